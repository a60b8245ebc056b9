#![allow(non_snake_case)]

use super::primal_problem::{PrimalPhase1, PrimalPhase2, PrimalProblem};

use crate::error::ColGenError;
use crate::problem::Problem;
use crate::solver::{LpResult, LpSolver, Solution, SolutionStatus, SolverResult};
use crate::solvers::trivial::solve_trivial_problem;
use crate::standard_form::{BasisFactor, Nonbasic, NonbasicBound, Point, StandardForm};
use crate::util::{EPS, FEAS_TOL, PIVOT_EPS};

use log::{debug, trace};

//consecutive degenerate pivots tolerated before switching to Bland's rule
const MAX_DEGENERATE_PIVOTS: u64 = 50;

/// Two-phase revised primal simplex for bounded variables.
#[derive(Debug, Clone)]
pub struct PrimalSimplexSolver {
    max_iter: u64,
}

impl std::default::Default for PrimalSimplexSolver {
    fn default() -> Self {
        Self { max_iter: 10_000 }
    }
}

impl PrimalSimplexSolver {
    pub fn new(max_iter: Option<u64>) -> Self {
        Self {
            max_iter: max_iter.unwrap_or(u64::MAX),
        }
    }

    pub fn solve(&self, prob: &Problem) -> LpResult {
        let std_form = StandardForm::from(prob);

        if std_form.rows() == 0 {
            debug!("no constraints, solving trivial problem");
            return solve_trivial_problem(std_form);
        }

        let feas_tol = FEAS_TOL * std_form.b.amax().max(1.);
        let mut phase_1 = PrimalPhase1::from(std_form);

        match self.solve_with_initial(&mut phase_1)? {
            SolutionStatus::Optimal => {
                let obj = phase_1.obj();

                if obj > feas_tol {
                    debug!("phase 1 objective {} is positive, problem is infeasible", obj);
                    return Ok(SolverResult::Infeasible);
                }

                debug!("found feasible point");
            }

            SolutionStatus::Infeasible => return Ok(SolverResult::Infeasible),

            SolutionStatus::Unbounded => {
                return Err(ColGenError::solver(
                    "phase 1 problem reported unbounded".to_string(),
                ))
            }

            SolutionStatus::MaxIter => {
                debug!("phase 1 reached maximum iterations");
                return Ok(SolverResult::MaxIter { obj: f64::INFINITY });
            }
        }

        let mut phase_2 = PrimalPhase2::from(phase_1);

        Ok(match self.solve_with_initial(&mut phase_2)? {
            SolutionStatus::Optimal => {
                SolverResult::Optimal(Solution::new(phase_2.std_form, phase_2.point)?)
            }

            SolutionStatus::Infeasible => SolverResult::Infeasible,
            SolutionStatus::Unbounded => SolverResult::Unbounded,
            SolutionStatus::MaxIter => SolverResult::MaxIter { obj: phase_2.obj() },
        })
    }

    /// Runs simplex iterations from the basic point held by `prob` until it is optimal.
    pub fn solve_with_initial<P: PrimalProblem>(
        &self,
        prob: &mut P,
    ) -> Result<SolutionStatus, ColGenError> {
        let (std_form, pt) = prob.unpack();
        let m = std_form.rows();

        if pt.B.len() != m {
            return Err(ColGenError::solver(format!(
                "invalid B, has {} elements but {} expected",
                pt.B.len(),
                m,
            )));
        }

        if pt.B.len() + pt.N.len() != std_form.cols() {
            return Err(ColGenError::solver(format!(
                "invalid N, has {} elements but {} expected",
                pt.N.len(),
                std_form.cols() - m,
            )));
        }

        let mut degenerate_pivots = 0u64;
        let mut iter = 0u64;

        loop {
            if iter >= self.max_iter {
                debug!("reached max iterations");
                return Ok(SolutionStatus::MaxIter);
            }

            iter += 1;

            //TODO update the LU factors after each pivot instead of refactoring A_B
            let factor = BasisFactor::new(std_form, &pt.B)?;
            Self::update_basic_values(std_form, &factor, pt)?;

            trace!("obj: {}", std_form.obj(&pt.x));

            let c_B = nalgebra::DVector::from_iterator(
                pt.B.len(),
                pt.B.iter().map(|b| std_form.c[b.index]),
            );
            let y = factor.solve_transpose(&c_B)?;

            let bland = degenerate_pivots > MAX_DEGENERATE_PIVOTS;

            let (entering, direction) = match Self::choose_entering(std_form, &y, &pt.N, bland)
            {
                Some(entering) => entering,
                None => return Ok(SolutionStatus::Optimal),
            };

            let q = pt.N[entering].index;
            let w = factor.solve(&std_form.A.column(q).clone_owned())?;

            let step = match Self::ratio_test(std_form, pt, q, direction, &w, bland) {
                Some(step) => step,
                None => return Ok(SolutionStatus::Unbounded),
            };

            trace!(
                "entering: {}, direction: {}, step: {:?}",
                q,
                direction,
                step
            );

            if step.length < EPS {
                degenerate_pivots += 1;
            } else {
                degenerate_pivots = 0;
            }

            Self::pivot(std_form, pt, entering, direction, &w, step);
        }
    }

    //x_B = A_B^-1 (b - A_N x_N), recomputed every iteration so errors do not accumulate
    fn update_basic_values(
        std_form: &StandardForm,
        factor: &BasisFactor,
        pt: &mut Point,
    ) -> Result<(), ColGenError> {
        let mut b_tilde = std_form.b.clone();

        for nonbasic in &pt.N {
            let x_j = pt.x[nonbasic.index];

            if x_j != 0. {
                b_tilde.axpy(-x_j, &std_form.A.column(nonbasic.index), 1.);
            }
        }

        let x_B = factor.solve(&b_tilde)?;

        for (basic, &x_i) in pt.B.iter().zip(x_B.iter()) {
            pt.x[basic.index] = x_i;
        }

        Ok(())
    }

    //returns the position in N of the entering column and the direction it moves in
    fn choose_entering(
        std_form: &StandardForm,
        y: &nalgebra::DVector<f64>,
        N: &[Nonbasic],
        bland: bool,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(f64, usize, f64)> = None;

        for (pos, nonbasic) in N.iter().enumerate() {
            let j = nonbasic.index;

            if std_form.bounds[j].is_fixed() {
                continue;
            }

            let d_j = std_form.c[j] - std_form.A.column(j).dot(y);

            let (violation, direction) = match nonbasic.bound {
                NonbasicBound::Lower if d_j < -EPS => (-d_j, 1.),
                NonbasicBound::Upper if d_j > EPS => (d_j, -1.),
                NonbasicBound::Free if d_j.abs() > EPS => (d_j.abs(), -d_j.signum()),
                _ => continue,
            };

            let replace = match best {
                None => true,

                //smallest subscript rule
                Some((_, best_pos, _)) if bland => j < N[best_pos].index,

                Some((best_violation, best_pos, _)) => {
                    violation > best_violation + EPS
                        || ((violation - best_violation).abs() <= EPS && j < N[best_pos].index)
                }
            };

            if replace {
                best = Some((violation, pos, direction));
            }
        }

        best.map(|(_violation, pos, direction)| (pos, direction))
    }

    //None if the step is unbounded
    fn ratio_test(
        std_form: &StandardForm,
        pt: &Point,
        q: usize,
        direction: f64,
        w: &nalgebra::DVector<f64>,
        bland: bool,
    ) -> Option<Step> {
        //the entering variable itself may hit its opposite bound first
        let entering_bound = std_form.bounds[q];
        let mut length = entering_bound.upper() - entering_bound.lower();
        let mut leaving: Option<(usize, NonbasicBound)> = None;

        for (k, basic) in pt.B.iter().enumerate() {
            //change of x_k per unit step of the entering variable
            let delta_k = -direction * w[k];
            let x_k = pt.x[basic.index];
            let bound = std_form.bounds[basic.index];

            let (t_k, at) = if delta_k < -PIVOT_EPS && bound.lower().is_finite() {
                (((bound.lower() - x_k) / delta_k).max(0.), NonbasicBound::Lower)
            } else if delta_k > PIVOT_EPS && bound.upper().is_finite() {
                (((bound.upper() - x_k) / delta_k).max(0.), NonbasicBound::Upper)
            } else {
                continue;
            };

            let replace = if t_k < length - EPS {
                true
            } else if (t_k - length).abs() <= EPS {
                match leaving {
                    //prefer the bound flip on ties, no basis change needed
                    None => false,
                    Some((prev, _)) if bland => basic.index < pt.B[prev].index,
                    Some((prev, _)) => delta_k.abs() > w[prev].abs(),
                }
            } else {
                false
            };

            if replace {
                length = length.min(t_k);
                leaving = Some((k, at));
            }
        }

        if length.is_infinite() {
            None
        } else {
            Some(Step { length, leaving })
        }
    }

    fn pivot(
        std_form: &StandardForm,
        pt: &mut Point,
        entering: usize,
        direction: f64,
        w: &nalgebra::DVector<f64>,
        step: Step,
    ) {
        let q = pt.N[entering].index;

        pt.x[q] += direction * step.length;

        for (basic, &w_k) in pt.B.iter().zip(w.iter()) {
            pt.x[basic.index] -= direction * w_k * step.length;
        }

        match step.leaving {
            Some((k, at)) => {
                let leaving = pt.B[k].index;
                let bound = std_form.bounds[leaving];

                //snap onto the bound to avoid drift
                pt.x[leaving] = match at {
                    NonbasicBound::Lower => bound.lower(),
                    _ => bound.upper(),
                };

                pt.B[k].index = q;
                pt.N[entering] = Nonbasic::new(leaving, at);
            }

            None => {
                //nonbasic went from lower to upper bound, or vice versa
                let bound = std_form.bounds[q];
                let nonbasic = &mut pt.N[entering];

                match nonbasic.bound {
                    NonbasicBound::Lower => {
                        nonbasic.bound = NonbasicBound::Upper;
                        pt.x[q] = bound.upper();
                    }

                    NonbasicBound::Upper => {
                        nonbasic.bound = NonbasicBound::Lower;
                        pt.x[q] = bound.lower();
                    }

                    //free variables have an infinite range, so they always pivot in
                    NonbasicBound::Free => unreachable!("free variable cannot flip bounds"),
                }
            }
        }
    }
}

impl LpSolver for PrimalSimplexSolver {
    fn solve_lp(&self, prob: &Problem) -> LpResult {
        self.solve(prob)
    }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    length: f64,
    //position in B of the leaving variable and the bound it leaves at
    leaving: Option<(usize, NonbasicBound)>,
}
