//! Post-optimal sensitivity analysis of a linear program.
//!
//! All ranges describe how far a single coefficient may move while the optimal basis
//! stays the same, so the reported shadow prices and reduced costs remain valid.

#![allow(non_snake_case)]

use crate::error::ColGenError;
use crate::problem::{ConstraintId, ConstraintOp, Problem, VariableId};
use crate::solver::Solution;
use crate::standard_form::{BasisFactor, NonbasicBound};
use crate::util::{EPS, PIVOT_EPS};

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSensitivity {
    pub id: ConstraintId,
    pub op: ConstraintOp,
    pub rhs: f64,
    /// `rhs - lhs` at the optimum.
    pub slack: f64,
    pub shadow_price: f64,
    /// Right-hand side values for which the shadow price stays valid.
    pub rhs_range: (f64, f64),
}

impl ConstraintSensitivity {
    pub fn is_binding(&self) -> bool {
        self.slack.abs() < EPS * self.rhs.abs().max(1.)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSensitivity {
    pub id: VariableId,
    pub name: Option<String>,
    pub value: f64,
    pub reduced_cost: f64,
    pub is_basic: bool,
    pub obj_coeff: f64,
    /// Objective coefficients for which the current solution stays optimal.
    pub obj_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityReport {
    pub constraints: Vec<ConstraintSensitivity>,
    pub variables: Vec<VariableSensitivity>,
}

impl SensitivityReport {
    pub fn new(prob: &Problem, sol: &Solution) -> Result<Self, ColGenError> {
        let std_form = &sol.std_form;

        if std_form.num_vars != prob.vars().len() || std_form.rows() != prob.constraints().len()
        {
            return Err(ColGenError::invalid_input(
                "solution does not belong to this problem".to_string(),
            ));
        }

        let factor = if sol.basis().is_empty() {
            None
        } else {
            Some(BasisFactor::new(std_form, sol.basis())?)
        };

        let x = sol.x();

        let constraints = prob
            .constraints()
            .iter()
            .enumerate()
            .map(|(i, constraint)| {
                let rhs_range = match &factor {
                    Some(factor) => Self::rhs_range(sol, factor, i)?,
                    None => (f64::NEG_INFINITY, f64::INFINITY),
                };

                Ok(ConstraintSensitivity {
                    id: ConstraintId::from(i),
                    op: constraint.op,
                    rhs: constraint.rhs,
                    slack: constraint.rhs - constraint.lhs(x),
                    shadow_price: sol.dual()[i],
                    rhs_range: (constraint.rhs + rhs_range.0, constraint.rhs + rhs_range.1),
                })
            })
            .collect::<Result<Vec<_>, ColGenError>>()?;

        let variables = prob
            .vars()
            .iter()
            .enumerate()
            .map(|(j, var)| {
                let delta = match (&factor, sol.basis().iter().position(|b| b.index == j)) {
                    (Some(factor), Some(k)) => Self::basic_cost_range(sol, factor, k)?,
                    _ => Self::nonbasic_cost_range(sol, j),
                };

                Ok(VariableSensitivity {
                    id: var.id,
                    name: var.name.clone(),
                    value: x[j],
                    reduced_cost: sol.d[j],
                    is_basic: sol.is_basic(j),
                    obj_coeff: var.obj_coeff,
                    obj_range: (var.obj_coeff + delta.0, var.obj_coeff + delta.1),
                })
            })
            .collect::<Result<Vec<_>, ColGenError>>()?;

        Ok(Self {
            constraints,
            variables,
        })
    }

    //allowed change of b_i: basic values move along A_B^-1 e_i and must stay within bounds
    fn rhs_range(
        sol: &Solution,
        factor: &BasisFactor,
        i: usize,
    ) -> Result<(f64, f64), ColGenError> {
        let std_form = &sol.std_form;
        let mut e_i = nalgebra::DVector::zeros(std_form.rows());
        e_i[i] = 1.;

        let g = factor.solve(&e_i)?;
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;

        for (basic, &g_k) in sol.basis().iter().zip(g.iter()) {
            let bound = std_form.bounds[basic.index];
            let x_k = sol.point.x[basic.index];

            //x_k + delta * g_k must stay in [lower, upper]
            if g_k > PIVOT_EPS {
                lo = lo.max((bound.lower() - x_k) / g_k);
                hi = hi.min((bound.upper() - x_k) / g_k);
            } else if g_k < -PIVOT_EPS {
                lo = lo.max((bound.upper() - x_k) / g_k);
                hi = hi.min((bound.lower() - x_k) / g_k);
            }
        }

        Ok((lo.min(0.), hi.max(0.)))
    }

    //allowed change of c_j for the basic variable at position k of the basis
    fn basic_cost_range(
        sol: &Solution,
        factor: &BasisFactor,
        k: usize,
    ) -> Result<(f64, f64), ColGenError> {
        let std_form = &sol.std_form;
        let mut e_k = nalgebra::DVector::zeros(std_form.rows());
        e_k[k] = 1.;

        //changing c_j by delta changes every nonbasic reduced cost by -delta * alpha_l
        let rho = factor.solve_transpose(&e_k)?;
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;

        for nonbasic in sol.nonbasic() {
            let l = nonbasic.index;

            if std_form.bounds[l].is_fixed() {
                continue;
            }

            let alpha = std_form.A.column(l).dot(&rho);

            if alpha.abs() < PIVOT_EPS {
                continue;
            }

            let ratio = sol.d[l] / alpha;

            match nonbasic.bound {
                //d_l - delta * alpha >= 0
                NonbasicBound::Lower => {
                    if alpha > 0. {
                        hi = hi.min(ratio);
                    } else {
                        lo = lo.max(ratio);
                    }
                }

                //d_l - delta * alpha <= 0
                NonbasicBound::Upper => {
                    if alpha > 0. {
                        lo = lo.max(ratio);
                    } else {
                        hi = hi.min(ratio);
                    }
                }

                //d_l must stay zero
                NonbasicBound::Free => {
                    lo = lo.max(0.);
                    hi = hi.min(0.);
                }
            }
        }

        Ok((lo.min(0.), hi.max(0.)))
    }

    fn nonbasic_cost_range(sol: &Solution, j: usize) -> (f64, f64) {
        let d_j = sol.d[j];

        if sol.std_form.bounds[j].is_fixed() {
            return (f64::NEG_INFINITY, f64::INFINITY);
        }

        let at = sol
            .nonbasic()
            .iter()
            .find(|nonbasic| nonbasic.index == j)
            .map(|nonbasic| nonbasic.bound);

        match at {
            Some(NonbasicBound::Lower) => (-d_j, f64::INFINITY),
            Some(NonbasicBound::Upper) => (f64::NEG_INFINITY, -d_j),
            _ => (-d_j, -d_j),
        }
    }
}
