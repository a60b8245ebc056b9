use crate::error::ColGenError;
use crate::problem::{Bound, Problem, VariableId};
use crate::solver::{IntegerSolution, IpResult, IpSolver, LpSolver, SolverResult};
use crate::solvers::primal::primal_simplex_solver::PrimalSimplexSolver;
use crate::util::EPS;

use log::{debug, trace};

/// Depth-first branch and bound over LP relaxations.
///
/// Each node tightens the bounds of one integer variable. A node is pruned when its
/// relaxation is infeasible or cannot beat the incumbent; otherwise the most fractional
/// integer variable is split into `x <= floor(v)` and `x >= ceil(v)`.
#[derive(Debug, Clone)]
pub struct BranchAndBoundSolver<L = PrimalSimplexSolver> {
    lp_solver: L,
    max_nodes: usize,
    int_tol: f64,
}

impl std::default::Default for BranchAndBoundSolver<PrimalSimplexSolver> {
    fn default() -> Self {
        Self::new(PrimalSimplexSolver::default())
    }
}

#[derive(Debug)]
struct Node {
    bounds: Vec<Bound>,
    depth: usize,
}

impl<L: LpSolver> BranchAndBoundSolver<L> {
    pub fn new(lp_solver: L) -> Self {
        Self {
            lp_solver,
            max_nodes: 100_000,
            int_tol: 1e-6,
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_int_tol(mut self, int_tol: f64) -> Self {
        self.int_tol = int_tol;
        self
    }

    pub fn solve(&self, prob: &Problem) -> IpResult {
        let mut relaxation = prob.clone();
        let mut incumbent: Option<(Vec<f64>, f64)> = None;
        let mut nodes = 0usize;

        let mut stack = vec![Node {
            bounds: prob.vars().iter().map(|var| var.bound).collect(),
            depth: 0,
        }];

        while let Some(node) = stack.pop() {
            if nodes >= self.max_nodes {
                debug!("reached max nodes ({})", self.max_nodes);

                return Ok(SolverResult::MaxIter {
                    obj: incumbent.map_or(f64::INFINITY, |(_, obj)| obj),
                });
            }

            nodes += 1;

            for (i, bound) in node.bounds.iter().enumerate() {
                relaxation.set_bound(VariableId::from(i), *bound)?;
            }

            let sol = match self.lp_solver.solve_lp(&relaxation)? {
                SolverResult::Optimal(sol) => sol,
                SolverResult::Infeasible => {
                    trace!("node {} (depth {}) is infeasible", nodes, node.depth);
                    continue;
                }
                SolverResult::Unbounded => return Ok(SolverResult::Unbounded),
                SolverResult::MaxIter { .. } => {
                    return Err(ColGenError::solver(format!(
                        "LP relaxation at node {} reached maximum iterations",
                        nodes
                    )))
                }
            };

            if let Some((_, best_obj)) = &incumbent {
                if sol.obj() >= best_obj - EPS {
                    trace!("node {} pruned by bound {}", nodes, sol.obj());
                    continue;
                }
            }

            match self.most_fractional(prob, sol.x()) {
                Some((i, value)) => {
                    let var = &node.bounds[i];

                    //push the up branch last so it is explored first
                    for bound in [var.with_upper(value.floor()), var.with_lower(value.ceil())]
                        .iter()
                        .flatten()
                    {
                        let mut bounds = node.bounds.clone();
                        bounds[i] = *bound;

                        stack.push(Node {
                            bounds,
                            depth: node.depth + 1,
                        });
                    }
                }

                None => {
                    let x: Vec<_> = prob
                        .vars()
                        .iter()
                        .zip(sol.x())
                        .map(|(var, &x_i)| if var.integer { x_i.round() } else { x_i })
                        .collect();

                    let obj = prob.obj(&x);
                    debug!("new incumbent with objective {} at node {}", obj, nodes);
                    incumbent = Some((x, obj));
                }
            }
        }

        debug!("branch and bound explored {} nodes", nodes);

        Ok(match incumbent {
            Some((x, obj)) => SolverResult::Optimal(IntegerSolution::new(x, obj, nodes)),
            None => SolverResult::Infeasible,
        })
    }

    //integer variable furthest from an integer value, if any
    fn most_fractional(&self, prob: &Problem, x: &[f64]) -> Option<(usize, f64)> {
        prob.vars()
            .iter()
            .zip(x)
            .enumerate()
            .filter(|(_, (var, _))| var.integer)
            .map(|(i, (_, &x_i))| (i, x_i, (x_i - x_i.round()).abs()))
            .filter(|(_, _, frac)| *frac > self.int_tol)
            .max_by(|(i1, _, f1), (i2, _, f2)| {
                f1.partial_cmp(f2)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| i2.cmp(i1))
            })
            .map(|(i, x_i, _)| (i, x_i))
    }
}

impl<L: LpSolver> IpSolver for BranchAndBoundSolver<L> {
    fn solve_ip(&self, prob: &Problem) -> IpResult {
        self.solve(prob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ConstraintOp;

    #[test]
    fn binary_knapsack() {
        //maximize 5a + 4b + 3c subject to 2a + 3b + c <= 5
        let mut prob = Problem::new();
        let a = prob.add_integer_var(-5., Bound::TwoSided(0., 1.), None).unwrap();
        let b = prob.add_integer_var(-4., Bound::TwoSided(0., 1.), None).unwrap();
        let c = prob.add_integer_var(-3., Bound::TwoSided(0., 1.), None).unwrap();

        prob.add_constraint(vec![(a, 2.), (b, 3.), (c, 1.)], ConstraintOp::Lte, 5.)
            .unwrap();

        let sol = BranchAndBoundSolver::default()
            .solve(&prob)
            .unwrap()
            .optimal()
            .unwrap();

        assert_eq!(sol.obj(), -9.);
        assert_eq!(sol.x(), &[1., 1., 0.]);
        assert!(sol.nodes() > 1);
    }

    #[test]
    fn general_integers() {
        //maximize 3x + 2y subject to 4x + 3y <= 10
        let mut prob = Problem::new();
        let x = prob.add_integer_var(-3., Bound::Lower(0.), None).unwrap();
        let y = prob.add_integer_var(-2., Bound::Lower(0.), None).unwrap();

        prob.add_constraint(vec![(x, 4.), (y, 3.)], ConstraintOp::Lte, 10.)
            .unwrap();

        let sol = BranchAndBoundSolver::default()
            .solve(&prob)
            .unwrap()
            .optimal()
            .unwrap();

        assert_eq!(sol.obj(), -7.);
        assert_eq!(sol.x(), &[1., 2.]);
    }

    #[test]
    fn mixed_integer() {
        let mut prob = Problem::new();
        let x = prob.add_integer_var(-1., Bound::Lower(0.), None).unwrap();
        let y = prob.add_var(-2., Bound::TwoSided(0., 1.2), None).unwrap();

        prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Lte, 3.5)
            .unwrap();
        prob.add_constraint(vec![(x, 1.), (y, -1.)], ConstraintOp::Lte, 0.5)
            .unwrap();

        let sol = BranchAndBoundSolver::default()
            .solve(&prob)
            .unwrap()
            .optimal()
            .unwrap();

        assert!((sol.obj() + 3.4).abs() < 1e-9);
        assert_eq!(sol.x()[0], 1.);
        assert!((sol.x()[1] - 1.2).abs() < 1e-9);
    }

    #[test]
    fn integer_infeasible() {
        let mut prob = Problem::new();
        let x = prob.add_integer_var(1., Bound::Lower(0.), None).unwrap();
        prob.add_constraint(vec![(x, 2.)], ConstraintOp::Eq, 1.)
            .unwrap();

        let result = BranchAndBoundSolver::default().solve(&prob).unwrap();
        assert!(matches!(result, SolverResult::Infeasible));
    }

    #[test]
    fn node_limit() {
        let mut prob = Problem::new();
        let x = prob.add_integer_var(1., Bound::Lower(0.), None).unwrap();
        prob.add_constraint(vec![(x, 2.)], ConstraintOp::Eq, 1.)
            .unwrap();

        let result = BranchAndBoundSolver::default()
            .with_max_nodes(1)
            .solve(&prob)
            .unwrap();

        assert!(matches!(result, SolverResult::MaxIter { .. }));
    }
}
