use super::{usable_width, CuttingStock, Pattern};

use crate::error::{ColGenError, ProblemKind};
use crate::problem::{Bound, ConstraintOp, Problem};
use crate::solver::IpSolver;
use crate::solvers::integer::BranchAndBoundSolver;

use log::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    pub pattern: Pattern,
    /// `1 - dot(duals, pattern)`, negative if the pattern improves the master problem.
    pub reduced_cost: f64,
}

/// Proposes the pattern with the smallest reduced cost for the given shadow prices.
pub trait Pricer {
    fn price(&self, instance: &CuttingStock, duals: &[f64]) -> Result<PricingResult, ColGenError>;
}

/// Prices by solving the knapsack
///
/// ```text
/// minimize    1 - sum_i dual_i a_i
/// subject to  sum_i width_i a_i <= roll_width
///             a_i in {0, 1, ..., floor(roll_width / width_i)}
/// ```
///
/// with an integer program solver. The constant is left out of the model and added back
/// to the reduced cost. Capacity and bounds allow the same rounding slack as
/// [`Pattern::fits`], so no pattern that fits is cut off.
#[derive(Debug, Clone)]
pub struct IntegerProgramPricer<I = BranchAndBoundSolver> {
    ip_solver: I,
}

impl std::default::Default for IntegerProgramPricer<BranchAndBoundSolver> {
    fn default() -> Self {
        Self::new(BranchAndBoundSolver::default())
    }
}

impl<I: IpSolver> IntegerProgramPricer<I> {
    pub fn new(ip_solver: I) -> Self {
        Self { ip_solver }
    }

    pub fn pricing_problem(
        instance: &CuttingStock,
        duals: &[f64],
    ) -> Result<Problem, ColGenError> {
        if duals.len() != instance.num_items() {
            return Err(ColGenError::invalid_input(format!(
                "got {} duals for {} items",
                duals.len(),
                instance.num_items()
            )));
        }

        let capacity = usable_width(instance.roll_width());
        let mut prob = Problem::new();

        let vars = instance
            .item_widths()
            .iter()
            .zip(duals)
            .map(|(&width, &dual)| {
                let max_count = (capacity / width).floor();
                prob.add_integer_var(-dual, Bound::TwoSided(0., max_count), None)
            })
            .collect::<Result<Vec<_>, _>>()?;

        prob.add_constraint(
            vars.into_iter().zip(instance.item_widths().iter().copied()).collect(),
            ConstraintOp::Lte,
            capacity,
        )?;

        Ok(prob)
    }
}

impl<I: IpSolver> Pricer for IntegerProgramPricer<I> {
    fn price(&self, instance: &CuttingStock, duals: &[f64]) -> Result<PricingResult, ColGenError> {
        let prob = Self::pricing_problem(instance, duals)?;

        let sol = self
            .ip_solver
            .solve_ip(&prob)?
            .into_optimal(ProblemKind::Pricing)?;

        //the solver returns integral values for integer variables
        let pattern = Pattern::new(
            sol.x()
                .iter()
                .map(|&count| count.round().max(0.) as u32)
                .collect(),
        );

        let reduced_cost = 1. - pattern
            .counts()
            .iter()
            .zip(duals)
            .map(|(&count, dual)| f64::from(count) * dual)
            .sum::<f64>();

        trace!(
            "pricing found {} with reduced cost {} (IP objective {})",
            pattern,
            reduced_cost,
            sol.obj()
        );

        Ok(PricingResult {
            pattern,
            reduced_cost,
        })
    }
}
