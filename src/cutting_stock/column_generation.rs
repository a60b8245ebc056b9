use super::master::{MasterProblem, MasterSolution, PatternId};
use super::pricing::{IntegerProgramPricer, Pricer};
use super::{CuttingStock, Pattern};

use crate::error::ColGenError;
use crate::solver::LpSolver;
use crate::solvers::primal::primal_simplex_solver::PrimalSimplexSolver;

use log::{debug, info, warn};

//quantities at or below this are treated as unused when rounding
const QUANTITY_EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGenerationOptions {
    /// Maximum number of master solves, unlimited if `None`.
    pub max_iter: Option<u64>,
    /// The loop stops once the best reduced cost is at least this value.
    pub tolerance: f64,
    /// Stop when pricing returns a pattern the master problem already has. Such a stop
    /// is flagged by [`ColumnGenerationResult::stopped_on_duplicate`], since the last
    /// reduced cost is still below the tolerance and the objective is not certified.
    pub deduplicate: bool,
    pub quantity_upper_bound: f64,
}

impl std::default::Default for ColumnGenerationOptions {
    fn default() -> Self {
        Self {
            max_iter: Some(1000),
            tolerance: -1e-7,
            deduplicate: true,
            quantity_upper_bound: 1e10,
        }
    }
}

impl ColumnGenerationOptions {
    pub fn with_max_iter(mut self, max_iter: Option<u64>) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_quantity_upper_bound(mut self, quantity_upper_bound: f64) -> Self {
        self.quantity_upper_bound = quantity_upper_bound;
        self
    }

    fn validate(&self) -> Result<(), ColGenError> {
        if self.max_iter == Some(0) {
            return Err(ColGenError::invalid_input(
                "max_iter must allow at least one iteration".to_string(),
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance > 0. {
            return Err(ColGenError::invalid_input(format!(
                "tolerance must be finite and nonpositive, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }
}

/// One master solve and the pricing step that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: u64,
    pub objective: f64,
    pub reduced_cost: f64,
    /// The pattern appended to the master problem, `None` on the final iteration.
    pub added: Option<PatternId>,
}

#[derive(Debug, Clone)]
pub struct ColumnGenerationResult {
    /// Every pattern of the final master problem, in [`PatternId`] order.
    pub patterns: Vec<Pattern>,
    /// Optimal, possibly fractional, number of rolls cut with each pattern.
    pub quantities: Vec<f64>,
    pub objective: f64,
    /// Number of master solves.
    pub iterations: u64,
    /// Shadow prices of the demand rows at the final master solve.
    pub duals: Vec<f64>,
    pub history: Vec<IterationRecord>,
    /// `true` if the loop ended because pricing repeated an existing pattern rather than
    /// because every reduced cost reached the tolerance.
    pub stopped_on_duplicate: bool,
}

impl ColumnGenerationResult {
    /// Patterns with a positive quantity.
    pub fn used_patterns(&self) -> impl Iterator<Item = (&Pattern, f64)> {
        self.patterns
            .iter()
            .zip(self.quantities.iter().copied())
            .filter(|(_, quantity)| *quantity > QUANTITY_EPS)
    }

    /// Integer plan that cuts every used pattern a whole number of times.
    ///
    /// Rounding up never uncovers demand, so the plan is always feasible, though it may
    /// produce more pieces than demanded.
    pub fn round_up(&self) -> CuttingPlan {
        CuttingPlan {
            cuts: self
                .used_patterns()
                .map(|(pattern, quantity)| {
                    (pattern.clone(), (quantity - QUANTITY_EPS).ceil() as u64)
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuttingPlan {
    pub cuts: Vec<(Pattern, u64)>,
}

impl CuttingPlan {
    pub fn total_rolls(&self) -> u64 {
        self.cuts.iter().map(|(_, rolls)| rolls).sum()
    }

    /// Pieces of each item produced by the plan.
    pub fn produced(&self, num_items: usize) -> Vec<u64> {
        let mut produced = vec![0; num_items];

        for (pattern, rolls) in &self.cuts {
            for (total, &count) in produced.iter_mut().zip(pattern.counts()) {
                *total += u64::from(count) * rolls;
            }
        }

        produced
    }
}

impl std::fmt::Display for CuttingPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (pattern, rolls) in &self.cuts {
            writeln!(f, "{} x {}", rolls, pattern)?;
        }

        write!(f, "total rolls: {}", self.total_rolls())
    }
}

/// Alternates master and pricing solves until no pattern with a negative reduced cost remains.
#[derive(Debug, Clone)]
pub struct ColumnGenerationSolver<L = PrimalSimplexSolver, P = IntegerProgramPricer> {
    lp_solver: L,
    pricer: P,
    options: ColumnGenerationOptions,
}

impl std::default::Default for ColumnGenerationSolver<PrimalSimplexSolver, IntegerProgramPricer> {
    fn default() -> Self {
        Self::new(
            PrimalSimplexSolver::default(),
            IntegerProgramPricer::default(),
            ColumnGenerationOptions::default(),
        )
    }
}

impl<L: LpSolver, P: Pricer> ColumnGenerationSolver<L, P> {
    pub fn new(lp_solver: L, pricer: P, options: ColumnGenerationOptions) -> Self {
        Self {
            lp_solver,
            pricer,
            options,
        }
    }

    pub fn with_options(mut self, options: ColumnGenerationOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &ColumnGenerationOptions {
        &self.options
    }

    pub fn solve(&self, instance: &CuttingStock) -> Result<ColumnGenerationResult, ColGenError> {
        self.options.validate()?;

        let mut master = MasterProblem::new(instance, self.options.quantity_upper_bound)?;
        let mut history = vec![];
        let mut iteration = 0;

        debug!(
            "starting column generation with {} items and {} initial patterns",
            instance.num_items(),
            master.len()
        );

        loop {
            iteration += 1;

            let sol = master.solve(&self.lp_solver)?;
            let priced = self.pricer.price(instance, &sol.duals)?;

            debug!(
                "iteration {}: master objective {}, best reduced cost {} for {}",
                iteration, sol.objective, priced.reduced_cost, priced.pattern
            );

            let mut record = IterationRecord {
                iteration,
                objective: sol.objective,
                reduced_cost: priced.reduced_cost,
                added: None,
            };

            if priced.reduced_cost >= self.options.tolerance {
                info!(
                    "column generation converged after {} iterations with objective {}",
                    iteration, sol.objective
                );

                history.push(record);
                return Ok(Self::result(&master, sol, iteration, history, false));
            }

            if self.options.deduplicate {
                if let Some(id) = master.find(&priced.pattern) {
                    warn!(
                        "pricing returned {} = {} again with reduced cost {}, stopping",
                        id, priced.pattern, priced.reduced_cost
                    );

                    history.push(record);
                    return Ok(Self::result(&master, sol, iteration, history, true));
                }
            }

            if self.options.max_iter.map_or(false, |max| iteration >= max) {
                warn!(
                    "column generation stopped at the iteration limit ({}) with objective {}",
                    iteration, sol.objective
                );

                history.push(record);
                return Err(ColGenError::NotConverged(Box::new(Self::result(
                    &master, sol, iteration, history, false,
                ))));
            }

            if priced.pattern.is_empty()
                || !priced
                    .pattern
                    .fits(instance.item_widths(), instance.roll_width())
            {
                return Err(ColGenError::solver(format!(
                    "pricing returned {} which is not a valid pattern for a roll of width {}",
                    priced.pattern,
                    instance.roll_width()
                )));
            }

            let id = master.add_pattern(priced.pattern)?;
            debug!("added {}", id);

            record.added = Some(id);
            history.push(record);
        }
    }

    fn result(
        master: &MasterProblem,
        sol: MasterSolution,
        iterations: u64,
        history: Vec<IterationRecord>,
        stopped_on_duplicate: bool,
    ) -> ColumnGenerationResult {
        ColumnGenerationResult {
            patterns: master.patterns().to_vec(),
            quantities: sol.quantities,
            objective: sol.objective,
            iterations,
            duals: sol.duals,
            history,
            stopped_on_duplicate,
        }
    }
}
