use super::{CuttingStock, Pattern};

use crate::error::{ColGenError, ProblemKind};
use crate::problem::{Bound, ConstraintId, ConstraintOp, Problem, VariableId};
use crate::solver::LpSolver;

use log::trace;
use std::collections::HashMap;

/// Stable index of a pattern in the master problem.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(usize);

impl std::convert::From<PatternId> for usize {
    fn from(id: PatternId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "pattern[{}]", self.0)
    }
}

/// The restricted master LP: how many rolls to cut with each known pattern.
///
/// ```text
/// minimize    sum_j x_j
/// subject to  sum_j a_ij x_j = demand_i   for every item i
///             0 <= x_j <= quantity_upper_bound
/// ```
///
/// Patterns are only ever appended.
#[derive(Debug, Clone)]
pub struct MasterProblem {
    prob: Problem,
    patterns: Vec<Pattern>,
    vars: Vec<VariableId>,
    demand_rows: Vec<ConstraintId>,
    index: HashMap<Pattern, PatternId>,
    quantity_upper_bound: f64,
}

#[derive(Debug, Clone)]
pub struct MasterSolution {
    pub objective: f64,
    /// One entry per pattern, in [`PatternId`] order.
    pub quantities: Vec<f64>,
    /// One shadow price per demand row.
    pub duals: Vec<f64>,
}

impl MasterProblem {
    pub fn new(instance: &CuttingStock, quantity_upper_bound: f64) -> Result<Self, ColGenError> {
        if !quantity_upper_bound.is_finite() || quantity_upper_bound <= 0. {
            return Err(ColGenError::invalid_input(format!(
                "quantity upper bound must be positive, got {}",
                quantity_upper_bound
            )));
        }

        let mut prob = Problem::new();

        let demand_rows = instance
            .demand()
            .iter()
            .map(|&demand| prob.add_constraint(vec![], ConstraintOp::Eq, demand))
            .collect::<Result<Vec<_>, _>>()?;

        let mut master = Self {
            prob,
            patterns: vec![],
            vars: vec![],
            demand_rows,
            index: HashMap::new(),
            quantity_upper_bound,
        };

        for pattern in instance.initial_patterns() {
            master.add_pattern(pattern.clone())?;
        }

        Ok(master)
    }

    /// Appends a quantity variable for `pattern` and patches its counts into the demand rows.
    pub fn add_pattern(&mut self, pattern: Pattern) -> Result<PatternId, ColGenError> {
        if pattern.len() != self.demand_rows.len() {
            return Err(ColGenError::invalid_input(format!(
                "pattern {} has {} entries, expected {}",
                pattern,
                pattern.len(),
                self.demand_rows.len()
            )));
        }

        let coeffs = self
            .demand_rows
            .iter()
            .zip(pattern.counts())
            .filter(|(_, count)| **count > 0)
            .map(|(&row, &count)| (row, f64::from(count)))
            .collect();

        let var = self.prob.add_column(
            1.,
            Bound::TwoSided(0., self.quantity_upper_bound),
            None,
            coeffs,
        )?;

        let id = PatternId(self.patterns.len());
        trace!("{} = {} uses {:?}", id, pattern, var);

        self.index.entry(pattern.clone()).or_insert(id);
        self.patterns.push(pattern);
        self.vars.push(var);

        Ok(id)
    }

    /// First id under which `pattern` was added, if any.
    pub fn find(&self, pattern: &Pattern) -> Option<PatternId> {
        self.index.get(pattern).copied()
    }

    #[inline]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[inline]
    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The underlying LP, as handed to the solver.
    #[inline]
    pub fn problem(&self) -> &Problem {
        &self.prob
    }

    pub fn solve<L: LpSolver>(&self, lp_solver: &L) -> Result<MasterSolution, ColGenError> {
        let sol = lp_solver
            .solve_lp(&self.prob)?
            .into_optimal(ProblemKind::Master)?;

        let x = sol.x();
        let y = sol.dual();

        Ok(MasterSolution {
            objective: sol.obj(),
            quantities: self.vars.iter().map(|&var| x[usize::from(var)]).collect(),
            duals: self
                .demand_rows
                .iter()
                .map(|&row| y[usize::from(row)])
                .collect(),
        })
    }
}
