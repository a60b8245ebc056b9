//! One-dimensional cutting stock solved by column generation.
//!
//! Rolls of a fixed width are cut into items of smaller widths. A [`Pattern`] says how many
//! pieces of every item one roll yields; the master LP picks how often to cut each pattern
//! and the pricing problem proposes new patterns from the master's shadow prices.

mod column_generation;
mod master;
mod pricing;

pub use column_generation::{
    ColumnGenerationOptions, ColumnGenerationResult, ColumnGenerationSolver, CuttingPlan,
    IterationRecord,
};
pub use master::{MasterProblem, MasterSolution, PatternId};
pub use pricing::{IntegerProgramPricer, Pricer, PricingResult};

use crate::error::ColGenError;
use crate::util::EPS;

/// Number of pieces of each item cut from a single roll.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<u32>);

impl Pattern {
    pub fn new(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    /// One piece of `item` and nothing else.
    pub fn unit(num_items: usize, item: usize) -> Self {
        let mut counts = vec![0; num_items];
        counts[item] = 1;
        Self(counts)
    }

    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    /// Total width consumed by the pattern.
    pub fn width(&self, item_widths: &[f64]) -> f64 {
        self.0
            .iter()
            .zip(item_widths)
            .map(|(&count, width)| f64::from(count) * width)
            .sum()
    }

    pub fn fits(&self, item_widths: &[f64], roll_width: f64) -> bool {
        self.len() == item_widths.len() && self.width(item_widths) <= usable_width(roll_width)
    }
}

//roll width plus the rounding slack a pattern may use, so 7 x 0.1 fits in 0.7
pub(crate) fn usable_width(roll_width: f64) -> f64 {
    roll_width + EPS * roll_width.max(1.)
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[")?;

        for (i, count) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{}", count)?;
        }

        write!(f, "]")
    }
}

/// A validated cutting stock instance.
#[derive(Debug, Clone)]
pub struct CuttingStock {
    demand: Vec<f64>,
    item_widths: Vec<f64>,
    roll_width: f64,
    initial_patterns: Vec<Pattern>,
}

impl CuttingStock {
    /// Creates an instance whose initial patterns cut a single piece of one item each.
    pub fn new(
        demand: Vec<f64>,
        item_widths: Vec<f64>,
        roll_width: f64,
    ) -> Result<Self, ColGenError> {
        if !roll_width.is_finite() || roll_width <= 0. {
            return Err(ColGenError::invalid_input(format!(
                "roll width must be positive, got {}",
                roll_width
            )));
        }

        if demand.is_empty() {
            return Err(ColGenError::invalid_input(
                "at least one item is required".to_string(),
            ));
        }

        if demand.len() != item_widths.len() {
            return Err(ColGenError::invalid_input(format!(
                "got {} demands but {} item widths",
                demand.len(),
                item_widths.len()
            )));
        }

        if let Some((i, d)) = demand
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d <= 0.)
        {
            return Err(ColGenError::invalid_input(format!(
                "demand of item {} must be positive, got {}",
                i, d
            )));
        }

        if let Some((i, w)) = item_widths
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w <= 0.)
        {
            return Err(ColGenError::invalid_input(format!(
                "width of item {} must be positive, got {}",
                i, w
            )));
        }

        if let Some((i, w)) = item_widths
            .iter()
            .enumerate()
            .find(|(_, w)| **w > roll_width)
        {
            return Err(ColGenError::invalid_input(format!(
                "item {} of width {} does not fit a roll of width {}",
                i, w, roll_width
            )));
        }

        let num_items = demand.len();

        Ok(Self {
            demand,
            item_widths,
            roll_width,
            initial_patterns: (0..num_items).map(|i| Pattern::unit(num_items, i)).collect(),
        })
    }

    /// Replaces the initial patterns of the master problem.
    ///
    /// The patterns are not required to cover every item; if they don't, the first master
    /// solve fails with an infeasible master problem.
    pub fn with_initial_patterns(mut self, patterns: Vec<Pattern>) -> Result<Self, ColGenError> {
        if patterns.is_empty() {
            return Err(ColGenError::invalid_input(
                "at least one initial pattern is required".to_string(),
            ));
        }

        for pattern in &patterns {
            if pattern.len() != self.num_items() {
                return Err(ColGenError::invalid_input(format!(
                    "pattern {} has {} entries, expected {}",
                    pattern,
                    pattern.len(),
                    self.num_items()
                )));
            }

            if !pattern.fits(&self.item_widths, self.roll_width) {
                return Err(ColGenError::invalid_input(format!(
                    "pattern {} of width {} does not fit a roll of width {}",
                    pattern,
                    pattern.width(&self.item_widths),
                    self.roll_width
                )));
            }
        }

        self.initial_patterns = patterns;
        Ok(self)
    }

    #[inline]
    pub fn num_items(&self) -> usize {
        self.demand.len()
    }

    #[inline]
    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    #[inline]
    pub fn item_widths(&self) -> &[f64] {
        &self.item_widths
    }

    #[inline]
    pub fn roll_width(&self) -> f64 {
        self.roll_width
    }

    #[inline]
    pub fn initial_patterns(&self) -> &[Pattern] {
        &self.initial_patterns
    }
}
