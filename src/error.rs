use crate::cutting_stock::ColumnGenerationResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColGenError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} problem is infeasible")]
    Infeasible(ProblemKind),

    #[error("{0} problem is unbounded")]
    Unbounded(ProblemKind),

    #[error(
        "column generation did not converge after {} iterations (objective: {})",
        .0.iterations,
        .0.objective
    )]
    NotConverged(Box<ColumnGenerationResult>),

    #[error("{0}")]
    Solver(String),
}

impl ColGenError {
    pub fn invalid_input(msg: String) -> Self {
        Self::InvalidInput(msg)
    }

    pub fn solver(msg: String) -> Self {
        Self::Solver(msg)
    }
}

/// Which model a solver failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Master,
    Pricing,
    Linear,
    Integer,
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProblemKind::Master => write!(f, "master"),
            ProblemKind::Pricing => write!(f, "pricing"),
            ProblemKind::Linear => write!(f, "linear"),
            ProblemKind::Integer => write!(f, "integer"),
        }
    }
}
