//! Column generation for the one-dimensional cutting stock problem, together with the
//! linear and integer programming solvers it runs on.
//!
//! ```no_run
//! use colgen::{ColumnGenerationSolver, CuttingStock};
//!
//! let instance = CuttingStock::new(
//!     vec![45., 38., 25., 11., 12.],
//!     vec![22., 42., 52., 53., 78.],
//!     100.,
//! )?;
//!
//! let result = ColumnGenerationSolver::default().solve(&instance)?;
//! println!("{} rolls, {}", result.objective, result.round_up());
//! # Ok::<(), colgen::ColGenError>(())
//! ```

pub mod cutting_stock;
mod error;
pub mod problem;
pub mod sensitivity;
pub mod solver;
pub mod solvers;
mod standard_form;
mod util;

pub use crate::cutting_stock::{
    ColumnGenerationOptions, ColumnGenerationResult, ColumnGenerationSolver, CuttingPlan,
    CuttingStock, IntegerProgramPricer, IterationRecord, MasterProblem, MasterSolution,
    Pattern, PatternId, Pricer, PricingResult,
};
pub use crate::error::{ColGenError, ProblemKind};
pub use crate::problem::{
    Bound, Constraint, ConstraintId, ConstraintOp, Problem, Variable, VariableId,
};
pub use crate::sensitivity::{ConstraintSensitivity, SensitivityReport, VariableSensitivity};
pub use crate::solver::{
    IntegerSolution, IpResult, IpSolver, LpResult, LpSolver, Solution, SolverResult,
};
pub use crate::solvers::integer::BranchAndBoundSolver;
pub use crate::solvers::primal::primal_simplex_solver::PrimalSimplexSolver;
