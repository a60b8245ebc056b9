#![allow(non_snake_case)]

use crate::error::{ColGenError, ProblemKind};
use crate::problem::Problem;
use crate::standard_form::{Basic, BasisFactor, Nonbasic, Point, StandardForm};

pub type LpResult = Result<SolverResult<Solution>, ColGenError>;
pub type IpResult = Result<SolverResult<IntegerSolution>, ColGenError>;

/// Solves the continuous relaxation of a [`Problem`]; integrality flags are ignored.
pub trait LpSolver {
    fn solve_lp(&self, prob: &Problem) -> LpResult;
}

/// Solves a [`Problem`] honoring the integrality flag of every variable.
pub trait IpSolver {
    fn solve_ip(&self, prob: &Problem) -> IpResult;
}

#[derive(Debug, Clone)]
pub enum SolverResult<S = Solution> {
    Optimal(S),
    Infeasible,
    Unbounded,
    MaxIter { obj: f64 },
}

impl<S> SolverResult<S> {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(..))
    }

    pub fn optimal(self) -> Option<S> {
        match self {
            SolverResult::Optimal(sol) => Some(sol),
            _ => None,
        }
    }

    /// Turns every non-optimal outcome into an error tagged with `kind`.
    pub fn into_optimal(self, kind: ProblemKind) -> Result<S, ColGenError> {
        match self {
            SolverResult::Optimal(sol) => Ok(sol),
            SolverResult::Infeasible => Err(ColGenError::Infeasible(kind)),
            SolverResult::Unbounded => Err(ColGenError::Unbounded(kind)),
            SolverResult::MaxIter { obj } => Err(ColGenError::solver(format!(
                "{} problem reached maximum iterations (objective: {})",
                kind, obj
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    Infeasible,
    Unbounded,
    MaxIter,
}

/// An optimal basic solution of a linear program.
#[derive(Debug, Clone)]
pub struct Solution {
    pub(crate) std_form: StandardForm,
    pub(crate) point: Point,
    //dual values, one per constraint
    pub(crate) y: nalgebra::DVector<f64>,
    //reduced costs of every standard form column
    pub(crate) d: nalgebra::DVector<f64>,
    obj: f64,
}

impl Solution {
    pub(crate) fn new(std_form: StandardForm, point: Point) -> Result<Self, ColGenError> {
        let y = if point.B.is_empty() {
            nalgebra::DVector::zeros(std_form.rows())
        } else {
            let c_B = nalgebra::DVector::from_iterator(
                point.B.len(),
                point.B.iter().map(|b| std_form.c[b.index]),
            );

            BasisFactor::new(&std_form, &point.B)?.solve_transpose(&c_B)?
        };

        let d = &std_form.c - std_form.A.tr_mul(&y);
        let n = std_form.num_vars;
        let obj = std_form.c.rows(0, n).dot(&point.x.rows(0, n));

        Ok(Self {
            std_form,
            point,
            y,
            d,
            obj,
        })
    }

    #[inline]
    pub fn obj(&self) -> f64 {
        self.obj
    }

    /// Values of the problem's variables.
    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.point.x.as_slice()[..self.std_form.num_vars]
    }

    /// Shadow prices: the change in the optimal objective per unit increase of each
    /// constraint's right-hand side.
    #[inline]
    pub fn dual(&self) -> &[f64] {
        self.y.as_slice()
    }

    #[inline]
    pub fn reduced_costs(&self) -> &[f64] {
        &self.d.as_slice()[..self.std_form.num_vars]
    }

    pub fn is_basic(&self, var: usize) -> bool {
        self.point.B.iter().any(|b| b.index == var)
    }

    #[inline]
    pub(crate) fn basis(&self) -> &[Basic] {
        &self.point.B
    }

    #[inline]
    pub(crate) fn nonbasic(&self) -> &[Nonbasic] {
        &self.point.N
    }
}

/// An optimal solution of an integer program.
#[derive(Debug, Clone)]
pub struct IntegerSolution {
    x: Vec<f64>,
    obj: f64,
    nodes: usize,
}

impl IntegerSolution {
    pub(crate) fn new(x: Vec<f64>, obj: f64, nodes: usize) -> Self {
        Self { x, obj, nodes }
    }

    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[inline]
    pub fn obj(&self) -> f64 {
        self.obj
    }

    /// Number of branch-and-bound nodes explored.
    #[inline]
    pub fn nodes(&self) -> usize {
        self.nodes
    }
}
