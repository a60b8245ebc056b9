#![allow(non_snake_case)]

use crate::error::ColGenError;
use crate::problem::{Bound, ConstraintOp, Problem};
use crate::util::SINGULAR_EPS;

/// `min c^T x` subject to `A x = b` and a bound on every column.
///
/// Columns `0..num_vars` are the problem's variables, followed by one slack column per
/// inequality. Solvers may append further columns (phase 1 artificials).
#[derive(Debug, Clone)]
pub struct StandardForm {
    pub c: nalgebra::DVector<f64>,
    pub A: nalgebra::DMatrix<f64>,
    pub b: nalgebra::DVector<f64>,
    pub bounds: Vec<Bound>,
    pub num_vars: usize,
}

impl std::convert::From<&Problem> for StandardForm {
    fn from(prob: &Problem) -> StandardForm {
        let n = prob.vars().len();
        let m = prob.constraints().len();

        let num_slack_vars = prob
            .constraints()
            .iter()
            .filter(|constraint| constraint.op != ConstraintOp::Eq)
            .count();

        let total_vars = n + num_slack_vars;

        let mut c = nalgebra::DVector::zeros(total_vars);
        let mut A = nalgebra::DMatrix::zeros(m, total_vars);
        let mut b = nalgebra::DVector::zeros(m);

        //default to Lower(0.), because that's what the slack variable bounds are
        let mut bounds = vec![Bound::Lower(0.); total_vars];

        for (i, var) in prob.vars().iter().enumerate() {
            c[i] = var.obj_coeff;
            bounds[i] = var.bound;
        }

        let mut cur_slack_col = n;

        for (i, constraint) in prob.constraints().iter().enumerate() {
            b[i] = constraint.rhs;

            //repeated entries for the same variable add up
            for (id, coeff) in &constraint.coeffs {
                A[(i, usize::from(id))] += *coeff;
            }

            if let Some(slack_coeff) = match constraint.op {
                ConstraintOp::Lte => Some(1.),
                ConstraintOp::Eq => None,
                ConstraintOp::Gte => Some(-1.),
            } {
                A[(i, cur_slack_col)] = slack_coeff;
                cur_slack_col += 1;
            }
        }

        assert_eq!(cur_slack_col, total_vars);

        StandardForm {
            c,
            A,
            b,
            bounds,
            num_vars: n,
        }
    }
}

impl StandardForm {
    #[inline]
    pub fn rows(&self) -> usize {
        self.A.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.A.ncols()
    }

    #[inline]
    pub fn obj(&self, x: &nalgebra::DVector<f64>) -> f64 {
        self.c.dot(x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Basic {
    pub index: usize,
}

impl Basic {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonbasicBound {
    Lower,
    Upper,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonbasic {
    pub index: usize,
    pub bound: NonbasicBound,
}

impl Nonbasic {
    #[inline]
    pub fn new(index: usize, bound: NonbasicBound) -> Self {
        Self { index, bound }
    }
}

/// A basic solution: every column is either basic or sitting at one of its bounds.
#[derive(Debug, Clone)]
pub struct Point {
    pub x: nalgebra::DVector<f64>,
    pub N: Vec<Nonbasic>,
    pub B: Vec<Basic>,
}

/// LU factorisation of the basis matrix `A_B`.
pub struct BasisFactor {
    lu: nalgebra::LU<f64, nalgebra::Dyn, nalgebra::Dyn>,
}

impl BasisFactor {
    pub fn new(std_form: &StandardForm, B: &[Basic]) -> Result<Self, ColGenError> {
        let A_B = std_form.A.select_columns(B.iter().map(|b| &b.index));
        let lu = A_B.lu();

        if lu.u().diagonal().iter().any(|d| d.abs() < SINGULAR_EPS) {
            return Err(ColGenError::solver(
                "invalid B, A_B is not invertible".to_string(),
            ));
        }

        Ok(Self { lu })
    }

    /// Solves `A_B v = rhs`.
    pub fn solve(
        &self,
        rhs: &nalgebra::DVector<f64>,
    ) -> Result<nalgebra::DVector<f64>, ColGenError> {
        self.lu
            .solve(rhs)
            .ok_or_else(|| ColGenError::solver("A_B is singular".to_string()))
    }

    /// Solves `A_B^T v = rhs`.
    pub fn solve_transpose(
        &self,
        rhs: &nalgebra::DVector<f64>,
    ) -> Result<nalgebra::DVector<f64>, ColGenError> {
        //P A_B = L U, so A_B^T v = rhs becomes U^T L^T (P v) = rhs
        let singular = || ColGenError::solver("A_B is singular".to_string());
        let v_tilde = self
            .lu
            .u()
            .tr_solve_upper_triangular(rhs)
            .ok_or_else(singular)?;
        let mut v = self
            .lu
            .l()
            .tr_solve_lower_triangular(&v_tilde)
            .ok_or_else(singular)?;

        self.lu.p().inv_permute_rows(&mut v);
        Ok(v)
    }
}
