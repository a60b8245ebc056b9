#![allow(non_snake_case)]

use crate::problem::Bound;
use crate::solver::{LpResult, Solution, SolverResult};
use crate::standard_form::{Nonbasic, NonbasicBound, Point, StandardForm};

/// Solves a problem without constraints: every variable sits at its cheapest bound.
pub fn solve_trivial_problem(std_form: StandardForm) -> LpResult {
    assert_eq!(std_form.rows(), 0);
    assert_eq!(std_form.c.len(), std_form.bounds.len());

    let mut x = nalgebra::DVector::zeros(std_form.cols());
    let mut N = Vec::with_capacity(std_form.cols());

    for (i, (&c_i, bound)) in std_form.c.iter().zip(&std_form.bounds).enumerate() {
        let at = if c_i > 0. {
            match *bound {
                Bound::Free | Bound::Upper(..) => return Ok(SolverResult::Unbounded),
                _ => NonbasicBound::Lower,
            }
        } else if c_i < 0. {
            match *bound {
                Bound::Free | Bound::Lower(..) => return Ok(SolverResult::Unbounded),
                _ => NonbasicBound::Upper,
            }
        } else {
            //any value works, prefer zero when the bounds allow it
            match *bound {
                Bound::Free => NonbasicBound::Free,
                Bound::Upper(..) => NonbasicBound::Upper,
                _ => NonbasicBound::Lower,
            }
        };

        x[i] = match at {
            NonbasicBound::Lower => bound.lower(),
            NonbasicBound::Upper => bound.upper(),
            NonbasicBound::Free => 0.,
        };

        N.push(Nonbasic::new(i, at));
    }

    let point = Point { x, N, B: vec![] };
    Ok(SolverResult::Optimal(Solution::new(std_form, point)?))
}
