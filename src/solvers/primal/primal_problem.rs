#![allow(non_snake_case)]

use crate::problem::Bound;
use crate::standard_form::{Basic, Nonbasic, NonbasicBound, Point, StandardForm};

use log::debug;

pub trait PrimalProblem {
    fn obj(&self) -> f64;
    fn unpack(&mut self) -> (&StandardForm, &mut Point);
}

/// Feasibility problem: the problem's own columns plus one artificial column per row,
/// minimizing the sum of the artificials.
#[derive(Debug)]
pub struct PrimalPhase1 {
    pub std_form: StandardForm,
    pub point: Point,
    orig_c: nalgebra::DVector<f64>,
    phase_1_vars: Vec<usize>,
}

impl PrimalProblem for PrimalPhase1 {
    #[inline]
    fn obj(&self) -> f64 {
        self.std_form.obj(&self.point.x)
    }

    #[inline]
    fn unpack(&mut self) -> (&StandardForm, &mut Point) {
        (&self.std_form, &mut self.point)
    }
}

#[derive(Debug)]
pub struct PrimalPhase2 {
    pub std_form: StandardForm,
    pub point: Point,
}

impl PrimalProblem for PrimalPhase2 {
    #[inline]
    fn obj(&self) -> f64 {
        self.std_form.obj(&self.point.x)
    }

    #[inline]
    fn unpack(&mut self) -> (&StandardForm, &mut Point) {
        (&self.std_form, &mut self.point)
    }
}

impl std::convert::From<StandardForm> for PrimalPhase1 {
    fn from(mut std_form: StandardForm) -> Self {
        debug!("converting standard form to phase 1 standard form");

        let n = std_form.cols();
        let m = std_form.rows();
        let mut N = Vec::with_capacity(n);
        let mut B = Vec::with_capacity(m);
        let mut v = nalgebra::DVector::<f64>::zeros(n + m);

        for (i, bound) in std_form.bounds.iter().enumerate() {
            match *bound {
                //free variables start at zero and may enter in either direction
                Bound::Free => N.push(Nonbasic::new(i, NonbasicBound::Free)),

                Bound::Lower(lb) | Bound::TwoSided(lb, _) | Bound::Fixed(lb) => {
                    v[i] = lb;
                    N.push(Nonbasic::new(i, NonbasicBound::Lower));
                }

                Bound::Upper(ub) => {
                    v[i] = ub;
                    N.push(Nonbasic::new(i, NonbasicBound::Upper));
                }
            }
        }

        let b_tilde = &std_form.b - &std_form.A * v.rows(0, n);

        std_form.A = std_form.A.resize_horizontally(n + m, 0.);
        let mut phase_1_vars = Vec::with_capacity(m);

        for i in 0..m {
            let index = n + i;
            v[index] = b_tilde[i].abs();
            std_form.A[(i, index)] = if b_tilde[i] >= 0. { 1. } else { -1. };
            std_form.bounds.push(Bound::Lower(0.));
            B.push(Basic::new(index));
            phase_1_vars.push(index);
        }

        let orig_c = std::mem::replace(
            &mut std_form.c,
            nalgebra::DVector::from_fn(n + m, |i, _| if i >= n { 1. } else { 0. }),
        );

        PrimalPhase1 {
            std_form,
            point: Point { x: v, N, B },
            orig_c,
            phase_1_vars,
        }
    }
}

impl std::convert::From<PrimalPhase1> for PrimalPhase2 {
    fn from(phase_1: PrimalPhase1) -> Self {
        debug!("converting phase 1 standard form to phase 2 standard form");

        let mut std_form = phase_1.std_form;
        let n = phase_1.orig_c.len();

        for (i, c_i) in std_form.c.iter_mut().enumerate() {
            *c_i = if i < n { phase_1.orig_c[i] } else { 0. };
        }

        //artificials stay in the matrix but can never move away from zero again
        for &i in &phase_1.phase_1_vars {
            std_form.bounds[i] = Bound::Fixed(0.);
        }

        let mut point = phase_1.point;

        for nonbasic in point.N.iter_mut() {
            if phase_1.phase_1_vars.contains(&nonbasic.index) {
                point.x[nonbasic.index] = 0.;
                nonbasic.bound = NonbasicBound::Lower;
            }
        }

        PrimalPhase2 { std_form, point }
    }
}
