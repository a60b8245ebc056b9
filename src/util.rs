//comparison tolerance used for bounds, reduced costs and ratio-test ties
pub const EPS: f64 = 1e-9;

//smallest direction entry that may block a step or leave the basis
pub const PIVOT_EPS: f64 = 1e-9;

//phase 1 objective above this (scaled by the largest |b_i|) means infeasible
pub const FEAS_TOL: f64 = 1e-7;

//U diagonal entries below this mean the basis matrix is singular
pub const SINGULAR_EPS: f64 = 1e-11;
