#![allow(dead_code)]

use colgen::*;

const EPS: f64 = 1e-8;

/// What the checks need from an optimal solution, LP or IP.
pub trait PrimalValues: std::fmt::Debug + 'static {
    fn obj(&self) -> f64;
    fn x(&self) -> &[f64];
}

impl PrimalValues for Solution {
    fn obj(&self) -> f64 {
        Solution::obj(self)
    }

    fn x(&self) -> &[f64] {
        Solution::x(self)
    }
}

impl PrimalValues for IntegerSolution {
    fn obj(&self) -> f64 {
        IntegerSolution::obj(self)
    }

    fn x(&self) -> &[f64] {
        IntegerSolution::x(self)
    }
}

pub fn assert_optimal<S: PrimalValues>(
    result: &SolverResult<S>,
    expected_obj: f64,
    expected_x: &[f64],
) {
    assert_optimal_obj(result, expected_obj);

    if let SolverResult::Optimal(sol) = result {
        let x = sol.x();
        assert_eq!(x.len(), expected_x.len());

        for (x_i, expected) in x.iter().zip(expected_x) {
            assert!(
                (x_i - expected).abs() < EPS,
                "x: {:?}, expected: {:?}",
                x,
                expected_x
            );
        }
    }
}

pub fn assert_optimal_obj<S: PrimalValues>(result: &SolverResult<S>, expected_obj: f64) {
    match result {
        SolverResult::Optimal(sol) => {
            assert!(
                (sol.obj() - expected_obj).abs() < EPS,
                "obj: {}, expected: {}",
                sol.obj(),
                expected_obj
            );
        }

        _ => panic!("not optimal: {:?}", result),
    }
}

pub fn assert_infeasible<S: PrimalValues>(result: &SolverResult<S>) {
    assert!(
        matches!(result, SolverResult::Infeasible),
        "not infeasible: {:?}",
        result
    );
}

pub fn assert_unbounded<S: PrimalValues>(result: &SolverResult<S>) {
    assert!(
        matches!(result, SolverResult::Unbounded),
        "not unbounded: {:?}",
        result
    );
}

pub struct TestProblem<S> {
    pub prob: Problem,
    pub check_result: Box<dyn FnOnce(&SolverResult<S>)>,
}

impl<S: PrimalValues> TestProblem<S> {
    fn new<F: FnOnce(&SolverResult<S>) + 'static>(prob: Problem, check_result: F) -> Self {
        Self {
            prob,
            check_result: Box::new(check_result),
        }
    }
}

fn var(prob: &mut Problem, obj_coeff: f64, bound: Bound, name: &str) -> VariableId {
    prob.add_var(obj_coeff, bound, Some(name.to_string()))
        .unwrap()
}

fn int_var(prob: &mut Problem, obj_coeff: f64, bound: Bound, name: &str) -> VariableId {
    prob.add_integer_var(obj_coeff, bound, Some(name.to_string()))
        .unwrap()
}

pub fn no_variables<S: PrimalValues>() -> TestProblem<S> {
    TestProblem::new(Problem::new(), |result| assert_optimal(result, 0., &[]))
}

pub fn bounds_only<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    var(&mut prob, 2., Bound::TwoSided(-1., 1.), "x");
    var(&mut prob, -1., Bound::Upper(4.), "y");

    TestProblem::new(prob, |result| assert_optimal(result, -6., &[-1., 4.]))
}

pub fn bounds_only_unbounded<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    var(&mut prob, 1., Bound::Lower(0.), "x");
    var(&mut prob, 2., Bound::Free, "y");

    TestProblem::new(prob, |result| assert_unbounded(result))
}

pub fn empty_row_infeasible<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    var(&mut prob, 1., Bound::Free, "x");
    prob.add_constraint(vec![], ConstraintOp::Eq, 1.).unwrap();

    TestProblem::new(prob, |result| assert_infeasible(result))
}

pub fn empty_row_feasible<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    var(&mut prob, 2., Bound::Lower(3.), "x");
    prob.add_constraint(vec![], ConstraintOp::Gte, -1.).unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, 6., &[3.]))
}

pub fn production<S: PrimalValues>() -> TestProblem<S> {
    //maximize 3x + 2y
    let mut prob = Problem::new();
    let x = var(&mut prob, -3., Bound::Lower(0.), "x");
    let y = var(&mut prob, -2., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Lte, 4.)
        .unwrap();
    prob.add_constraint(vec![(x, 1.), (y, 3.)], ConstraintOp::Lte, 9.)
        .unwrap();
    prob.add_constraint(vec![(x, 1.)], ConstraintOp::Lte, 3.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, -11., &[3., 1.]))
}

pub fn diet<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 2., Bound::Lower(0.), "x");
    let y = var(&mut prob, 3., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Gte, 4.)
        .unwrap();
    prob.add_constraint(vec![(x, 1.), (y, 3.)], ConstraintOp::Gte, 6.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, 9., &[3., 1.]))
}

pub fn bounded_and_fixed<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, -1., Bound::TwoSided(0., 4.), "x");
    let y = var(&mut prob, -2., Bound::TwoSided(1., 5.), "y");
    let z = var(&mut prob, 1., Bound::Fixed(2.), "z");

    prob.add_constraint(vec![(x, 1.), (y, 1.), (z, 1.)], ConstraintOp::Lte, 10.)
        .unwrap();
    prob.add_constraint(vec![(x, 1.), (y, -1.)], ConstraintOp::Gte, -2.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, -11., &[3., 5., 2.]))
}

pub fn free_variables<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 1., Bound::Free, "x");
    let y = var(&mut prob, 1., Bound::Free, "y");

    prob.add_constraint(vec![(x, 1.), (y, 2.)], ConstraintOp::Gte, 3.)
        .unwrap();
    prob.add_constraint(vec![(x, 2.), (y, 1.)], ConstraintOp::Gte, 3.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, 2., &[1., 1.]))
}

pub fn upper_bounds<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 1., Bound::Upper(0.), "x");
    let y = var(&mut prob, -1., Bound::Upper(2.), "y");

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Gte, -3.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, -7., &[-5., 2.]))
}

pub fn negative_rhs<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 1., Bound::Lower(0.), "x");
    let y = var(&mut prob, 1., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, -1.), (y, -1.)], ConstraintOp::Lte, -5.)
        .unwrap();
    prob.add_constraint(vec![(x, 1.)], ConstraintOp::Lte, 2.)
        .unwrap();

    //every point on x + y = 5 is optimal
    TestProblem::new(prob, |result| assert_optimal_obj(result, 5.))
}

pub fn redundant_equalities<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 1., Bound::Lower(0.), "x");
    let y = var(&mut prob, 2., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Eq, 2.)
        .unwrap();
    prob.add_constraint(vec![(x, 2.), (y, 2.)], ConstraintOp::Eq, 4.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, 2., &[2., 0.]))
}

pub fn linear_system_2d<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 0., Bound::Free, "x");
    let y = var(&mut prob, 0., Bound::Free, "y");

    prob.add_constraint(vec![(x, 2.), (y, 1.)], ConstraintOp::Eq, 1.)
        .unwrap();
    prob.add_constraint(vec![(x, 3.), (y, 1.)], ConstraintOp::Eq, 1.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, 0., &[0., 1.]))
}

pub fn linear_system_3d_infeasible<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 0., Bound::Free, "x");
    let y = var(&mut prob, 0., Bound::Free, "y");
    let z = var(&mut prob, 0., Bound::Free, "z");

    prob.add_constraint(vec![(x, 1.), (y, 2.), (z, 4.)], ConstraintOp::Eq, 1.)
        .unwrap();
    prob.add_constraint(vec![(x, 3.), (y, 4.), (z, 8.)], ConstraintOp::Eq, 2.)
        .unwrap();
    prob.add_constraint(vec![(x, 5.), (y, 6.), (z, 12.)], ConstraintOp::Eq, 5.)
        .unwrap();

    TestProblem::new(prob, |result| assert_infeasible(result))
}

pub fn conflicting_rows<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, 1., Bound::Lower(0.), "x");
    let y = var(&mut prob, 1., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Lte, 1.)
        .unwrap();
    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Gte, 2.)
        .unwrap();

    TestProblem::new(prob, |result| assert_infeasible(result))
}

pub fn unbounded_ray<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = var(&mut prob, -1., Bound::Lower(0.), "x");
    let y = var(&mut prob, -1., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, 1.), (y, -1.)], ConstraintOp::Lte, 1.)
        .unwrap();

    TestProblem::new(prob, |result| assert_unbounded(result))
}

pub fn beale_cycle<S: PrimalValues>() -> TestProblem<S> {
    //cycles under the textbook Dantzig rule without an anti-cycling fallback
    let mut prob = Problem::new();
    let a = var(&mut prob, -0.75, Bound::Lower(0.), "a");
    let b = var(&mut prob, 150., Bound::Lower(0.), "b");
    let c = var(&mut prob, -0.02, Bound::Lower(0.), "c");
    let d = var(&mut prob, 6., Bound::Lower(0.), "d");

    prob.add_constraint(
        vec![(a, 0.25), (b, -60.), (c, -0.04), (d, 9.)],
        ConstraintOp::Lte,
        0.,
    )
    .unwrap();
    prob.add_constraint(
        vec![(a, 0.5), (b, -90.), (c, -0.02), (d, 3.)],
        ConstraintOp::Lte,
        0.,
    )
    .unwrap();
    prob.add_constraint(vec![(c, 1.)], ConstraintOp::Lte, 1.)
        .unwrap();

    TestProblem::new(prob, |result| {
        assert_optimal(result, -0.05, &[0.04, 0., 1., 0.])
    })
}

pub fn knapsack_binary<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let a = int_var(&mut prob, -5., Bound::TwoSided(0., 1.), "a");
    let b = int_var(&mut prob, -4., Bound::TwoSided(0., 1.), "b");
    let c = int_var(&mut prob, -3., Bound::TwoSided(0., 1.), "c");

    prob.add_constraint(vec![(a, 2.), (b, 3.), (c, 1.)], ConstraintOp::Lte, 5.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, -9., &[1., 1., 0.]))
}

pub fn knapsack_general<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = int_var(&mut prob, -3., Bound::Lower(0.), "x");
    let y = int_var(&mut prob, -2., Bound::Lower(0.), "y");

    prob.add_constraint(vec![(x, 4.), (y, 3.)], ConstraintOp::Lte, 10.)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, -7., &[1., 2.]))
}

pub fn first_pricing_problem<S: PrimalValues>() -> TestProblem<S> {
    //pricing problem of the five item instance under unit shadow prices
    let mut prob = Problem::new();
    let widths = [22f64, 42., 52., 53., 78.];

    let vars: Vec<_> = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| {
            let max_count = (100. / width).floor();
            int_var(&mut prob, -1., Bound::TwoSided(0., max_count), &format!("a{}", i))
        })
        .collect();

    prob.add_constraint(
        vars.into_iter().zip(widths.iter().copied()).collect(),
        ConstraintOp::Lte,
        100.,
    )
    .unwrap();

    TestProblem::new(prob, |result| {
        assert_optimal(result, -4., &[4., 0., 0., 0., 0.])
    })
}

pub fn mixed_integer<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = int_var(&mut prob, -1., Bound::Lower(0.), "x");
    let y = var(&mut prob, -2., Bound::TwoSided(0., 1.2), "y");

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Lte, 3.5)
        .unwrap();
    prob.add_constraint(vec![(x, 1.), (y, -1.)], ConstraintOp::Lte, 0.5)
        .unwrap();

    TestProblem::new(prob, |result| assert_optimal(result, -3.4, &[1., 1.2]))
}

pub fn integer_infeasible<S: PrimalValues>() -> TestProblem<S> {
    let mut prob = Problem::new();
    let x = int_var(&mut prob, 1., Bound::Lower(0.), "x");
    prob.add_constraint(vec![(x, 2.)], ConstraintOp::Eq, 1.)
        .unwrap();

    TestProblem::new(prob, |result| assert_infeasible(result))
}
