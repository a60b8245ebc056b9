use crate::error::ColGenError;
use crate::util::EPS;

use std::collections::{HashMap, HashSet};

const LTE_STR: &str = "\u{2264}";
const EQ_STR: &str = "\u{003D}";
const GTE_STR: &str = "\u{2265}";
const INF_STR: &str = "\u{221E}";

/// A minimization problem with linear constraints and bounded, optionally integer, variables.
///
/// Variables and constraints are only ever appended, so their ids stay valid for the
/// lifetime of the problem. Existing rows can be patched with [`Problem::add_coeff`], which
/// is how a column is appended to a live model.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    var_names: HashSet<String>, //these strings are duplicated in the variables
}

impl Problem {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_var(
        &mut self,
        obj_coeff: f64,
        bound: Bound,
        name: Option<String>,
    ) -> Result<VariableId, ColGenError> {
        self.push_var(obj_coeff, bound, false, name)
    }

    pub fn add_integer_var(
        &mut self,
        obj_coeff: f64,
        bound: Bound,
        name: Option<String>,
    ) -> Result<VariableId, ColGenError> {
        self.push_var(obj_coeff, bound, true, name)
    }

    fn push_var(
        &mut self,
        obj_coeff: f64,
        bound: Bound,
        integer: bool,
        name: Option<String>,
    ) -> Result<VariableId, ColGenError> {
        if !obj_coeff.is_finite() {
            return Err(ColGenError::invalid_input(format!(
                "objective coefficient must be finite, got {}",
                obj_coeff
            )));
        }

        bound.validate()?;

        if let Some(name) = &name {
            if !self.var_names.insert(name.clone()) {
                return Err(ColGenError::invalid_input(format!(
                    "variable names must be unique, {} was added twice",
                    name
                )));
            }
        }

        let id = VariableId(self.variables.len());
        self.variables.push(Variable {
            id,
            obj_coeff,
            bound,
            integer,
            name,
        });

        Ok(id)
    }

    pub fn add_constraint(
        &mut self,
        coeffs: Vec<(VariableId, f64)>,
        op: ConstraintOp,
        rhs: f64,
    ) -> Result<ConstraintId, ColGenError> {
        if let Some((invalid_var, _coeff)) = coeffs.iter().find(|(id, _)| !self.has_var(*id)) {
            return Err(ColGenError::invalid_input(format!(
                "{:?} is invalid",
                invalid_var
            )));
        }

        if !rhs.is_finite() || coeffs.iter().any(|(_, coeff)| !coeff.is_finite()) {
            return Err(ColGenError::invalid_input(
                "constraint coefficients and rhs must be finite".to_string(),
            ));
        }

        let id = ConstraintId(self.constraints.len());
        self.constraints.push(Constraint { coeffs, op, rhs });
        Ok(id)
    }

    /// Adds `coeff * var` to the left-hand side of an existing constraint.
    pub fn add_coeff(
        &mut self,
        constraint: ConstraintId,
        var: VariableId,
        coeff: f64,
    ) -> Result<(), ColGenError> {
        if !self.has_var(var) {
            return Err(ColGenError::invalid_input(format!("{:?} is invalid", var)));
        }

        if !coeff.is_finite() {
            return Err(ColGenError::invalid_input(format!(
                "coefficient must be finite, got {}",
                coeff
            )));
        }

        match self.constraints.get_mut(constraint.0) {
            Some(constraint) => {
                constraint.add_coeff(var, coeff);
                Ok(())
            }

            None => Err(ColGenError::invalid_input(format!(
                "{:?} is invalid",
                constraint
            ))),
        }
    }

    /// Appends a variable together with its coefficients in existing constraints.
    pub fn add_column(
        &mut self,
        obj_coeff: f64,
        bound: Bound,
        name: Option<String>,
        coeffs: Vec<(ConstraintId, f64)>,
    ) -> Result<VariableId, ColGenError> {
        if let Some((invalid, _)) = coeffs
            .iter()
            .find(|(id, _)| id.0 >= self.constraints.len())
        {
            return Err(ColGenError::invalid_input(format!("{:?} is invalid", invalid)));
        }

        let var = self.add_var(obj_coeff, bound, name)?;

        for (constraint, coeff) in coeffs {
            self.add_coeff(constraint, var, coeff)?;
        }

        Ok(var)
    }

    pub fn set_bound(&mut self, var: VariableId, bound: Bound) -> Result<(), ColGenError> {
        bound.validate()?;

        match self.variables.get_mut(var.0) {
            Some(variable) => {
                variable.bound = bound;
                Ok(())
            }

            None => Err(ColGenError::invalid_input(format!("{:?} is invalid", var))),
        }
    }

    #[inline]
    pub fn vars(&self) -> &[Variable] {
        self.variables.as_slice()
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        self.constraints.as_slice()
    }

    #[inline]
    fn has_var(&self, id: VariableId) -> bool {
        id.0 < self.variables.len()
    }

    pub fn obj(&self, x: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(x)
            .map(|(var, x_i)| var.obj_coeff * x_i)
            .sum()
    }

    pub fn is_feasible(&self, x: &[f64]) -> bool {
        if x.len() != self.variables.len() {
            return false;
        }

        for (var, &val) in self.variables.iter().zip(x.iter()) {
            if val < var.bound.lower() - EPS || val > var.bound.upper() + EPS {
                return false;
            }
        }

        self.constraints
            .iter()
            .all(|constraint| constraint.is_feasible(x))
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub id: VariableId,
    pub obj_coeff: f64,
    pub bound: Bound,
    pub integer: bool,
    pub name: Option<String>,
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        //Problem add_var guarantees that different variables have different ids
        self.id == other.id
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Free,
    Lower(f64),
    Upper(f64),
    TwoSided(f64, f64),
    Fixed(f64),
}

impl Bound {
    fn validate(&self) -> Result<(), ColGenError> {
        if let Bound::TwoSided(lb, ub) = *self {
            if lb > ub {
                return Err(ColGenError::invalid_input(format!(
                    "invalid variable bounds: ({}, {})",
                    lb, ub
                )));
            }
        }

        let bound_valid = match *self {
            Bound::Free => true,
            Bound::Lower(lb) => lb.is_finite(),
            Bound::Upper(ub) => ub.is_finite(),
            Bound::TwoSided(lb, ub) => lb.is_finite() && ub.is_finite(),
            Bound::Fixed(fixed_val) => fixed_val.is_finite(),
        };

        if !bound_valid {
            return Err(ColGenError::invalid_input(format!(
                "invalid bound: {:?}",
                self
            )));
        }

        Ok(())
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        match *self {
            Bound::Free | Bound::Upper(..) => f64::NEG_INFINITY,
            Bound::Lower(lb) | Bound::TwoSided(lb, _) | Bound::Fixed(lb) => lb,
        }
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        match *self {
            Bound::Free | Bound::Lower(..) => f64::INFINITY,
            Bound::Upper(ub) | Bound::TwoSided(_, ub) | Bound::Fixed(ub) => ub,
        }
    }

    /// True if the variable cannot move, which keeps it out of the basis for good.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        match *self {
            Bound::Fixed(..) => true,
            Bound::TwoSided(lb, ub) => lb == ub,
            _ => false,
        }
    }

    //None if the range is empty
    fn from_range(lb: f64, ub: f64) -> Option<Bound> {
        match (lb.is_finite(), ub.is_finite()) {
            (true, true) => {
                if lb > ub {
                    None
                } else if lb == ub {
                    Some(Bound::Fixed(lb))
                } else {
                    Some(Bound::TwoSided(lb, ub))
                }
            }
            (true, false) => Some(Bound::Lower(lb)),
            (false, true) => Some(Bound::Upper(ub)),
            (false, false) => Some(Bound::Free),
        }
    }

    /// Intersects the bound with `x <= ub`.
    pub fn with_upper(&self, ub: f64) -> Option<Bound> {
        Self::from_range(self.lower(), self.upper().min(ub))
    }

    /// Intersects the bound with `x >= lb`.
    pub fn with_lower(&self, lb: f64) -> Option<Bound> {
        Self::from_range(self.lower().max(lb), self.upper())
    }

    fn display(&self, f: &mut std::fmt::Formatter, var: &Variable) -> std::fmt::Result {
        match self {
            Bound::Free => write!(f, "{} free", var),
            Bound::Lower(lb) => write!(f, "{} {gte} {}", var, lb, gte = GTE_STR),
            Bound::Upper(ub) => write!(f, "{} {lte} {}", var, ub, lte = LTE_STR),
            Bound::TwoSided(lb, ub) => {
                write!(f, "{} {lte} {} {lte} {}", lb, var, ub, lte = LTE_STR)
            }
            Bound::Fixed(val) => write!(f, "{} {eq} {}", var, val, eq = EQ_STR),
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Bound::Free => write!(f, "(-{inf}, {inf})", inf = INF_STR),
            Bound::Lower(lb) => write!(f, "[{}, {inf})", lb, inf = INF_STR),
            Bound::Upper(ub) => write!(f, "(-{inf}, {}]", ub, inf = INF_STR),
            Bound::TwoSided(lb, ub) => write!(f, "[{}, {}]", lb, ub),
            Bound::Fixed(val) => write!(f, "[{val}, {val}]", val = val),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub coeffs: Vec<(VariableId, f64)>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

impl Constraint {
    pub fn add_coeff(&mut self, var: VariableId, coeff: f64) {
        self.coeffs.push((var, coeff));
    }

    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coeffs
            .iter()
            .map(|(var, coeff)| coeff * x[var.0])
            .sum()
    }

    fn is_feasible(&self, x: &[f64]) -> bool {
        let lhs = self.lhs(x);
        let tol = EPS * self.rhs.abs().max(1.);

        match self.op {
            ConstraintOp::Lte => lhs <= self.rhs + tol,
            ConstraintOp::Eq => (lhs - self.rhs).abs() <= tol,
            ConstraintOp::Gte => lhs >= self.rhs - tol,
        }
    }

    fn display(
        &self,
        f: &mut std::fmt::Formatter,
        vars: &HashMap<VariableId, &Variable>,
    ) -> std::fmt::Result {
        for (var_id, coeff) in &self.coeffs {
            if *coeff == 0. {
                continue;
            }

            let sign = if *coeff >= 0. { "+" } else { "-" };

            match vars.get(var_id) {
                Some(var) => write!(f, "{} {} {} ", sign, coeff.abs(), var)?,
                None => write!(f, "{} {} id[{}] ", sign, coeff.abs(), var_id.0)?,
            }
        }

        write!(f, "{} {}", self.op, self.rhs)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl std::convert::From<usize> for VariableId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl std::convert::From<VariableId> for usize {
    fn from(id: VariableId) -> Self {
        id.0
    }
}

impl std::convert::From<&VariableId> for usize {
    fn from(id: &VariableId) -> Self {
        id.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(usize);

impl std::convert::From<usize> for ConstraintId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl std::convert::From<ConstraintId> for usize {
    fn from(id: ConstraintId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Lte,
    Eq,
    Gte,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "minimize")?;
        let mut var_id_to_var: HashMap<VariableId, &Variable> = HashMap::new();

        for var in &self.variables {
            var_id_to_var.insert(var.id, var);

            if var.obj_coeff == 0. {
                continue;
            }

            write!(
                f,
                "{} {} {} ",
                if var.obj_coeff > 0. { "+" } else { "-" },
                var.obj_coeff.abs(),
                var
            )?;
        }

        writeln!(f, "\n\nsubject to")?;

        for constraint in &self.constraints {
            constraint.display(f, &var_id_to_var)?;
            writeln!(f)?;
        }

        writeln!(f, "\nwith the bounds")?;

        for var in &self.variables {
            var.bound.display(f, var)?;

            if var.integer {
                write!(f, ", integer")?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "id[{}]", self.id.0),
        }
    }
}

impl std::fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConstraintOp::Lte => write!(f, "{}", LTE_STR),
            ConstraintOp::Eq => write!(f, "{}", EQ_STR),
            ConstraintOp::Gte => write!(f, "{}", GTE_STR),
        }
    }
}
