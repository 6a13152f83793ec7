//! Boundary between the assignment model and the integer program solver.
//!
//! The model builder only talks to a [`Solver`]; [`LpSolver`] binds it to `good_lp`
//! with the pure Rust `microlp` backend.

use std::fmt;

pub use self::lp::LpSolver;

mod lp;
#[cfg(test)]
pub(crate) mod stub;

/// Handle on a variable declared to a [`Solver`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Var(pub usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relation {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::LessOrEqual => "<=",
            Relation::GreaterOrEqual => ">=",
            Relation::Equal => "=",
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Terminal status of an optimization run.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    SolverError,
    Timeout,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::SolverError => "solver error",
            SolverStatus::Timeout => "timeout",
        })
    }
}

/// A linear combination of variables.
pub type Terms = [(Var, f64)];

/// Capabilities required from an integer program solver.
///
/// An instance is single use: variables, constraints and the objective are declared
/// first, [`Solver::optimize`] is then called exactly once, after which the instance is
/// only queried. Declaring a variable or adding a constraint after `optimize`, or
/// calling `optimize` a second time, is a contract violation and implementations may
/// panic. Use a fresh instance for every solve.
pub trait Solver {
    /// Must not be called after [`Solver::optimize`].
    fn declare_binary_variable(&mut self, name: &str) -> Var;

    /// Must not be called after [`Solver::optimize`].
    fn declare_integer_variable(&mut self, name: &str, lower_bound: f64) -> Var;

    /// Must not be called after [`Solver::optimize`].
    fn add_linear_constraint(&mut self, name: &str, terms: &Terms, relation: Relation, rhs: f64);

    fn set_objective(&mut self, terms: &Terms, sense: Sense);

    /// Run the optimization synchronously. Must be called at most once per instance.
    fn optimize(&mut self) -> SolverStatus;

    /// Value of `var` in the solution. Only meaningful after an `Optimal` status.
    fn value_of(&self, var: Var) -> f64;

    /// Objective value of the solution. Only meaningful after an `Optimal` status.
    fn objective_value(&self) -> f64;
}
