//! A scripted solver recording every declaration, used to test the model builder and the
//! solution decoding without running an actual optimization.

use super::{Relation, Sense, Solver, SolverStatus, Terms, Var};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    Binary,
    Integer(f64),
}

#[derive(Clone, Debug)]
pub struct RecordedConstraint {
    pub name: String,
    pub terms: Vec<(Var, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

pub struct ScriptedSolver {
    pub variables: Vec<(String, Kind)>,
    pub constraints: Vec<RecordedConstraint>,
    pub objective: Vec<(Var, f64)>,
    pub sense: Option<Sense>,
    pub optimized: usize,
    status: SolverStatus,
    values: HashMap<String, f64>,
}

impl ScriptedSolver {
    pub fn new(status: SolverStatus) -> Self {
        ScriptedSolver {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            sense: None,
            optimized: 0,
            status,
            values: HashMap::new(),
        }
    }

    /// Value reported for the variable called `name` after optimization.
    #[must_use]
    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_owned(), value);
        self
    }

    pub fn name_of(&self, Var(var): Var) -> &str {
        &self.variables[var].0
    }

    pub fn constraint(&self, name: &str) -> Option<&RecordedConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    fn declare(&mut self, name: &str, kind: Kind) -> Var {
        self.variables.push((name.to_owned(), kind));
        Var(self.variables.len() - 1)
    }
}

impl Solver for ScriptedSolver {
    fn declare_binary_variable(&mut self, name: &str) -> Var {
        self.declare(name, Kind::Binary)
    }

    fn declare_integer_variable(&mut self, name: &str, lower_bound: f64) -> Var {
        self.declare(name, Kind::Integer(lower_bound))
    }

    fn add_linear_constraint(&mut self, name: &str, terms: &Terms, relation: Relation, rhs: f64) {
        self.constraints.push(RecordedConstraint {
            name: name.to_owned(),
            terms: terms.to_vec(),
            relation,
            rhs,
        });
    }

    fn set_objective(&mut self, terms: &Terms, sense: Sense) {
        self.objective = terms.to_vec();
        self.sense = Some(sense);
    }

    fn optimize(&mut self) -> SolverStatus {
        self.optimized += 1;
        self.status
    }

    fn value_of(&self, var: Var) -> f64 {
        self.values.get(self.name_of(var)).copied().unwrap_or(0.0)
    }

    fn objective_value(&self) -> f64 {
        self.objective
            .iter()
            .map(|&(var, coefficient)| coefficient * self.value_of(var))
            .sum()
    }
}
