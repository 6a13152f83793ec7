use super::{Relation, Sense, Solver, SolverStatus, Terms, Var};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    constraint, variable,
};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// [`Solver`] implementation on top of `good_lp` and `microlp`.
///
/// `good_lp` builds problems by value, so declarations are buffered here and the
/// actual problem is assembled when [`Solver::optimize`] is called. The problem is
/// consumed by the solve, so any further declaration, constraint or optimization
/// panics.
pub struct LpSolver {
    problem: Option<ProblemVariables>,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<(Var, f64)>,
    sense: Sense,
    values: Vec<f64>,
    solved: bool,
}

impl Default for LpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LpSolver {
    pub fn new() -> Self {
        LpSolver {
            problem: Some(ProblemVariables::new()),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            sense: Sense::Minimize,
            values: Vec::new(),
            solved: false,
        }
    }

    fn declare(&mut self, definition: good_lp::VariableDefinition) -> Var {
        assert!(!self.solved, "cannot declare variables after optimization");
        let problem = self.problem.get_or_insert_with(ProblemVariables::new);
        self.variables.push(problem.add(definition));
        Var(self.variables.len() - 1)
    }

    fn expression(&self, terms: &Terms) -> Expression {
        terms
            .iter()
            .map(|&(Var(v), coefficient)| coefficient * self.variables[v])
            .sum()
    }
}

impl Solver for LpSolver {
    fn declare_binary_variable(&mut self, name: &str) -> Var {
        self.declare(variable().binary().name(name))
    }

    fn declare_integer_variable(&mut self, name: &str, lower_bound: f64) -> Var {
        self.declare(variable().integer().min(lower_bound).name(name))
    }

    fn add_linear_constraint(&mut self, name: &str, terms: &Terms, relation: Relation, rhs: f64) {
        assert!(!self.solved, "cannot add constraints after optimization");
        trace!(constraint = name, terms = terms.len(), %relation, rhs, "adding constraint");
        let lhs = self.expression(terms);
        self.constraints.push(match relation {
            Relation::LessOrEqual => constraint::leq(lhs, rhs),
            Relation::GreaterOrEqual => constraint::geq(lhs, rhs),
            Relation::Equal => constraint::eq(lhs, rhs),
        });
    }

    fn set_objective(&mut self, terms: &Terms, sense: Sense) {
        self.objective = terms.to_vec();
        self.sense = sense;
    }

    fn optimize(&mut self) -> SolverStatus {
        assert!(!self.solved, "a solver instance can only be optimized once");
        self.solved = true;
        let objective = self.expression(&self.objective);
        let problem = self.problem.take().unwrap_or_else(ProblemVariables::new);
        let unsolved = match self.sense {
            Sense::Minimize => problem.minimise(objective),
            Sense::Maximize => problem.maximise(objective),
        };
        let mut model = unsolved.using(microlp);
        debug!(
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            "starting microlp"
        );
        for c in self.constraints.drain(..) {
            model = model.with(c);
        }
        let start = Instant::now();
        let status = match model.solve() {
            Ok(solution) => {
                self.values = self.variables.iter().map(|&v| solution.value(v)).collect();
                SolverStatus::Optimal
            }
            Err(ResolutionError::Infeasible) => SolverStatus::Infeasible,
            Err(ResolutionError::Unbounded) => SolverStatus::Unbounded,
            Err(e) => {
                warn!(error = %e, "solver failure");
                SolverStatus::SolverError
            }
        };
        info!(%status, elapsed = ?start.elapsed(), "optimization finished");
        status
    }

    fn value_of(&self, Var(var): Var) -> f64 {
        self.values.get(var).copied().unwrap_or(0.0)
    }

    fn objective_value(&self) -> f64 {
        self.objective
            .iter()
            .map(|&(var, coefficient)| coefficient * self.value_of(var))
            .sum()
    }
}
