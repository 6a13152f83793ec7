use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::extract::{self, Solution};
use crate::formulation::Formulation;
use crate::model::Cohort;
use crate::penalty::{Penalties, PenaltyPolicy};
use crate::solver::{Solver, SolverStatus};
use tracing::{info, warn};

/// One assignment run for a validated cohort.
pub struct ProjectAssigner<'a> {
    cohort: &'a Cohort,
    penalties: Penalties,
}

impl<'a> ProjectAssigner<'a> {
    pub fn new(cohort: &'a Cohort, policy: &PenaltyPolicy) -> Self {
        ProjectAssigner {
            cohort,
            penalties: Penalties::compute(cohort, policy),
        }
    }

    pub fn penalties(&self) -> &Penalties {
        &self.penalties
    }

    /// Build the model into a fresh `solver`, optimize it and decode the result.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &mut S) -> Result<Solution> {
        let formulation = Formulation::build(solver, self.cohort, &self.penalties);
        match solver.optimize() {
            SolverStatus::Optimal => {}
            SolverStatus::Infeasible => {
                warn!("model is infeasible");
                return Err(Error::InfeasibleModel);
            }
            status => {
                warn!(%status, "solver did not reach optimality");
                return Err(Error::SolverFailure(status));
            }
        }
        let solution = extract::extract(solver, &formulation, self.cohort, &self.penalties);
        info!(
            objective = solution.objective,
            assignments = solution.assignments.len(),
            "solution extracted"
        );
        Ok(solution)
    }
}

/// Validate `data`, then solve it with `solver`.
pub fn assign<S: Solver + ?Sized>(
    data: &Dataset,
    policy: &PenaltyPolicy,
    solver: &mut S,
) -> Result<(Cohort, Solution)> {
    let cohort = Cohort::from_dataset(data)?;
    let solution = ProjectAssigner::new(&cohort, policy).solve(solver)?;
    Ok((cohort, solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Row};
    use crate::formulation::assignment_name;
    use crate::schema::{PROJECTS, STUDENTS, field};
    use crate::solver::stub::ScriptedSolver;
    use rstest::rstest;

    fn dataset() -> Dataset {
        let mut data = Dataset::new();
        data.insert_table(
            PROJECTS,
            vec![Row::from_iter([
                (field::NAME, Cell::from("Robots")),
                (field::MIN_CAPACITY, Cell::from(0_i64)),
                (field::MAX_CAPACITY, Cell::from(2_i64)),
                (field::EVEN_NUMBERED, Cell::from(false)),
            ])],
        );
        data.insert_table(
            STUDENTS,
            vec![Row::from_iter([
                (field::EMAIL, Cell::from("ann@example.com")),
                (field::FIRST_CHOICE, Cell::from("Robots")),
            ])],
        );
        data
    }

    #[test]
    fn optimal_status_yields_a_solution() {
        let mut solver = ScriptedSolver::new(SolverStatus::Optimal)
            .with_value(&assignment_name("ann@example.com", "Robots"), 1.0);
        let (cohort, solution) = assign(&dataset(), &PenaltyPolicy::default(), &mut solver).unwrap();
        assert_eq!(solver.optimized, 1);
        assert_eq!(solution.assignments.len(), 1);
        assert_eq!(solution.objective, 0.0);
        assert!(crate::checks::check_solution(&cohort, &solution).is_empty());
    }

    #[rstest]
    #[case(SolverStatus::Infeasible, Error::InfeasibleModel)]
    #[case(SolverStatus::Unbounded, Error::SolverFailure(SolverStatus::Unbounded))]
    #[case(SolverStatus::SolverError, Error::SolverFailure(SolverStatus::SolverError))]
    #[case(SolverStatus::Timeout, Error::SolverFailure(SolverStatus::Timeout))]
    fn non_optimal_status_is_fatal(#[case] status: SolverStatus, #[case] expected: Error) {
        let mut solver = ScriptedSolver::new(status);
        assert_eq!(
            assign(&dataset(), &PenaltyPolicy::default(), &mut solver).map(|_| ()),
            Err(expected)
        );
        assert_eq!(solver.optimized, 1);
    }

    #[test]
    fn invalid_input_never_reaches_the_solver() {
        let mut data = dataset();
        data.insert_table(
            STUDENTS,
            vec![Row::from_iter([
                (field::EMAIL, Cell::from("ann@example.com")),
                (field::FIRST_CHOICE, Cell::from("Rockets")),
            ])],
        );
        let mut solver = ScriptedSolver::new(SolverStatus::Optimal);
        assert!(matches!(
            assign(&data, &PenaltyPolicy::default(), &mut solver),
            Err(Error::SchemaViolation(_))
        ));
        assert_eq!(solver.optimized, 0);
        assert!(solver.variables.is_empty());
    }
}
