//! Integer program for the assignment problem.
//!
//! With `x[s,p]` equal to 1 iff student `s` is assigned to project `p`:
//!
//! - minimize the sum of `penalty[s,p] * x[s,p]`;
//! - every project receives between its minimum and maximum capacity;
//! - an even-numbered project receives `2 * y[p]` students, `y[p]` being a non-negative
//!   integer;
//! - every student receives exactly one project;
//! - when a prior round exists, `x[s, previous(s)] = 0`.

use crate::model::{Cohort, ProjectId, StudentId};
use crate::penalty::Penalties;
use crate::solver::{Relation, Sense, Solver, Var};
use tracing::{debug, info};

/// Variables declared for a cohort, kept to decode the solver output afterwards.
#[derive(Clone, Debug)]
pub struct Formulation {
    projects: usize,
    assign: Vec<Var>,
    half_counts: Vec<Option<Var>>,
}

pub fn assignment_name(email: &str, project: &str) -> String {
    format!("assign[{email},{project}]")
}

pub fn half_count_name(project: &str) -> String {
    format!("half_count[{project}]")
}

impl Formulation {
    /// Declare variables, objective and constraints to `solver`. The solver is not run.
    pub fn build<S: Solver + ?Sized>(
        solver: &mut S,
        cohort: &Cohort,
        penalties: &Penalties,
    ) -> Formulation {
        let mut assign = Vec::with_capacity(cohort.students.len() * cohort.projects.len());
        for s in &cohort.students {
            for p in &cohort.projects {
                assign.push(solver.declare_binary_variable(&assignment_name(&s.email, &p.name)));
            }
        }
        let half_counts = cohort
            .projects
            .iter()
            .map(|p| {
                p.even_numbered
                    .then(|| solver.declare_integer_variable(&half_count_name(&p.name), 0.0))
            })
            .collect();
        let formulation = Formulation {
            projects: cohort.projects.len(),
            assign,
            half_counts,
        };

        let objective = cohort
            .all_students()
            .flat_map(|s| cohort.all_projects().map(move |p| (s, p)))
            .map(|(s, p)| (formulation.assign_var(s, p), f64::from(penalties.get(s, p))))
            .collect::<Vec<_>>();
        solver.set_objective(&objective, Sense::Minimize);

        let mut constraints = 0;
        for p in &cohort.projects {
            let mut column = cohort
                .all_students()
                .map(|s| (formulation.assign_var(s, p.id), 1.0))
                .collect::<Vec<_>>();
            solver.add_linear_constraint(
                &format!("min_capacity[{}]", p.name),
                &column,
                Relation::GreaterOrEqual,
                f64::from(p.min_capacity),
            );
            solver.add_linear_constraint(
                &format!("max_capacity[{}]", p.name),
                &column,
                Relation::LessOrEqual,
                f64::from(p.max_capacity),
            );
            constraints += 2;
            if let Some(y) = formulation.half_count_var(p.id) {
                column.push((y, -2.0));
                solver.add_linear_constraint(
                    &format!("even[{}]", p.name),
                    &column,
                    Relation::Equal,
                    0.0,
                );
                constraints += 1;
            }
        }

        let exclude_previous = cohort.has_prior_round();
        for s in &cohort.students {
            let row = cohort
                .all_projects()
                .map(|p| (formulation.assign_var(s.id, p), 1.0))
                .collect::<Vec<_>>();
            solver.add_linear_constraint(
                &format!("one_project[{}]", s.email),
                &row,
                Relation::Equal,
                1.0,
            );
            constraints += 1;
            if let Some(previous) = s.previous_assignment().filter(|_| exclude_previous) {
                debug!(student = %s, project = %cohort.project(previous), "excluding previous project");
                solver.add_linear_constraint(
                    &format!("no_repeat[{}]", s.email),
                    &[(formulation.assign_var(s.id, previous), 1.0)],
                    Relation::Equal,
                    0.0,
                );
                constraints += 1;
            }
        }

        info!(
            variables = formulation.assign.len() + formulation.half_counts.iter().flatten().count(),
            constraints,
            exclude_previous,
            "built assignment model"
        );
        formulation
    }

    pub fn assign_var(&self, StudentId(s): StudentId, ProjectId(p): ProjectId) -> Var {
        self.assign[s * self.projects + p]
    }

    pub fn half_count_var(&self, ProjectId(p): ProjectId) -> Option<Var> {
        self.half_counts[p]
    }
}
