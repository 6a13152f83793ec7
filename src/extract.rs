//! Decoding of solver values into assignment and project summary records.

use crate::dataset::{Cell, Dataset, Row};
use crate::formulation::Formulation;
use crate::model::{AssignedChoice, Cohort, ProjectId, StudentId};
use crate::penalty::Penalties;
use crate::schema::{ASSIGNMENTS, PROJECTS, field};
use crate::solver::Solver;
use tracing::debug;

/// Binary variables above this value count as set.
pub const ASSIGNED_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub student: StudentId,
    pub project: ProjectId,
    pub choice: AssignedChoice,
    pub penalty: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectSummary {
    pub project: ProjectId,
    pub assigned: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub assignments: Vec<Assignment>,
    pub projects: Vec<ProjectSummary>,
    /// Objective value reported by the solver.
    pub objective: f64,
}

impl Solution {
    /// Sum of the penalties of the emitted assignments.
    pub fn total_penalty(&self) -> u64 {
        self.assignments.iter().map(|a| u64::from(a.penalty)).sum()
    }

    pub fn project_for(&self, student: StudentId) -> Option<ProjectId> {
        self.assignments
            .iter()
            .find(|a| a.student == student)
            .map(|a| a.project)
    }

    pub fn students_for(&self, project: ProjectId) -> Vec<StudentId> {
        self.assignments
            .iter()
            .filter(|a| a.project == project)
            .map(|a| a.student)
            .collect()
    }

    pub fn size(&self, project: ProjectId) -> u32 {
        self.projects
            .iter()
            .find(|s| s.project == project)
            .map_or(0, |s| s.assigned)
    }
}

/// Read an optimal solution out of `solver`.
pub fn extract<S: Solver + ?Sized>(
    solver: &S,
    formulation: &Formulation,
    cohort: &Cohort,
    penalties: &Penalties,
) -> Solution {
    let mut assignments = Vec::new();
    for s in &cohort.students {
        for p in cohort.all_projects() {
            if solver.value_of(formulation.assign_var(s.id, p)) > ASSIGNED_THRESHOLD {
                let choice = s.preferences.classify(p);
                debug!(student = %s, project = %cohort.project(p), %choice, "assigned");
                assignments.push(Assignment {
                    student: s.id,
                    project: p,
                    choice,
                    penalty: penalties.get(s.id, p),
                });
            }
        }
    }
    let projects = cohort
        .all_projects()
        .map(|p| {
            let total: f64 = cohort
                .all_students()
                .map(|s| solver.value_of(formulation.assign_var(s, p)))
                .sum();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let assigned = total.round().max(0.0) as u32;
            ProjectSummary {
                project: p,
                assigned,
            }
        })
        .collect();
    Solution {
        assignments,
        projects,
        objective: solver.objective_value(),
    }
}

impl Solution {
    /// The `assignments` and `projects` output tables, laid out as in [`Schema::output`].
    ///
    /// [`Schema::output`]: crate::schema::Schema::output
    pub fn output_tables(&self, cohort: &Cohort) -> Dataset {
        let assignments = self
            .assignments
            .iter()
            .map(|a| {
                let s = cohort.student(a.student);
                Row::from_iter([
                    (field::EMAIL, Cell::from(s.email.as_str())),
                    (field::FIRST_NAME, Cell::from(s.first_name.as_deref())),
                    (field::LAST_NAME, Cell::from(s.last_name.as_deref())),
                    (field::PROJECT, Cell::from(cohort.project(a.project).name.as_str())),
                    (field::ASSIGNED_CHOICE, Cell::from(a.choice.as_str())),
                ])
            })
            .collect();
        let projects = self
            .projects
            .iter()
            .map(|summary| {
                Row::from_iter([
                    (field::NAME, Cell::from(cohort.project(summary.project).name.as_str())),
                    (field::NUMBER_ASSIGNED, Cell::from(i64::from(summary.assigned))),
                ])
            })
            .collect();
        let mut tables = Dataset::new();
        tables.insert_table(ASSIGNMENTS, assignments);
        tables.insert_table(PROJECTS, projects);
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::assignment_name;
    use crate::model::{Preferences, Project, Student};
    use crate::penalty::PenaltyPolicy;
    use crate::schema::Schema;
    use crate::solver::SolverStatus;
    use crate::solver::stub::ScriptedSolver;

    fn cohort() -> Cohort {
        let projects = ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(n, name)| Project {
                id: ProjectId(n),
                name: (*name).to_owned(),
                min_capacity: 0,
                max_capacity: 3,
                even_numbered: false,
            })
            .collect();
        let students = vec![
            Student::new(
                StudentId(0),
                "ada@x",
                Preferences {
                    first: Some(ProjectId(0)),
                    second: Some(ProjectId(1)),
                    ..Preferences::default()
                },
            )
            .with_names("Ada", "Lovelace"),
            Student::new(
                StudentId(1),
                "bob@x",
                Preferences {
                    first: Some(ProjectId(0)),
                    last: Some(ProjectId(1)),
                    ..Preferences::default()
                },
            ),
            Student::new(StudentId(2), "cy@x", Preferences::default()),
        ];
        Cohort::new(projects, students).unwrap()
    }

    fn decode(solver: ScriptedSolver) -> (Cohort, Solution) {
        let c = cohort();
        let penalties = Penalties::compute(&c, &PenaltyPolicy::default());
        let mut solver = solver;
        let formulation = Formulation::build(&mut solver, &c, &penalties);
        let solution = extract(&solver, &formulation, &c, &penalties);
        (c, solution)
    }

    #[test]
    fn decodes_assignments_and_labels() {
        let solver = ScriptedSolver::new(SolverStatus::Optimal)
            .with_value(&assignment_name("ada@x", "B"), 1.0)
            .with_value(&assignment_name("bob@x", "B"), 0.999_999)
            .with_value(&assignment_name("cy@x", "C"), 1.000_001)
            .with_value(&assignment_name("cy@x", "A"), 1e-9);
        let (c, solution) = decode(solver);
        assert_eq!(
            solution.assignments,
            vec![
                Assignment {
                    student: StudentId(0),
                    project: ProjectId(1),
                    choice: AssignedChoice::Second,
                    penalty: 1,
                },
                Assignment {
                    student: StudentId(1),
                    project: ProjectId(1),
                    choice: AssignedChoice::Last,
                    penalty: 4,
                },
                Assignment {
                    student: StudentId(2),
                    project: ProjectId(2),
                    choice: AssignedChoice::Other,
                    penalty: 3,
                },
            ]
        );
        assert_eq!(
            solution.projects,
            vec![
                ProjectSummary {
                    project: ProjectId(0),
                    assigned: 0
                },
                ProjectSummary {
                    project: ProjectId(1),
                    assigned: 2
                },
                ProjectSummary {
                    project: ProjectId(2),
                    assigned: 1
                },
            ]
        );
        assert_eq!(solution.total_penalty(), 8);
        assert!((solution.objective - 8.0).abs() < 1e-3);
        assert_eq!(solution.project_for(StudentId(2)), Some(ProjectId(2)));
        assert_eq!(solution.students_for(ProjectId(1)), vec![StudentId(0), StudentId(1)]);
        assert_eq!(solution.size(ProjectId(0)), 0);
        assert!(crate::checks::check_solution(&c, &solution).is_empty());
    }

    #[test]
    fn output_tables() {
        let solver = ScriptedSolver::new(SolverStatus::Optimal)
            .with_value(&assignment_name("ada@x", "A"), 1.0)
            .with_value(&assignment_name("bob@x", "A"), 1.0)
            .with_value(&assignment_name("cy@x", "A"), 1.0);
        let (c, solution) = decode(solver);
        let tables = solution.output_tables(&c);
        crate::checks::validate(&Schema::output(), &tables).unwrap();
        let assignments = tables.table(ASSIGNMENTS).unwrap();
        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].get(field::FIRST_NAME), &Cell::from("Ada"));
        assert_eq!(assignments[0].get(field::ASSIGNED_CHOICE), &Cell::from("First Choice"));
        assert_eq!(assignments[2].get(field::ASSIGNED_CHOICE), &Cell::from("Other Choice"));
        assert!(assignments[2].get(field::LAST_NAME).is_null());
        let projects = tables.table(PROJECTS).unwrap();
        assert_eq!(
            projects
                .iter()
                .map(|r| (r.get(field::NAME).to_string(), r.get(field::NUMBER_ASSIGNED).as_integer()))
                .collect::<Vec<_>>(),
            vec![("A".into(), Some(3)), ("B".into(), Some(0)), ("C".into(), Some(0))]
        );
    }

    #[test]
    fn total_penalty_exceeds_a_single_weight() {
        let assignment = Assignment {
            student: StudentId(0),
            project: ProjectId(0),
            choice: AssignedChoice::Other,
            penalty: u32::MAX,
        };
        let solution = Solution {
            assignments: vec![
                assignment.clone(),
                Assignment {
                    student: StudentId(1),
                    ..assignment
                },
            ],
            projects: vec![],
            objective: 0.0,
        };
        assert_eq!(solution.total_penalty(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn consistency_check_flags_problems() {
        let solver = ScriptedSolver::new(SolverStatus::Optimal)
            .with_value(&assignment_name("ada@x", "A"), 1.0)
            .with_value(&assignment_name("ada@x", "B"), 1.0);
        let (c, solution) = decode(solver);
        let problems = crate::checks::check_solution(&c, &solution);
        // ada twice, bob and cy never
        assert_eq!(problems.len(), 3);
    }
}
