use super::{Preferences, PreviousChoice, PreviousRound, Project, ProjectId, Student, StudentId};
use crate::checks;
use crate::dataset::{Dataset, Row};
use crate::error::{Error, Result, Violation};
use crate::schema::{PRIOR_ROUND_FIELDS, PROJECTS, STUDENTS, Schema, field};
use std::collections::HashMap;
use tracing::{debug, info};

/// The students and projects of one solve, with normalized identifiers: `ProjectId(n)`
/// and `StudentId(n)` are the positions in the respective vectors.
#[derive(Clone, Debug)]
pub struct Cohort {
    pub projects: Vec<Project>,
    pub students: Vec<Student>,
}

impl Cohort {
    /// Assemble a cohort from typed entities, enforcing the invariants the model builder
    /// relies on.
    pub fn new(projects: Vec<Project>, students: Vec<Student>) -> Result<Cohort> {
        for (n, p) in projects.iter().enumerate() {
            if p.id != ProjectId(n) {
                return Err(id_error(PROJECTS, &p.name, n, p.id.0));
            }
            if p.max_capacity < p.min_capacity {
                return Err(Violation::RowPredicate {
                    table: PROJECTS.to_owned(),
                    key: p.name.clone(),
                    predicate: "Max Capacity at least Min Capacity".to_owned(),
                }
                .into());
            }
        }
        for (n, s) in students.iter().enumerate() {
            if s.id != StudentId(n) {
                return Err(id_error(STUDENTS, &s.email, n, s.id.0));
            }
            let references = s
                .preferences
                .projects()
                .chain(s.previous_assignment());
            for ProjectId(p) in references {
                if p >= projects.len() {
                    return Err(Violation::ForeignKey {
                        table: STUDENTS.to_owned(),
                        key: s.email.clone(),
                        field: "project reference".to_owned(),
                        value: p.to_string(),
                        references: PROJECTS.to_owned(),
                    }
                    .into());
                }
            }
        }
        let present = students.iter().filter(|s| s.previous.is_some()).count();
        if present != 0 && present != students.len() {
            return Err(Error::InconsistentPriorRoundData {
                fields: PRIOR_ROUND_FIELDS.join(" and "),
                present,
                absent: students.len() - present,
            });
        }
        Ok(Cohort { projects, students })
    }

    /// Validate raw input tables against [`Schema::input`] and convert them.
    pub fn from_dataset(data: &Dataset) -> Result<Cohort> {
        checks::validate(&Schema::input(), data)?;
        let project_rows = data.table(PROJECTS).unwrap_or_default();
        let student_rows = data.table(STUDENTS).unwrap_or_default();
        let projects = project_rows
            .iter()
            .enumerate()
            .map(|(n, row)| project_from_row(ProjectId(n), row))
            .collect::<Result<Vec<_>>>()?;
        // Work with normalized values (students and projects starting at 0 and without gaps)
        let ids: HashMap<&str, ProjectId> =
            projects.iter().map(|p| (p.name.as_str(), p.id)).collect();
        let students = student_rows
            .iter()
            .enumerate()
            .map(|(n, row)| student_from_row(StudentId(n), row, &ids))
            .collect::<Result<Vec<_>>>()?;
        let cohort = Cohort::new(projects, students)?;
        info!(
            projects = cohort.projects.len(),
            students = cohort.students.len(),
            prior_round = cohort.has_prior_round(),
            "loaded cohort"
        );
        Ok(cohort)
    }

    /// True when every student carries the outcome of a previous round. `Cohort::new`
    /// guarantees that it is then the case for all of them.
    pub fn has_prior_round(&self) -> bool {
        !self.students.is_empty() && self.students.iter().all(|s| s.previous.is_some())
    }

    pub fn student(&self, StudentId(student): StudentId) -> &Student {
        &self.students[student]
    }

    pub fn project(&self, ProjectId(project): ProjectId) -> &Project {
        &self.projects[project]
    }

    pub fn all_projects(&self) -> impl Iterator<Item = ProjectId> + use<> {
        (0..self.projects.len()).map(ProjectId)
    }

    pub fn all_students(&self) -> impl Iterator<Item = StudentId> + use<> {
        (0..self.students.len()).map(StudentId)
    }

    pub fn filter_projects<F>(&self, condition: F) -> Vec<ProjectId>
    where
        F: Fn(&Project) -> bool,
    {
        self.projects
            .iter()
            .filter(|p| condition(p))
            .map(|p| p.id)
            .collect()
    }

    pub fn project_by_name(&self, name: &str) -> Option<ProjectId> {
        self.projects.iter().find(|p| p.name == name).map(|p| p.id)
    }
}

fn data_type_error(table: &str, key: &str, field: &str, problem: &str) -> Error {
    Violation::DataType {
        table: table.to_owned(),
        key: key.to_owned(),
        field: field.to_owned(),
        problem: problem.to_owned(),
    }
    .into()
}

/// Identifiers must match positions.
fn id_error(table: &str, key: &str, expected: usize, found: usize) -> Error {
    data_type_error(table, key, "id", &format!("must be {expected}, found {found}"))
}

fn capacity(row: &Row, key: &str, field: &str) -> Result<u32> {
    row.get(field)
        .as_integer()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| data_type_error(PROJECTS, key, field, "must be a non-negative integer"))
}

fn project_from_row(id: ProjectId, row: &Row) -> Result<Project> {
    let name = row.get(field::NAME).to_string();
    Ok(Project {
        id,
        min_capacity: capacity(row, &name, field::MIN_CAPACITY)?,
        max_capacity: capacity(row, &name, field::MAX_CAPACITY)?,
        even_numbered: row
            .get(field::EVEN_NUMBERED)
            .as_flag()
            .ok_or_else(|| data_type_error(PROJECTS, &name, field::EVEN_NUMBERED, "must be 0 or 1"))?,
        name,
    })
}

fn missing_partner(email: &str, missing: &str, present: &str) -> Error {
    data_type_error(STUDENTS, email, missing, &format!("must be set when {present} is"))
}

fn student_from_row(id: StudentId, row: &Row, ids: &HashMap<&str, ProjectId>) -> Result<Student> {
    let email = row.get(field::EMAIL).to_string();
    let lookup = |f: &str| -> Result<Option<ProjectId>> {
        match row.get(f).as_text() {
            None => Ok(None),
            Some(name) => ids.get(name).copied().map(Some).ok_or_else(|| {
                Violation::ForeignKey {
                    table: STUDENTS.to_owned(),
                    key: email.clone(),
                    field: f.to_owned(),
                    value: name.to_owned(),
                    references: PROJECTS.to_owned(),
                }
                .into()
            }),
        }
    };
    let preferences = Preferences {
        first: lookup(field::FIRST_CHOICE)?,
        second: lookup(field::SECOND_CHOICE)?,
        third: lookup(field::THIRD_CHOICE)?,
        last: lookup(field::LAST_CHOICE)?,
    };
    let previous_choice = row
        .get(field::PREVIOUS_CHOICE)
        .as_text()
        .map(str::parse::<PreviousChoice>)
        .transpose()
        .map_err(|e| data_type_error(STUDENTS, &email, field::PREVIOUS_CHOICE, &e))?;
    let previous = match (lookup(field::PREVIOUS_ASSIGNMENT)?, previous_choice) {
        (Some(assignment), Some(choice)) => Some(PreviousRound { assignment, choice }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(missing_partner(
                &email,
                field::PREVIOUS_CHOICE,
                field::PREVIOUS_ASSIGNMENT,
            ));
        }
        (None, Some(_)) => {
            return Err(missing_partner(
                &email,
                field::PREVIOUS_ASSIGNMENT,
                field::PREVIOUS_CHOICE,
            ));
        }
    };
    let text = |f: &str| row.get(f).as_text().map(str::to_owned);
    let student = Student {
        id,
        first_name: text(field::FIRST_NAME),
        last_name: text(field::LAST_NAME),
        email,
        preferences,
        previous,
    };
    debug!(student = %student, preferences = ?student.preferences, "loaded student");
    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn project(n: usize, min: u32, max: u32) -> Project {
        Project {
            id: ProjectId(n),
            name: format!("P{n}"),
            min_capacity: min,
            max_capacity: max,
            even_numbered: false,
        }
    }

    #[test]
    fn rejects_inverted_capacity() {
        let err = Cohort::new(vec![project(0, 3, 2)], Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaViolation(Violation::RowPredicate { .. })
        ));
    }

    #[test]
    fn rejects_mixed_prior_round() {
        let students = vec![
            Student::new(StudentId(0), "a", Preferences::default())
                .with_previous(ProjectId(0), PreviousChoice::FirstChoice),
            Student::new(StudentId(1), "b", Preferences::default()),
        ];
        let err = Cohort::new(vec![project(0, 0, 2)], students).unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentPriorRoundData {
                fields: "Previous Assignment and Previous Choice".to_owned(),
                present: 1,
                absent: 1,
            }
        );
    }

    #[test]
    fn rejects_dangling_reference() {
        let students = vec![Student::new(
            StudentId(0),
            "a",
            Preferences {
                first: Some(ProjectId(4)),
                ..Preferences::default()
            },
        )];
        assert!(Cohort::new(vec![project(0, 0, 2)], students).is_err());
    }

    #[test]
    fn rejects_unnormalized_ids() {
        let err = Cohort::new(vec![project(0, 0, 2), project(3, 0, 2)], Vec::new()).unwrap_err();
        assert_eq!(
            err,
            Error::SchemaViolation(Violation::DataType {
                table: PROJECTS.to_owned(),
                key: "P3".to_owned(),
                field: "id".to_owned(),
                problem: "must be 1, found 3".to_owned(),
            })
        );
        let students = vec![
            Student::new(StudentId(0), "a", Preferences::default()),
            Student::new(StudentId(0), "b", Preferences::default()),
        ];
        assert!(matches!(
            Cohort::new(vec![project(0, 0, 2)], students),
            Err(Error::SchemaViolation(Violation::DataType { ref key, ref field, .. }))
                if key == "b" && field == "id"
        ));
    }

    #[test]
    fn half_filled_prior_round_row_names_the_missing_field() {
        let ids = HashMap::from([("A", ProjectId(0))]);
        let row = Row::from_iter([
            (field::EMAIL, Cell::from("a@x")),
            (field::PREVIOUS_ASSIGNMENT, Cell::from("A")),
        ]);
        assert_eq!(
            student_from_row(StudentId(0), &row, &ids).unwrap_err(),
            Error::SchemaViolation(Violation::DataType {
                table: STUDENTS.to_owned(),
                key: "a@x".to_owned(),
                field: field::PREVIOUS_CHOICE.to_owned(),
                problem: "must be set when Previous Assignment is".to_owned(),
            })
        );
        let row = Row::from_iter([
            (field::EMAIL, Cell::from("a@x")),
            (field::PREVIOUS_CHOICE, Cell::from("First Choice")),
        ]);
        assert!(matches!(
            student_from_row(StudentId(0), &row, &ids),
            Err(Error::SchemaViolation(Violation::DataType { ref field, .. }))
                if field == "Previous Assignment"
        ));
    }

    #[test]
    fn converts_dataset() {
        let mut data = Dataset::new();
        data.insert_table(
            PROJECTS,
            vec![
                Row::from_iter([
                    (field::NAME, Cell::from("A")),
                    (field::MIN_CAPACITY, Cell::from(1)),
                    (field::MAX_CAPACITY, Cell::from("3")),
                    (field::EVEN_NUMBERED, Cell::from("0")),
                ]),
                Row::from_iter([
                    (field::NAME, Cell::from("B")),
                    (field::MIN_CAPACITY, Cell::from(0)),
                    (field::MAX_CAPACITY, Cell::from(2)),
                    (field::EVEN_NUMBERED, Cell::from(true)),
                ]),
            ],
        );
        data.insert_table(
            STUDENTS,
            vec![Row::from_iter([
                (field::EMAIL, Cell::from("ada@example.com")),
                (field::FIRST_NAME, Cell::from("Ada")),
                (field::FIRST_CHOICE, Cell::from("B")),
                (field::LAST_CHOICE, Cell::from("A")),
                (field::PREVIOUS_ASSIGNMENT, Cell::from("A")),
                (field::PREVIOUS_CHOICE, Cell::from("Second Choice")),
            ])],
        );
        let cohort = Cohort::from_dataset(&data).unwrap();
        assert_eq!(cohort.projects.len(), 2);
        assert!(cohort.project(ProjectId(1)).even_numbered);
        assert_eq!(cohort.project(ProjectId(0)).max_capacity, 3);
        let s = cohort.student(StudentId(0));
        assert_eq!(s.first_name.as_deref(), Some("Ada"));
        assert_eq!(s.last_name, None);
        assert_eq!(s.preferences.first, Some(ProjectId(1)));
        assert_eq!(s.preferences.second, None);
        assert_eq!(s.preferences.last, Some(ProjectId(0)));
        assert_eq!(
            s.previous,
            Some(PreviousRound {
                assignment: ProjectId(0),
                choice: PreviousChoice::SecondChoice
            })
        );
        assert!(cohort.has_prior_round());
        assert_eq!(cohort.project_by_name("B"), Some(ProjectId(1)));
    }
}
