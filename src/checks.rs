use crate::dataset::Dataset;
use crate::error::{Error, Result, Violation};
use crate::extract::Solution;
use crate::model::Cohort;
use crate::schema::Schema;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Check raw tables against `schema` before anything is built from them.
///
/// Rules are applied in this order and the first failure is returned:
/// table presence and primary key uniqueness, foreign keys, data types, row predicates,
/// and finally the joint presence rules.
pub fn validate(schema: &Schema, data: &Dataset) -> Result<()> {
    let mut keys: HashMap<&str, HashSet<String>> = HashMap::new();
    for table in &schema.tables {
        let rows = data.table(table.name).ok_or_else(|| Violation::MissingTable {
            table: table.name.to_owned(),
        })?;
        let unknown = rows
            .iter()
            .flat_map(|row| row.fields())
            .filter(|f| !table.field_names().any(|n| n == *f))
            .collect::<BTreeSet<_>>();
        if !unknown.is_empty() {
            warn!(table = table.name, columns = ?unknown, "ignoring unknown columns");
        }
        let mut seen = HashSet::new();
        for row in rows {
            let key = row.get(table.primary_key);
            // A null key is reported by the data type rules.
            if !key.is_null() && !seen.insert(key.to_string()) {
                return Err(Violation::DuplicateKey {
                    table: table.name.to_owned(),
                    key: key.to_string(),
                }
                .into());
            }
        }
        keys.insert(table.name, seen);
    }

    for fk in &schema.foreign_keys {
        let (Some(table), Some(rows)) = (schema.table(fk.table), data.table(fk.table)) else {
            continue;
        };
        let targets = keys
            .get(fk.references)
            .ok_or_else(|| Violation::MissingTable {
                table: fk.references.to_owned(),
            })?;
        for row in rows {
            if let Some(value) = row.get(fk.field).as_text() {
                if !targets.contains(value) {
                    return Err(Violation::ForeignKey {
                        table: fk.table.to_owned(),
                        key: table.key_of(row),
                        field: fk.field.to_owned(),
                        value: value.to_owned(),
                        references: fk.references.to_owned(),
                    }
                    .into());
                }
            }
        }
    }

    for table in &schema.tables {
        for row in data.table(table.name).unwrap_or_default() {
            for field in &table.fields {
                field
                    .data_type
                    .check(row.get(field.name))
                    .map_err(|problem| Violation::DataType {
                        table: table.name.to_owned(),
                        key: table.key_of(row),
                        field: field.name.to_owned(),
                        problem,
                    })?;
            }
        }
    }

    for predicate in &schema.predicates {
        let Some(table) = schema.table(predicate.table) else {
            continue;
        };
        for row in data.table(predicate.table).unwrap_or_default() {
            if !(predicate.check)(row) {
                return Err(Violation::RowPredicate {
                    table: predicate.table.to_owned(),
                    key: table.key_of(row),
                    predicate: predicate.name.to_owned(),
                }
                .into());
            }
        }
    }

    for rule in &schema.joint_presence {
        let rows = data.table(rule.table).unwrap_or_default();
        let all = |null: bool| {
            rows.iter()
                .all(|row| rule.fields.iter().all(|f| row.get(f).is_null() == null))
        };
        if !all(true) && !all(false) {
            let present = rows
                .iter()
                .filter(|row| rule.fields.iter().any(|f| !row.get(f).is_null()))
                .count();
            return Err(Error::InconsistentPriorRoundData {
                fields: rule.fields.join(" and "),
                present,
                absent: rows.len() - present,
            });
        }
    }

    debug!(tables = schema.tables.len(), "input tables are valid");
    Ok(())
}

/// Re-verify the structural properties of a solution. Returns a description of every
/// problem found, which is empty for a consistent solution.
pub fn check_solution(cohort: &Cohort, solution: &Solution) -> Vec<String> {
    let mut problems = Vec::new();
    let mut assigned = vec![0usize; cohort.students.len()];
    let mut sizes = vec![0u32; cohort.projects.len()];
    for a in &solution.assignments {
        assigned[a.student.0] += 1;
        sizes[a.project.0] += 1;
        if cohort.student(a.student).previous_assignment() == Some(a.project) {
            problems.push(format!(
                "student {} got their previous project {} again",
                cohort.student(a.student),
                cohort.project(a.project)
            ));
        }
    }
    for s in cohort.all_students() {
        if assigned[s.0] != 1 {
            problems.push(format!(
                "student {} is assigned to {} projects",
                cohort.student(s),
                assigned[s.0]
            ));
        }
    }
    for summary in &solution.projects {
        let p = cohort.project(summary.project);
        if summary.assigned != sizes[p.id.0] {
            problems.push(format!(
                "project {p} reports {} students but has {} assignments",
                summary.assigned, sizes[p.id.0]
            ));
        }
        if !p.can_host(summary.assigned) {
            problems.push(format!(
                "project {p} has an unacceptable number of students ({})",
                summary.assigned
            ));
        }
    }
    if solution.projects.len() != cohort.projects.len() {
        problems.push(format!(
            "{} project summaries for {} projects",
            solution.projects.len(),
            cohort.projects.len()
        ));
    }
    problems
}
