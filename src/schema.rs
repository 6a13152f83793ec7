//! Table layouts and the rules that input tables must obey.
//!
//! A [`Schema`] is plain immutable data handed to the validator in
//! [`crate::checks::validate`]; nothing in here is global state.

use crate::dataset::{Cell, Row};
use crate::model::{AssignedChoice, PreviousChoice};

pub const PROJECTS: &str = "projects";
pub const STUDENTS: &str = "students";
pub const ASSIGNMENTS: &str = "assignments";

/// Column headers.
pub mod field {
    pub const NAME: &str = "Name";
    pub const MIN_CAPACITY: &str = "Min Capacity";
    pub const MAX_CAPACITY: &str = "Max Capacity";
    pub const EVEN_NUMBERED: &str = "Even Numbered";
    pub const EMAIL: &str = "Email";
    pub const FIRST_NAME: &str = "First Name";
    pub const LAST_NAME: &str = "Last Name";
    pub const FIRST_CHOICE: &str = "First Choice";
    pub const SECOND_CHOICE: &str = "Second Choice";
    pub const THIRD_CHOICE: &str = "Third Choice";
    pub const LAST_CHOICE: &str = "Last Choice";
    pub const PREVIOUS_ASSIGNMENT: &str = "Previous Assignment";
    pub const PREVIOUS_CHOICE: &str = "Previous Choice";
    pub const PROJECT: &str = "Project";
    pub const ASSIGNED_CHOICE: &str = "Assigned Choice";
    pub const NUMBER_ASSIGNED: &str = "Number Assigned";
}

/// Columns of the students table that name a project.
pub const PROJECT_REFERENCES: [&str; 5] = [
    field::FIRST_CHOICE,
    field::SECOND_CHOICE,
    field::THIRD_CHOICE,
    field::LAST_CHOICE,
    field::PREVIOUS_ASSIGNMENT,
];

/// Columns describing the previous round, present for everyone or for no one.
pub const PRIOR_ROUND_FIELDS: [&str; 2] = [field::PREVIOUS_ASSIGNMENT, field::PREVIOUS_CHOICE];

#[derive(Clone, Debug)]
pub enum DataType {
    Integer { min: Option<i64>, max: Option<i64> },
    /// Boolean, or integer 0/1.
    Flag,
    Text {
        nullable: bool,
        allowed: Option<Vec<&'static str>>,
    },
}

impl DataType {
    pub fn non_negative_integer() -> Self {
        DataType::Integer {
            min: Some(0),
            max: None,
        }
    }

    pub fn text(nullable: bool) -> Self {
        DataType::Text {
            nullable,
            allowed: None,
        }
    }

    /// Describe what is wrong with `cell`, if anything.
    pub fn check(&self, cell: &Cell) -> Result<(), String> {
        match self {
            DataType::Integer { min, max } => {
                let n = cell
                    .as_integer()
                    .ok_or_else(|| format!("must be an integer, found {}", describe(cell)))?;
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return Err(format!(
                        "must be within [{}, {}], found {n}",
                        min.map_or_else(|| "-inf".to_owned(), |m| m.to_string()),
                        max.map_or_else(|| "+inf".to_owned(), |m| m.to_string()),
                    ));
                }
                Ok(())
            }
            DataType::Flag => cell
                .as_flag()
                .map(|_| ())
                .ok_or_else(|| format!("must be 0 or 1, found {}", describe(cell))),
            DataType::Text { nullable, allowed } => match cell {
                Cell::Null if *nullable => Ok(()),
                Cell::Text(s) => match allowed {
                    Some(allowed) if !allowed.contains(&s.as_str()) => {
                        Err(format!("must be one of {allowed:?}, found {s:?}"))
                    }
                    _ => Ok(()),
                },
                _ => Err(format!("must be a string, found {}", describe(cell))),
            },
        }
    }
}

fn describe(cell: &Cell) -> String {
    match cell {
        Cell::Null => "null".to_owned(),
        Cell::Text(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: &'static str,
    pub data_type: DataType,
}

#[derive(Clone, Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub primary_key: &'static str,
    /// Every column, primary key included.
    pub fields: Vec<Field>,
}

impl TableSchema {
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn key_of(&self, row: &Row) -> String {
        row.get(self.primary_key).to_string()
    }
}

/// `table.field`, when not null, must equal the primary key of some row of `references`.
#[derive(Clone, Debug)]
pub struct ForeignKey {
    pub table: &'static str,
    pub field: &'static str,
    pub references: &'static str,
}

#[derive(Clone, Debug)]
pub struct RowPredicate {
    pub table: &'static str,
    pub name: &'static str,
    pub check: fn(&Row) -> bool,
}

/// The listed columns must be null in every row or non-null in every row.
#[derive(Clone, Debug)]
pub struct JointPresence {
    pub table: &'static str,
    pub fields: Vec<&'static str>,
}

#[derive(Clone, Debug)]
pub struct Schema {
    pub tables: Vec<TableSchema>,
    pub foreign_keys: Vec<ForeignKey>,
    pub predicates: Vec<RowPredicate>,
    pub joint_presence: Vec<JointPresence>,
}

impl Schema {
    /// Layout of the `projects` and `students` input tables.
    pub fn input() -> Self {
        let text_field = |name| Field {
            name,
            data_type: DataType::text(true),
        };
        let mut student_fields = vec![
            Field {
                name: field::EMAIL,
                data_type: DataType::text(false),
            },
            text_field(field::FIRST_NAME),
            text_field(field::LAST_NAME),
        ];
        student_fields.extend(PROJECT_REFERENCES.into_iter().map(text_field));
        student_fields.push(Field {
            name: field::PREVIOUS_CHOICE,
            data_type: DataType::Text {
                nullable: true,
                allowed: Some(PreviousChoice::ALL.iter().map(|c| c.as_str()).collect()),
            },
        });
        Schema {
            tables: vec![
                TableSchema {
                    name: PROJECTS,
                    primary_key: field::NAME,
                    fields: vec![
                        Field {
                            name: field::NAME,
                            data_type: DataType::text(false),
                        },
                        Field {
                            name: field::MIN_CAPACITY,
                            data_type: DataType::non_negative_integer(),
                        },
                        Field {
                            name: field::MAX_CAPACITY,
                            data_type: DataType::non_negative_integer(),
                        },
                        Field {
                            name: field::EVEN_NUMBERED,
                            data_type: DataType::Flag,
                        },
                    ],
                },
                TableSchema {
                    name: STUDENTS,
                    primary_key: field::EMAIL,
                    fields: student_fields,
                },
            ],
            foreign_keys: PROJECT_REFERENCES
                .into_iter()
                .map(|f| ForeignKey {
                    table: STUDENTS,
                    field: f,
                    references: PROJECTS,
                })
                .collect(),
            predicates: vec![RowPredicate {
                table: PROJECTS,
                name: "Max Capacity at least Min Capacity",
                check: |row| {
                    match (
                        row.get(field::MIN_CAPACITY).as_integer(),
                        row.get(field::MAX_CAPACITY).as_integer(),
                    ) {
                        (Some(min), Some(max)) => max >= min,
                        _ => true,
                    }
                },
            }],
            joint_presence: vec![JointPresence {
                table: STUDENTS,
                fields: PRIOR_ROUND_FIELDS.to_vec(),
            }],
        }
    }

    /// Layout of the `assignments` and `projects` output tables.
    pub fn output() -> Self {
        let text_field = |name| Field {
            name,
            data_type: DataType::text(true),
        };
        Schema {
            tables: vec![
                TableSchema {
                    name: ASSIGNMENTS,
                    primary_key: field::EMAIL,
                    fields: vec![
                        Field {
                            name: field::EMAIL,
                            data_type: DataType::text(false),
                        },
                        text_field(field::FIRST_NAME),
                        text_field(field::LAST_NAME),
                        Field {
                            name: field::PROJECT,
                            data_type: DataType::text(false),
                        },
                        Field {
                            name: field::ASSIGNED_CHOICE,
                            data_type: DataType::Text {
                                nullable: false,
                                allowed: Some(AssignedChoice::ALL.iter().map(|c| c.as_str()).collect()),
                            },
                        },
                    ],
                },
                TableSchema {
                    name: PROJECTS,
                    primary_key: field::NAME,
                    fields: vec![
                        Field {
                            name: field::NAME,
                            data_type: DataType::text(false),
                        },
                        Field {
                            name: field::NUMBER_ASSIGNED,
                            data_type: DataType::non_negative_integer(),
                        },
                    ],
                },
            ],
            foreign_keys: vec![ForeignKey {
                table: ASSIGNMENTS,
                field: field::PROJECT,
                references: PROJECTS,
            }],
            predicates: Vec::new(),
            joint_presence: Vec::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }
}
