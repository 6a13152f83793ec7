use crate::solver::SolverStatus;
use thiserror::Error;

/// Fatal outcomes of an assignment run. None of them comes with partial output.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("schema violation: {0}")]
    SchemaViolation(#[from] Violation),

    #[error(
        "{fields} must be collectively null or collectively non-null \
         ({present} students have them, {absent} do not)"
    )]
    InconsistentPriorRoundData {
        fields: String,
        present: usize,
        absent: usize,
    },

    #[error("no assignment satisfies every capacity, parity and exclusion constraint")]
    InfeasibleModel,

    #[error("solver terminated with status {0}")]
    SolverFailure(SolverStatus),
}

/// The input rule that a schema check found broken.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Violation {
    #[error("missing table {table}")]
    MissingTable { table: String },

    #[error("table {table} has duplicate primary key {key:?}")]
    DuplicateKey { table: String, key: String },

    #[error("{table} {key:?}: {field} {value:?} does not reference any row of {references}")]
    ForeignKey {
        table: String,
        key: String,
        field: String,
        value: String,
        references: String,
    },

    #[error("{table} {key:?}: {field} {problem}")]
    DataType {
        table: String,
        key: String,
        field: String,
        problem: String,
    },

    #[error("{table} {key:?}: check {predicate:?} failed")]
    RowPredicate {
        table: String,
        key: String,
        predicate: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
