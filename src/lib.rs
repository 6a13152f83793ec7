//! Assignment of class projects to students.
//!
//! Students rank projects, and an integer program places every student in exactly one
//! project while respecting capacity and parity requirements and minimizing the total
//! dissatisfaction. When the outcome of a previous round is known, students who fared
//! badly weigh more and nobody gets the same project twice.

pub mod assigner;
pub mod checks;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod extract;
pub mod formulation;
pub mod loaders;
pub mod model;
pub mod penalty;
pub mod schema;
pub mod solver;
pub mod stats;

pub use crate::assigner::{ProjectAssigner, assign};
pub use crate::error::{Error, Result, Violation};
pub use crate::extract::{Assignment, ProjectSummary, Solution};
