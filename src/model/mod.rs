pub use self::choice::{AssignedChoice, PreviousChoice};
pub use self::cohort::Cohort;
pub use self::project::{Project, ProjectId};
pub use self::student::{Preferences, PreviousRound, Student, StudentId};

mod choice;
mod cohort;
mod project;
mod student;
