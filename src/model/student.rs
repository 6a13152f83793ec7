use super::{AssignedChoice, PreviousChoice, ProjectId};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

/// Ranked survey answers. Any of them may be left empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Preferences {
    pub first: Option<ProjectId>,
    pub second: Option<ProjectId>,
    pub third: Option<ProjectId>,
    pub last: Option<ProjectId>,
}

impl Preferences {
    /// Classify `project` against the ranking. Fields are matched in order first, second,
    /// third, last, so a project listed twice gets its best label.
    pub fn classify(&self, project: ProjectId) -> AssignedChoice {
        [
            (self.first, AssignedChoice::First),
            (self.second, AssignedChoice::Second),
            (self.third, AssignedChoice::Third),
            (self.last, AssignedChoice::Last),
        ]
        .into_iter()
        .find_map(|(p, label)| (p == Some(project)).then_some(label))
        .unwrap_or(AssignedChoice::Other)
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none() && self.last.is_none()
    }

    pub(crate) fn projects(&self) -> impl Iterator<Item = ProjectId> + '_ {
        [self.first, self.second, self.third, self.last]
            .into_iter()
            .flatten()
    }
}

/// What happened to the student in the previous round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PreviousRound {
    pub assignment: ProjectId,
    pub choice: PreviousChoice,
}

#[derive(Clone, Debug)]
pub struct Student {
    pub id: StudentId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferences: Preferences,
    pub previous: Option<PreviousRound>,
}

impl Student {
    pub fn new(id: StudentId, email: impl Into<String>, preferences: Preferences) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: None,
            last_name: None,
            preferences,
            previous: None,
        }
    }

    #[must_use]
    pub fn with_names(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = Some(first_name.to_owned());
        self.last_name = Some(last_name.to_owned());
        self
    }

    #[must_use]
    pub fn with_previous(mut self, assignment: ProjectId, choice: PreviousChoice) -> Self {
        self.previous = Some(PreviousRound { assignment, choice });
        self
    }

    pub fn previous_assignment(&self) -> Option<ProjectId> {
        self.previous.map(|p| p.assignment)
    }

    pub fn is_lazy(&self) -> bool {
        self.preferences.is_empty()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => write!(f, "{first} {last} <{}>", self.email),
            _ => f.write_str(&self.email),
        }
    }
}
