use std::fmt;
use std::str::FromStr;

/// Outcome a student obtained in the previous assignment round, as recorded in the
/// `Previous Choice` column.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PreviousChoice {
    FirstChoice,
    SecondChoice,
    ThirdChoice,
    LastChoice,
    OtherChoice,
    DidNotSubmitFirstSurvey,
    DidNotSubmitSecondSurvey,
}

impl PreviousChoice {
    pub const ALL: [PreviousChoice; 7] = [
        PreviousChoice::FirstChoice,
        PreviousChoice::SecondChoice,
        PreviousChoice::ThirdChoice,
        PreviousChoice::LastChoice,
        PreviousChoice::OtherChoice,
        PreviousChoice::DidNotSubmitFirstSurvey,
        PreviousChoice::DidNotSubmitSecondSurvey,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PreviousChoice::FirstChoice => "First Choice",
            PreviousChoice::SecondChoice => "Second Choice",
            PreviousChoice::ThirdChoice => "Third Choice",
            PreviousChoice::LastChoice => "Last Choice",
            PreviousChoice::OtherChoice => "Other Choice",
            PreviousChoice::DidNotSubmitFirstSurvey => "Did Not Submit First Survey",
            PreviousChoice::DidNotSubmitSecondSurvey => "Did Not Submit Second Survey",
        }
    }
}

impl fmt::Display for PreviousChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreviousChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown previous choice {s:?}"))
    }
}

/// Label describing how the project a student received relates to their ranking.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AssignedChoice {
    First,
    Second,
    Third,
    Last,
    Other,
}

impl AssignedChoice {
    pub const ALL: [AssignedChoice; 5] = [
        AssignedChoice::First,
        AssignedChoice::Second,
        AssignedChoice::Third,
        AssignedChoice::Last,
        AssignedChoice::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssignedChoice::First => "First Choice",
            AssignedChoice::Second => "Second Choice",
            AssignedChoice::Third => "Third Choice",
            AssignedChoice::Last => "Last Choice",
            AssignedChoice::Other => "Other Choice",
        }
    }
}

impl fmt::Display for AssignedChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_previous_choice_labels() {
    for choice in PreviousChoice::ALL {
        assert_eq!(choice.as_str().parse::<PreviousChoice>(), Ok(choice));
    }
    assert!("Fourth Choice".parse::<PreviousChoice>().is_err());
}

#[test]
fn test_assigned_choice_labels() {
    let labels = AssignedChoice::ALL.map(|c| c.to_string());
    assert_eq!(
        labels,
        ["First Choice", "Second Choice", "Third Choice", "Last Choice", "Other Choice"]
    );
    assert_eq!(AssignedChoice::Last.as_str(), PreviousChoice::LastChoice.as_str());
}
