//! Dissatisfaction costs for every (student, project) pair.

use crate::model::{Cohort, PreviousChoice, ProjectId, Student, StudentId};
use pathfinding::matrix::Matrix;
use serde::Deserialize;
use tracing::{debug, trace};

/// Base cost of each rank. `unranked` applies to projects the student did not mention,
/// and sits between the third and the last choice.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PenaltyPolicy {
    pub first_choice: u32,
    pub second_choice: u32,
    pub third_choice: u32,
    pub last_choice: u32,
    pub unranked: u32,
    pub multipliers: PriorityMultipliers,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        PenaltyPolicy {
            first_choice: 0,
            second_choice: 1,
            third_choice: 2,
            last_choice: 4,
            unranked: 3,
            multipliers: PriorityMultipliers::default(),
        }
    }
}

/// Scaling applied to every penalty of a student according to how well they fared in the
/// previous round. Students who got a bad outcome weigh more in the objective.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityMultipliers {
    pub first_choice: u32,
    pub second_choice: u32,
    pub third_choice: u32,
    pub last_choice: u32,
    pub other_choice: u32,
    pub did_not_submit_first_survey: u32,
    pub did_not_submit_second_survey: u32,
}

impl Default for PriorityMultipliers {
    fn default() -> Self {
        PriorityMultipliers {
            first_choice: 1,
            second_choice: 3,
            third_choice: 4,
            last_choice: 4,
            other_choice: 4,
            did_not_submit_first_survey: 2,
            did_not_submit_second_survey: 1,
        }
    }
}

impl PriorityMultipliers {
    pub fn multiplier(&self, choice: PreviousChoice) -> u32 {
        match choice {
            PreviousChoice::FirstChoice => self.first_choice,
            PreviousChoice::SecondChoice => self.second_choice,
            PreviousChoice::ThirdChoice => self.third_choice,
            PreviousChoice::LastChoice => self.last_choice,
            PreviousChoice::OtherChoice => self.other_choice,
            PreviousChoice::DidNotSubmitFirstSurvey => self.did_not_submit_first_survey,
            PreviousChoice::DidNotSubmitSecondSurvey => self.did_not_submit_second_survey,
        }
    }
}

impl PenaltyPolicy {
    /// Cost of placing `student` in `project`, before any prior round scaling.
    pub fn base_penalty(&self, student: &Student, project: ProjectId) -> u32 {
        let prefs = &student.preferences;
        let project = Some(project);
        if prefs.first == project {
            self.first_choice
        } else if prefs.second == project {
            self.second_choice
        } else if prefs.third == project {
            self.third_choice
        } else if prefs.last == project {
            self.last_choice
        } else {
            self.unranked
        }
    }

    /// Largest penalty this policy can give, `None` when a rank cost times a multiplier
    /// does not fit in a `u32`.
    pub fn max_penalty(&self) -> Option<u32> {
        let rank = [
            self.first_choice,
            self.second_choice,
            self.third_choice,
            self.last_choice,
            self.unranked,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        let factor = PreviousChoice::ALL
            .iter()
            .map(|&choice| self.multipliers.multiplier(choice))
            .fold(1, u32::max);
        rank.checked_mul(factor)
    }

    /// Multiplier for `student`, 1 unless prior round data is in use.
    pub fn priority(&self, student: &Student, has_prior_round: bool) -> u32 {
        match student.previous {
            Some(previous) if has_prior_round => self.multipliers.multiplier(previous.choice),
            _ => 1,
        }
    }
}

/// Penalties indexed by student then by project (less is better). Computed once per
/// solve and never modified afterwards.
#[derive(Clone, Debug)]
pub struct Penalties {
    weights: Matrix<u32>,
}

impl Penalties {
    /// Compute penalties, scaling them by the prior round outcome when the cohort has one.
    /// Weights saturate at `u32::MAX` for policies rejected by
    /// [`PenaltyPolicy::max_penalty`].
    pub fn compute(cohort: &Cohort, policy: &PenaltyPolicy) -> Penalties {
        Self::with_prior_round(cohort, policy, cohort.has_prior_round())
    }

    /// Compute penalties, choosing explicitly whether prior round scaling applies.
    pub fn with_prior_round(
        cohort: &Cohort,
        policy: &PenaltyPolicy,
        has_prior_round: bool,
    ) -> Penalties {
        let mut weights = Matrix::new(cohort.students.len(), cohort.projects.len(), 0);
        for s in &cohort.students {
            let priority = policy.priority(s, has_prior_round);
            for p in cohort.all_projects() {
                weights[(s.id.0, p.0)] = policy.base_penalty(s, p).saturating_mul(priority);
            }
            trace!(
                student = %s,
                priority,
                penalties = ?cohort
                    .all_projects()
                    .map(|p| weights[(s.id.0, p.0)])
                    .collect::<Vec<_>>(),
                "computed penalties"
            );
        }
        debug!(
            students = weights.rows,
            projects = weights.columns,
            has_prior_round,
            "computed penalty matrix"
        );
        Penalties { weights }
    }

    pub fn get(&self, StudentId(student): StudentId, ProjectId(project): ProjectId) -> u32 {
        self.weights[(student, project)]
    }

    /// Sum of the penalties of the given (student, project) pairs.
    pub fn total<I>(&self, pairs: I) -> u64
    where
        I: IntoIterator<Item = (StudentId, ProjectId)>,
    {
        pairs.into_iter().map(|(s, p)| u64::from(self.get(s, p))).sum()
    }

    pub fn students(&self) -> usize {
        self.weights.rows
    }

    pub fn projects(&self) -> usize {
        self.weights.columns
    }
}
