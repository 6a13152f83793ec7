use crate::extract::Solution;
use crate::model::AssignedChoice;

/// Number of assignments for each label, in the order of [`AssignedChoice::ALL`].
pub fn statistics(solution: &Solution) -> Vec<(AssignedChoice, usize)> {
    AssignedChoice::ALL
        .iter()
        .map(|&choice| {
            (
                choice,
                solution
                    .assignments
                    .iter()
                    .filter(|a| a.choice == choice)
                    .count(),
            )
        })
        .collect()
}
