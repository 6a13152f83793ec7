use crate::extract::Solution;
use crate::model::Cohort;
use crate::stats;
use std::io::{self, Write};

pub fn display_details(out: &mut impl Write, cohort: &Cohort, solution: &Solution) -> io::Result<()> {
    let mut projects = cohort.projects.iter().collect::<Vec<_>>();
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    for p in projects {
        let mut students = solution
            .assignments
            .iter()
            .filter(|a| a.project == p.id)
            .map(|a| (cohort.student(a.student).to_string(), a.choice))
            .collect::<Vec<_>>();
        students.sort();
        if !students.is_empty() {
            writeln!(out, "{} ({} students):", p.name, students.len())?;
            for (name, choice) in students {
                writeln!(out, "  - {name} ({choice})")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
pub fn display_stats(out: &mut impl Write, cohort: &Cohort, solution: &Solution) -> io::Result<()> {
    let students = cohort.students.len();
    let lazy = cohort.students.iter().filter(|s| s.is_lazy()).count();
    writeln!(
        out,
        "Students with/without preferences/total: {}/{}/{}",
        students - lazy,
        lazy,
        students
    )?;
    let choices = stats::statistics(solution);
    let total: usize = choices.iter().map(|&(_, n)| n).sum();
    let cumul = choices.iter().scan(0, |s, &(_, n)| {
        *s += n;
        Some(*s)
    });
    writeln!(out, "Final distribution (total penalty {}):", solution.total_penalty())?;
    for (&(choice, n), c) in choices.iter().zip(cumul) {
        if n != 0 {
            writeln!(
                out,
                "  - {choice}: {n} (cumulative {c} - {:.2}%)",
                100.0 * c as f32 / total as f32
            )?;
        }
    }
    Ok(())
}

pub fn display_empty(out: &mut impl Write, cohort: &Cohort, solution: &Solution) -> io::Result<()> {
    let mut projects = cohort.filter_projects(|p| solution.size(p.id) == 0);
    projects.sort_by_key(|&p| &cohort.project(p).name);
    if !projects.is_empty() {
        writeln!(out, "Empty projects:")?;
        for p in projects {
            writeln!(out, "  - {}", cohort.project(p).name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Assignment, ProjectSummary};
    use crate::model::{AssignedChoice, Preferences, Project, ProjectId, Student, StudentId};

    fn fixture() -> (Cohort, Solution) {
        let projects = ["Zeppelins", "Bridges", "Robots"]
            .iter()
            .enumerate()
            .map(|(n, name)| Project {
                id: ProjectId(n),
                name: (*name).to_owned(),
                min_capacity: 0,
                max_capacity: 4,
                even_numbered: false,
            })
            .collect();
        let first_zeppelins = Preferences {
            first: Some(ProjectId(0)),
            ..Preferences::default()
        };
        let students = vec![
            Student::new(StudentId(0), "bob@x", first_zeppelins.clone()),
            Student::new(StudentId(1), "ann@x", first_zeppelins).with_names("Ann", "Smith"),
            Student::new(StudentId(2), "cy@x", Preferences::default()),
        ];
        let cohort = Cohort::new(projects, students).unwrap();
        let assignments = [
            (0, 0, AssignedChoice::First),
            (1, 0, AssignedChoice::First),
            (2, 1, AssignedChoice::Other),
        ]
        .into_iter()
        .map(|(s, p, choice)| Assignment {
            student: StudentId(s),
            project: ProjectId(p),
            choice,
            penalty: if choice == AssignedChoice::First { 0 } else { 3 },
        })
        .collect();
        let solution = Solution {
            assignments,
            projects: vec![
                ProjectSummary {
                    project: ProjectId(0),
                    assigned: 2,
                },
                ProjectSummary {
                    project: ProjectId(1),
                    assigned: 1,
                },
                ProjectSummary {
                    project: ProjectId(2),
                    assigned: 0,
                },
            ],
            objective: 3.0,
        };
        (cohort, solution)
    }

    fn render(f: fn(&mut Vec<u8>, &Cohort, &Solution) -> io::Result<()>) -> String {
        let (cohort, solution) = fixture();
        let mut out = Vec::new();
        f(&mut out, &cohort, &solution).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn details_are_sorted() {
        assert_eq!(
            render(|out, c, s| display_details(out, c, s)),
            "Bridges (1 students):\n  - cy@x (Other Choice)\n\n\
             Zeppelins (2 students):\n  - Ann Smith <ann@x> (First Choice)\n  - bob@x (First Choice)\n\n"
        );
    }

    #[test]
    fn stats_are_cumulative() {
        assert_eq!(
            render(|out, c, s| display_stats(out, c, s)),
            "Students with/without preferences/total: 2/1/3\n\
             Final distribution (total penalty 3):\n  \
             - First Choice: 2 (cumulative 2 - 66.67%)\n  \
             - Other Choice: 1 (cumulative 3 - 100.00%)\n"
        );
    }

    #[test]
    fn empty_projects() {
        assert_eq!(
            render(|out, c, s| display_empty(out, c, s)),
            "Empty projects:\n  - Robots\n"
        );
    }
}
