use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProjectId(pub usize);

#[derive(Clone, Debug)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub min_capacity: u32,
    pub max_capacity: u32,
    /// The number of assigned students must be a multiple of two.
    pub even_numbered: bool,
}

impl Project {
    /// Check whether `n` students would be an acceptable headcount for this project.
    pub fn can_host(&self, n: u32) -> bool {
        (self.min_capacity..=self.max_capacity).contains(&n) && (!self.even_numbered || n % 2 == 0)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[test]
fn test_can_host() {
    let p = Project {
        id: ProjectId(0),
        name: "dummy".into(),
        min_capacity: 2,
        max_capacity: 5,
        even_numbered: false,
    };
    assert_eq!(
        (0..8).filter(|&n| p.can_host(n)).collect::<Vec<_>>(),
        vec![2, 3, 4, 5]
    );
    let p = Project {
        even_numbered: true,
        ..p
    };
    assert_eq!(
        (0..8).filter(|&n| p.can_host(n)).collect::<Vec<_>>(),
        vec![2, 4]
    );
    let p = Project {
        min_capacity: 0,
        ..p
    };
    assert!(p.can_host(0));
}
