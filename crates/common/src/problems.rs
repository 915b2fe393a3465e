//! The contest's fixed problem sizes. Room counts never change at runtime;
//! they exist so the CLI and tests can go from a problem name to an `N`
//! without hardcoding it twice.

/// A named contest problem and the room count the oracle uses for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemName {
    Probatio,
    Primus,
    Secundus,
    Tertius,
    Quartus,
    Quintus,
}

pub const PROBLEMS: &[(ProblemName, &str, usize)] = &[
    (ProblemName::Probatio, "probatio", 3),
    (ProblemName::Primus, "primus", 6),
    (ProblemName::Secundus, "secundus", 12),
    (ProblemName::Tertius, "tertius", 18),
    (ProblemName::Quartus, "quartus", 24),
    (ProblemName::Quintus, "quintus", 30),
];

impl ProblemName {
    pub fn as_str(self) -> &'static str {
        PROBLEMS
            .iter()
            .find(|(name, _, _)| *name == self)
            .map(|(_, s, _)| *s)
            .expect("PROBLEMS is exhaustive over ProblemName")
    }

    pub fn parse(name: &str) -> Option<Self> {
        PROBLEMS
            .iter()
            .find(|(_, s, _)| *s == name)
            .map(|(name, _, _)| *name)
    }

    pub fn room_count(self) -> usize {
        problem_size(self)
    }
}

/// Room count for a given problem, straight out of the fixed table.
pub fn problem_size(name: ProblemName) -> usize {
    PROBLEMS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, _, size)| *size)
        .expect("PROBLEMS is exhaustive over ProblemName")
}
