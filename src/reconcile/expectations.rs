use std::collections::{BTreeSet, HashMap};

const STANDARD: &[(&str, &[&str])] = &[
    ("A", &["Active", "Accepted"]),
    ("D", &["Deferred"]),
    ("F", &["Final"]),
    ("P", &["Provisional"]),
    ("R", &["Rejected"]),
    ("S", &["Superseded"]),
    ("W", &["Withdrawn"]),
    ("", &["Draft", "Active"]),
];

/// Allowed PEP statuses per index category code
///
/// Built once at startup and handed to the [`Reconciler`]. The empty code
/// covers index rows whose type letter has no status letter.
///
/// [`Reconciler`]: crate::reconcile::Reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusExpectationTable {
    allowed: HashMap<String, BTreeSet<String>>,
}

impl StatusExpectationTable {
    /// The category codes used by the PEP index
    pub fn standard() -> Self {
        Self::from_entries(STANDARD.iter().copied())
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        let allowed = entries
            .into_iter()
            .map(|(code, statuses)| {
                (
                    code.to_string(),
                    statuses.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { allowed }
    }

    /// Allowed statuses for `code`, `None` for codes the table does not know
    pub fn expected(&self, code: &str) -> Option<&BTreeSet<String>> {
        self.allowed.get(code)
    }
}
