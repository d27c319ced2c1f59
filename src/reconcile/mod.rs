//! PEP status reconciliation and aggregation
//!
//! This module cross-checks each PEP's declared status against the statuses
//! its index category allows, and counts PEPs per status:
//! - [`StatusExpectationTable`]: allowed statuses per category code
//! - [`Reconciler`]: finds mismatches and builds the [`Aggregate`]
//! - [`Aggregate::to_table`]: the count table handed to the output sink

mod expectations;

pub use expectations::StatusExpectationTable;

use crate::extract::{PepEntry, Table};
use std::collections::{BTreeMap, BTreeSet};

pub const HEADER: [&str; 2] = ["Статус", "Количество"];
const TOTAL_LABEL: &str = "Общее количество PEP";

/// A PEP whose declared status is not allowed for its category code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub entry: PepEntry,
    pub expected: BTreeSet<String>,
}

/// Occurrences per distinct status, plus the grand total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
}

impl Aggregate {
    /// Counts `entries` by exact status string
    pub fn from_entries(entries: &[PepEntry]) -> Self {
        let mut counts = BTreeMap::new();
        for entry in entries {
            *counts.entry(entry.status.clone()).or_insert(0) += 1;
        }
        Self {
            counts,
            total: entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Renders the counts, `None` when there is nothing to report
    pub fn to_table(&self) -> Option<Table> {
        if self.is_empty() {
            return None;
        }

        let mut table = Table::new(HEADER);
        for (status, count) in &self.counts {
            table.push([format!("Количество PEP в статусе {}", status), count.to_string()]);
        }
        table.push([TOTAL_LABEL.to_string(), self.total.to_string()]);
        Some(table)
    }
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub mismatches: Vec<Mismatch>,
    pub aggregate: Aggregate,
}

/// Validates PEP entries against a [`StatusExpectationTable`]
pub struct Reconciler<'a> {
    expectations: &'a StatusExpectationTable,
}

impl<'a> Reconciler<'a> {
    pub fn new(expectations: &'a StatusExpectationTable) -> Self {
        Self { expectations }
    }

    /// Returns the mismatch for `entry`, if any
    ///
    /// Category codes missing from the table are never mismatches.
    pub fn check(&self, entry: &PepEntry) -> Option<Mismatch> {
        let expected = match self.expectations.expected(&entry.category_code) {
            Some(expected) => expected,
            None => {
                tracing::debug!(
                    "Unknown category code {:?} for {}, not validated",
                    entry.category_code,
                    entry.url
                );
                return None;
            }
        };

        if expected.contains(&entry.status) {
            None
        } else {
            Some(Mismatch {
                entry: entry.clone(),
                expected: expected.clone(),
            })
        }
    }

    /// Checks every entry, logs all mismatches in one warning and counts statuses
    pub fn reconcile(&self, entries: &[PepEntry]) -> Reconciliation {
        let mismatches: Vec<Mismatch> = entries.iter().filter_map(|e| self.check(e)).collect();

        if !mismatches.is_empty() {
            tracing::warn!("Mismatched statuses:\n{}", format_mismatches(&mismatches));
        }

        Reconciliation {
            mismatches,
            aggregate: Aggregate::from_entries(entries),
        }
    }
}

/// One block per mismatch: URL, observed status, expected statuses
pub fn format_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|m| {
            let expected: Vec<&str> = m.expected.iter().map(String::as_str).collect();
            format!(
                "{}\nStatus on page: {}\nExpected statuses: [{}]",
                m.entry.url,
                m.entry.status,
                expected.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
