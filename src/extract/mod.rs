//! Extractors turning fetched pages into records
//!
//! Each extractor fetches an index page through the shared [`Fetcher`],
//! locates its structural anchors with the [`crate::html`] queries and
//! produces a [`Table`]:
//! - `whats_new`: one row per changelog page
//! - `latest_versions`: one row per documentation version link
//! - `pep`: raw PEP entries, aggregated later by the reconciler
//! - `download`: saves the PDF archive, produces no rows
//!
//! [`Fetcher`]: crate::fetcher::Fetcher

mod download;
mod latest_versions;
mod pep;
mod whats_new;

pub use download::{download, find_archive_link};
pub use latest_versions::{latest_versions, parse_version_links, split_version_text, VersionLink};
pub use pep::{parse_numerical_index, parse_pep_status, pep_entries, IndexRow, PepEntry};
pub use whats_new::{parse_changelog_index, parse_version_page, whats_new};

/// One output row
pub type Record = Vec<String>;

/// A header record plus data records of the same arity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Record,
    rows: Vec<Record>,
}

impl Table {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a data row
    ///
    /// # Panics
    ///
    /// In debug builds, when the row arity differs from the header.
    pub fn push<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let row: Record = row.into_iter().map(Into::into).collect();
        debug_assert_eq!(row.len(), self.header.len(), "row arity must match header");
        self.rows.push(row);
    }

    pub fn header(&self) -> &Record {
        &self.header
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Header first, then data rows
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
