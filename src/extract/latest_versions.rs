//! Documentation version-list extractor

use crate::config::SitesConfig;
use crate::extract::Table;
use crate::fetcher::Fetcher;
use crate::html::{element_text, find, find_all, parse_document, TagQuery};
use crate::progress::ProgressReporter;
use crate::ParserError;
use regex::Regex;
use std::sync::OnceLock;

pub const HEADER: [&str; 3] = ["Link", "Version", "Status"];

const VERSIONS_MARKER: &str = "All versions";

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
            .expect("version pattern is valid")
    })
}

/// A version link from the sidebar, in sidebar order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLink {
    pub href: String,
    pub text: String,
}

/// Splits anchor text like `Python 3.13 (stable)` into version and status
///
/// Text without that shape is returned whole as the version, with an empty
/// status.
pub fn split_version_text(text: &str) -> (String, String) {
    match version_pattern().captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// Collects the anchors of the first sidebar list mentioning "All versions"
///
/// # Errors
///
/// - `TagNotFound` when the sidebar is missing
/// - `StructureNotFound` when no list in it carries the marker
pub fn parse_version_links(body: &str) -> Result<Vec<VersionLink>, ParserError> {
    let document = parse_document(body);
    let sidebar = find(
        document.root_element(),
        &TagQuery::new("div").class("sphinxsidebarwrapper"),
    )?;

    let list = find_all(sidebar, &TagQuery::new("ul"))
        .into_iter()
        .find(|ul| element_text(*ul).contains(VERSIONS_MARKER))
        .ok_or_else(|| {
            tracing::error!("No sidebar list contains '{}'", VERSIONS_MARKER);
            ParserError::StructureNotFound(format!(
                "sidebar list containing '{}'",
                VERSIONS_MARKER
            ))
        })?;

    Ok(find_all(list, &TagQuery::new("a"))
        .into_iter()
        .map(|a| VersionLink {
            href: a.value().attr("href").unwrap_or_default().to_string(),
            text: element_text(a),
        })
        .collect())
}

/// Builds the version table from the documentation home page
pub async fn latest_versions(
    fetcher: &Fetcher,
    sites: &SitesConfig,
    progress: &dyn ProgressReporter,
) -> Result<Table, ParserError> {
    let home = fetcher.fetch(&sites.docs_url).await?;

    tracing::info!("Getting latest versions started");
    let links = parse_version_links(&home.body)?;

    let mut table = Table::new(HEADER);
    progress.start(links.len());

    for link in links {
        progress.advance(&link.text);
        let (version, status) = split_version_text(&link.text);
        table.push([link.href, version, status]);
    }

    progress.finish();
    tracing::info!("Getting latest versions finished ({} versions)", table.len());
    Ok(table)
}
