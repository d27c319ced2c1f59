//! PEP index extractor
//!
//! Walks the numerical index of the PEP site and reads each proposal's
//! declared status from its own page. The entries are raw material for
//! [`crate::reconcile::Reconciler`].

use crate::config::SitesConfig;
use crate::fetcher::Fetcher;
use crate::html::{element_text, find, find_all, next_sibling_element, parse_document, TagQuery};
use crate::progress::ProgressReporter;
use crate::ParserError;
use url::Url;

const SECTION_ID: &str = "numerical-index";
const PEP_LINK_CLASS: &str = "pep reference internal";
const STATUS_TERM: &str = "Status:";

/// One PEP as seen on the index and on its own page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PepEntry {
    /// Status declared on the PEP page, empty when the page has none
    pub status: String,
    /// Status letter from the index, without its leading type letter
    pub category_code: String,
    pub url: Url,
}

/// A row of the numerical index before the PEP page is fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub category_code: String,
    pub url: Url,
}

/// Reads the rows of the numerical index table, skipping its header row
///
/// The `abbr` text is a type letter followed by the status letter; only
/// the status letter is kept as the category code.
pub fn parse_numerical_index(body: &str, base: &Url) -> Result<Vec<IndexRow>, ParserError> {
    let document = parse_document(body);
    let section = find(document.root_element(), &TagQuery::new("section").id(SECTION_ID))?;

    let mut rows = Vec::new();
    for tr in find_all(section, &TagQuery::new("tr")).into_iter().skip(1) {
        let abbr = find(tr, &TagQuery::new("abbr"))?;
        let category_code: String = element_text(abbr).chars().skip(1).collect();

        let anchor = find(tr, &TagQuery::new("a").class(PEP_LINK_CLASS))?;
        let href = anchor.value().attr("href").unwrap_or_default();

        rows.push(IndexRow {
            category_code,
            url: base.join(href)?,
        });
    }

    Ok(rows)
}

/// Reads the declared status from a PEP page
///
/// The status is the element following the `Status:` term of the page's
/// first definition list. A page without that term has an empty status;
/// a page without any definition list is a `TagNotFound`.
pub fn parse_pep_status(body: &str) -> Result<String, ParserError> {
    let document = parse_document(body);
    let dl = find(document.root_element(), &TagQuery::new("dl"))?;

    let status = find_all(dl, &TagQuery::new("dt"))
        .into_iter()
        .find(|dt| element_text(*dt).trim() == STATUS_TERM)
        .and_then(next_sibling_element)
        .map(|dd| element_text(dd).trim().to_string())
        .unwrap_or_default();

    Ok(status)
}

/// Collects an entry for every PEP on the index
///
/// PEP pages that fail to load are skipped and logged. The returned order
/// follows the index, though consumers only aggregate it.
pub async fn pep_entries(
    fetcher: &Fetcher,
    sites: &SitesConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PepEntry>, ParserError> {
    let index = fetcher.fetch(&sites.peps_url).await?;

    tracing::info!("Parsing PEP statuses started");
    let rows = parse_numerical_index(&index.body, &index.url)?;
    tracing::debug!("Found {} PEPs in the numerical index", rows.len());

    progress.start(rows.len());
    let result = collect_statuses(fetcher, rows, progress).await;
    progress.finish();

    let entries = result?;
    tracing::info!("Parsing PEP statuses finished ({} PEPs)", entries.len());
    Ok(entries)
}

async fn collect_statuses(
    fetcher: &Fetcher,
    rows: Vec<IndexRow>,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PepEntry>, ParserError> {
    let mut entries = Vec::with_capacity(rows.len());

    for row in rows {
        progress.advance(row.url.as_str());

        let page = match fetcher.fetch(&row.url).await {
            Ok(page) => page,
            Err(e) if e.is_recoverable() => continue,
            Err(e) => return Err(e),
        };

        let status = parse_pep_status(&page.body)?;
        if status.is_empty() {
            tracing::debug!("No status field on {}", row.url);
        }

        entries.push(PepEntry {
            status,
            category_code: row.category_code,
            url: row.url,
        });
    }

    Ok(entries)
}
