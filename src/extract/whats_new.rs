//! Changelog ("What's New") extractor

use crate::config::SitesConfig;
use crate::extract::Table;
use crate::fetcher::Fetcher;
use crate::html::{collapse_whitespace, element_text, find, find_all, locate, parse_document, TagQuery};
use crate::progress::ProgressReporter;
use crate::ParserError;
use url::Url;

pub const HEADER: [&str; 3] = ["Link", "Title", "Editor/Author"];

const SECTION_ID: &str = "what-s-new-in-python";

/// Collects the version page URLs listed on the changelog index
///
/// Each top-level `li.toctree-l1` entry contributes its first anchor's
/// `href`, resolved against `base`. Document order is preserved.
///
/// # Errors
///
/// `TagNotFound` when the section, the toctree wrapper or an entry's anchor
/// is missing.
pub fn parse_changelog_index(body: &str, base: &Url) -> Result<Vec<Url>, ParserError> {
    let document = parse_document(body);
    let section = find(document.root_element(), &TagQuery::new("section").id(SECTION_ID))?;
    let wrapper = find(section, &TagQuery::new("div").class("toctree-wrapper"))?;

    let mut links = Vec::new();
    for entry in find_all(wrapper, &TagQuery::new("li").class("toctree-l1")) {
        let anchor = find(entry, &TagQuery::new("a"))?;
        let href = anchor.value().attr("href").unwrap_or_default();
        links.push(base.join(href)?);
    }

    Ok(links)
}

/// Extracts the title and the editor/author block of a version page
///
/// Returns `(heading, definition_list)` with whitespace collapsed. The title
/// heading is required; a page without a definition list yields an empty
/// second field.
pub fn parse_version_page(body: &str) -> Result<(String, String), ParserError> {
    let document = parse_document(body);
    let root = document.root_element();

    let heading = find(root, &TagQuery::new("h1"))?;
    let authors = locate(root, &TagQuery::new("dl"))
        .map(|dl| collapse_whitespace(&element_text(dl)))
        .unwrap_or_default();

    Ok((collapse_whitespace(&element_text(heading)), authors))
}

/// Builds the changelog table
///
/// Version pages that fail to load are skipped; structural misses on the
/// index or a version page end the mode.
pub async fn whats_new(
    fetcher: &Fetcher,
    sites: &SitesConfig,
    progress: &dyn ProgressReporter,
) -> Result<Table, ParserError> {
    let index_url = sites.whats_new_url()?;
    let index = fetcher.fetch(&index_url).await?;

    tracing::info!("Parsing news started");
    let links = parse_changelog_index(&index.body, &index.url)?;
    tracing::debug!("Found {} changelog entries", links.len());

    progress.start(links.len());
    let result = collect_version_pages(fetcher, links, progress).await;
    progress.finish();

    let table = result?;
    tracing::info!("Parsing news finished ({} pages)", table.len());
    Ok(table)
}

async fn collect_version_pages(
    fetcher: &Fetcher,
    links: Vec<Url>,
    progress: &dyn ProgressReporter,
) -> Result<Table, ParserError> {
    let mut table = Table::new(HEADER);

    for link in links {
        progress.advance(link.as_str());

        let page = match fetcher.fetch(&link).await {
            Ok(page) => page,
            Err(e) if e.is_recoverable() => continue,
            Err(e) => return Err(e),
        };

        let (title, authors) = parse_version_page(&page.body)?;
        table.push([link.to_string(), title, authors]);
    }

    Ok(table)
}
