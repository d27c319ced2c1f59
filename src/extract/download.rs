//! Documentation archive download

use crate::config::SitesConfig;
use crate::fetcher::Fetcher;
use crate::html::{find, parse_document, TagQuery};
use crate::ParserError;
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

const ARCHIVE_PATTERN: &str = r".+pdf-a4\.zip$";

/// Locates the A4 PDF archive link on the download page
///
/// # Errors
///
/// `TagNotFound` when the `docutils` table or the archive anchor is missing.
pub fn find_archive_link(body: &str, base: &Url) -> Result<Url, ParserError> {
    let pattern = Regex::new(ARCHIVE_PATTERN).expect("archive pattern is valid");

    let document = parse_document(body);
    let table = find(document.root_element(), &TagQuery::new("table").class("docutils"))?;
    let anchor = find(table, &TagQuery::new("a").attr_pattern("href", pattern))?;
    let href = anchor.value().attr("href").unwrap_or_default();

    Ok(base.join(href)?)
}

/// File name for a downloaded archive: the last path segment of its URL
fn archive_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("docs-pdf-a4.zip")
        .to_string()
}

/// Downloads the A4 PDF documentation archive into `downloads_dir`
///
/// # Returns
///
/// The path the archive was written to
pub async fn download(
    fetcher: &Fetcher,
    sites: &SitesConfig,
    downloads_dir: &Path,
) -> Result<PathBuf, ParserError> {
    let download_url = sites.download_url()?;
    let page = fetcher.fetch(&download_url).await?;

    let archive_url = find_archive_link(&page.body, &page.url)?;
    tracing::info!("Downloading {}", archive_url);
    let archive = fetcher.fetch_bytes(&archive_url).await?;

    std::fs::create_dir_all(downloads_dir)?;
    let archive_path = downloads_dir.join(archive_file_name(&archive_url));
    std::fs::write(&archive_path, &archive)?;

    tracing::info!("Archive downloaded and saved: {}", archive_path.display());
    Ok(archive_path)
}
