//! Integration tests for the extractors
//!
//! These tests use wiremock to serve small copies of the documentation and
//! PEP sites and run each mode end-to-end through the cached fetcher.

use docs_parser::config::Config;
use docs_parser::extract::{latest_versions, pep_entries, whats_new};
use docs_parser::modes::{self, Mode, RunContext};
use docs_parser::progress::{NoProgress, ProgressReporter};
use docs_parser::{ErrorKind, Fetcher, ParserError, Reconciler, StatusExpectationTable};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Counts progress callbacks
#[derive(Default)]
struct CountingProgress {
    started: AtomicUsize,
    advanced: AtomicUsize,
    finished: AtomicUsize,
}

impl ProgressReporter for CountingProgress {
    fn start(&self, total: usize) {
        self.started.store(total, Ordering::SeqCst);
    }

    fn advance(&self, _item: &str) {
        self.advanced.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates a config pointing both sites at the mock server, with all files
/// under a temporary directory
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.sites.docs_url = Url::parse(&format!("{}/3/", base_url)).unwrap();
    config.sites.peps_url = Url::parse(&format!("{}/peps/", base_url)).unwrap();
    config.paths.base_dir = dir.path().to_string_lossy().into_owned();
    config.http.timeout_secs = 5;
    config
}

fn create_fetcher(config: &Config) -> Fetcher {
    Fetcher::from_config(&config.http, &config.paths.cache_path()).expect("Failed to build fetcher")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

const WHATS_NEW_INDEX: &str = r#"
<html><body>
<section id="what-s-new-in-python">
  <div class="toctree-wrapper compound">
    <ul>
      <li class="toctree-l1"><a class="reference internal" href="3.13.html">What’s New In Python 3.13</a></li>
      <li class="toctree-l1"><a class="reference internal" href="3.12.html">What’s New In Python 3.12</a></li>
      <li class="toctree-l1"><a class="reference internal" href="3.11.html">What’s New In Python 3.11</a></li>
    </ul>
  </div>
</section>
</body></html>
"#;

fn version_page(version: &str, editor: &str) -> String {
    format!(
        r#"<html><body>
        <h1>What’s New In
            Python {}</h1>
        <dl class="field-list simple">
          <dt>Editor<span class="colon">:</span></dt>
          <dd><p>{}</p></dd>
        </dl>
        </body></html>"#,
        version, editor
    )
}

#[tokio::test]
async fn test_whats_new_skips_pages_that_fail_to_load() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&base_url, &dir);

    mount_page(&mock_server, "/3/whatsnew/", WHATS_NEW_INDEX).await;
    mount_page(&mock_server, "/3/whatsnew/3.13.html", &version_page("3.13", "Adam Turner")).await;
    mount_page(&mock_server, "/3/whatsnew/3.12.html", &version_page("3.12", "Adam Turner")).await;

    // 3.11 is broken on the server
    Mock::given(method("GET"))
        .and(path("/3/whatsnew/3.11.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&config);
    let progress = CountingProgress::default();
    let table = whats_new(&fetcher, &config.sites, &progress)
        .await
        .expect("Partial results expected");

    assert_eq!(table.header(), &vec!["Link", "Title", "Editor/Author"]);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.rows()[0],
        vec![
            format!("{}/3/whatsnew/3.13.html", base_url),
            "What’s New In Python 3.13".to_string(),
            "Editor: Adam Turner".to_string(),
        ]
    );
    assert_eq!(table.rows()[1][0], format!("{}/3/whatsnew/3.12.html", base_url));
    assert!(table.rows().iter().all(|row| row.len() == 3));

    assert_eq!(progress.started.load(Ordering::SeqCst), 3);
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 3);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_index_section_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_page(
        &mock_server,
        "/3/whatsnew/",
        "<html><body><section id=\"renamed\"></section></body></html>",
    )
    .await;

    let fetcher = create_fetcher(&config);
    let ctx = RunContext {
        config: &config,
        fetcher: &fetcher,
        expectations: &StatusExpectationTable::standard(),
        progress: &NoProgress,
    };

    let err = modes::run(Mode::WhatsNew, &ctx).await.unwrap_err();
    assert!(matches!(err, ParserError::TagNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::Fatal);
}

#[tokio::test]
async fn test_unreachable_index_is_recoverable() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    // Nothing mounted: the index answers 404
    let fetcher = create_fetcher(&config);
    let err = latest_versions(&fetcher, &config.sites, &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, ParserError::HttpStatus { status: 404, .. }));
    assert_eq!(err.kind(), ErrorKind::Recoverable);
}

#[tokio::test]
async fn test_latest_versions_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_page(
        &mock_server,
        "/3/",
        r#"<html><body>
        <div class="sphinxsidebarwrapper">
          <ul><li><a href="download.html">Download</a></li></ul>
          <ul>
            <li><a href="https://docs.python.org/3.14/">Python 3.14 (in development)</a></li>
            <li><a href="https://docs.python.org/3.13/">Python 3.13 (stable)</a></li>
            <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
          </ul>
        </div>
        </body></html>"#,
    )
    .await;

    let fetcher = create_fetcher(&config);
    let progress = CountingProgress::default();
    let table = latest_versions(&fetcher, &config.sites, &progress).await.unwrap();

    assert_eq!(table.header(), &vec!["Link", "Version", "Status"]);
    assert_eq!(
        table.rows(),
        &[
            ["https://docs.python.org/3.14/", "3.14", "in development"],
            ["https://docs.python.org/3.13/", "3.13", "stable"],
            ["https://www.python.org/doc/versions/", "All versions", ""],
        ]
        .map(|row| row.map(String::from).to_vec())
    );
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 3);
}

const PEP_INDEX: &str = r#"
<html><body>
<section id="numerical-index">
  <table class="pep-zero-table docutils">
    <thead><tr><th>Type</th><th>PEP</th><th>Title</th></tr></thead>
    <tbody>
      <tr><td><abbr>PA</abbr></td><td><a class="pep reference internal" href="pep-0001/">1</a></td><td>Purpose</td></tr>
      <tr><td><abbr>SF</abbr></td><td><a class="pep reference internal" href="pep-0008/">8</a></td><td>Style</td></tr>
      <tr><td><abbr>SA</abbr></td><td><a class="pep reference internal" href="pep-0484/">484</a></td><td>Hints</td></tr>
      <tr><td><abbr>S</abbr></td><td><a class="pep reference internal" href="pep-0750/">750</a></td><td>Templates</td></tr>
      <tr><td><abbr>IF</abbr></td><td><a class="pep reference internal" href="pep-0999/">999</a></td><td>Gone</td></tr>
    </tbody>
  </table>
</section>
</body></html>
"#;

fn pep_page(status: &str) -> String {
    format!(
        r#"<html><body>
        <dl class="rfc2822 field-list simple">
          <dt class="field-odd">Author<span class="colon">:</span></dt>
          <dd class="field-odd">Someone</dd>
          <dt class="field-even">Status<span class="colon">:</span></dt>
          <dd class="field-even"><abbr>{}</abbr></dd>
        </dl>
        </body></html>"#,
        status
    )
}

async fn mount_peps(server: &MockServer, expected_hits: u64) {
    for (page_path, body) in [
        ("/peps/", PEP_INDEX.to_string()),
        ("/peps/pep-0001/", pep_page("Active")),
        ("/peps/pep-0008/", pep_page("Final")),
        ("/peps/pep-0484/", pep_page("Final")),
        ("/peps/pep-0750/", pep_page("Draft")),
    ] {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(html(&body))
            .expect(expected_hits)
            .mount(server)
            .await;
    }
    // pep-0999 is not mounted and answers 404
}

#[tokio::test]
async fn test_pep_mode_reconciles_and_counts() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);
    mount_peps(&mock_server, 1).await;

    let fetcher = create_fetcher(&config);
    let expectations = StatusExpectationTable::standard();

    let entries = pep_entries(&fetcher, &config.sites, &NoProgress).await.unwrap();
    assert_eq!(entries.len(), 4);

    let result = Reconciler::new(&expectations).reconcile(&entries);

    // PEP 484 is listed as Accepted but its page says Final
    assert_eq!(result.mismatches.len(), 1);
    assert!(result.mismatches[0].entry.url.as_str().ends_with("/peps/pep-0484/"));
    assert_eq!(result.mismatches[0].entry.status, "Final");

    let table = result.aggregate.to_table().unwrap();
    assert_eq!(table.header(), &vec!["Статус", "Количество"]);
    assert_eq!(table.len(), 4);
    assert!(table
        .rows()
        .contains(&vec!["Количество PEP в статусе Final".to_string(), "2".to_string()]));
    assert_eq!(
        table.rows().last().unwrap(),
        &vec!["Общее количество PEP".to_string(), "4".to_string()]
    );
}

#[tokio::test]
async fn test_pep_entries_are_served_from_cache_on_rerun() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);
    // Every page may be requested once; the second run must hit the cache
    mount_peps(&mock_server, 1).await;

    let fetcher = create_fetcher(&config);
    let first = pep_entries(&fetcher, &config.sites, &NoProgress).await.unwrap();
    let second = pep_entries(&fetcher, &config.sites, &NoProgress).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.cached_len().unwrap(), 5);
}

#[tokio::test]
async fn test_pep_mode_with_empty_index_has_no_results() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_page(
        &mock_server,
        "/peps/",
        r#"<section id="numerical-index"><table><tr><th>Type</th></tr></table></section>"#,
    )
    .await;

    let fetcher = create_fetcher(&config);
    let ctx = RunContext {
        config: &config,
        fetcher: &fetcher,
        expectations: &StatusExpectationTable::standard(),
        progress: &NoProgress,
    };

    assert_eq!(modes::run(Mode::Pep, &ctx).await.unwrap(), None);
}

#[tokio::test]
async fn test_download_saves_archive() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_page(
        &mock_server,
        "/3/download.html",
        r#"<table class="docutils align-default">
          <tr><td><a href="archives/python-3.13-docs-pdf-letter.zip">Letter</a></td></tr>
          <tr><td><a href="archives/python-3.13-docs-pdf-a4.zip">A4</a></td></tr>
        </table>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/3/archives/python-3.13-docs-pdf-a4.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04archive".to_vec()))
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&config);
    let ctx = RunContext {
        config: &config,
        fetcher: &fetcher,
        expectations: &StatusExpectationTable::standard(),
        progress: &NoProgress,
    };

    assert_eq!(modes::run(Mode::Download, &ctx).await.unwrap(), None);

    let saved = config
        .paths
        .downloads_path()
        .join("python-3.13-docs-pdf-a4.zip");
    assert_eq!(std::fs::read(saved).unwrap(), b"PK\x03\x04archive".to_vec());
}

#[tokio::test]
async fn test_fetcher_ignores_declared_charset() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    let body = "<h1>Статус</h1>";
    Mock::given(method("GET"))
        .and(path("/3/mislabelled.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&config);
    let url = config.sites.docs_url.join("mislabelled.html").unwrap();
    let page = fetcher.fetch(&url).await.unwrap();

    assert_eq!(page.body, body);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path("/3/"))
        .respond_with(html("<p>home</p>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&config);
    fetcher.fetch(&config.sites.docs_url).await.unwrap();
    fetcher.fetch(&config.sites.docs_url).await.unwrap();
    assert_eq!(fetcher.cached_len().unwrap(), 1);

    assert_eq!(fetcher.clear_cache().unwrap(), 1);
    assert_eq!(fetcher.cached_len().unwrap(), 0);

    fetcher.fetch(&config.sites.docs_url).await.unwrap();
}

#[tokio::test]
async fn test_fatal_page_error_still_finishes_progress() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    mount_page(
        &mock_server,
        "/peps/",
        r#"<section id="numerical-index"><table>
            <tr><th>Type</th><th>PEP</th></tr>
            <tr><td><abbr>SF</abbr></td><td><a class="pep reference internal" href="pep-0008/">8</a></td></tr>
        </table></section>"#,
    )
    .await;
    mount_page(&mock_server, "/peps/pep-0008/", "<html><body><h1>No fields</h1></body></html>").await;

    let fetcher = create_fetcher(&config);
    let progress = CountingProgress::default();
    let err = pep_entries(&fetcher, &config.sites, &progress).await.unwrap_err();

    assert!(matches!(err, ParserError::TagNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::Fatal);
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 1);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
}
