use std::time::Duration;

use reqwest::{redirect::Policy, Client, StatusCode};
use scraper::Html;
use thiserror::Error;
use url::Url;

use crate::extract::{extract_verses, SelectorPath};
use crate::types::Extraction;

// Site policy
pub const REKHTA_DOMAIN: &str = "rekhta.org";
pub const FALLBACK_NAME: &str = "ghazal";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
// Rekhta serves bots a block page; present a plain browser identity.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// One variant per failure class; `Display` strings are the response
/// messages, the `Failed` detail only ever reaches the logs.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("URL is required")]
    MissingUrl,
    #[error("Only Rekhta.org URLs are supported")]
    UnsupportedSource,
    #[error("Request timeout. Please try again.")]
    Timeout,
    #[error("Page not found. Please check the URL.")]
    UpstreamNotFound,
    #[error("No Urdu verses found on the page")]
    NoVerses,
    #[error("Failed to scrape the page. Please check the URL and try again.")]
    Failed(String),
}

#[derive(Clone)]
pub struct ScrapeClient {
    http: Client,
}

impl ScrapeClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(Policy::limited(8))
            .timeout(timeout)
            .build()
            .unwrap();

        Self { http }
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, ScrapeError> {
        let res = self.http.get(url.clone()).send().await.map_err(classify)?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ScrapeError::UpstreamNotFound);
        }
        if !status.is_success() {
            return Err(ScrapeError::Failed(format!(
                "http status {}",
                status.as_u16()
            )));
        }

        let body = res.bytes().await.map_err(classify)?;
        // Decode bytes (assume utf-8; the site serves nothing else)
        Ok(String::from_utf8_lossy(&body).to_string())
    }
}

fn classify(e: reqwest::Error) -> ScrapeError {
    if e.is_timeout() {
        ScrapeError::Timeout
    } else {
        ScrapeError::Failed(e.to_string())
    }
}

/// Validate, fetch once, extract, assemble. No retries; every failure is
/// terminal for the request and maps to exactly one `ScrapeError` variant.
pub async fn scrape_ghazal(sc: &ScrapeClient, url_raw: &str) -> Result<Extraction, ScrapeError> {
    let url_raw = url_raw.trim();
    if url_raw.is_empty() {
        return Err(ScrapeError::MissingUrl);
    }
    // Plain substring check; the marker may sit anywhere in the URL.
    if !url_raw.contains(REKHTA_DOMAIN) {
        return Err(ScrapeError::UnsupportedSource);
    }

    let url = Url::parse(url_raw).map_err(|e| ScrapeError::Failed(format!("bad url: {e}")))?;
    if !(url.scheme() == "https" || url.scheme() == "http") {
        return Err(ScrapeError::Failed(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }

    let html = sc.fetch_page(&url).await?;
    let doc = Html::parse_document(&html);
    let verses = extract_verses(&doc, &SelectorPath::default());
    if verses.is_empty() {
        return Err(ScrapeError::NoVerses);
    }

    Ok(Extraction::new(verses, filename_for(url_raw)))
}

/// Last path segment with any query stripped; falls back to `ghazal`
/// when the URL ends in `/`. `.txt` is always appended.
pub fn filename_for(url: &str) -> String {
    let tail = url.rsplit('/').next().unwrap_or("");
    let stem = tail.split('?').next().unwrap_or("");
    let stem = if stem.is_empty() { FALLBACK_NAME } else { stem };
    format!("{stem}.txt")
}
