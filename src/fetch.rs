use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};

use crate::error::ScrapeError;

const CONTENT_WARNINGS_SUFFIX: &str = "content_warnings";

/// Retrieves the raw HTML pages the extractors work on. One GET per call,
/// no retry; retry policy is layered above this (see pipeline::fetch_with_retry).
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build http client: {err}"))?;

        Ok(Self { client })
    }

    /// GET `{book_url}/content_warnings`.
    pub async fn content_warnings_page(&self, book_url: &str) -> Result<String, ScrapeError> {
        self.get_text(&format!(
            "{}/{CONTENT_WARNINGS_SUFFIX}",
            book_url.trim_end_matches('/')
        ))
        .await
    }

    /// GET the book's main page; review count and rating both live here.
    pub async fn main_page(&self, book_url: &str) -> Result<String, ScrapeError> {
        self.get_text(book_url).await
    }

    async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, "warnscope/0.1")
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::FetchStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|source| ScrapeError::Fetch {
            url: url.to_owned(),
            source,
        })
    }
}
