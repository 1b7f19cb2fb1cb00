/// Everything that can go wrong between a book URL and its rows in the
/// corpus table. The scraped site is a versionless format, so each variant
/// names which layer of the contract broke.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch failed for {url}: HTTP {status}")]
    FetchStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("page structure mismatch: {0}")]
    Structure(String),

    #[error("malformed content warning label: {label:?}")]
    MalformedWarning { label: String },

    #[error("{0} not found on page")]
    NotFound(&'static str),
}

impl ScrapeError {
    /// Stable kind tag used in the failed-books section of the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Fetch { .. } | ScrapeError::FetchStatus { .. } => "fetch",
            ScrapeError::Structure(_) => "structure",
            ScrapeError::MalformedWarning { .. } => "malformed_warning",
            ScrapeError::NotFound(_) => "not_found",
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ScrapeError::Fetch { .. } | ScrapeError::FetchStatus { .. }
        )
    }
}
