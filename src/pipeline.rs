use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{BookEntry, Cohorts};
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::model::{BookMetrics, CorpusRow, FailedBook};
use crate::{metrics, warnings};

/// The corpus table plus the books that failed to contribute to it.
#[derive(Debug)]
pub struct Corpus {
    pub rows: Vec<CorpusRow>,
    pub failures: Vec<FailedBook>,
}

/// Fetches and extracts every book across all cohorts. Books run on a
/// bounded worker pool; one book's failure is recorded and never disturbs
/// another's rows. Rows come back in config order regardless of which
/// fetch finished first.
pub async fn collect_corpus(
    cohorts: &Cohorts,
    concurrency: usize,
    retries: u32,
) -> anyhow::Result<Corpus> {
    let fetcher = PageFetcher::new()?;
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks: JoinSet<(usize, Result<Vec<CorpusRow>, FailedBook>)> = JoinSet::new();

    let mut submitted = 0_usize;
    for cohort in &cohorts.cohorts {
        for book in &cohort.books {
            let fetcher = fetcher.clone();
            let semaphore = Arc::clone(&semaphore);
            let cohort_name = cohort.name.clone();
            let book = book.clone();
            let index = submitted;
            submitted += 1;

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(err) => {
                        return (
                            index,
                            Err(FailedBook {
                                cohort: cohort_name,
                                title: book.title,
                                url: book.url,
                                kind: "internal".to_owned(),
                                error: format!("worker pool closed: {err}"),
                            }),
                        );
                    }
                };

                let result = scrape_book(&fetcher, &cohort_name, &book, retries)
                    .await
                    .map_err(|err| {
                        tracing::warn!(
                            cohort = %cohort_name,
                            title = %book.title,
                            %err,
                            "book failed; skipping"
                        );
                        FailedBook {
                            cohort: cohort_name.clone(),
                            title: book.title.clone(),
                            url: book.url.clone(),
                            kind: err.kind().to_owned(),
                            error: err.to_string(),
                        }
                    });

                (index, result)
            });
        }
    }

    let mut finished = Vec::with_capacity(submitted);
    while let Some(joined) = tasks.join_next().await {
        finished.push(joined.context("join book worker")?);
    }
    finished.sort_by_key(|(index, _)| *index);

    let mut corpus = Corpus {
        rows: Vec::new(),
        failures: Vec::new(),
    };
    for (_, result) in finished {
        match result {
            Ok(rows) => corpus.rows.extend(rows),
            Err(failure) => corpus.failures.push(failure),
        }
    }

    Ok(corpus)
}

async fn scrape_book(
    fetcher: &PageFetcher,
    cohort: &str,
    book: &BookEntry,
    retries: u32,
) -> Result<Vec<CorpusRow>, ScrapeError> {
    tracing::info!(cohort, title = %book.title, url = %book.url, "scraping book");

    let cw_html = fetch_with_retry(|| fetcher.content_warnings_page(&book.url), retries).await?;
    let warning_rows = warnings::extract_warnings(&cw_html)?;

    let main_html = fetch_with_retry(|| fetcher.main_page(&book.url), retries).await?;
    let review_count = metrics::extract_review_count(&main_html);
    let rating = metrics::extract_rating(&main_html)?;

    let book_metrics = BookMetrics {
        title: book.title.clone(),
        cohort: cohort.to_owned(),
        review_count,
        rating: Some(rating),
    };

    tracing::debug!(
        title = %book.title,
        warnings = warning_rows.len(),
        ?review_count,
        rating,
        "book extracted"
    );

    Ok(warning_rows
        .into_iter()
        .map(|warning| CorpusRow::new(&book_metrics, warning))
        .collect())
}

/// Retry decorator over a single page fetch. Only transport/status failures
/// are retried; extraction errors surface immediately.
async fn fetch_with_retry<F, Fut>(mut fetch: F, retries: u32) -> Result<String, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, ScrapeError>>,
{
    let mut delay = Duration::from_millis(500);
    let mut tries_left = retries;

    loop {
        match fetch().await {
            Ok(body) => return Ok(body),
            Err(err) if err.is_fetch() && tries_left > 0 => {
                tracing::warn!(%err, tries_left, "fetch failed; backing off");
                tokio::time::sleep(delay).await;
                delay *= 2;
                tries_left -= 1;
            }
            Err(err) => return Err(err),
        }
    }
}
