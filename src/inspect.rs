use anyhow::Context as _;
use serde::Serialize;
use url::Url;

use crate::cli::InspectArgs;
use crate::fetch::PageFetcher;
use crate::model::WarningRecord;
use crate::{metrics, warnings};

#[derive(Debug, Serialize)]
struct Inspection {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<f32>,
    warnings: Vec<WarningRecord>,
}

/// Fetches one book and prints its warning table as YAML. Debugging entry
/// point for checking a single page against the markup contract.
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    let url = Url::parse(&args.url).context("parse --url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {url}");
    }

    let fetcher = PageFetcher::new()?;

    let cw_html = fetcher.content_warnings_page(&args.url).await?;
    let warning_rows = warnings::extract_warnings(&cw_html)?;

    let main_html = fetcher.main_page(&args.url).await?;
    let inspection = Inspection {
        url: args.url,
        review_count: metrics::extract_review_count(&main_html),
        rating: metrics::extract_rating(&main_html).ok(),
        warnings: warning_rows,
    };

    let yaml = serde_yaml::to_string(&inspection).context("serialize inspection")?;
    print!("{yaml}");

    Ok(())
}
