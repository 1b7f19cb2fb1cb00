use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ScrapeError;

/// Pulls the aggregate review count from a book's main page: the first
/// italic summary paragraph whose text starts with "summary of N ratings".
/// Absence is not an error — the count feeds a division downstream, so a
/// book without one simply gets no normalized counts.
pub fn extract_review_count(html: &str) -> Option<u32> {
    let doc = Html::parse_document(html);
    let summary_selector = Selector::parse("p.italic.text-sm.mb-4").unwrap();
    let summary_re = Regex::new(r"^summary of (\d+) ratings").unwrap();

    for el in doc.select(&summary_selector) {
        let text = el.text().collect::<String>();
        if let Some(caps) = summary_re.captures(text.trim())
            && let Ok(count) = caps[1].parse()
        {
            return Some(count);
        }
    }

    tracing::debug!("no review summary paragraph on page");
    None
}

/// Pulls the average rating from a book's main page: the first
/// average-star-rating element whose text parses as a float.
pub fn extract_rating(html: &str) -> Result<f32, ScrapeError> {
    let doc = Html::parse_document(html);
    let rating_selector = Selector::parse("span.average-star-rating").unwrap();

    for el in doc.select(&rating_selector) {
        if let Ok(rating) = el.text().collect::<String>().trim().parse::<f32>() {
            return Ok(rating);
        }
    }

    Err(ScrapeError::NotFound("average star rating"))
}
