use serde::{Deserialize, Serialize};

/// One content warning as listed on a book's content-warnings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningRecord {
    pub name: String,
    pub count: u32,
    /// Severity heading the warning was listed under ("Minor", "Moderate", ...).
    pub level: String,
}

/// Per-book metadata pulled from the book's main page plus its config labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetrics {
    pub title: String,
    pub cohort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// One warning record tagged with its owning book. The corpus table is the
/// ordered concatenation of these across all books in all cohorts; duplicate
/// (warning, level) pairs within a book stay as separate rows because the
/// source page does not guarantee uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusRow {
    pub cohort: String,
    pub title: String,
    pub warning: String,
    pub count: u32,
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// count / review_count; None when review_count is missing or zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_count: Option<f64>,
}

impl CorpusRow {
    pub fn new(book: &BookMetrics, warning: WarningRecord) -> Self {
        let normalized_count = match book.review_count {
            Some(reviews) if reviews > 0 => Some(f64::from(warning.count) / f64::from(reviews)),
            _ => None,
        };

        Self {
            cohort: book.cohort.clone(),
            title: book.title.clone(),
            warning: warning.name,
            count: warning.count,
            level: warning.level,
            review_count: book.review_count,
            rating: book.rating,
            normalized_count,
        }
    }
}

/// One row per book: its warning totals, raw and review-normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub cohort: String,
    pub total_count: u32,
    /// Sum of normalized_count over the book's rows; rows without a
    /// normalized count are excluded from the sum.
    pub total_normalized_count: f64,
}

/// A book whose fetch/extract pipeline failed; other books are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedBook {
    pub cohort: String,
    pub title: String,
    pub url: String,
    pub kind: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(review_count: Option<u32>) -> BookMetrics {
        BookMetrics {
            title: "A Book".to_owned(),
            cohort: "listed".to_owned(),
            review_count,
            rating: Some(4.1),
        }
    }

    fn warning(count: u32) -> WarningRecord {
        WarningRecord {
            name: "Gore".to_owned(),
            count,
            level: "Minor".to_owned(),
        }
    }

    #[test]
    fn normalizes_count_by_review_count() {
        let row = CorpusRow::new(&book(Some(5)), warning(10));
        assert_eq!(row.normalized_count, Some(2.0));
    }

    #[test]
    fn zero_review_count_yields_no_normalized_count() {
        let row = CorpusRow::new(&book(Some(0)), warning(10));
        assert_eq!(row.normalized_count, None);
    }

    #[test]
    fn missing_review_count_yields_no_normalized_count() {
        let row = CorpusRow::new(&book(None), warning(10));
        assert_eq!(row.normalized_count, None);
    }
}
