use std::collections::HashMap;

use crate::model::{BookSummary, CorpusRow};

/// The two measures compared across cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    TotalCount,
    TotalNormalizedCount,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::TotalCount, Measure::TotalNormalizedCount];

    pub fn name(self) -> &'static str {
        match self {
            Measure::TotalCount => "Total Count",
            Measure::TotalNormalizedCount => "Total Normalized Count",
        }
    }

    /// Output image name: the measure name with spaces as hyphens.
    pub fn file_name(self) -> String {
        format!("{}.png", self.name().replace(' ', "-"))
    }

    pub fn value(self, summary: &BookSummary) -> f64 {
        match self {
            Measure::TotalCount => f64::from(summary.total_count),
            Measure::TotalNormalizedCount => summary.total_normalized_count,
        }
    }
}

/// Reduces the corpus table to one row per book, in first-appearance order.
/// Rows without a normalized count are excluded from the normalized total.
/// A title spanning two cohorts is a configuration error.
pub fn summarize(rows: &[CorpusRow]) -> anyhow::Result<Vec<BookSummary>> {
    let mut summaries: Vec<BookSummary> = Vec::new();
    let mut index_by_title: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let index = *index_by_title.entry(row.title.as_str()).or_insert_with(|| {
            summaries.push(BookSummary {
                title: row.title.clone(),
                cohort: row.cohort.clone(),
                total_count: 0,
                total_normalized_count: 0.0,
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[index];
        if summary.cohort != row.cohort {
            anyhow::bail!(
                "title {:?} appears under cohorts {:?} and {:?}",
                row.title,
                summary.cohort,
                row.cohort
            );
        }

        summary.total_count += row.count;
        if let Some(normalized) = row.normalized_count {
            summary.total_normalized_count += normalized;
        }
    }

    Ok(summaries)
}

/// Per-cohort measure values, cohorts in first-appearance order. This feeds
/// one chart: one box (plus its points) per cohort.
pub fn cohort_groups(summaries: &[BookSummary], measure: Measure) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index_by_cohort: HashMap<&str, usize> = HashMap::new();

    for summary in summaries {
        let index = *index_by_cohort
            .entry(summary.cohort.as_str())
            .or_insert_with(|| {
                groups.push((summary.cohort.clone(), Vec::new()));
                groups.len() - 1
            });
        groups[index].1.push(measure.value(summary));
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookMetrics, WarningRecord};

    fn rows_for(
        title: &str,
        cohort: &str,
        review_count: Option<u32>,
        counts: &[u32],
    ) -> Vec<CorpusRow> {
        let book = BookMetrics {
            title: title.to_owned(),
            cohort: cohort.to_owned(),
            review_count,
            rating: Some(3.9),
        };
        counts
            .iter()
            .map(|&count| {
                CorpusRow::new(
                    &book,
                    WarningRecord {
                        name: format!("warning {count}"),
                        count,
                        level: "Minor".to_owned(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn sums_counts_per_book() {
        let mut rows = rows_for("Book A", "left", Some(5), &[10, 2]);
        rows.extend(rows_for("Book B", "right", Some(4), &[1]));

        let summaries = summarize(&rows).unwrap();
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].title, "Book A");
        assert_eq!(summaries[0].total_count, 12);
        assert!((summaries[0].total_normalized_count - 2.4).abs() < 1e-9);

        assert_eq!(summaries[1].title, "Book B");
        assert_eq!(summaries[1].total_count, 1);
        assert_eq!(summaries[1].total_normalized_count, 0.25);
    }

    #[test]
    fn rows_without_normalized_count_are_excluded_from_the_normalized_total() {
        let rows = rows_for("Book A", "left", None, &[10, 2]);
        let summaries = summarize(&rows).unwrap();
        assert_eq!(summaries[0].total_count, 12);
        assert_eq!(summaries[0].total_normalized_count, 0.0);
    }

    #[test]
    fn title_under_two_cohorts_is_an_error() {
        let mut rows = rows_for("Book A", "left", Some(5), &[1]);
        rows.extend(rows_for("Book A", "right", Some(5), &[1]));
        assert!(summarize(&rows).is_err());
    }

    #[test]
    fn groups_measure_values_by_cohort_in_order() {
        let mut rows = rows_for("Book A", "left", Some(5), &[10]);
        rows.extend(rows_for("Book B", "right", Some(2), &[4]));
        rows.extend(rows_for("Book C", "left", Some(1), &[3]));

        let summaries = summarize(&rows).unwrap();
        let groups = cohort_groups(&summaries, Measure::TotalCount);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "left");
        assert_eq!(groups[0].1, vec![10.0, 3.0]);
        assert_eq!(groups[1].0, "right");
        assert_eq!(groups[1].1, vec![4.0]);

        let normalized = cohort_groups(&summaries, Measure::TotalNormalizedCount);
        assert_eq!(normalized[0].1, vec![2.0, 3.0]);
        assert_eq!(normalized[1].1, vec![2.0]);
    }

    #[test]
    fn measure_file_names_replace_spaces_with_hyphens() {
        assert_eq!(Measure::TotalCount.file_name(), "Total-Count.png");
        assert_eq!(
            Measure::TotalNormalizedCount.file_name(),
            "Total-Normalized-Count.png"
        );
    }
}
