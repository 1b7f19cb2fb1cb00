use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use crate::model::WarningRecord;

/// Parses a content-warning label like "Religious bigotry (1)" into
/// ("Religious bigotry", 1). The count is everything after the first `(`
/// minus the final character; the terminal `)` is dropped by position, not
/// matched. Malformed labels are logged with the raw string before the
/// error propagates.
pub fn parse_warning_label(label: &str) -> Result<(String, u32), ScrapeError> {
    let Some((name, rest)) = label.split_once('(') else {
        tracing::error!(label, "content warning label has no parenthesized count");
        return Err(ScrapeError::MalformedWarning {
            label: label.to_owned(),
        });
    };

    let mut digits = rest.chars();
    digits.next_back();
    let count = match digits.as_str().parse::<u32>() {
        Ok(count) => count,
        Err(err) => {
            tracing::error!(label, %err, "content warning count is not an integer");
            return Err(ScrapeError::MalformedWarning {
                label: label.to_owned(),
            });
        }
    };

    Ok((name.trim().to_owned(), count))
}

/// Extracts (warning, count, severity level) rows from a content-warnings
/// sub-page. The page renders one info pane before the warnings pane, so the
/// warnings live in the second `div.standard-pane`.
pub fn extract_warnings(html: &str) -> Result<Vec<WarningRecord>, ScrapeError> {
    let doc = Html::parse_document(html);
    let pane_selector = Selector::parse("div.standard-pane").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let panes: Vec<ElementRef> = doc.select(&pane_selector).collect();
    let Some(pane) = panes.get(1) else {
        return Err(ScrapeError::Structure(format!(
            "expected at least 2 standard-pane containers, found {}",
            panes.len()
        )));
    };

    let mut records = Vec::new();

    for heading in pane.child_elements().filter(|el| el.value().name() == "p") {
        let level = element_text(heading);

        for sibling in level_block(heading) {
            if sibling.value().name() != "div" {
                continue;
            }
            let Some(link) = sibling.select(&link_selector).next() else {
                continue;
            };
            let href = link.value().attr("href").unwrap_or_default();
            if !href.contains("content_warning") {
                continue;
            }

            let (name, count) = parse_warning_label(&element_text(link))?;
            records.push(WarningRecord {
                name,
                count,
                level: level.clone(),
            });
        }
    }

    Ok(records)
}

/// Siblings following a severity heading, up to but not including the next
/// heading. The page marks level boundaries only by the arrival of the next
/// `<p>`, so the terminator is an explicit predicate, not list exhaustion.
fn level_block<'a>(heading: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().name() != "p")
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    #[test]
    fn parses_label_with_count() {
        assert_eq!(
            parse_warning_label("Religious bigotry (1)").unwrap(),
            ("Religious bigotry".to_owned(), 1)
        );
        assert_eq!(
            parse_warning_label("Minor gore (12)").unwrap(),
            ("Minor gore".to_owned(), 12)
        );
    }

    #[test]
    fn label_without_parenthesis_is_malformed() {
        let err = parse_warning_label("Religious bigotry").unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedWarning { .. }));
    }

    #[test]
    fn label_with_non_numeric_count_is_malformed() {
        let err = parse_warning_label("Mild violence (abc)").unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedWarning { .. }));
    }

    const TWO_LEVEL_PAGE: &str = r#"<!doctype html>
<html><body>
  <div class="standard-pane"><p>This page shows content warnings.</p></div>
  <div class="standard-pane">
    <p>Moderate</p>
    <div><a href="/books/x/content_warnings/1">Religious bigotry (1)</a></div>
    <div><a href="/books/x/content_warnings/2">Minor gore (12)</a></div>
    <div><a href="/books/x/reviews">See all reviews (3)</a></div>
    <p>Minor</p>
    <div><a href="/books/x/content_warnings/9">Cursing (4)</a></div>
  </div>
</body></html>"#;

    #[test]
    fn rows_are_segmented_per_level_in_document_order() {
        let rows = extract_warnings(TWO_LEVEL_PAGE).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].name, "Religious bigotry");
        assert_eq!(rows[0].count, 1);
        assert_eq!(rows[0].level, "Moderate");

        assert_eq!(rows[1].name, "Minor gore");
        assert_eq!(rows[1].count, 12);
        assert_eq!(rows[1].level, "Moderate");

        // The reviews link is not a content warning and contributes no row;
        // the row after it belongs to the next heading.
        assert_eq!(rows[2].name, "Cursing");
        assert_eq!(rows[2].count, 4);
        assert_eq!(rows[2].level, "Minor");
    }

    #[test]
    fn empty_level_yields_zero_rows() {
        let html = r#"
  <div class="standard-pane"></div>
  <div class="standard-pane">
    <p>Minor</p>
    <p>Moderate</p>
    <div><a href="/books/x/content_warnings/1">Blood (2)</a></div>
  </div>"#;
        let rows = extract_warnings(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].level, "Moderate");
    }

    #[test]
    fn fewer_than_two_panes_is_a_structure_error() {
        let html = r#"<div class="standard-pane"><p>Minor</p></div>"#;
        let err = extract_warnings(html).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn malformed_label_aborts_the_page() {
        let html = r#"
  <div class="standard-pane"></div>
  <div class="standard-pane">
    <p>Minor</p>
    <div><a href="/books/x/content_warnings/1">No count here</a></div>
  </div>"#;
        let err = extract_warnings(html).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedWarning { .. }));
    }

    #[test]
    fn extraction_is_idempotent() {
        let first = extract_warnings(TWO_LEVEL_PAGE).unwrap();
        let second = extract_warnings(TWO_LEVEL_PAGE).unwrap();
        assert_eq!(first, second);
    }
}
