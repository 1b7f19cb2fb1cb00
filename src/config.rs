use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;
use url::Url;

/// Cohorts to compare, in the order the config file lists them.
#[derive(Debug, Clone)]
pub struct Cohorts {
    pub cohorts: Vec<Cohort>,
}

#[derive(Debug, Clone)]
pub struct Cohort {
    pub name: String,
    pub books: Vec<BookEntry>,
}

#[derive(Debug, Clone)]
pub struct BookEntry {
    pub url: String,
    pub title: String,
}

impl Cohorts {
    pub fn book_count(&self) -> usize {
        self.cohorts.iter().map(|c| c.books.len()).sum()
    }
}

/// Loads a cohort config: a YAML mapping of cohort name -> { book url: title }.
/// Mapping order is preserved; it defines fetch and corpus row order.
pub fn load(path: &Path) -> anyhow::Result<Cohorts> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("read cohort config: {}", path.display()))?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml)
        .with_context(|| format!("parse cohort config: {}", path.display()))?;

    parse_cohorts(&doc).with_context(|| format!("invalid cohort config: {}", path.display()))
}

// Deserialized by hand rather than into a map type: serde_yaml mappings keep
// document order, and cohort/book iteration order must match the file.
fn parse_cohorts(doc: &serde_yaml::Value) -> anyhow::Result<Cohorts> {
    let top = doc
        .as_mapping()
        .ok_or_else(|| anyhow::anyhow!("top level must be a mapping of cohort name -> books"))?;
    if top.is_empty() {
        anyhow::bail!("config lists no cohorts");
    }

    let mut cohorts = Vec::with_capacity(top.len());
    let mut seen_titles: HashSet<String> = HashSet::new();

    for (name, books) in top {
        let name = name
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("cohort name must be a string"))?
            .to_owned();
        let books_map = books
            .as_mapping()
            .ok_or_else(|| anyhow::anyhow!("cohort {name:?} must map book url -> title"))?;

        let mut entries = Vec::with_capacity(books_map.len());
        for (url, title) in books_map {
            let url = url
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("book url in cohort {name:?} must be a string"))?
                .to_owned();
            let title = title
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("title for {url} must be a string"))?
                .to_owned();

            let parsed = Url::parse(&url).with_context(|| format!("parse book url: {url}"))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("book url must be http/https: {url}");
            }

            // Titles key the per-book summaries, so one title cannot sit in
            // two cohorts.
            if !seen_titles.insert(title.clone()) {
                anyhow::bail!("title {title:?} appears more than once across cohorts");
            }

            entries.push(BookEntry { url, title });
        }

        cohorts.push(Cohort {
            name,
            books: entries,
        });
    }

    Ok(Cohorts { cohorts })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> anyhow::Result<Cohorts> {
        parse_cohorts(&serde_yaml::from_str(yaml).expect("parse yaml"))
    }

    #[test]
    fn preserves_cohort_and_book_order() {
        let cohorts = parse(
            r#"
zebra list:
  https://example.com/books/2: Second
  https://example.com/books/1: First
alpha list:
  https://example.com/books/3: Third
"#,
        )
        .expect("valid config");

        assert_eq!(cohorts.cohorts.len(), 2);
        assert_eq!(cohorts.cohorts[0].name, "zebra list");
        assert_eq!(cohorts.cohorts[0].books[0].title, "Second");
        assert_eq!(cohorts.cohorts[0].books[1].title, "First");
        assert_eq!(cohorts.cohorts[1].name, "alpha list");
        assert_eq!(cohorts.book_count(), 3);
    }

    #[test]
    fn rejects_duplicate_title_across_cohorts() {
        let err = parse(
            r#"
a:
  https://example.com/books/1: Same Title
b:
  https://example.com/books/2: Same Title
"#,
        )
        .expect_err("duplicate title must be rejected");
        assert!(err.to_string().contains("Same Title"));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = parse("a:\n  ftp://example.com/books/1: Title\n")
            .expect_err("ftp url must be rejected");
        assert!(format!("{err:#}").contains("http"));
    }

    #[test]
    fn rejects_empty_config() {
        assert!(parse("{}").is_err());
    }
}
