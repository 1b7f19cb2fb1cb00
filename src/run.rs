use std::fs::OpenOptions;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use crate::cli::RunArgs;
use crate::model::{BookSummary, CorpusRow, FailedBook};
use crate::summary::Measure;
use crate::{config, pipeline, plot, summary};

#[derive(Debug, Serialize)]
struct RunReport {
    generated_at: String,
    books: Vec<BookSummary>,
    failed_books: Vec<FailedBook>,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let out_dir = PathBuf::from(&args.out);
    if out_dir.exists() {
        anyhow::bail!("output directory already exists: {}", out_dir.display());
    }

    let cohorts = config::load(Path::new(&args.config)).context("load cohort config")?;
    tracing::info!(
        cohorts = cohorts.cohorts.len(),
        books = cohorts.book_count(),
        concurrency = args.concurrency,
        "collecting corpus"
    );

    let corpus = pipeline::collect_corpus(&cohorts, args.concurrency, args.retries)
        .await
        .context("collect corpus")?;
    tracing::info!(
        rows = corpus.rows.len(),
        failed_books = corpus.failures.len(),
        "corpus collected"
    );

    let summaries = summary::summarize(&corpus.rows).context("summarize corpus")?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;

    write_corpus(&out_dir.join("corpus.jsonl"), &corpus.rows).context("write corpus")?;

    let report = RunReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        books: summaries.clone(),
        failed_books: corpus.failures,
    };
    write_report(&out_dir.join("report.yaml"), &report).context("write report")?;

    for measure in Measure::ALL {
        let groups = summary::cohort_groups(&summaries, measure);
        let path = out_dir.join(measure.file_name());
        plot::render_measure(&path, measure.name(), &groups)
            .with_context(|| format!("render {}", measure.name()))?;
        tracing::info!(chart = %path.display(), "chart written");
    }

    if !report.failed_books.is_empty() {
        tracing::warn!(
            failed_books = report.failed_books.len(),
            "some books were skipped; see report.yaml"
        );
    }

    Ok(())
}

fn write_corpus(path: &Path, rows: &[CorpusRow]) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(path)
        .with_context(|| format!("create corpus table: {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for row in rows {
        serde_json::to_writer(&mut out, row).context("write corpus row json")?;
        out.write_all(b"\n").context("write corpus row newline")?;
    }

    out.flush().context("flush corpus table")?;
    Ok(())
}

fn write_report(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(report).context("serialize run report")?;
    let mut out = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(path)
        .with_context(|| format!("create run report: {}", path.display()))?;
    out.write_all(yaml.as_bytes())
        .with_context(|| format!("write run report: {}", path.display()))?;
    out.flush().context("flush run report")?;
    Ok(())
}
