use anyhow::{Context, Result};
use cranfield_core::output::write_run_file;
use cranfield_core::persist::{load_index, IndexPaths};
use cranfield_core::{run_batch, SearchConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// One batch search invocation: every query in `queries` against the index at `index_dir`.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub index_dir: PathBuf,
    pub queries: PathBuf,
    pub model_id: i64,
    pub output: PathBuf,
    pub top_k: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub executed: usize,
    pub skipped: usize,
    pub lines_written: usize,
}

pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading queries from {}", path.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}

pub fn run(job: &SearchJob) -> Result<SearchSummary> {
    // Validate the model before touching the index or the output file.
    let config = SearchConfig::from_model_id(job.model_id)?.with_top_k(job.top_k);
    let index = load_index(&IndexPaths::new(&job.index_dir))?;
    let queries = read_queries(&job.queries)?;
    tracing::info!(
        model = %config.model,
        top_k = config.top_k,
        queries = queries.len(),
        "running queries"
    );

    let outcome = run_batch(&index, &queries, &config);
    write_run_file(&job.output, &outcome.records)
        .with_context(|| format!("writing results to {}", job.output.display()))?;

    let summary = SearchSummary {
        executed: outcome.executed,
        skipped: outcome.skipped,
        lines_written: outcome.records.len(),
    };
    tracing::info!(
        executed = summary.executed,
        skipped = summary.skipped,
        lines = summary.lines_written,
        output = %job.output.display(),
        "search complete"
    );
    Ok(summary)
}
