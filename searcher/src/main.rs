use anyhow::Result;
use clap::Parser;
use cranfield_core::config::DEFAULT_TOP_K;
use searcher::{run, SearchJob};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Run a file of queries against an index and write a TREC run file")]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: PathBuf,
    /// Queries file, one query per line; blank lines are skipped
    #[arg(long)]
    queries: PathBuf,
    /// Scoring model: 0 classic, 1 bm25, 2 boolean, 3 lm-dirichlet, 4 lm-jelinek-mercer
    #[arg(long, allow_negative_numbers = true)]
    model: i64,
    /// Output run file
    #[arg(long)]
    output: PathBuf,
    /// Results kept per query
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let job = SearchJob {
        index_dir: args.index,
        queries: args.queries,
        model_id: args.model,
        output: args.output,
        top_k: args.top_k,
    };
    run(&job)?;
    Ok(())
}
