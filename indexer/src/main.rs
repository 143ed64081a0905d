use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cranfield_core::corpus::read_corpus_dir;
use cranfield_core::persist::{load_index, save_index, IndexPaths};
use cranfield_core::{Field, InvertedIndex};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::Path;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect the multi-field inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory of .I/.T/.A/.W corpus files
    Build {
        /// Directory of corpus files; each file may hold many documents
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
    /// Print document and vocabulary statistics for an existing index
    Stats {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build_index(&input, &output),
        Commands::Stats { index } => print_stats(&index),
    }
}

fn build_index(input: &str, output: &str) -> Result<()> {
    let docs = read_corpus_dir(Path::new(input))?;
    tracing::info!(num_docs = docs.len(), input, "ingested documents");

    let index = InvertedIndex::build(docs);
    save_index(&IndexPaths::new(output), &index)
        .with_context(|| format!("writing index to {output}"))?;

    tracing::info!(output, "index build complete");
    Ok(())
}

fn print_stats(index_dir: &str) -> Result<()> {
    let index = load_index(&IndexPaths::new(index_dir))?;
    println!("documents: {}", index.num_docs());
    for field in Field::ALL {
        let fi = index.field(field);
        println!(
            "{field}: terms={} tokens={} avg_length={:.2} boost={}",
            fi.num_terms(),
            fi.total_length(),
            index.average_field_length(field),
            field.boost()
        );
    }
    Ok(())
}
