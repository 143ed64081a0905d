use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("document directory does not exist or is not a directory: {}", .0.display())]
    CorpusDirectory(PathBuf),

    #[error("no index found at {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("refusing to overwrite {}: directory is not empty and holds no index", .0.display())]
    NotAnIndex(PathBuf),

    #[error("unsupported index format version {found} (expected {expected})")]
    IndexVersion { found: u32, expected: u32 },

    #[error(
        "invalid scoring model {0}: expected 0 (classic), 1 (bm25), 2 (boolean), \
         3 (lm-dirichlet) or 4 (lm-jelinek-mercer)"
    )]
    InvalidScoringModel(i64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("index encoding: {0}")]
    Encode(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure to parse a single query line. These never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("operator {0} is missing an operand")]
    MissingOperand(&'static str),

    #[error("query has {count} clauses, more than the maximum of {max}")]
    TooManyClauses { count: usize, max: usize },
}
