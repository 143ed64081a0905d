pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod output;
pub mod persist;
pub mod query;
pub mod search;
pub mod similarity;
pub mod tokenizer;

pub use config::SearchConfig;
pub use corpus::Document;
pub use error::{Error, QueryError, Result};
pub use index::{DocId, Field, FieldIndex, InvertedIndex, Posting, TermId};
pub use output::ResultRecord;
pub use query::Query;
pub use search::{evaluate, rank, run_batch, BatchOutcome, ScoredResult};
pub use similarity::ScoringModel;
