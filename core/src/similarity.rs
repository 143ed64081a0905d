//! Relevance models.
//!
//! Every model scores one (term, field, document) triple from the term's frequency in the
//! document field plus field-level collection statistics. Scores are always finite and
//! non-negative, and a term that does not occur in the field scores zero.

use crate::error::{Error, Result};
use crate::index::{DocId, Field, InvertedIndex, TermStats};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringModel {
    /// Classic TF-IDF with length normalization.
    Classic,
    /// Okapi BM25.
    Bm25 { k1: f32, b: f32 },
    /// Presence only.
    Boolean,
    /// Query likelihood with a Dirichlet prior.
    LmDirichlet { mu: f32 },
    /// Query likelihood with Jelinek-Mercer interpolation.
    LmJelinekMercer { lambda: f32 },
}

/// Field-level statistics shared by every posting of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub num_docs: u32,
    pub avg_field_length: f32,
    /// Total analyzed tokens in the field, the collection size for the language models.
    pub total_length: u64,
}

impl FieldStats {
    pub fn new(index: &InvertedIndex, field: Field) -> Self {
        Self {
            num_docs: index.num_docs(),
            avg_field_length: index.average_field_length(field),
            total_length: index.field(field).total_length(),
        }
    }
}

impl ScoringModel {
    pub const BM25_K1: f32 = 1.2;
    pub const BM25_B: f32 = 0.75;
    pub const DIRICHLET_MU: f32 = 2000.0;
    pub const JELINEK_MERCER_LAMBDA: f32 = 0.7;

    /// Map a command-line model number to a model with its default parameters.
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            0 => Ok(ScoringModel::Classic),
            1 => Ok(ScoringModel::Bm25 { k1: Self::BM25_K1, b: Self::BM25_B }),
            2 => Ok(ScoringModel::Boolean),
            3 => Ok(ScoringModel::LmDirichlet { mu: Self::DIRICHLET_MU }),
            4 => Ok(ScoringModel::LmJelinekMercer { lambda: Self::JELINEK_MERCER_LAMBDA }),
            other => Err(Error::InvalidScoringModel(other)),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            ScoringModel::Classic => 0,
            ScoringModel::Bm25 { .. } => 1,
            ScoringModel::Boolean => 2,
            ScoringModel::LmDirichlet { .. } => 3,
            ScoringModel::LmJelinekMercer { .. } => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringModel::Classic => "classic",
            ScoringModel::Bm25 { .. } => "bm25",
            ScoringModel::Boolean => "boolean",
            ScoringModel::LmDirichlet { .. } => "lm-dirichlet",
            ScoringModel::LmJelinekMercer { .. } => "lm-jelinek-mercer",
        }
    }

    /// Score `term` in `field` of `doc_id`. Looks the posting up; the evaluator uses
    /// [`ScoringModel::score_posting`] directly while walking posting lists.
    pub fn score(&self, term: &str, field: Field, doc_id: DocId, index: &InvertedIndex) -> f32 {
        let fi = index.field(field);
        let Some(tid) = fi.term_id(term) else { return 0.0 };
        let tf = fi.term_frequency(term, doc_id);
        let stats = FieldStats::new(index, field);
        self.score_posting(&stats, fi.term_stats(tid), tf, fi.field_length(doc_id))
    }

    pub fn score_posting(
        &self,
        field: &FieldStats,
        term: TermStats,
        tf: u32,
        field_length: u32,
    ) -> f32 {
        if tf == 0 || field_length == 0 {
            return 0.0;
        }
        let tf = tf as f64;
        let len = field_length as f64;
        let n = field.num_docs as f64;
        let df = term.doc_freq as f64;
        let score = match *self {
            ScoringModel::Classic => {
                let idf = 1.0 + (n / (df + 1.0)).ln();
                tf.sqrt() * idf * idf / len.sqrt()
            }
            ScoringModel::Bm25 { k1, b } => {
                let (k1, b) = (k1 as f64, b as f64);
                let avgdl = field.avg_field_length as f64;
                let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
                idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * len / avgdl))
            }
            ScoringModel::Boolean => 1.0,
            ScoringModel::LmDirichlet { mu } => {
                let mu = mu as f64;
                let p_c = collection_probability(term, field);
                let score = ((mu * p_c + tf) / (p_c * (len + mu))).ln();
                if score > ROUNDING_FLOOR { score } else { 0.0 }
            }
            ScoringModel::LmJelinekMercer { lambda } => {
                let lambda = lambda as f64;
                let p_c = collection_probability(term, field);
                let p_d = jelinek_mercer_probability(lambda, tf, len, p_c);
                (p_d / (lambda * p_c)).ln()
            }
        };
        score as f32
    }
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Log-ratios this close to zero are rounding noise of a ratio that is exactly one.
const ROUNDING_FLOOR: f64 = 1e-9;

/// Collection language model: `collectionFreq / collectionSize`.
fn collection_probability(term: TermStats, field: &FieldStats) -> f64 {
    term.collection_freq as f64 / field.total_length as f64
}

/// `P(term|doc) = (1-λ) * tf/fieldLength + λ * P(term|collection)`.
pub fn jelinek_mercer_probability(
    lambda: f64,
    tf: f64,
    field_length: f64,
    p_collection: f64,
) -> f64 {
    (1.0 - lambda) * tf / field_length + lambda * p_collection
}
