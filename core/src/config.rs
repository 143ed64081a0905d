use crate::error::Result;
use crate::similarity::ScoringModel;

/// Number of ranked results kept per query.
pub const DEFAULT_TOP_K: usize = 50;

/// Settings for one search invocation. Exactly one scoring model is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub model: ScoringModel,
    pub top_k: usize,
}

impl SearchConfig {
    pub fn new(model: ScoringModel) -> Self {
        Self { model, top_k: DEFAULT_TOP_K }
    }

    /// Validates the model number up front so a bad value never reaches the search loop.
    pub fn from_model_id(id: i64) -> Result<Self> {
        Ok(Self::new(ScoringModel::from_id(id)?))
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_to_fifty_results() {
        let config = SearchConfig::from_model_id(1).unwrap();
        assert_eq!(config.top_k, 50);
        assert_eq!(config.model.id(), 1);
        assert_eq!(config.with_top_k(5).top_k, 5);
    }

    #[test]
    fn rejects_unknown_model() {
        assert!(matches!(SearchConfig::from_model_id(7), Err(Error::InvalidScoringModel(7))));
    }
}
