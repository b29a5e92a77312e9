use crate::{Error, Result};

/// Default neighbors per item
pub const DEFAULT_TOP_N: usize = 10;

/// Terms in more than this fraction of documents are dropped from the vocabulary
pub const DEFAULT_MAX_DF: f32 = 0.85;

/// Decimal digits kept on emitted scores
pub const DEFAULT_SCORE_PRECISION: u32 = 4;

/// Largest catalog the dense n×n matrix is built for (400 MB of f32 at the cap)
pub const DEFAULT_MAX_ITEMS: usize = 10_000;

/// Configuration for vectorizing, scoring and ranking a catalog
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendConfig {
    pub top_n: usize,
    pub max_df: f32,
    /// Rich records (source metadata, scores) when true; bare title lists otherwise
    pub verbose_output: bool,
    pub score_precision: u32,
    pub max_items: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            max_df: DEFAULT_MAX_DF,
            verbose_output: true,
            score_precision: DEFAULT_SCORE_PRECISION,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl RecommendConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(Error::Configuration(format!(
                "max-df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.max_items < 2 {
            return Err(Error::Configuration(format!(
                "item ceiling must be at least 2, got {}",
                self.max_items
            )));
        }
        Ok(())
    }
}
