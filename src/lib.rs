//! # simrec
//!
//! Builds a static, precomputed content-based recommendation table: for every
//! item of a CSV catalog, the N items whose descriptions are most similar
//! under TF-IDF cosine similarity, written as one JSON file a static page can
//! look up without any ranking at request time.
//!
//! ## Quick Start
//!
//! ```bash
//! simrec --csv movies_metadata.csv --out-dir ./site --max-rows 1000 --top-n 10
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use simrec::prelude::*;
//!
//! let pipeline = Pipeline::new(PipelineConfig {
//!     source: "movies_metadata.csv".into(),
//!     out_dir: "site".into(),
//!     ..Default::default()
//! });
//! let path = pipeline.run().unwrap();
//! println!("wrote {}", path.display());
//! ```
//!
//! ## Crate Structure
//!
//! - `simrec-core` - Catalog model, TF-IDF vectorizer, similarity matrix, ranker
//! - `simrec-storage` - CSV catalog loader and atomic JSON writer

use std::path::PathBuf;
use tracing::info;

pub use simrec_core::{
    recommend, Catalog, Error, ErrorKind, Item, Neighbor, RecommendConfig, Recommendation,
    RecommendationTable, Result,
};
pub use simrec_storage::{CatalogLoader, JsonWriter, LoaderConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogLoader, Error, Item, JsonWriter, LoaderConfig, Pipeline, PipelineConfig,
        RecommendConfig, RecommendationTable, Result,
    };
}

/// Everything one run needs: where to read, where to write, how to rank
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source: PathBuf,
    /// Directory receiving the artifact; created when absent
    pub out_dir: PathBuf,
    pub file_name: String,
    pub loader: LoaderConfig,
    pub recommend: RecommendConfig,
    /// Accepted for command-line compatibility; nothing in the pipeline is random
    pub random_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            out_dir: PathBuf::from("site"),
            file_name: simrec_storage::writer::DEFAULT_FILE_NAME.to_string(),
            loader: LoaderConfig::default(),
            recommend: RecommendConfig::default(),
            random_seed: 42,
        }
    }
}

/// Loader → Vectorizer → Similarity → Ranker → Writer, once
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load and rank without writing anything
    pub fn build(&self) -> Result<RecommendationTable> {
        self.config.recommend.validate()?;
        let catalog = CatalogLoader::new(self.config.loader.clone()).load_path(&self.config.source)?;
        recommend(&catalog, &self.config.recommend)
    }

    /// Run every stage and write the artifact; returns its path.
    /// Nothing is written when any stage fails.
    pub fn run(&self) -> Result<PathBuf> {
        let table = self.build()?;
        let path = JsonWriter::new(&self.config.out_dir)
            .with_file_name(self.config.file_name.clone())
            .write(&table)?;
        info!("Wrote {} recommendation records", table.len());
        Ok(path)
    }
}
