//! # simrec Core
//!
//! Core library for simrec, the precomputed content-based recommendation
//! builder.
//!
//! This crate provides the similarity-ranking pipeline:
//!
//! - [`Catalog`] - Ordered, title-deduplicated items
//! - [`TfidfVectorizer`] - TF-IDF weighting with English stopwords and `max_df` pruning
//! - [`SimilarityMatrix`] - Dense pairwise cosine similarity with a size ceiling
//! - [`Ranker`] - Top-N neighbors per item with self-exclusion and stable tie-break
//! - [`RecommendationTable`] - Rich or minimal JSON-serializable result
//!
//! ## Example
//!
//! ```rust
//! use simrec_core::{Catalog, Item, RecommendConfig, recommend};
//!
//! let catalog = Catalog::from_items(vec![
//!     Item::new("A", "space opera battle"),
//!     Item::new("B", "space battle opera"),
//!     Item::new("C", "cooking recipe book"),
//! ]);
//! let table = recommend(&catalog, &RecommendConfig { top_n: 2, ..Default::default() }).unwrap();
//! let recs: Vec<&str> = table.get("A").unwrap().titles().collect();
//! assert_eq!(recs, vec!["B", "C"]);
//! ```

pub mod config;
pub mod error;
pub mod item;
pub mod ranker;
pub mod similarity;
pub mod sparse;
pub mod tokenize;
pub mod vectorizer;

pub use config::RecommendConfig;
pub use error::{Error, ErrorKind, Result};
pub use item::{Catalog, Item};
pub use ranker::{Neighbor, Ranker, Recommendation, RecommendationTable, SourceMeta};
pub use similarity::SimilarityMatrix;
pub use sparse::SparseVector;
pub use vectorizer::TfidfVectorizer;

use tracing::info;

/// Vectorize, score and rank a catalog in one pass
pub fn recommend(catalog: &Catalog, config: &RecommendConfig) -> Result<RecommendationTable> {
    config.validate()?;
    if catalog.len() > config.max_items {
        return Err(Error::Resource {
            items: catalog.len(),
            ceiling: config.max_items,
        });
    }

    let mut vectorizer = TfidfVectorizer::new(config.max_df);
    let vectors = vectorizer.fit_transform(&catalog.texts())?;
    info!(
        "TF-IDF fitted: {} documents, {} terms",
        vectors.len(),
        vectorizer.vocabulary_size()
    );

    let matrix = SimilarityMatrix::compute(&vectors, config.max_items)?;
    info!("Similarity matrix: {}x{}", matrix.len(), matrix.len());

    Ranker::new(config.top_n, config.score_precision).rank(catalog, &matrix, config.verbose_output)
}
