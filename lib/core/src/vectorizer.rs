//! TF-IDF vectorizer
//!
//! Fits a vocabulary jointly over every document of a catalog and emits one
//! L2-normalized sparse vector per document, so that the inner product of two
//! vectors is their cosine similarity.

use crate::sparse::SparseVector;
use crate::tokenize::tokenize;
use crate::{Error, Result};
use ahash::AHashMap;
use std::collections::BTreeMap;
use tracing::debug;

/// A fitted TF-IDF model and the vectors of the documents it was fitted on
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_df: f32,
    // term -> dimension, assigned in lexicographic term order
    vocabulary: BTreeMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    #[must_use]
    pub fn new(max_df: f32) -> Self {
        Self {
            max_df,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn dimension(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.dimension(term).map(|d| self.idf[d as usize])
    }

    /// Fit the vocabulary over `docs` and return one vector per document,
    /// in input order
    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<Vec<SparseVector>> {
        let n = docs.len();
        if n < 2 {
            return Err(Error::Data(format!(
                "need at least 2 documents to compare, got {n}"
            )));
        }

        let counts: Vec<AHashMap<String, u32>> = docs
            .iter()
            .map(|doc| {
                let mut tf: AHashMap<String, u32> = AHashMap::new();
                for token in tokenize(doc.as_ref()) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let seen = doc_freq.len();

        let max_doc_count = f64::from(self.max_df) * n as f64;
        self.vocabulary.clear();
        self.idf.clear();
        for (term, df) in doc_freq {
            if f64::from(df) > max_doc_count {
                continue;
            }
            let idf = ((1.0 + n as f64) / (1.0 + f64::from(df))).ln() + 1.0;
            self.vocabulary.insert(term.to_string(), self.idf.len() as u32);
            self.idf.push(idf as f32);
        }

        debug!(
            "Vocabulary: {} terms kept of {} seen (max_df={})",
            self.vocabulary.len(),
            seen,
            self.max_df
        );

        if self.vocabulary.is_empty() {
            return Err(Error::Data(format!(
                "vocabulary is empty after pruning ({seen} distinct terms across {n} documents, \
                 all above max_df={} or stopwords)",
                self.max_df
            )));
        }

        Ok(counts.iter().map(|tf| self.weigh(tf)).collect())
    }

    fn weigh(&self, tf: &AHashMap<String, u32>) -> SparseVector {
        let pairs = tf
            .iter()
            .filter_map(|(term, &count)| {
                self.vocabulary
                    .get(term)
                    .map(|&dim| (dim, count as f32 * self.idf[dim as usize]))
            })
            .collect();
        let mut vector = SparseVector::from_pairs(pairs);
        vector.normalize();
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_are_unit_length() {
        let mut vectorizer = TfidfVectorizer::new(0.85);
        let vectors = vectorizer
            .fit_transform(&["space opera battle", "cooking recipe book", "space recipe"])
            .unwrap();
        assert_eq!(vectors.len(), 3);
        for v in &vectors {
            assert!((v.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_near_universal_terms_pruned() {
        let mut vectorizer = TfidfVectorizer::new(0.85);
        vectorizer
            .fit_transform(&["movie alpha", "movie beta", "movie gamma"])
            .unwrap();
        assert!(vectorizer.dimension("movie").is_none());
        assert_eq!(vectorizer.vocabulary_size(), 3);
    }

    #[test]
    fn test_rare_terms_kept_with_higher_idf() {
        let mut vectorizer = TfidfVectorizer::new(1.0);
        vectorizer
            .fit_transform(&["common rare", "common", "common"])
            .unwrap();
        let rare = vectorizer.idf("rare").unwrap();
        let common = vectorizer.idf("common").unwrap();
        assert!(rare > common);
        assert!((common - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimensions_follow_term_order() {
        let mut vectorizer = TfidfVectorizer::new(1.0);
        vectorizer.fit_transform(&["zeta alpha", "mid"]).unwrap();
        assert_eq!(vectorizer.dimension("alpha"), Some(0));
        assert_eq!(vectorizer.dimension("mid"), Some(1));
        assert_eq!(vectorizer.dimension("zeta"), Some(2));
    }

    #[test]
    fn test_document_without_terms_is_zero_vector() {
        let mut vectorizer = TfidfVectorizer::new(0.85);
        let vectors = vectorizer.fit_transform(&["the and of", "lonely planet"]).unwrap();
        assert!(vectors[0].is_zero());
        assert!(!vectors[1].is_zero());
    }

    #[test]
    fn test_too_few_documents() {
        let mut vectorizer = TfidfVectorizer::new(0.85);
        let err = vectorizer.fit_transform(&["only one"]).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }

    #[test]
    fn test_empty_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new(0.85);
        let err = vectorizer.fit_transform(&["the of and", "it is"]).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
        assert!(err.to_string().contains("vocabulary is empty"));
    }
}
