//! Top-N neighbor selection and recommendation records
//!
//! The ranker always produces the rich record; the minimal shape is a
//! projection applied when the table is serialized.

use crate::item::{Catalog, Item};
use crate::similarity::SimilarityMatrix;
use crate::{Error, Result};
use ordered_float::OrderedFloat;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// Auxiliary fields of the item a record belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl From<&Item> for SourceMeta {
    fn from(item: &Item) -> Self {
        Self {
            poster: item.poster.clone(),
            year: item.year.clone(),
        }
    }
}

/// One recommended item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub source: SourceMeta,
    pub recs: Vec<Neighbor>,
}

impl Recommendation {
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.recs.iter().map(|n| n.title.as_str())
    }
}

/// Per-item recommendations in catalog order, keyed by title
#[derive(Debug, Clone, Default)]
pub struct RecommendationTable {
    entries: Vec<(String, Recommendation)>,
    verbose: bool,
}

impl RecommendationTable {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            entries: Vec::new(),
            verbose,
        }
    }

    pub fn push(&mut self, title: String, recommendation: Recommendation) {
        self.entries.push((title, recommendation));
    }

    /// Switch between the rich and the minimal output shape
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Recommendation> {
        self.entries.iter().find(|(t, _)| t == title).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Recommendation)> {
        self.entries.iter().map(|(t, r)| (t.as_str(), r))
    }
}

struct TitleList<'a>(&'a Recommendation);

impl Serialize for TitleList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.recs.len()))?;
        for title in self.0.titles() {
            seq.serialize_element(title)?;
        }
        seq.end()
    }
}

impl Serialize for RecommendationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (title, recommendation) in &self.entries {
            if self.verbose {
                map.serialize_entry(title, recommendation)?;
            } else {
                map.serialize_entry(title, &TitleList(recommendation))?;
            }
        }
        map.end()
    }
}

/// Round half away from zero to `precision` decimal digits
#[inline]
#[must_use]
pub fn round_score(score: f32, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (f64::from(score) * factor).round() / factor
}

/// Selects the `top_n` most similar other items for every catalog entry
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    top_n: usize,
    precision: u32,
}

impl Ranker {
    #[must_use]
    pub fn new(top_n: usize, precision: u32) -> Self {
        Self { top_n, precision }
    }

    /// Indices and raw scores of the neighbors of `i`, best first.
    /// `i` is excluded by index; equal scores keep ascending index order.
    #[must_use]
    pub fn neighbors(&self, matrix: &SimilarityMatrix, i: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = matrix
            .row(i)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .collect();
        scored.sort_by(|a, b| {
            OrderedFloat(b.1)
                .cmp(&OrderedFloat(a.1))
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(self.top_n);
        scored
    }

    pub fn rank(
        &self,
        catalog: &Catalog,
        matrix: &SimilarityMatrix,
        verbose: bool,
    ) -> Result<RecommendationTable> {
        if catalog.len() != matrix.len() {
            return Err(Error::Data(format!(
                "catalog has {} items but the similarity matrix has {} rows",
                catalog.len(),
                matrix.len()
            )));
        }

        let items = catalog.items();
        let mut table = RecommendationTable::new(verbose);
        for (i, item) in items.iter().enumerate() {
            let recs = self
                .neighbors(matrix, i)
                .into_iter()
                .map(|(j, score)| Neighbor {
                    title: items[j].title.clone(),
                    poster: items[j].poster.clone(),
                    year: items[j].year.clone(),
                    score: round_score(score, self.precision),
                })
                .collect();
            table.push(
                item.title.clone(),
                Recommendation {
                    source: SourceMeta::from(item),
                    recs,
                },
            );

            if (i + 1) % 100 == 0 {
                debug!("Ranked {}/{} items", i + 1, items.len());
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseVector;

    fn matrix_of(vectors: &[Vec<(u32, f32)>]) -> SimilarityMatrix {
        let vectors: Vec<SparseVector> = vectors
            .iter()
            .map(|pairs| {
                let mut v = SparseVector::from_pairs(pairs.clone());
                v.normalize();
                v
            })
            .collect();
        SimilarityMatrix::compute(&vectors, 1000).unwrap()
    }

    #[test]
    fn test_self_excluded_even_with_identical_rows() {
        let matrix = matrix_of(&[vec![(0, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)]]);
        let ranker = Ranker::new(10, 4);
        let neighbors = ranker.neighbors(&matrix, 1);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, 0);
        assert!(neighbors.iter().all(|&(j, _)| j != 1));
    }

    #[test]
    fn test_ties_broken_by_ascending_index() {
        let matrix = matrix_of(&[
            vec![(0, 1.0)],
            vec![(1, 1.0)],
            vec![(2, 1.0)],
            vec![(3, 1.0)],
        ]);
        let neighbors = Ranker::new(10, 4).neighbors(&matrix, 2);
        let order: Vec<usize> = neighbors.iter().map(|&(j, _)| j).collect();
        assert_eq!(order, vec![0, 1, 3]);
    }

    #[test]
    fn test_top_n_truncates() {
        let matrix = matrix_of(&[vec![(0, 1.0)], vec![(0, 1.0)], vec![(0, 1.0)], vec![(0, 1.0)]]);
        assert_eq!(Ranker::new(2, 4).neighbors(&matrix, 0).len(), 2);
    }

    #[test]
    fn test_rank_copies_optional_fields() {
        let catalog = Catalog::from_items(vec![
            Item::new("A", "x").with_poster("/a.jpg").with_year("1999"),
            Item::new("B", "y"),
        ]);
        let matrix = matrix_of(&[vec![(0, 1.0), (1, 1.0)], vec![(0, 1.0)]]);
        let table = Ranker::new(10, 4).rank(&catalog, &matrix, true).unwrap();

        let a = table.get("A").unwrap();
        assert_eq!(a.source.poster.as_deref(), Some("/a.jpg"));
        assert_eq!(a.recs[0].title, "B");
        assert!(a.recs[0].poster.is_none());
        assert_eq!(a.recs[0].score, 0.7071);

        let b = table.get("B").unwrap();
        assert_eq!(b.source, SourceMeta::default());
        assert_eq!(b.recs[0].year.as_deref(), Some("1999"));
    }

    #[test]
    fn test_rank_rejects_mismatched_sizes() {
        let catalog = Catalog::from_items(vec![Item::new("A", "x")]);
        let matrix = matrix_of(&[vec![(0, 1.0)], vec![(0, 1.0)]]);
        assert!(Ranker::new(10, 4).rank(&catalog, &matrix, true).is_err());
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123_456, 4), 0.1235);
        assert_eq!(round_score(1.0, 4), 1.0);
        assert_eq!(round_score(0.0, 4), 0.0);
    }

    #[test]
    fn test_serialize_shapes() {
        let mut table = RecommendationTable::new(true);
        table.push(
            "Zeta".to_string(),
            Recommendation {
                source: SourceMeta { poster: None, year: Some("2001".to_string()) },
                recs: vec![Neighbor { title: "Alpha".to_string(), poster: None, year: None, score: 0.5 }],
            },
        );
        table.push(
            "Alpha".to_string(),
            Recommendation { source: SourceMeta::default(), recs: vec![] },
        );

        let rich = serde_json::to_string(&table).unwrap();
        assert_eq!(
            rich,
            r#"{"Zeta":{"source":{"year":"2001"},"recs":[{"title":"Alpha","score":0.5}]},"Alpha":{"source":{},"recs":[]}}"#
        );

        let minimal = serde_json::to_string(&table.with_verbose(false)).unwrap();
        assert_eq!(minimal, r#"{"Zeta":["Alpha"],"Alpha":[]}"#);
    }
}
