use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// A catalog entry. `title` is the primary key; `text` feeds the vectorizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl Item {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            poster: None,
            year: None,
        }
    }

    #[must_use]
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }
}

/// Ordered, deduplicated item sequence. The position of an item is the
/// join key into the vector space and the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    titles: AHashSet<String>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            titles: AHashSet::new(),
        }
    }

    /// Build from items, keeping the first occurrence of each title
    pub fn from_items<I: IntoIterator<Item = Item>>(items: I) -> Self {
        let mut catalog = Self::new();
        for item in items {
            catalog.push(item);
        }
        catalog
    }

    /// Append an item; returns false if its title is already present
    pub fn push(&mut self, item: Item) -> bool {
        if !self.titles.insert(item.title.clone()) {
            return false;
        }
        self.items.push(item);
        true
    }

    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Text fields in catalog order
    pub fn texts(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.text.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
