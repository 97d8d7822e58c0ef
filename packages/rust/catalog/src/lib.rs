//! Topic catalog and next-topic selection.
//!
//! The catalog is a statically authored, append-only list of candidate
//! content items with priority ranks; it is read-only at runtime. The
//! selector walks a chain of [`TopicSource`]s — the catalog first, then an
//! optional dynamic fallback — and returns the first topic offered.

mod selector;

use std::collections::HashSet;
use std::path::Path;

use pressmill_shared::{PressmillError, Result, Topic};

pub use selector::{CatalogSource, TopicSource, select_from_catalog, select_next};

/// Built-in catalog data, compiled into the binary.
const BUILTIN_TOPICS: &str = include_str!("builtin_topics.toml");

/// Wrapper for the `[[topics]]` TOML table.
#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    topics: Vec<Topic>,
}

/// An ordered, immutable list of candidate topics.
#[derive(Debug, Clone)]
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        // The embedded file is validated by tests; a parse failure here is a
        // build defect, not a runtime condition.
        Self::parse(BUILTIN_TOPICS).expect("embedded catalog is valid")
    }

    /// Load a user-supplied catalog file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PressmillError::io(path, e))?;
        Self::parse(&content).map_err(|e| {
            PressmillError::validation(format!("invalid catalog {}: {e}", path.display()))
        })
    }

    fn parse(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| PressmillError::validation(format!("catalog parse: {e}")))?;

        let catalog = Self {
            topics: file.topics,
        };
        catalog.check_unique_keywords()?;
        Ok(catalog)
    }

    /// Build a catalog directly from topics (tests, dynamic composition).
    pub fn from_topics(topics: Vec<Topic>) -> Result<Self> {
        let catalog = Self { topics };
        catalog.check_unique_keywords()?;
        Ok(catalog)
    }

    /// All topics, in authored order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Topics not yet published, in authored order.
    pub fn available<'a>(&'a self, published: &HashSet<String>) -> Vec<&'a Topic> {
        self.topics
            .iter()
            .filter(|t| !published.contains(&t.keyword))
            .collect()
    }

    /// The first `n` topics sorted by ascending priority (stable within a
    /// rank). Used by the initial-setup pipeline to seed the site.
    pub fn top_priority(&self, n: usize) -> Vec<Topic> {
        let mut sorted = self.topics.clone();
        sorted.sort_by_key(|t| t.priority);
        sorted.truncate(n);
        sorted
    }

    fn check_unique_keywords(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !seen.insert(topic.keyword.as_str()) {
                return Err(PressmillError::validation(format!(
                    "duplicate catalog keyword: {}",
                    topic.keyword
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressmill_shared::ContentType;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin();
        assert!(catalog.len() >= 12);
        assert!(catalog.topics().iter().any(|t| t.priority == 1));
    }

    #[test]
    fn builtin_keywords_are_unique() {
        // Construction already enforces this; make the invariant visible.
        let catalog = Catalog::builtin();
        let keywords: HashSet<_> = catalog.topics().iter().map(|t| &t.keyword).collect();
        assert_eq!(keywords.len(), catalog.len());
    }

    #[test]
    fn duplicate_keyword_rejected() {
        let topic = Topic {
            title: "T".into(),
            keyword: "dup".into(),
            secondary_keywords: vec![],
            content_type: ContentType::Guide,
            category: "Guides".into(),
            priority: 1,
        };
        let err = Catalog::from_topics(vec![topic.clone(), topic]).unwrap_err();
        assert!(err.to_string().contains("duplicate catalog keyword"));
    }

    #[test]
    fn available_filters_published() {
        let catalog = Catalog::builtin();
        let first_keyword = catalog.topics()[0].keyword.clone();
        let published = HashSet::from([first_keyword.clone()]);

        let available = catalog.available(&published);
        assert_eq!(available.len(), catalog.len() - 1);
        assert!(available.iter().all(|t| t.keyword != first_keyword));
    }

    #[test]
    fn top_priority_sorted_and_truncated() {
        let catalog = Catalog::builtin();
        let top = catalog.top_priority(5);
        assert_eq!(top.len(), 5);
        assert!(top.iter().all(|t| t.priority == 1));
    }
}
