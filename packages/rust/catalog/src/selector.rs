//! Next-topic selection: priority filter plus uniform tie-break.

use std::collections::HashSet;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use pressmill_shared::{PressmillError, Result, Topic};

use crate::Catalog;

// ---------------------------------------------------------------------------
// TopicSource
// ---------------------------------------------------------------------------

/// A supplier of candidate topics. The static catalog and the dynamic LLM
/// fallback both implement this, so the selection loop treats them
/// uniformly: `Ok(None)` means "exhausted, try the next source".
#[async_trait]
pub trait TopicSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Offer the next topic, given the set of already-published keywords.
    async fn next_topic(&self, published: &HashSet<String>) -> Result<Option<Topic>>;
}

/// Walk the source chain in order and return the first topic offered.
///
/// A source error propagates immediately (no retry); every source returning
/// `None` is a fatal condition for the run.
pub async fn select_next(
    sources: &[&dyn TopicSource],
    published: &HashSet<String>,
) -> Result<Topic> {
    for source in sources {
        match source.next_topic(published).await? {
            Some(topic) => {
                info!(
                    source = source.name(),
                    keyword = %topic.keyword,
                    priority = topic.priority,
                    "topic selected"
                );
                return Ok(topic);
            }
            None => {
                debug!(source = source.name(), "source exhausted, trying next");
            }
        }
    }

    Err(PressmillError::validation(
        "no topic source could supply a topic",
    ))
}

// ---------------------------------------------------------------------------
// Catalog selection
// ---------------------------------------------------------------------------

/// Pick the next topic from a catalog:
///
/// 1. drop topics whose keyword is already published;
/// 2. nothing left → `None`;
/// 3. find the minimum priority value among the rest (1 = highest);
/// 4. choose uniformly at random among the topics at that priority.
///
/// The random tie-break adds variety across runs without per-run state;
/// the RNG is injected so tests can seed it.
pub fn select_from_catalog<R: Rng>(
    catalog: &Catalog,
    published: &HashSet<String>,
    rng: &mut R,
) -> Option<Topic> {
    let available = catalog.available(published);
    if available.is_empty() {
        return None;
    }

    let top_priority = available.iter().map(|t| t.priority).min()?;
    let top: Vec<_> = available
        .into_iter()
        .filter(|t| t.priority == top_priority)
        .collect();

    top.choose(rng).map(|t| (*t).clone())
}

/// [`TopicSource`] backed by a static [`Catalog`].
pub struct CatalogSource {
    catalog: Catalog,
}

impl CatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl TopicSource for CatalogSource {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn next_topic(&self, published: &HashSet<String>) -> Result<Option<Topic>> {
        let mut rng = rand::thread_rng();
        Ok(select_from_catalog(&self.catalog, published, &mut rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressmill_shared::ContentType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn topic(keyword: &str, priority: u8) -> Topic {
        Topic {
            title: format!("Article about {keyword}"),
            keyword: keyword.into(),
            secondary_keywords: vec![],
            content_type: ContentType::Guide,
            category: "Guides".into(),
            priority,
        }
    }

    fn catalog(topics: Vec<Topic>) -> Catalog {
        Catalog::from_topics(topics).unwrap()
    }

    #[test]
    fn never_returns_published_keyword() {
        let cat = catalog(vec![topic("a", 1), topic("b", 2), topic("c", 3)]);
        let published = HashSet::from(["a".to_string()]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let selected = select_from_catalog(&cat, &published, &mut rng).unwrap();
            assert_ne!(selected.keyword, "a");
        }
    }

    #[test]
    fn returns_minimum_priority() {
        let cat = catalog(vec![topic("low", 3), topic("high", 1), topic("mid", 2)]);
        let mut rng = StdRng::seed_from_u64(7);

        let selected = select_from_catalog(&cat, &HashSet::new(), &mut rng).unwrap();
        assert_eq!(selected.keyword, "high");
    }

    #[test]
    fn tie_break_stays_within_top_priority() {
        let cat = catalog(vec![topic("a", 1), topic("b", 1), topic("c", 2)]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for _ in 0..100 {
            let selected = select_from_catalog(&cat, &HashSet::new(), &mut rng).unwrap();
            assert_ne!(selected.keyword, "c");
            seen.insert(selected.keyword);
        }
        // With 100 draws both equal-priority topics should appear.
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn exhausted_catalog_returns_none() {
        let cat = catalog(vec![topic("a", 1)]);
        let published = HashSet::from(["a".to_string()]);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(select_from_catalog(&cat, &published, &mut rng).is_none());
    }

    #[test]
    fn empty_catalog_returns_none() {
        let cat = catalog(vec![]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_from_catalog(&cat, &HashSet::new(), &mut rng).is_none());
    }

    #[tokio::test]
    async fn select_next_falls_through_to_second_source() {
        struct FixedSource(Option<Topic>);

        #[async_trait]
        impl TopicSource for FixedSource {
            fn name(&self) -> &str {
                "fixed"
            }
            async fn next_topic(&self, _published: &HashSet<String>) -> Result<Option<Topic>> {
                Ok(self.0.clone())
            }
        }

        let empty = FixedSource(None);
        let fallback = FixedSource(Some(topic("fresh", 2)));

        let selected = select_next(&[&empty, &fallback], &HashSet::new())
            .await
            .unwrap();
        assert_eq!(selected.keyword, "fresh");
    }

    #[tokio::test]
    async fn select_next_errors_when_all_exhausted() {
        let source = CatalogSource::new(catalog(vec![topic("a", 1)]));
        let published = HashSet::from(["a".to_string()]);

        let err = select_next(&[&source], &published).await.unwrap_err();
        assert!(err.to_string().contains("no topic source"));
    }
}
