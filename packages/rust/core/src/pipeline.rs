//! End-to-end pipelines: daily run, initial seeding, standalone rebuild.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};

use pressmill_catalog::{Catalog, TopicSource, select_next};
use pressmill_generation::ArticleWriter;
use pressmill_shared::{AffiliateRule, PublishConfig, Result, SiteConfig};
use pressmill_site::{BuildOptions, BuildReport};
use pressmill_storage::RecordStore;

use crate::lock::RunLock;
use crate::publish;

/// Paths and site settings shared by every pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory of record JSON files.
    pub posts_dir: PathBuf,
    /// Root of the rendered site.
    pub output_dir: PathBuf,
    /// Static assets copied into the output tree, if present.
    pub assets_dir: Option<PathBuf>,
    /// Site identity for the renderer.
    pub site: SiteConfig,
    /// Affiliate substitution rules.
    pub affiliates: Vec<AffiliateRule>,
    /// Cards shown on the homepage.
    pub homepage_posts: usize,
}

/// Configuration for the daily run.
#[derive(Debug, Clone)]
pub struct DailyConfig {
    pub pipeline: PipelineConfig,
    pub publish: PublishConfig,
}

/// Configuration for initial seeding.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub pipeline: PipelineConfig,
    /// Catalog to seed from.
    pub catalog: Catalog,
    /// Number of articles to generate.
    pub articles: usize,
}

/// Result of one daily run.
#[derive(Debug)]
pub struct DailyRunResult {
    /// Title of the generated article.
    pub title: String,
    /// Keyword it covers.
    pub keyword: String,
    /// Records in the store after this run.
    pub total_records: usize,
    /// Whether the site was pushed to the remote.
    pub published: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Result of the seeding pipeline.
#[derive(Debug)]
pub struct SetupResult {
    /// Articles generated this run.
    pub generated: usize,
    /// Topics that failed or were skipped.
    pub skipped: usize,
    /// Records in the store after seeding.
    pub total_records: usize,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each article during seeding.
    fn article_written(&self, title: &str, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn article_written(&self, _title: &str, _current: usize, _total: usize) {}
}

/// Run the full daily cycle.
///
/// 1. Acquire the run lock
/// 2. Load published keywords
/// 3. Select the next topic from the source chain
/// 4. Generate the article
/// 5. Persist the record
/// 6. Rebuild the site
/// 7. Publish (best effort)
#[instrument(skip_all, fields(posts = %config.pipeline.posts_dir.display()))]
pub async fn run_daily(
    config: &DailyConfig,
    writer: &dyn ArticleWriter,
    sources: &[&dyn TopicSource],
    progress: &dyn ProgressReporter,
) -> Result<DailyRunResult> {
    let start = Instant::now();
    let _lock = RunLock::acquire(lock_dir(&config.pipeline.posts_dir))?;

    let store = RecordStore::new(&config.pipeline.posts_dir);
    let published_keywords = store.published_keywords()?;
    info!(published = published_keywords.len(), "daily run starting");

    progress.phase("Selecting topic");
    let topic = select_next(sources, &published_keywords).await?;

    progress.phase("Generating article");
    let record = writer.write_article(&topic).await?;

    progress.phase("Saving record");
    store.save(&record)?;

    progress.phase("Building site");
    build_site(&store, &config.pipeline)?;

    progress.phase("Publishing");
    let published = publish::publish(&config.pipeline.output_dir, &config.publish)?;

    let result = DailyRunResult {
        title: record.title,
        keyword: record.keyword,
        total_records: store.count()?,
        published,
        elapsed: start.elapsed(),
    };

    info!(
        title = %result.title,
        keyword = %result.keyword,
        total_records = result.total_records,
        published = result.published,
        elapsed_ms = result.elapsed.as_millis(),
        "daily run complete"
    );

    Ok(result)
}

/// Seed the site with the top-priority catalog topics.
///
/// A topic that is already published, or whose generation fails, is logged
/// and skipped; seeding keeps going and builds whatever it got.
#[instrument(skip_all, fields(articles = config.articles))]
pub async fn run_setup(
    config: &SetupConfig,
    writer: &dyn ArticleWriter,
    progress: &dyn ProgressReporter,
) -> Result<SetupResult> {
    let _lock = RunLock::acquire(lock_dir(&config.pipeline.posts_dir))?;

    let store = RecordStore::new(&config.pipeline.posts_dir);
    let published_keywords = store.published_keywords()?;

    let topics = config.catalog.top_priority(config.articles);
    let total = topics.len();
    let mut generated = 0;
    let mut skipped = 0;

    for (i, topic) in topics.iter().enumerate() {
        if published_keywords.contains(&topic.keyword) {
            info!(keyword = %topic.keyword, "already published, skipping");
            skipped += 1;
            continue;
        }

        progress.phase(&format!("Generating article {}/{total}", i + 1));
        match writer.write_article(topic).await {
            Ok(record) => {
                store.save(&record)?;
                progress.article_written(&record.title, i + 1, total);
                generated += 1;
            }
            Err(e) => {
                warn!(keyword = %topic.keyword, error = %e, "generation failed, skipping topic");
                skipped += 1;
            }
        }
    }

    progress.phase("Building site");
    build_site(&store, &config.pipeline)?;

    let result = SetupResult {
        generated,
        skipped,
        total_records: store.count()?,
    };
    info!(
        generated = result.generated,
        skipped = result.skipped,
        total_records = result.total_records,
        "setup complete"
    );
    Ok(result)
}

/// Rebuild the site from stored records without generating anything.
#[instrument(skip_all, fields(posts = %config.posts_dir.display()))]
pub fn run_build(config: &PipelineConfig) -> Result<BuildReport> {
    let store = RecordStore::new(&config.posts_dir);
    build_site(&store, config)
}

fn build_site(store: &RecordStore, config: &PipelineConfig) -> Result<BuildReport> {
    let records = store.load_all()?;
    let options = BuildOptions {
        site: config.site.clone(),
        affiliates: config.affiliates.clone(),
        output_dir: config.output_dir.clone(),
        assets_dir: config.assets_dir.clone(),
        homepage_posts: config.homepage_posts,
    };
    pressmill_site::build(&records, &options)
}

fn lock_dir(posts_dir: &Path) -> &Path {
    posts_dir.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(posts_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use pressmill_catalog::CatalogSource;
    use pressmill_shared::{ContentType, PressmillError, Record, Topic, slugify};

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

    /// Deterministic writer that never touches the network.
    struct FakeWriter;

    #[async_trait]
    impl ArticleWriter for FakeWriter {
        async fn write_article(&self, topic: &Topic) -> Result<Record> {
            Ok(Record {
                title: topic.title.clone(),
                meta_description: format!("All about {}", topic.keyword),
                content: format!("## {}\n\nBody text.", topic.title),
                tags: vec!["ai".into()],
                estimated_read_time: 5,
                keyword: topic.keyword.clone(),
                secondary_keywords: topic.secondary_keywords.clone(),
                content_type: topic.content_type,
                category: topic.category.clone(),
                slug: slugify(&topic.title),
                date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            })
        }
    }

    /// Writer that fails on a specific keyword.
    struct FailingWriter(&'static str);

    #[async_trait]
    impl ArticleWriter for FailingWriter {
        async fn write_article(&self, topic: &Topic) -> Result<Record> {
            if topic.keyword == self.0 {
                return Err(PressmillError::Generation("synthetic failure".into()));
            }
            FakeWriter.write_article(topic).await
        }
    }

    fn pipeline_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            posts_dir: root.join("posts"),
            output_dir: root.join("output"),
            assets_dir: None,
            site: SiteConfig::default(),
            affiliates: vec![],
            homepage_posts: 12,
        }
    }

    #[tokio::test]
    async fn daily_run_generates_saves_and_builds() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DailyConfig {
            pipeline: pipeline_config(tmp.path()),
            publish: PublishConfig::default(),
        };
        let catalog = Catalog::from_topics(vec![topic("ai writing", 1)]).unwrap();
        let source = CatalogSource::new(catalog);

        let result = run_daily(&config, &FakeWriter, &[&source], &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.keyword, "ai writing");
        assert_eq!(result.total_records, 1);
        // output dir is not a git repo
        assert!(!result.published);
        assert!(tmp
            .path()
            .join("posts/2026-02-10-article-about-ai-writing.json")
            .exists());
        assert!(tmp.path().join("output/index.html").exists());
        assert!(tmp.path().join("output/sitemap.xml").exists());
    }

    #[tokio::test]
    async fn second_daily_run_picks_a_fresh_topic() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DailyConfig {
            pipeline: pipeline_config(tmp.path()),
            publish: PublishConfig::default(),
        };
        let catalog =
            Catalog::from_topics(vec![topic("first", 1), topic("second", 1)]).unwrap();
        let source = CatalogSource::new(catalog);

        let a = run_daily(&config, &FakeWriter, &[&source], &SilentProgress)
            .await
            .unwrap();
        let b = run_daily(&config, &FakeWriter, &[&source], &SilentProgress)
            .await
            .unwrap();

        assert_ne!(a.keyword, b.keyword);
        assert_eq!(b.total_records, 2);
    }

    #[tokio::test]
    async fn exhausted_sources_fail_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DailyConfig {
            pipeline: pipeline_config(tmp.path()),
            publish: PublishConfig::default(),
        };
        let catalog = Catalog::from_topics(vec![topic("only", 1)]).unwrap();
        let source = CatalogSource::new(catalog);

        run_daily(&config, &FakeWriter, &[&source], &SilentProgress)
            .await
            .unwrap();
        let err = run_daily(&config, &FakeWriter, &[&source], &SilentProgress)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no topic source"));
    }

    #[tokio::test]
    async fn held_lock_blocks_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DailyConfig {
            pipeline: pipeline_config(tmp.path()),
            publish: PublishConfig::default(),
        };
        let _outside = RunLock::acquire(tmp.path()).unwrap();

        let catalog = Catalog::from_topics(vec![topic("kw", 1)]).unwrap();
        let source = CatalogSource::new(catalog);
        let err = run_daily(&config, &FakeWriter, &[&source], &SilentProgress)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("another run"));
    }

    #[tokio::test]
    async fn setup_seeds_top_priority_topics() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_topics(vec![
            topic("one", 1),
            topic("two", 1),
            topic("three", 2),
        ])
        .unwrap();
        let config = SetupConfig {
            pipeline: pipeline_config(tmp.path()),
            catalog,
            articles: 2,
        };

        let result = run_setup(&config, &FakeWriter, &SilentProgress).await.unwrap();
        assert_eq!(result.generated, 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.total_records, 2);
        assert!(tmp.path().join("output/index.html").exists());
    }

    #[tokio::test]
    async fn setup_skips_failed_topics_and_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog =
            Catalog::from_topics(vec![topic("bad", 1), topic("good", 1)]).unwrap();
        let config = SetupConfig {
            pipeline: pipeline_config(tmp.path()),
            catalog,
            articles: 2,
        };

        let result = run_setup(&config, &FailingWriter("bad"), &SilentProgress)
            .await
            .unwrap();
        assert_eq!(result.generated, 1);
        assert_eq!(result.skipped, 1);
    }

    #[tokio::test]
    async fn setup_is_idempotent_over_published_topics() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_topics(vec![topic("one", 1), topic("two", 1)]).unwrap();
        let config = SetupConfig {
            pipeline: pipeline_config(tmp.path()),
            catalog,
            articles: 2,
        };

        run_setup(&config, &FakeWriter, &SilentProgress).await.unwrap();
        let again = run_setup(&config, &FakeWriter, &SilentProgress).await.unwrap();
        assert_eq!(again.generated, 0);
        assert_eq!(again.skipped, 2);
        assert_eq!(again.total_records, 2);
    }

    #[test]
    fn build_without_records_yields_empty_site() {
        let tmp = tempfile::tempdir().unwrap();
        let report = run_build(&pipeline_config(tmp.path())).unwrap();
        assert_eq!(report.rendered_count, 0);
        assert!(tmp.path().join("output/index.html").exists());
    }

    #[tokio::test]
    async fn dynamic_fallback_engages_after_catalog_exhausts() {
        struct FixedSource;

        #[async_trait]
        impl TopicSource for FixedSource {
            fn name(&self) -> &str {
                "fixed"
            }
            async fn next_topic(
                &self,
                published: &HashSet<String>,
            ) -> Result<Option<Topic>> {
                assert!(published.contains("only"));
                Ok(Some(topic("fallback", 9)))
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let config = DailyConfig {
            pipeline: pipeline_config(tmp.path()),
            publish: PublishConfig::default(),
        };
        let catalog = Catalog::from_topics(vec![topic("only", 1)]).unwrap();
        let source = CatalogSource::new(catalog);
        let fallback = FixedSource;

        run_daily(&config, &FakeWriter, &[&source, &fallback], &SilentProgress)
            .await
            .unwrap();
        let result = run_daily(&config, &FakeWriter, &[&source, &fallback], &SilentProgress)
            .await
            .unwrap();
        assert_eq!(result.keyword, "fallback");
    }
}
