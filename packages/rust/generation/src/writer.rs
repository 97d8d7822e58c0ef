//! The article-generation collaborator.
//!
//! Turns a [`Topic`] into a complete [`Record`]. The collaborator is a
//! fallible, non-retried, synchronous external call: any failure aborts the
//! current run's generate step and nothing partial is ever persisted.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};

use pressmill_shared::{PressmillError, Record, Result, Topic, slugify};

use crate::client::ChatClient;

const SYSTEM_PROMPT: &str = "You are an expert content writer specializing in AI tools, \
    productivity, and technology. You write engaging, SEO-optimized articles that genuinely \
    help readers make informed decisions about AI tools.";

// ---------------------------------------------------------------------------
// ArticleWriter
// ---------------------------------------------------------------------------

/// Capability interface for article generation, injected into the pipelines
/// so tests can substitute a fake.
#[async_trait]
pub trait ArticleWriter: Send + Sync {
    /// Generate a complete record for the topic, or fail.
    async fn write_article(&self, topic: &Topic) -> Result<Record>;
}

// ---------------------------------------------------------------------------
// ChatWriter
// ---------------------------------------------------------------------------

/// The fields the model must return, before derivation.
#[derive(Debug, Deserialize)]
struct ArticleDraft {
    title: String,
    meta_description: String,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    estimated_read_time: u32,
}

/// [`ArticleWriter`] backed by a chat-completions endpoint.
pub struct ChatWriter {
    client: ChatClient,
}

impl ChatWriter {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArticleWriter for ChatWriter {
    #[instrument(skip_all, fields(keyword = %topic.keyword, model = %self.client.model()))]
    async fn write_article(&self, topic: &Topic) -> Result<Record> {
        let prompt = article_prompt(topic);
        let value = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;

        let draft: ArticleDraft = serde_json::from_value(value).map_err(|e| {
            PressmillError::Generation(format!("article response missing fields: {e}"))
        })?;

        let slug = slugify(&draft.title);
        if slug.is_empty() {
            return Err(PressmillError::Generation(format!(
                "generated title yields an empty slug: {:?}",
                draft.title
            )));
        }

        let record = Record {
            title: draft.title,
            meta_description: draft.meta_description,
            content: draft.content,
            tags: draft.tags,
            estimated_read_time: draft.estimated_read_time,
            keyword: topic.keyword.clone(),
            secondary_keywords: topic.secondary_keywords.clone(),
            content_type: topic.content_type,
            category: topic.category.clone(),
            slug,
            date: Utc::now().date_naive(),
        };

        info!(
            title = %record.title,
            words = record.content.split_whitespace().count(),
            read_time = record.estimated_read_time,
            "article generated"
        );

        Ok(record)
    }
}

/// Build the generation prompt from the topic fields.
fn article_prompt(topic: &Topic) -> String {
    format!(
        "Write a comprehensive, SEO-optimized blog article about: \"{title}\"\n\
         \n\
         Target keyword: {keyword}\n\
         Secondary keywords: {secondary}\n\
         Article type: {content_type}\n\
         Word count: approximately 1200-1500 words\n\
         \n\
         Requirements:\n\
         1. Write in a helpful, authoritative tone\n\
         2. Include an engaging introduction that hooks the reader\n\
         3. Use H2 and H3 subheadings for structure\n\
         4. Include practical tips and actionable advice\n\
         5. Include a clear conclusion with a call-to-action\n\
         6. Optimize for the target keyword naturally (don't stuff)\n\
         7. Write for freelancers and small business owners\n\
         8. Include a \"Quick Summary\" section near the top\n\
         \n\
         Format the response as JSON with these fields:\n\
         - title: SEO-optimized article title\n\
         - meta_description: 150-160 character meta description\n\
         - content: Full article in Markdown format\n\
         - tags: array of 5-7 relevant tags\n\
         - estimated_read_time: reading time in minutes",
        title = topic.title,
        keyword = topic.keyword,
        secondary = topic.secondary_keywords.join(", "),
        content_type = topic.content_type,
    )
}
