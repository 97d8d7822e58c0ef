//! Dynamic topic fallback.
//!
//! When the static catalog is exhausted, a chat collaborator proposes one
//! fresh topic. It sits behind the same [`TopicSource`] seam as the catalog,
//! so the selection loop does not care where topics come from.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use pressmill_catalog::TopicSource;
use pressmill_shared::{ContentType, PressmillError, Result, Topic};

use crate::client::ChatClient;

const SYSTEM_PROMPT: &str = "You are a content strategist for a website about AI tools and \
    productivity software. You propose specific, search-friendly article topics.";

/// Priority floor for dynamically proposed topics. Below every catalog
/// rank, so a refreshed catalog always wins over the fallback.
const DYNAMIC_PRIORITY: u8 = 9;

#[derive(Debug, Deserialize)]
struct TopicProposal {
    title: String,
    keyword: String,
    #[serde(default)]
    secondary_keywords: Vec<String>,
    #[serde(rename = "type")]
    content_type: ContentType,
    category: String,
    #[serde(default = "default_priority")]
    priority: u8,
}

fn default_priority() -> u8 {
    DYNAMIC_PRIORITY
}

/// [`TopicSource`] that asks a chat collaborator for one new topic.
pub struct DynamicTopicSource {
    client: ChatClient,
}

impl DynamicTopicSource {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TopicSource for DynamicTopicSource {
    fn name(&self) -> &str {
        "dynamic"
    }

    #[instrument(skip_all, fields(model = %self.client.model(), published = published.len()))]
    async fn next_topic(&self, published: &HashSet<String>) -> Result<Option<Topic>> {
        let prompt = proposal_prompt(published);
        let value = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;

        let proposal: TopicProposal = serde_json::from_value(value).map_err(|e| {
            PressmillError::Generation(format!("topic proposal missing fields: {e}"))
        })?;

        // The collaborator was told which keywords exist; proposing one of
        // them anyway is a collaborator failure, not a skip condition.
        if published.contains(&proposal.keyword) {
            return Err(PressmillError::Generation(format!(
                "proposed keyword already published: {:?}",
                proposal.keyword
            )));
        }

        info!(keyword = %proposal.keyword, "dynamic topic proposed");

        Ok(Some(Topic {
            title: proposal.title,
            keyword: proposal.keyword,
            secondary_keywords: proposal.secondary_keywords,
            content_type: proposal.content_type,
            category: proposal.category,
            priority: proposal.priority.max(DYNAMIC_PRIORITY),
        }))
    }
}

fn proposal_prompt(published: &HashSet<String>) -> String {
    let mut taken: Vec<_> = published.iter().map(String::as_str).collect();
    taken.sort_unstable();

    format!(
        "Propose ONE new blog article topic about AI tools, writing assistants, or \
         productivity software.\n\
         \n\
         These target keywords are already covered and must NOT be reused:\n\
         {taken}\n\
         \n\
         Pick a topic with real search demand that a freelancer or small business owner \
         would look for.\n\
         \n\
         Format the response as JSON with these fields:\n\
         - title: working article title\n\
         - keyword: primary target keyword (lowercase)\n\
         - secondary_keywords: array of 2-4 related keywords\n\
         - type: one of \"review\", \"comparison\", \"guide\", \"listicle\", \"roundup\"\n\
         - category: one of \"Reviews\", \"Comparisons\", \"Guides\", \"Tools\"\n\
         - priority: integer rank, 9 for proposed topics",
        taken = if taken.is_empty() {
            "(none yet)".to_string()
        } else {
            taken.join(", ")
        },
    )
}
