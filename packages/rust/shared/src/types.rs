//! Core domain types for Pressmill content records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 60;

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// The editorial shape of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Review,
    Comparison,
    Guide,
    Listicle,
    Roundup,
}

impl ContentType {
    /// Lowercase wire/prompt name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Comparison => "comparison",
            Self::Guide => "guide",
            Self::Listicle => "listicle",
            Self::Roundup => "roundup",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A candidate content item. Immutable once defined; the `keyword` is the
/// unique key within the catalog and the deduplication key against the
/// record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Working title for the article.
    pub title: String,
    /// Primary search keyword; unique within the catalog.
    pub keyword: String,
    /// Supporting keywords woven into the prompt.
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    /// Editorial shape.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Category label shown on the site.
    pub category: String,
    /// Priority rank; 1 is highest.
    pub priority: u8,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A generated article: all `Topic` fields plus the generated content and
/// derived fields. Created exactly once per keyword, persisted as one JSON
/// file keyed by `(date, slug)`, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Generated, SEO-optimized title.
    pub title: String,
    /// 150-160 character meta description.
    pub meta_description: String,
    /// Full article body in Markdown.
    pub content: String,
    /// Generated tag list.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Estimated reading time in minutes.
    pub estimated_read_time: u32,
    /// Deduplication key, carried over from the topic.
    pub keyword: String,
    /// Records written by earlier schema versions lack these two fields.
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    #[serde(rename = "type", default = "default_content_type")]
    pub content_type: ContentType,
    /// Category label, carried over from the topic.
    pub category: String,
    /// URL slug derived from the generated title.
    pub slug: String,
    /// Publish date; together with `slug` it names the record file.
    pub date: NaiveDate,
}

fn default_content_type() -> ContentType {
    ContentType::Guide
}

impl Record {
    /// The record's file stem, `{date}-{slug}`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.date.format("%Y-%m-%d"), self.slug)
    }
}

// ---------------------------------------------------------------------------
// Slug derivation
// ---------------------------------------------------------------------------

/// Derive a URL-friendly slug from a title: lowercase, drop everything
/// outside `[a-z0-9 -]`, collapse whitespace and dash runs to a single
/// dash, truncate to [`MAX_SLUG_LEN`].
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut prev_dash = true; // suppress leading dashes

    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' => {
                slug.push(c);
                prev_dash = false;
            }
            ' ' | '\t' | '\n' | '-' => {
                if !prev_dash {
                    slug.push('-');
                    prev_dash = true;
                }
            }
            _ => {}
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
