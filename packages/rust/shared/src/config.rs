//! Application configuration for Pressmill.
//!
//! User config lives at `~/.pressmill/pressmill.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PressmillError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pressmill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pressmill";

// ---------------------------------------------------------------------------
// Config structs (matching pressmill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity used by the renderer.
    #[serde(default)]
    pub site: SiteConfig,

    /// Paths and run defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Article-writer collaborator endpoint.
    #[serde(default)]
    pub writer: WriterConfig,

    /// Dynamic-topic collaborator endpoint.
    #[serde(default)]
    pub topics: TopicsConfig,

    /// Git publish settings.
    #[serde(default)]
    pub publish: PublishConfig,

    /// Affiliate link substitution rules.
    #[serde(default = "default_affiliates")]
    pub affiliates: Vec<AffiliateRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            defaults: DefaultsConfig::default(),
            writer: WriterConfig::default(),
            topics: TopicsConfig::default(),
            publish: PublishConfig::default(),
            affiliates: default_affiliates(),
        }
    }
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title shown in headers and `<title>` tags.
    #[serde(default = "default_site_title")]
    pub title: String,

    /// One-line tagline for the homepage hero.
    #[serde(default = "default_site_tagline")]
    pub tagline: String,

    /// Meta description for the homepage.
    #[serde(default = "default_site_description")]
    pub description: String,

    /// Canonical base URL, no trailing slash.
    #[serde(default = "default_site_url")]
    pub base_url: String,

    /// Byline shown in article footers.
    #[serde(default = "default_site_author")]
    pub author: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            tagline: default_site_tagline(),
            description: default_site_description(),
            base_url: default_site_url(),
            author: default_site_author(),
        }
    }
}

fn default_site_title() -> String {
    "AI Tools Hub".into()
}
fn default_site_tagline() -> String {
    "Reviews, Comparisons & Guides for the Best AI Tools".into()
}
fn default_site_description() -> String {
    "Your trusted source for honest AI tool reviews, comparisons, and guides \
     to boost your productivity and business."
        .into()
}
fn default_site_url() -> String {
    "https://aitoolshub.github.io".into()
}
fn default_site_author() -> String {
    "AI Tools Hub Team".into()
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory holding one JSON file per record.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,

    /// Directory the rendered site is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory of static assets (css/js) copied into the output tree.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Number of records listed on the homepage.
    #[serde(default = "default_homepage_posts")]
    pub homepage_posts: usize,

    /// Timeout for collaborator HTTP calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
            output_dir: default_output_dir(),
            assets_dir: default_assets_dir(),
            homepage_posts: default_homepage_posts(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_posts_dir() -> String {
    "posts".into()
}
fn default_output_dir() -> String {
    "output".into()
}
fn default_assets_dir() -> String {
    "static".into()
}
fn default_homepage_posts() -> usize {
    12
}
fn default_request_timeout() -> u64 {
    60
}

/// `[writer]` section — the article-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_writer_key_env")]
    pub api_key_env: String,

    /// Model used for article generation.
    #[serde(default = "default_writer_model")]
    pub model: String,

    /// OpenAI-compatible chat-completions base URL.
    #[serde(default = "default_writer_base_url")]
    pub base_url: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_writer_key_env(),
            model: default_writer_model(),
            base_url: default_writer_base_url(),
        }
    }
}

fn default_writer_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_writer_model() -> String {
    "gpt-4.1-mini".into()
}
fn default_writer_base_url() -> String {
    "https://api.openai.com/v1".into()
}

/// `[topics]` section — the dynamic-topic collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_topics_key_env")]
    pub api_key_env: String,

    /// Model used for topic synthesis.
    #[serde(default = "default_topics_model")]
    pub model: String,

    /// OpenAI-compatible chat-completions base URL.
    #[serde(default = "default_writer_base_url")]
    pub base_url: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_topics_key_env(),
            model: default_topics_model(),
            base_url: default_writer_base_url(),
        }
    }
}

fn default_topics_key_env() -> String {
    "PRESSMILL_TOPICS_API_KEY".into()
}
fn default_topics_model() -> String {
    "gpt-4.1-mini".into()
}

/// `[publish]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Git remote name pushed to after a successful build.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch pushed on the remote.
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_remote() -> String {
    "origin".into()
}
fn default_branch() -> String {
    "main".into()
}

/// `[[affiliates]]` entry — one keyword→link substitution rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateRule {
    /// Display name, also the link text.
    pub name: String,
    /// Regex matched against the article body.
    pub pattern: String,
    /// Destination URL.
    pub url: String,
}

fn default_affiliates() -> Vec<AffiliateRule> {
    let rules = [
        ("Writesonic", r"\bWritesonic\b", "https://writesonic.com/?via=aitoolshub"),
        ("Jasper AI", r"\bJasper AI\b", "https://www.jasper.ai/?fpr=aitoolshub"),
        ("Surfer SEO", r"\bSurfer SEO\b", "https://surferseo.com/?fp_ref=aitoolshub"),
        ("Grammarly", r"\bGrammarly\b", "https://grammarly.go2cloud.org/aff_c?offer_id=7"),
        ("Canva", r"\bCanva\b", "https://www.canva.com/"),
    ];
    rules
        .into_iter()
        .map(|(name, pattern, url)| AffiliateRule {
            name: name.into(),
            pattern: pattern.into(),
            url: url.into(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pressmill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PressmillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pressmill/pressmill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PressmillError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PressmillError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PressmillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PressmillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PressmillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a collaborator API key from the env var a config section names.
pub fn resolve_api_key(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(PressmillError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("posts_dir"));
        assert!(toml_str.contains("OPENAI_API_KEY"));
        assert!(toml_str.contains("[[affiliates]]"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.homepage_posts, 12);
        assert_eq!(parsed.writer.api_key_env, "OPENAI_API_KEY");
        assert_eq!(parsed.publish.remote, "origin");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[site]
title = "My Blog"
base_url = "https://blog.example.com"

[publish]
remote = "pages"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.site.title, "My Blog");
        assert_eq!(config.site.author, "AI Tools Hub Team");
        assert_eq!(config.publish.remote, "pages");
        assert_eq!(config.publish.branch, "main");
        assert!(!config.affiliates.is_empty());
    }

    #[test]
    fn api_key_resolution_fails_when_unset() {
        // Unique env var name so other tests cannot interfere
        let result = resolve_api_key("PRESSMILL_TEST_NONEXISTENT_KEY_92841");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
