//! Shared types, error model, and configuration for Pressmill.
//!
//! This crate is the foundation depended on by all other Pressmill crates.
//! It provides:
//! - [`PressmillError`] — the unified error type
//! - Domain types ([`Topic`], [`Record`], [`ContentType`], [`slugify`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AffiliateRule, AppConfig, DefaultsConfig, PublishConfig, SiteConfig, TopicsConfig,
    WriterConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_api_key,
};
pub use error::{PressmillError, Result};
pub use types::{ContentType, MAX_SLUG_LEN, Record, Topic, slugify};
