//! External generation collaborators.
//!
//! One wire client ([`ChatClient`]) and two roles built on it: the article
//! writer that turns a topic into a record, and the dynamic topic source
//! that backfills when the static catalog runs dry. All calls are bounded
//! by a timeout and never retried.

mod client;
mod topics;
mod writer;

pub use client::{ChatClient, ChatClientOptions};
pub use topics::DynamicTopicSource;
pub use writer::{ArticleWriter, ChatWriter};
