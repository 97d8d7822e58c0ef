//! Static site rendering.
//!
//! A pure projection from stored records to an HTML tree: article pages,
//! homepage, sitemap, robots.txt, legal pages, and copied assets. The build
//! never mutates records and produces identical bytes for identical input.

mod builder;
mod links;
mod templates;

pub use builder::{BuildOptions, BuildReport, build};
pub use links::{MAX_LINK_OCCURRENCES, apply_link_rules};
pub use templates::{escape_html, markdown_to_html};
