//! Full site rebuild.
//!
//! Every build renders the entire tree from the given records and overwrites
//! unconditionally. Rebuilding from the same records produces byte-identical
//! output, so repeated builds are safe and cheap to diff.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use pressmill_shared::{AffiliateRule, PressmillError, Record, Result, SiteConfig};

use crate::links::{MAX_LINK_OCCURRENCES, apply_link_rules};
use crate::templates;

/// Inputs to a build besides the records themselves.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub site: SiteConfig,
    pub affiliates: Vec<AffiliateRule>,
    /// Root of the rendered tree.
    pub output_dir: PathBuf,
    /// Static assets (css/js) copied into `static/`; skipped when absent.
    pub assets_dir: Option<PathBuf>,
    /// Cards shown on the homepage.
    pub homepage_posts: usize,
}

/// What a build produced: page count and a sha256 per artifact, keyed by
/// path relative to the output root.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildReport {
    pub rendered_count: usize,
    pub checksums: BTreeMap<String, String>,
}

/// Render the whole site. Records are expected most-recent-first; the
/// homepage takes them in that order.
#[instrument(skip_all, fields(records = records.len(), output = %options.output_dir.display()))]
pub fn build(records: &[Record], options: &BuildOptions) -> Result<BuildReport> {
    let out = &options.output_dir;
    for dir in ["posts", "static/css", "static/js"] {
        let path = out.join(dir);
        std::fs::create_dir_all(&path).map_err(|e| PressmillError::io(&path, e))?;
    }

    let mut report = BuildReport {
        rendered_count: 0,
        checksums: BTreeMap::new(),
    };

    for record in records {
        let body = apply_link_rules(&record.content, &options.affiliates, MAX_LINK_OCCURRENCES)?;
        let body_html = templates::markdown_to_html(&body);
        let page = templates::render_article(record, &body_html, &options.site, &options.affiliates);
        write_artifact(
            &mut report,
            out,
            &format!("posts/{}.html", record.slug),
            page.as_bytes(),
        )?;
        report.rendered_count += 1;
    }

    let homepage = templates::render_homepage(
        records,
        &options.site,
        &options.affiliates,
        options.homepage_posts,
    );
    write_artifact(&mut report, out, "index.html", homepage.as_bytes())?;

    let sitemap = templates::render_sitemap(records, &options.site);
    write_artifact(&mut report, out, "sitemap.xml", sitemap.as_bytes())?;

    let robots = templates::render_robots(&options.site);
    write_artifact(&mut report, out, "robots.txt", robots.as_bytes())?;

    write_artifact(
        &mut report,
        out,
        "about.html",
        templates::render_about(&options.site).as_bytes(),
    )?;
    write_artifact(
        &mut report,
        out,
        "privacy.html",
        templates::render_privacy(&options.site).as_bytes(),
    )?;
    write_artifact(
        &mut report,
        out,
        "disclaimer.html",
        templates::render_disclaimer(&options.site).as_bytes(),
    )?;

    if let Some(assets) = &options.assets_dir {
        if assets.is_dir() {
            copy_assets(&mut report, assets, out, Path::new("static"))?;
        } else {
            debug!(dir = %assets.display(), "assets directory missing, skipping copy");
        }
    }

    info!(
        pages = report.rendered_count,
        artifacts = report.checksums.len(),
        "site built"
    );
    Ok(report)
}

fn write_artifact(report: &mut BuildReport, root: &Path, rel: &str, bytes: &[u8]) -> Result<()> {
    let path = root.join(rel);
    std::fs::write(&path, bytes).map_err(|e| PressmillError::io(&path, e))?;
    report
        .checksums
        .insert(rel.to_string(), format!("{:x}", Sha256::digest(bytes)));
    Ok(())
}

fn copy_assets(
    report: &mut BuildReport,
    src: &Path,
    out_root: &Path,
    rel: &Path,
) -> Result<()> {
    let entries = std::fs::read_dir(src).map_err(|e| PressmillError::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PressmillError::io(src, e))?;
        let path = entry.path();
        let child_rel = rel.join(entry.file_name());

        if path.is_dir() {
            let target = out_root.join(&child_rel);
            std::fs::create_dir_all(&target).map_err(|e| PressmillError::io(&target, e))?;
            copy_assets(report, &path, out_root, &child_rel)?;
        } else {
            let bytes = std::fs::read(&path).map_err(|e| PressmillError::io(&path, e))?;
            write_artifact(
                report,
                out_root,
                &child_rel.to_string_lossy(),
                &bytes,
            )?;
        }
    }
    Ok(())
}
