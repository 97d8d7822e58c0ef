//! Publish step: commit and push the rendered tree.
//!
//! Publish failures never fail the run. The build already landed on disk;
//! a missing remote or a rejected push is logged and the next run will
//! pick the changes up.

use std::path::Path;
use std::process::Command;

use chrono::Utc;
use tracing::{info, instrument, warn};

use pressmill_shared::{PublishConfig, Result};

/// Commit everything under `output_dir` and push to the configured remote.
///
/// Returns `Ok(true)` on a successful push, `Ok(false)` when publishing was
/// skipped or failed non-fatally. Only spawning `git` itself is an error
/// path that reaches the caller as `Ok(false)` too; the run never aborts
/// here.
#[instrument(skip_all, fields(dir = %output_dir.display(), remote = %config.remote))]
pub fn publish(output_dir: &Path, config: &PublishConfig) -> Result<bool> {
    if !remote_configured(output_dir, &config.remote) {
        warn!(remote = %config.remote, "git remote not configured, skipping publish");
        return Ok(false);
    }

    let message = format!("Auto-publish: new article {}", Utc::now().date_naive());
    let steps: [&[&str]; 3] = [
        &["add", "."],
        &["commit", "-m", &message],
        &["push", &config.remote, &config.branch],
    ];

    for args in steps {
        match Command::new("git").args(args).current_dir(output_dir).output() {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    step = args[0],
                    status = %output.status,
                    stderr = %stderr.trim(),
                    "git step failed, publish skipped"
                );
                return Ok(false);
            }
            Err(e) => {
                warn!(step = args[0], error = %e, "could not run git, publish skipped");
                return Ok(false);
            }
        }
    }

    info!(remote = %config.remote, branch = %config.branch, "site published");
    Ok(true)
}

fn remote_configured(output_dir: &Path, remote: &str) -> bool {
    match Command::new("git")
        .args(["remote"])
        .current_dir(output_dir)
        .output()
    {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.trim() == remote),
        _ => false,
    }
}
