//! File-per-record JSON store.
//!
//! One file per record at `<posts_dir>/{date}-{slug}.json`. Because the
//! date is a filename prefix, descending filename order approximates
//! reverse-chronological order; that load order is the builder's notion of
//! "most recent". Records are immutable after creation and the published
//! keyword set is recomputed from disk at the start of every run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use pressmill_shared::{PressmillError, Record, Result};

/// Store rooted at a posts directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    posts_dir: PathBuf,
}

impl RecordStore {
    /// Open a store. The directory is created lazily on first save.
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
        }
    }

    /// The directory holding record files.
    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Persist a record as `{date}-{slug}.json`, pretty-printed, written
    /// atomically (temp file + rename). Returns the written path.
    ///
    /// A record for an existing `(date, slug)` pair is a storage error:
    /// records are written exactly once.
    #[instrument(skip_all, fields(keyword = %record.keyword, slug = %record.slug))]
    pub fn save(&self, record: &Record) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.posts_dir)
            .map_err(|e| PressmillError::io(&self.posts_dir, e))?;

        let target = self.posts_dir.join(format!("{}.json", record.file_stem()));
        if target.exists() {
            return Err(PressmillError::Storage(format!(
                "record already exists: {}",
                target.display()
            )));
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| PressmillError::Storage(format!("record serialization: {e}")))?;

        let temp = self.posts_dir.join(format!(".{}.json.tmp", record.file_stem()));
        std::fs::write(&temp, &json).map_err(|e| PressmillError::io(&temp, e))?;
        std::fs::rename(&temp, &target).map_err(|e| PressmillError::io(&target, e))?;

        info!(path = %target.display(), "record saved");
        Ok(target)
    }

    /// Load every record, sorted by filename descending (most recent
    /// first). A file that fails to parse is a storage error — a corrupt
    /// record must not silently vanish from the site.
    #[instrument(skip_all, fields(dir = %self.posts_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<Record>> {
        let mut paths = self.record_paths()?;
        paths.sort();
        paths.reverse();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let content =
                std::fs::read_to_string(&path).map_err(|e| PressmillError::io(&path, e))?;
            let record: Record = serde_json::from_str(&content).map_err(|e| {
                PressmillError::Storage(format!("invalid record {}: {e}", path.display()))
            })?;
            records.push(record);
        }

        debug!(count = records.len(), "records loaded");
        Ok(records)
    }

    /// The set of keywords already published. Recomputed fresh per run,
    /// never cached across runs.
    pub fn published_keywords(&self) -> Result<HashSet<String>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|r| r.keyword)
            .collect())
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.record_paths()?.len())
    }

    fn record_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.posts_dir.exists() {
            debug!(dir = %self.posts_dir.display(), "posts directory missing, treating as empty");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.posts_dir)
            .map_err(|e| PressmillError::io(&self.posts_dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PressmillError::io(&self.posts_dir, e))?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if name.starts_with('.') {
                // leftover temp file from an interrupted run
                warn!(file = %name, "ignoring hidden file in posts directory");
                continue;
            }
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
