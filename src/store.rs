//! JSON release store read by the static site generator.
//!
//! Each release lives in its own file, named after its tag with `.` replaced
//! by `_`:
//!
//! ```text
//! releases_dir/
//! ├── v1_0_0.json
//! └── v0_9_0.json
//! ```
//!
//! There is no index file and no locking; every operation targets the
//! computed path directly.

use crate::models::Release;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Release records stored as one JSON file per tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStore {
    root: PathBuf,
}

impl ReleaseStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for `tag`, e.g. `v1.0.0` → `<root>/v1_0_0.json`.
    pub fn path_of(&self, tag: &str) -> PathBuf {
        self.root.join(format!("{}.json", tag.replace('.', "_")))
    }

    /// Write `release` to the store, merged with `extra` fields.
    ///
    /// Extra fields are applied after the record fields and win on key
    /// collisions. An existing record for the same tag is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory cannot be created or the file
    /// cannot be written.
    #[instrument(level = "info", skip_all, fields(tag = %release.tag))]
    pub fn add(&self, release: &Release, extra: Map<String, Value>) -> io::Result<()> {
        let mut obj = release.to_json_map()?;
        obj.extend(extra);

        let mut json = serde_json::to_string_pretty(&Value::Object(obj))?;
        json.push('\n');

        fs::create_dir_all(&self.root)?;
        let path = self.path_of(&release.tag);
        fs::write(&path, json)?;
        info!(path = %path.display(), "Wrote release record");
        Ok(())
    }

    /// Delete the record for `tag`. Missing records are ignored.
    #[instrument(level = "info", skip(self))]
    pub fn remove(&self, tag: &str) -> io::Result<()> {
        let path = self.path_of(tag);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed release record");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No release record to remove");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Read the record for `tag` back, ignoring any extra fields.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no record exists for `tag`.
    pub fn get(&self, tag: &str) -> io::Result<Option<Release>> {
        let json = match fs::read_to_string(self.path_of(tag)) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }
}
