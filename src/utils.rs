//! Small helpers shared by the commands.
//!
//! - Log-friendly truncation of release notes
//! - Output directory validation before anything is copied
//! - Tag validation, since tags become file and directory names

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Check that `tag` is usable as a single path component.
///
/// Rejects empty tags, `.` and `..`, and anything containing a path separator,
/// so a tag can never name the docs directory itself or a path outside it.
///
/// # Errors
///
/// Returns a message describing why the tag was rejected.
pub fn parse_tag(tag: &str) -> Result<String, String> {
    if tag.is_empty() {
        return Err("tag must not be empty".to_string());
    }
    if tag == "." || tag == ".." {
        return Err(format!("'{tag}' is not a valid tag"));
    }
    if tag.contains(['/', '\\']) {
        return Err(format!("tag '{tag}' must not contain path separators"));
    }
    Ok(tag.to_string())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and deletes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
