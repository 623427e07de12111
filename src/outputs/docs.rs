//! Documentation snapshots.
//!
//! A snapshot is a full copy of a generated documentation directory stored at
//! `docs_dir/<tag>`. Publishing a tag again replaces the previous snapshot
//! wholesale, so files dropped from the new docs do not linger.

use crate::config::SiteConfig;
use crate::outputs::redirects;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Replace the snapshot for `tag` with a copy of `source` and register its redirect.
///
/// # Errors
///
/// Returns an error if `source` is not a readable directory or if any part of
/// the copy fails. On failure the snapshot may be partially written.
#[instrument(level = "info", skip(config, source), fields(source = %source.display()))]
pub async fn update_docs(config: &SiteConfig, source: &Path, tag: &str) -> io::Result<()> {
    if !fs::metadata(source).await?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", source.display()),
        ));
    }

    let dest = config.docs_path_of(tag);
    remove_tree(&dest).await?;
    fs::create_dir_all(&config.docs_dir).await?;

    let copied = copy_tree(source, &dest).await?;
    info!(dest = %dest.display(), files = copied, "Copied documentation snapshot");

    redirects::add_redirect(config, tag).await
}

/// Delete the snapshot and redirect for `tag`. Missing pieces are ignored.
#[instrument(level = "info", skip(config))]
pub async fn remove_docs(config: &SiteConfig, tag: &str) -> io::Result<()> {
    remove_tree(&config.docs_path_of(tag)).await?;
    redirects::remove_redirect(config, tag).await
}

async fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed existing snapshot");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively copy `source` into `dest`, returning the number of files copied.
async fn copy_tree(source: &Path, dest: &Path) -> io::Result<usize> {
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(source.to_path_buf(), dest.to_path_buf())];
    let mut copied = 0;

    while let Some((from_dir, to_dir)) = pending.pop() {
        fs::create_dir_all(&to_dir).await?;
        let mut entries = fs::read_dir(&from_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let from = entry.path();
            let to = to_dir.join(entry.file_name());
            // Follows symlinks, so linked directories are copied as directories.
            if fs::metadata(&from).await?.is_dir() {
                pending.push((from, to));
            } else {
                fs::copy(&from, &to).await?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}
