//! Subcommand implementations.
//!
//! Each command wires the changelog scanner, the release store and the site
//! outputs together. Steps run one after another; the first failure aborts
//! the command and is returned to `main`.

use crate::changelog;
use crate::config::SiteConfig;
use crate::models::{Asset, AssetList, Release};
use crate::outputs::docs;
use crate::utils::{ensure_writable_dir, parse_tag, truncate_for_log};
use serde_json::Map;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

/// Tag under which the development docs are published.
pub const DEVELOP_TAG: &str = "develop";

/// Publish `docspath` as the `develop` documentation snapshot.
#[instrument(level = "info", skip_all, fields(docspath = %docspath.display()))]
pub async fn develop(config: &SiteConfig, docspath: &Path) -> Result<(), Box<dyn Error>> {
    ensure_writable_dir(&config.docs_dir).await?;
    docs::update_docs(config, docspath, DEVELOP_TAG).await?;
    info!("Develop documentation updated");
    Ok(())
}

/// Publish release `tag`: store its changelog entry, then snapshot its docs.
///
/// Nothing is written if the changelog has no entry for `tag`.
///
/// # Errors
///
/// Returns an error if the tag is not in the changelog, or on any I/O failure.
#[instrument(level = "info", skip_all, fields(%tag, changelog = %changelog.display()))]
pub async fn release(
    config: &SiteConfig,
    docspath: &Path,
    tag: &str,
    changelog: &Path,
    assets: Vec<Asset>,
) -> Result<(), Box<dyn Error>> {
    parse_tag(tag)?;
    let release = find_or_fail(changelog, tag)?;
    debug!(date = %release.date, changes = %truncate_for_log(&release.changes, 200), "Extracted release");

    let assets: AssetList = assets.into_iter().collect();
    let extra = if assets.is_empty() {
        Map::new()
    } else {
        info!(count = assets.len(), "Attaching assets");
        assets.to_json_map()
    };

    ensure_writable_dir(&config.docs_dir).await?;
    let store = config.store();
    match store.get(tag) {
        Ok(Some(previous)) => {
            info!(previous_date = %previous.date, "Replacing existing release record")
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Replacing unreadable release record"),
    }
    store.add(&release, extra)?;
    docs::update_docs(config, docspath, tag).await?;

    info!(date = %release.date, "Release published");
    Ok(())
}

/// Take release `tag` down: docs snapshot, redirect and release record.
#[instrument(level = "info", skip(config))]
pub async fn remove(config: &SiteConfig, tag: &str) -> Result<(), Box<dyn Error>> {
    parse_tag(tag)?;
    docs::remove_docs(config, tag).await?;
    config.store().remove(tag)?;
    info!("Release removed");
    Ok(())
}

/// Store every release found in the changelog, newest first.
///
/// # Returns
///
/// The number of releases written.
#[instrument(level = "info", skip_all, fields(changelog = %changelog.display()))]
pub fn sync(config: &SiteConfig, changelog: &Path) -> Result<usize, Box<dyn Error>> {
    let store = config.store();
    let mut count = 0;
    for release in changelog::extract_all(changelog)? {
        let release = release?;
        store.add(&release, Map::new())?;
        count += 1;
    }
    info!(count, store = %store.root().display(), "Synced releases from changelog");
    Ok(count)
}

/// Release notes for `tag`, for printing.
pub fn notes(changelog: &Path, tag: &str) -> Result<String, Box<dyn Error>> {
    Ok(find_or_fail(changelog, tag)?.changes)
}

fn find_or_fail(changelog: &Path, tag: &str) -> Result<Release, Box<dyn Error>> {
    match changelog::extract_release(changelog, tag)? {
        Some(release) => Ok(release),
        None => {
            error!(%tag, changelog = %changelog.display(), "Tag not found in changelog");
            Err(format!("could not find {tag} in {}", changelog.display()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetMethod;
    use serde_json::{Value, json};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CHANGELOG: &str = "\
# Changelog

## Unreleased
- work in progress

## [1.0.0] - 2022-10-25
Initial version

## [0.9.0] - 2022-09-01
Beta release
";

    struct Fixture {
        _temp: TempDir,
        config: SiteConfig,
        docs: PathBuf,
        changelog: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let config = SiteConfig::from_root(temp.path().join("site"));
        let docs = temp.path().join("htmldocs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("lib.html"), "docs").unwrap();
        let changelog = temp.path().join("CHANGELOG.md");
        fs::write(&changelog, CHANGELOG).unwrap();
        Fixture {
            _temp: temp,
            config,
            docs,
            changelog,
        }
    }

    #[tokio::test]
    async fn test_develop() {
        let f = fixture();
        develop(&f.config, &f.docs).await.unwrap();
        assert!(f.config.docs_path_of("develop").join("lib.html").exists());
        assert!(f.config.redirect_path_of("develop").exists());
    }

    #[tokio::test]
    async fn test_release_stores_record_and_docs() {
        let f = fixture();
        let assets = vec![Asset::new("linux64", AssetMethod::GithubAsset, "app.tar.gz")];

        release(&f.config, &f.docs, "v1.0.0", &f.changelog, assets).await.unwrap();

        let path = f.config.store().path_of("v1.0.0");
        let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "version": "v1.0.0",
                "date": "2022-10-25",
                "changes": "Initial version",
                "assets": [{"name": "linux64", "github-asset": "app.tar.gz"}]
            })
        );
        assert!(f.config.docs_path_of("v1.0.0").join("lib.html").exists());
        assert!(f.config.redirect_path_of("v1.0.0").exists());
    }

    #[tokio::test]
    async fn test_release_without_assets_has_no_assets_field() {
        let f = fixture();
        release(&f.config, &f.docs, "v0.9.0", &f.changelog, Vec::new()).await.unwrap();

        let path = f.config.store().path_of("v0.9.0");
        let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert!(value.get("assets").is_none());
        assert_eq!(value["changes"], "Beta release");
    }

    #[tokio::test]
    async fn test_release_unknown_tag_writes_nothing() {
        let f = fixture();
        let err = release(&f.config, &f.docs, "v3.0.0", &f.changelog, Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("could not find v3.0.0"));
        assert!(!f.config.releases_dir.exists());
        assert!(!f.config.docs_path_of("v3.0.0").exists());
    }

    #[tokio::test]
    async fn test_remove_after_release() {
        let f = fixture();
        release(&f.config, &f.docs, "v1.0.0", &f.changelog, Vec::new()).await.unwrap();

        remove(&f.config, "v1.0.0").await.unwrap();
        assert_eq!(f.config.store().get("v1.0.0").unwrap(), None);
        assert!(!f.config.docs_path_of("v1.0.0").exists());
        assert!(!f.config.redirect_path_of("v1.0.0").exists());

        remove(&f.config, "v1.0.0").await.unwrap();
    }

    #[tokio::test]
    async fn test_release_overwrites_unreadable_record() {
        let f = fixture();
        let store = f.config.store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.path_of("v1.0.0"), r#"{ "version": "v1.0.0" }"#).unwrap();

        release(&f.config, &f.docs, "v1.0.0", &f.changelog, Vec::new()).await.unwrap();

        let stored = store.get("v1.0.0").unwrap().unwrap();
        assert_eq!(stored.date, "2022-10-25");
        assert_eq!(stored.changes, "Initial version");
    }

    #[tokio::test]
    async fn test_remove_rejects_tags_outside_docs_dir() {
        let f = fixture();
        develop(&f.config, &f.docs).await.unwrap();
        release(&f.config, &f.docs, "v1.0.0", &f.changelog, Vec::new()).await.unwrap();

        for tag in ["", ".", "..", "../site", "v1.0.0/.."] {
            assert!(remove(&f.config, tag).await.is_err(), "tag {tag:?} accepted");
        }

        assert!(f.config.docs_path_of("develop").join("lib.html").exists());
        assert!(f.config.docs_path_of("v1.0.0").join("lib.html").exists());
        assert!(f.config.store().get("v1.0.0").unwrap().is_some());
    }

    #[test]
    fn test_sync_stores_every_release() {
        let f = fixture();
        assert_eq!(sync(&f.config, &f.changelog).unwrap(), 2);

        let store = f.config.store();
        assert_eq!(store.get("v1.0.0").unwrap().unwrap().changes, "Initial version");
        assert_eq!(store.get("v0.9.0").unwrap().unwrap().date, "2022-09-01");
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 2);
    }

    #[test]
    fn test_notes() {
        let f = fixture();
        assert_eq!(notes(&f.changelog, "v0.9.0").unwrap(), "Beta release");
        assert!(notes(&f.changelog, "vUnreleased").is_err());
    }
}
