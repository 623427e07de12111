//! Site layout configuration.
//!
//! All paths the commands touch are derived from a [`SiteConfig`] built once
//! in `main` and passed down. The defaults match an 11ty site laid out as:
//!
//! ```text
//! site_root/
//! └── src/
//!     ├── docs/<tag>/             # documentation snapshots
//!     ├── pages/docRedirects/     # <tag>.md redirect templates
//!     └── releases/               # <tag>.json release records
//! ```
//!
//! An optional YAML file can override any field:
//!
//! ```yaml
//! docs_dir: public/docs
//! releases_dir: src/_data/releases
//! redirect_layout: layouts/redirect.njk
//! ```

use crate::store::ReleaseStore;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_DOCS_DIR: &str = "src/docs";
const DEFAULT_REDIRECTS_DIR: &str = "src/pages/docRedirects";
const DEFAULT_RELEASES_DIR: &str = "src/releases";
const DEFAULT_REDIRECT_LAYOUT: &str = "layouts/docsRedirect.html";

/// Resolved locations of everything the publisher writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Parent directory of the per-tag documentation snapshots.
    pub docs_dir: PathBuf,
    /// Directory holding the `<tag>.md` redirect templates.
    pub redirects_dir: PathBuf,
    /// Release store directory.
    pub releases_dir: PathBuf,
    /// Layout named in the redirect template's front matter.
    pub redirect_layout: String,
}

/// On-disk form of the config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteConfigFile {
    docs_dir: Option<PathBuf>,
    redirects_dir: Option<PathBuf>,
    releases_dir: Option<PathBuf>,
    redirect_layout: Option<String>,
}

impl SiteConfig {
    /// Default layout under `root`.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            docs_dir: root.join(DEFAULT_DOCS_DIR),
            redirects_dir: root.join(DEFAULT_REDIRECTS_DIR),
            releases_dir: root.join(DEFAULT_RELEASES_DIR),
            redirect_layout: DEFAULT_REDIRECT_LAYOUT.to_string(),
        }
    }

    /// Default layout under `root`, overridden by the YAML file at `config_path`.
    ///
    /// Relative paths in the file are resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config YAML.
    #[instrument(level = "debug", skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(
        root: impl AsRef<Path>,
        config_path: Option<&Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let root = root.as_ref();
        let mut config = Self::from_root(root);
        let Some(config_path) = config_path else {
            return Ok(config);
        };

        let yaml = fs::read_to_string(config_path)
            .map_err(|e| format!("failed to read config {}: {e}", config_path.display()))?;
        let file: SiteConfigFile = if yaml.trim().is_empty() {
            SiteConfigFile::default()
        } else {
            serde_yaml::from_str(&yaml)
                .map_err(|e| format!("invalid config {}: {e}", config_path.display()))?
        };
        debug!(?file, "Loaded site config file");

        if let Some(dir) = file.docs_dir {
            config.docs_dir = root.join(dir);
        }
        if let Some(dir) = file.redirects_dir {
            config.redirects_dir = root.join(dir);
        }
        if let Some(dir) = file.releases_dir {
            config.releases_dir = root.join(dir);
        }
        if let Some(layout) = file.redirect_layout {
            config.redirect_layout = layout;
        }
        Ok(config)
    }

    /// Documentation snapshot directory for `tag`.
    pub fn docs_path_of(&self, tag: &str) -> PathBuf {
        self.docs_dir.join(tag)
    }

    /// Redirect template path for `tag`.
    pub fn redirect_path_of(&self, tag: &str) -> PathBuf {
        self.redirects_dir.join(format!("{tag}.md"))
    }

    pub fn store(&self) -> ReleaseStore {
        ReleaseStore::new(&self.releases_dir)
    }
}
