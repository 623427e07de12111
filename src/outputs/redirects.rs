//! Redirect templates for documentation snapshots.
//!
//! Generated API docs have no `index.html` of their own, so each snapshot gets
//! a front-matter-only page that the site layout turns into a redirect:
//!
//! ```text
//! ---
//! layout: layouts/docsRedirect.html
//! permalink: /docs/v1.0.0/
//! ---
//! ```

use crate::config::SiteConfig;
use std::io;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Render the redirect template for `tag`.
pub fn redirect_template(layout: &str, tag: &str) -> String {
    format!("---\nlayout: {layout}\npermalink: /docs/{tag}/\n---\n")
}

/// Write the redirect template for `tag`, creating the redirects directory if needed.
#[instrument(level = "info", skip(config))]
pub async fn add_redirect(config: &SiteConfig, tag: &str) -> io::Result<()> {
    fs::create_dir_all(&config.redirects_dir).await?;
    let path = config.redirect_path_of(tag);
    fs::write(&path, redirect_template(&config.redirect_layout, tag)).await?;
    info!(path = %path.display(), "Wrote redirect template");
    Ok(())
}

/// Delete the redirect template for `tag`, if any.
#[instrument(level = "info", skip(config))]
pub async fn remove_redirect(config: &SiteConfig, tag: &str) -> io::Result<()> {
    let path = config.redirect_path_of(tag);
    match fs::remove_file(&path).await {
        Ok(()) => {
            info!(path = %path.display(), "Removed redirect template");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No redirect template to remove");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_redirect_template() {
        assert_eq!(
            redirect_template("layouts/docsRedirect.html", "v0.1.1"),
            "---\nlayout: layouts/docsRedirect.html\npermalink: /docs/v0.1.1/\n---\n"
        );
    }

    #[tokio::test]
    async fn test_add_and_remove_redirect() {
        let temp = TempDir::new().unwrap();
        let config = SiteConfig::from_root(temp.path());

        add_redirect(&config, "develop").await.unwrap();
        let written = std::fs::read_to_string(config.redirect_path_of("develop")).unwrap();
        assert!(written.contains("permalink: /docs/develop/"));

        remove_redirect(&config, "develop").await.unwrap();
        assert!(!config.redirect_path_of("develop").exists());
        remove_redirect(&config, "develop").await.unwrap();
    }
}
