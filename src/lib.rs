//! devblog: a small personal blog toolkit
//!
//! A blog is a manifest of posts (`posts.json`) plus one markdown file per
//! post under `pages/`. This crate renders the post list with tag and
//! search filtering, renders single posts with their front-matter, keeps
//! the light/dark theme preference, serves the site locally, and publishes
//! it with git.

pub mod commands;
pub mod comments;
pub mod config;
pub mod content;
pub mod detail;
pub mod fetch;
pub mod helpers;
pub mod i18n;
pub mod index;
pub mod search;
pub mod server;
pub mod templates;
pub mod theme;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory (site root, also the git work tree)
    pub base_dir: PathBuf,
    /// Markdown posts directory
    pub pages_dir: PathBuf,
    /// Manifest file
    pub manifest_path: PathBuf,
    /// UI strings for the configured language
    pub i18n: i18n::I18n,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let pages_dir = base_dir.join(&config.pages_dir);
        let manifest_path = base_dir.join(&config.manifest);

        let mut i18n = i18n::I18n::new(&config.language);
        if let Err(e) = i18n.load_languages(base_dir.join(&config.i18n_dir)) {
            tracing::warn!("Failed to load language files: {}", e);
        }

        Self {
            config,
            base_dir,
            pages_dir,
            manifest_path,
            i18n,
        }
    }

    /// Fetcher serving site resources from disk
    pub fn fetcher(&self) -> fetch::FsFetcher {
        fetch::FsFetcher::new(&self.base_dir)
    }

    /// A fresh, unloaded post index
    pub fn post_index(&self) -> index::PostIndex {
        index::PostIndex::new(&self.config, self.i18n.clone())
    }

    /// Loader for single posts
    pub fn post_detail(&self) -> detail::PostDetail {
        detail::PostDetail::new(&self.config, self.i18n.clone())
    }

    /// Theme preference store used by the CLI
    pub fn theme_store(&self) -> theme::FileThemeStore {
        theme::FileThemeStore::new(
            self.base_dir.join(&self.config.theme.store_file),
            &self.config.theme.storage_key,
        )
    }

    /// Regenerate the manifest from the pages directory
    pub fn build_manifest(&self) -> Result<usize> {
        content::manifest::write(&self.pages_dir, &self.manifest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.pages_dir, dir.path().join("pages"));
        assert_eq!(blog.manifest_path, dir.path().join("posts.json"));
        assert_eq!(blog.i18n.language(), "ko");
    }

    #[test]
    fn test_new_reads_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "title: Notes\nlanguage: en\npages_dir: posts\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Notes");
        assert_eq!(blog.pages_dir, dir.path().join("posts"));
        assert_eq!(blog.i18n.t("all"), "All");
    }
}
