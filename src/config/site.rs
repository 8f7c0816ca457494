//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,

    // Content locations, relative to the site root
    pub manifest: String,
    pub pages_dir: String,
    pub i18n_dir: String,

    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "ko".to_string(),
            url: "http://localhost:4000".to_string(),

            manifest: "posts.json".to_string(),
            pages_dir: "pages".to_string(),
            i18n_dir: "languages".to_string(),

            search: SearchConfig::default(),
            theme: ThemeConfig::default(),
            comments: CommentsConfig::default(),
            deploy: DeployConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Search box settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed query is applied
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// Light/dark theme settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Storage key (and cookie name) holding the chosen theme
    pub storage_key: String,
    /// Theme used when neither a stored nor an OS preference exists
    pub default: String,
    /// File used by the CLI to persist the preference, relative to the site root
    pub store_file: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "blog-theme".to_string(),
            default: "light".to_string(),
            store_file: ".devblog/storage.json".to_string(),
        }
    }
}

/// Giscus comment widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    pub repo: String,
    pub repo_id: String,
    pub category: String,
    pub category_id: String,
    pub mapping: String,
    pub strict: bool,
    pub reactions_enabled: bool,
    pub emit_metadata: bool,
    pub input_position: String,
    pub theme: String,
    pub lang: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            repo: String::new(),
            repo_id: String::new(),
            category: "General".to_string(),
            category_id: String::new(),
            mapping: "pathname".to_string(),
            strict: false,
            reactions_enabled: true,
            emit_metadata: false,
            input_position: "bottom".to_string(),
            theme: "preferred_color_scheme".to_string(),
            lang: "ko".to_string(),
        }
    }
}

/// Git deploy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub remote: String,
    pub branch: String,
    pub message_prefix: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            message_prefix: "[blog]".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.manifest, "posts.json");
        assert_eq!(config.pages_dir, "pages");
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.theme.storage_key, "blog-theme");
        assert_eq!(config.deploy.branch, "main");
        assert!(!config.comments.enable);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
title: jaykimdevop's Blog
language: en
comments:
  enable: true
  repo: jaykimdevop/jaykimdevop.github.io
deploy:
  branch: gh-pages
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "jaykimdevop's Blog");
        assert_eq!(config.language, "en");
        assert!(config.comments.enable);
        assert_eq!(config.comments.mapping, "pathname");
        assert_eq!(config.deploy.branch, "gh-pages");
        assert_eq!(config.deploy.remote, "origin");
        assert_eq!(config.search.debounce_ms, 300);
    }
}
