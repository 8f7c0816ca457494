//! Internationalization (i18n) support
//!
//! UI strings ship for Korean and English. A site can override or add
//! strings with `languages/<lang>.yml` (or `.json`) files.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const KO: &[(&str, &str)] = &[
    ("all", "전체"),
    ("no_results", "검색 결과가 없습니다."),
    ("loading", "게시글을 불러오는 중..."),
    ("not_found", "게시글을 찾을 수 없습니다."),
    ("fetch_failed", "게시글을 불러올 수 없습니다."),
    ("error_title", "오류"),
    ("back_to_list", "← 목록으로 돌아가기"),
    ("search_placeholder", "검색 (/)"),
    ("toggle_theme", "테마 전환"),
];

const EN: &[(&str, &str)] = &[
    ("all", "All"),
    ("no_results", "No posts found."),
    ("loading", "Loading posts..."),
    ("not_found", "Post not found."),
    ("fetch_failed", "Could not load the post."),
    ("error_title", "Error"),
    ("back_to_list", "← Back to list"),
    ("search_placeholder", "Search (/)"),
    ("toggle_theme", "Toggle theme"),
];

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, String>>,
}

impl I18n {
    /// Create a new i18n handler with the built-in strings
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, table) in [("ko", KO), ("en", EN)] {
            translations.insert(
                lang.to_string(),
                table
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language files from a directory
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml") | Some("json")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("en")
                .to_string();
            let content = fs::read_to_string(&path)?;

            let parsed: Result<HashMap<String, String>, String> = if ext == Some("json") {
                serde_json::from_str(&content).map_err(|e| e.to_string())
            } else {
                serde_yaml::from_str(&content).map_err(|e| e.to_string())
            };

            match parsed {
                Ok(data) => {
                    self.translations.entry(lang).or_default().extend(data);
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => tracing::warn!("Failed to parse language file {:?}: {}", path, e),
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translate a key: current language, then its base language, then
    /// English, then the key itself
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        let base = self.language.split(['-', '_']).next().unwrap_or("");
        [self.language.as_str(), base, "en"]
            .iter()
            .find_map(|lang| self.translations.get(*lang).and_then(|m| m.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }
}
