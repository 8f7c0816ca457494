//! Persisted theme preference

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Theme;

/// Theme persistence errors
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

/// Where the chosen theme is remembered
pub trait ThemeStore {
    /// Stored theme; values other than `light`/`dark` read as absent
    fn get(&self) -> Option<Theme>;
    fn set(&mut self, theme: Theme) -> Result<(), ThemeError>;
    fn clear(&mut self) -> Result<(), ThemeError>;
}

/// Raw stored value kept in memory, e.g. seeded from a cookie
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<String>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self) -> Option<Theme> {
        self.value.as_deref().and_then(|v| v.parse().ok())
    }

    fn set(&mut self, theme: Theme) -> Result<(), ThemeError> {
        self.value = Some(theme.as_str().to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ThemeError> {
        self.value = None;
        Ok(())
    }
}

/// Key-value JSON file, one entry per storage key
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
    key: String,
}

impl FileThemeStore {
    pub fn new<P: AsRef<Path>>(path: P, key: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key: key.to_string(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ThemeError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl ThemeStore for FileThemeStore {
    fn get(&self) -> Option<Theme> {
        match self.read_all() {
            Ok(entries) => entries.get(&self.key).and_then(|v| v.parse().ok()),
            Err(e) => {
                tracing::warn!("Failed to read theme storage {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn set(&mut self, theme: Theme) -> Result<(), ThemeError> {
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(self.key.clone(), theme.as_str().to_string());
        self.write_all(&entries)
    }

    fn clear(&mut self) -> Result<(), ThemeError> {
        let mut entries = self.read_all().unwrap_or_default();
        if entries.remove(&self.key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
