//! Light/dark theme handling
//!
//! The theme is resolved in order: stored preference, OS preference,
//! then light. Applying a theme marks the document, persists the choice and
//! tells an attached comment frame to follow along. OS preference changes
//! only take effect while nothing has been stored.

mod store;

use std::fmt;
use std::str::FromStr;

pub use store::{FileThemeStore, MemoryThemeStore, ThemeError, ThemeStore};

use crate::comments::{self, CommentFrame};

/// Site color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Theme matching an OS `prefers-color-scheme: dark` flag
    pub fn from_prefers_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeError::UnknownTheme(other.to_string())),
        }
    }
}

/// Theme state for one document
pub struct ThemeController<S: ThemeStore> {
    store: S,
    os_prefers_dark: bool,
    fallback: Theme,
    /// The document's `data-theme` attribute
    document_theme: Option<Theme>,
    frame: Option<Box<dyn CommentFrame>>,
}

impl<S: ThemeStore> ThemeController<S> {
    pub fn new(store: S, os_prefers_dark: bool) -> Self {
        Self {
            store,
            os_prefers_dark,
            fallback: Theme::Light,
            document_theme: None,
            frame: None,
        }
    }

    /// Theme used when neither a stored nor an OS preference applies
    pub fn with_fallback(mut self, fallback: Theme) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn attach_frame(&mut self, frame: Box<dyn CommentFrame>) {
        self.frame = Some(frame);
    }

    /// Stored preference, else OS preference, else the fallback
    pub fn preferred(&self) -> Theme {
        if let Some(theme) = self.store.get() {
            return theme;
        }
        if self.os_prefers_dark {
            return Theme::Dark;
        }
        self.fallback
    }

    /// Mark the document with the preferred theme without storing it
    pub fn init(&mut self) -> Theme {
        let theme = self.preferred();
        self.document_theme = Some(theme);
        tracing::debug!("Initial theme: {}", theme);
        theme
    }

    /// Mark the document, persist, and notify the comment frame
    pub fn apply(&mut self, theme: Theme) {
        if let Err(e) = self.store.set(theme) {
            tracing::warn!("Failed to persist theme {}: {}", theme, e);
        }
        self.show(theme);
        tracing::debug!("Applied theme: {}", theme);
    }

    /// Mark the document and notify the comment frame, without persisting
    fn show(&mut self, theme: Theme) {
        self.document_theme = Some(theme);
        if let Some(frame) = &self.frame {
            frame.post_message(&comments::set_theme_message(theme), comments::GISCUS_ORIGIN);
        }
    }

    /// Flip the document theme; an unmarked document counts as light
    pub fn toggle(&mut self) -> Theme {
        let theme = self.current().toggled();
        self.apply(theme);
        theme
    }

    /// React to an OS preference change. Follows the OS only while no
    /// theme is stored, and does not store it; returns whether it followed.
    pub fn on_os_preference_change(&mut self, prefers_dark: bool) -> bool {
        self.os_prefers_dark = prefers_dark;
        if self.store.get().is_some() {
            return false;
        }
        self.show(Theme::from_prefers_dark(prefers_dark));
        true
    }

    /// Forget the stored preference
    pub fn reset(&mut self) -> Result<Theme, ThemeError> {
        self.store.clear()?;
        Ok(self.init())
    }

    /// Current document theme
    pub fn current(&self) -> Theme {
        self.document_theme.unwrap_or(Theme::Light)
    }

    pub fn document_theme(&self) -> Option<Theme> {
        self.document_theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
