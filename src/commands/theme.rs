//! Inspect and change the stored theme preference

use anyhow::Result;

use crate::theme::{Theme, ThemeController};
use crate::Blog;

/// Theme command actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeAction {
    Get,
    Toggle,
    Set(Theme),
    /// The OS preference changed
    OsChange(Theme),
    Reset,
}

/// Run a theme action; `os_prefers_dark` stands in for the OS setting
pub fn run(blog: &Blog, action: ThemeAction, os_prefers_dark: bool) -> Result<Theme> {
    let fallback: Theme = blog.config.theme.default.parse().unwrap_or_default();
    let mut controller =
        ThemeController::new(blog.theme_store(), os_prefers_dark).with_fallback(fallback);
    controller.init();

    let theme = match action {
        ThemeAction::Get => controller.current(),
        ThemeAction::Toggle => controller.toggle(),
        ThemeAction::Set(theme) => {
            controller.apply(theme);
            theme
        }
        ThemeAction::OsChange(theme) => {
            if !controller.on_os_preference_change(theme == Theme::Dark) {
                tracing::info!("Theme was chosen explicitly; ignoring OS preference");
            }
            controller.current()
        }
        ThemeAction::Reset => controller.reset()?,
    };

    println!("{}", theme);
    Ok(theme)
}
