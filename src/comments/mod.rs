//! Giscus comment widget: embed markup and runtime theme messages

use serde_json::{json, Value};

use crate::config::CommentsConfig;
use crate::helpers::html_escape;
use crate::theme::Theme;

/// Origin the widget iframe is served from
pub const GISCUS_ORIGIN: &str = "https://giscus.app";

const CLIENT_SCRIPT: &str = "https://giscus.app/client.js";

/// An embedded comment frame that accepts cross-origin messages
pub trait CommentFrame {
    fn post_message(&self, message: &Value, target_origin: &str);
}

/// Message switching the widget's theme at runtime
pub fn set_theme_message(theme: Theme) -> Value {
    json!({ "giscus": { "setConfig": { "theme": theme.as_str() } } })
}

/// The `<script>` tag that loads the widget, or `None` when comments are off
pub fn embed_script(config: &CommentsConfig) -> Option<String> {
    if !config.enable {
        return None;
    }
    if config.repo.is_empty() {
        tracing::warn!("Comments enabled but no repository configured");
        return None;
    }

    let flag = |b: bool| if b { "1" } else { "0" };
    let attrs = [
        ("data-repo", config.repo.as_str()),
        ("data-repo-id", config.repo_id.as_str()),
        ("data-category", config.category.as_str()),
        ("data-category-id", config.category_id.as_str()),
        ("data-mapping", config.mapping.as_str()),
        ("data-strict", flag(config.strict)),
        ("data-reactions-enabled", flag(config.reactions_enabled)),
        ("data-emit-metadata", flag(config.emit_metadata)),
        ("data-input-position", config.input_position.as_str()),
        ("data-theme", config.theme.as_str()),
        ("data-lang", config.lang.as_str()),
    ];

    let attrs: String = attrs
        .iter()
        .map(|(name, value)| format!(r#" {}="{}""#, name, html_escape(value)))
        .collect();

    Some(format!(
        r#"<script src="{}"{} crossorigin="anonymous" async></script>"#,
        CLIENT_SCRIPT, attrs
    ))
}
