//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render tag chips
///
/// # Examples
/// ```ignore
/// tag_chips(&["rust".into()]) // -> <span class="post-tag">rust</span>
/// ```
pub fn tag_chips(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!(r#"<span class="post-tag">{}</span>"#, html_escape(tag)))
        .collect()
}

/// Generate a `<meta>` tag, using `property=` for Open Graph keys
pub fn meta_tag(name: &str, content: &str) -> String {
    let attr = if name.starts_with("og:") {
        "property"
    } else {
        "name"
    };
    format!(
        r#"<meta {}="{}" content="{}">"#,
        attr,
        html_escape(name),
        html_escape(content)
    )
}
