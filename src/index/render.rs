//! Post card and tag filter markup

use crate::content::PostSummary;
use crate::helpers::{encode_component, html_escape, long_date, post_url, tag_chips};

/// Render a single post card
pub fn post_card(post: &PostSummary, language: &str) -> String {
    let tags = tag_chips(&post.tags);
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="post-card-tags">{}</div>"#, tags)
    };

    let category = post
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!("<span>· {}</span>", html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<a href="{href}" class="post-card">
  <h2 class="post-card-title">{title}</h2>
  <div class="post-card-meta">
    <time datetime="{datetime}">{date}</time>
    {category}
  </div>
  <p class="post-card-excerpt">{excerpt}</p>
  {tags}
</a>"#,
        href = html_escape(&post_url(&post.file)),
        title = html_escape(&post.title),
        datetime = html_escape(&post.date),
        date = html_escape(&long_date(&post.date, language)),
        category = category,
        excerpt = html_escape(&post.excerpt),
        tags = tags,
    )
}

/// Render the tag filter bar: an "all" control followed by one per tag.
/// Returns `None` when there are no tags at all.
pub fn tag_filter(tags: &[String], active: Option<&str>, all_label: &str) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    let class = |is_active: bool| {
        if is_active {
            "tag-btn active"
        } else {
            "tag-btn"
        }
    };

    let mut html = format!(
        r#"<a class="{}" data-tag="" href="index.html">{}</a>"#,
        class(active.is_none()),
        html_escape(all_label)
    );
    for tag in tags {
        html.push_str(&format!(
            r#"<a class="{}" data-tag="{}" href="index.html?tag={}">{}</a>"#,
            class(active == Some(tag.as_str())),
            html_escape(tag),
            encode_component(tag),
            html_escape(tag)
        ));
    }

    Some(html)
}
