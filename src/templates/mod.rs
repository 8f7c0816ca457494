//! Page shells for the index and post pages
//!
//! Styling is left to `css/style.css` in the site; these functions only
//! lay out the markup the stylesheet expects.

use crate::config::SiteConfig;
use crate::detail::DetailView;
use crate::helpers::{html_escape, meta_tag};
use crate::i18n::I18n;
use crate::index::{FilterState, IndexView};
use crate::theme::Theme;

/// Head metadata of a page
struct Head<'a> {
    title: &'a str,
    description: &'a str,
    og_title: &'a str,
}

fn layout(
    config: &SiteConfig,
    i18n: &I18n,
    theme: Option<Theme>,
    head: Head<'_>,
    main: &str,
) -> String {
    let theme_attr = theme
        .map(|t| format!(r#" data-theme="{}""#, t))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}"{theme_attr}>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{description}
{og_title}
<link rel="stylesheet" href="css/style.css">
</head>
<body>
<header class="site-header">
  <a class="site-title" href="index.html">{site_title}</a>
  <a id="theme-toggle" class="theme-toggle" href="theme/toggle" title="{toggle}">{toggle}</a>
</header>
<main>
{main}
</main>
</body>
</html>
"#,
        lang = html_escape(&config.language),
        theme_attr = theme_attr,
        title = html_escape(head.title),
        description = meta_tag("description", head.description),
        og_title = meta_tag("og:title", head.og_title),
        site_title = html_escape(&config.title),
        toggle = html_escape(i18n.t("toggle_theme")),
        main = main,
    )
}

/// The post list page
pub fn index_page(
    config: &SiteConfig,
    i18n: &I18n,
    view: &IndexView,
    filter: &FilterState,
    theme: Option<Theme>,
) -> String {
    let tag_input = filter
        .active_tag
        .as_deref()
        .map(|tag| {
            format!(
                r#"<input type="hidden" name="tag" value="{}">"#,
                html_escape(tag)
            )
        })
        .unwrap_or_default();

    let loading = if view.loading {
        format!(r#"<div id="loading">{}</div>"#, html_escape(i18n.t("loading")))
    } else {
        String::new()
    };

    let no_results_style = if view.no_results && !view.loading {
        "block"
    } else {
        "none"
    };

    let main = format!(
        r#"<form class="search" action="index.html" method="get">
  {tag_input}
  <input type="search" id="search-input" name="q" value="{query}" placeholder="{placeholder}" autocomplete="off">
</form>
<nav id="tag-filter" class="tag-filter">{tags}</nav>
{loading}
<div id="posts-container" class="posts">
{cards}
</div>
<div id="no-results" style="display: {no_results_style}">{no_results}</div>"#,
        tag_input = tag_input,
        query = html_escape(&filter.query),
        placeholder = html_escape(i18n.t("search_placeholder")),
        tags = view.tag_filter_html.as_deref().unwrap_or(""),
        loading = loading,
        cards = view.cards_html,
        no_results_style = no_results_style,
        no_results = html_escape(i18n.t("no_results")),
    );

    let head = Head {
        title: &config.title,
        description: &config.description,
        og_title: &config.title,
    };
    layout(config, i18n, theme, head, &main)
}

/// The single post page
pub fn post_page(config: &SiteConfig, i18n: &I18n, view: &DetailView, theme: Option<Theme>) -> String {
    match view {
        DetailView::Post(page) => {
            let date = match (&page.date, &page.date_display) {
                (Some(raw), Some(display)) => format!(
                    r#"<time id="post-date" datetime="{}">{}</time>"#,
                    html_escape(raw),
                    html_escape(display)
                ),
                _ => String::new(),
            };
            let category = page
                .category
                .as_deref()
                .map(|c| format!(r#"<span id="post-category">{}</span>"#, html_escape(c)))
                .unwrap_or_default();
            let comments = page
                .comments_html
                .as_deref()
                .map(|script| format!(r#"<section id="giscus-container">{}</section>"#, script))
                .unwrap_or_default();

            let main = format!(
                r#"<article class="post">
  <h1 id="post-title">{title}</h1>
  <div class="post-meta">{date}{category}</div>
  <div id="post-tags" class="post-tags">{tags}</div>
  <div id="post-content" class="post-content">
{content}
  </div>
</article>
{comments}"#,
                title = html_escape(&page.title),
                date = date,
                category = category,
                tags = page.tags_html,
                content = page.content_html,
                comments = comments,
            );

            let head = Head {
                title: &page.document_title,
                description: page.description.as_deref().unwrap_or(&config.description),
                og_title: &page.og_title,
            };
            layout(config, i18n, theme, head, &main)
        }
        DetailView::NotFound(panel) | DetailView::Error(panel) => {
            let main = format!(
                r#"<article class="post">
  <h1 id="post-title">{}</h1>
  <div id="post-content" class="post-content">
{}
  </div>
</article>"#,
                html_escape(&panel.title),
                panel.html
            );
            let title = format!("{} - {}", panel.title, config.title);
            let head = Head {
                title: &title,
                description: &config.description,
                og_title: &panel.title,
            };
            layout(config, i18n, theme, head, &main)
        }
    }
}
