//! Post detail page: loads one markdown post and prepares everything the
//! page shows about it

use crate::comments;
use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, PostDocument};
use crate::fetch::Fetcher;
use crate::helpers::{html_escape, long_date, tag_chips};
use crate::i18n::I18n;

/// Result of loading a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// No `file` was given
    NotFound(ErrorPanel),
    /// The post could not be fetched
    Error(ErrorPanel),
    Post(Box<PostPage>),
}

impl DetailView {
    /// Title shown in the page heading
    pub fn heading(&self) -> &str {
        match self {
            DetailView::NotFound(panel) | DetailView::Error(panel) => &panel.title,
            DetailView::Post(page) => &page.title,
        }
    }
}

/// Error message with a way back to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub title: String,
    pub message: String,
    pub html: String,
}

/// A rendered post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub file: String,
    pub title: String,
    /// `<title>` of the document
    pub document_title: String,
    /// Raw date as written, for `<time datetime>`
    pub date: Option<String>,
    pub date_display: Option<String>,
    /// `None` hides the category
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub tags_html: String,
    /// Value for `<meta name="description">`
    pub description: Option<String>,
    /// Value for `<meta property="og:title">`
    pub og_title: String,
    pub content_html: String,
    pub comments_html: Option<String>,
}

/// Loads and renders single posts
pub struct PostDetail {
    config: SiteConfig,
    i18n: I18n,
    renderer: MarkdownRenderer,
}

impl PostDetail {
    pub fn new(config: &SiteConfig, i18n: I18n) -> Self {
        Self {
            config: config.clone(),
            i18n,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load the post named by the `file` query parameter
    pub async fn load_post(&self, file: Option<&str>, fetcher: &dyn Fetcher) -> DetailView {
        let Some(file) = file.filter(|f| !f.is_empty()) else {
            return DetailView::NotFound(self.error_panel(self.i18n.t("not_found")));
        };

        let path = format!("{}/{}", self.config.pages_dir.trim_end_matches('/'), file);
        let raw = match fetcher.fetch_text(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Error loading post {}: {}", file, e);
                return DetailView::Error(self.error_panel(self.i18n.t("fetch_failed")));
            }
        };

        DetailView::Post(Box::new(self.render_post(file, &raw)))
    }

    /// Render raw post text fetched for `file`
    pub fn render_post(&self, file: &str, raw: &str) -> PostPage {
        let doc = PostDocument::parse(raw);
        let fm = &doc.front_matter;

        let title = doc.title_or(file);
        let tags = fm.tags().to_vec();

        PostPage {
            file: file.to_string(),
            document_title: format!("{} - {}", title, self.config.title),
            date: fm.date().map(str::to_string),
            date_display: fm.date().map(|d| long_date(d, self.i18n.language())),
            category: fm.category().map(str::to_string),
            tags_html: tag_chips(&tags),
            tags,
            description: fm.description().map(str::to_string),
            og_title: title.clone(),
            content_html: self.renderer.render(&doc.body),
            comments_html: comments::embed_script(&self.config.comments),
            title,
        }
    }

    fn error_panel(&self, message: &str) -> ErrorPanel {
        ErrorPanel {
            title: self.i18n.t("error_title").to_string(),
            message: message.to_string(),
            html: format!(
                r#"<div class="error-message">
  <p>{}</p>
  <a href="index.html">{}</a>
</div>"#,
                html_escape(message),
                html_escape(self.i18n.t("back_to_list"))
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;

    const POST: &str = "---\ntitle: \"Hello <World>\"\ndate: 2024-01-15\ncategory: Dev\ntags: [rust, \"web\"]\ndescription: A first post\n---\n# Intro\n\n```rust\nfn main() {}\n```\n";

    fn detail(language: &str) -> PostDetail {
        let config = SiteConfig {
            title: "My Blog".to_string(),
            language: language.to_string(),
            ..Default::default()
        };
        PostDetail::new(&config, I18n::new(language))
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let detail = detail("en");
        let fetcher = StaticFetcher::new();
        for file in [None, Some("")] {
            match detail.load_post(file, &fetcher).await {
                DetailView::NotFound(panel) => {
                    assert_eq!(panel.message, "Post not found.");
                    assert!(panel.html.contains(r#"href="index.html""#));
                }
                other => panic!("unexpected view: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_shows_error_with_link_back() {
        let detail = detail("ko");
        let view = detail.load_post(Some("gone.md"), &StaticFetcher::new()).await;
        match view {
            DetailView::Error(panel) => {
                assert_eq!(panel.title, "오류");
                assert!(panel.html.contains("게시글을 불러올 수 없습니다."));
                assert!(panel.html.contains("← 목록으로 돌아가기"));
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_metadata_and_body() {
        let detail = detail("en");
        let fetcher = StaticFetcher::new().with("pages/hello.md", POST);
        let DetailView::Post(page) = detail.load_post(Some("hello.md"), &fetcher).await else {
            panic!("expected a post");
        };

        assert_eq!(page.title, "Hello <World>");
        assert_eq!(page.document_title, "Hello <World> - My Blog");
        assert_eq!(page.og_title, "Hello <World>");
        assert_eq!(page.date.as_deref(), Some("2024-01-15"));
        assert_eq!(page.date_display.as_deref(), Some("January 15, 2024"));
        assert_eq!(page.category.as_deref(), Some("Dev"));
        assert_eq!(page.tags, vec!["rust", "web"]);
        assert!(page.tags_html.contains(r#"<span class="post-tag">web</span>"#));
        assert_eq!(page.description.as_deref(), Some("A first post"));
        assert!(page.content_html.contains("<h1>Intro</h1>"));
        assert!(page.content_html.contains("language-rust"));
        assert!(page.comments_html.is_none());
    }

    #[tokio::test]
    async fn test_post_without_front_matter() {
        let detail = detail("en");
        let fetcher = StaticFetcher::new().with("pages/plain-notes.md", "Just *text*.");
        let DetailView::Post(page) = detail.load_post(Some("plain-notes.md"), &fetcher).await
        else {
            panic!("expected a post");
        };

        assert_eq!(page.title, "plain-notes");
        assert!(page.category.is_none());
        assert!(page.date.is_none());
        assert!(page.tags.is_empty());
        assert!(page.description.is_none());
        assert!(page.content_html.contains("<em>text</em>"));
    }

    #[test]
    fn test_comments_embedded_when_enabled() {
        let mut config = SiteConfig::default();
        config.comments.enable = true;
        config.comments.repo = "owner/repo".to_string();
        let detail = PostDetail::new(&config, I18n::new("ko"));

        let page = detail.render_post("a.md", "body");
        assert!(page
            .comments_html
            .unwrap()
            .contains(r#"data-repo="owner/repo""#));
    }
}
