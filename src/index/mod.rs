//! Post index: the list of post cards with tag and search filtering
//!
//! A [`PostIndex`] owns everything the list page needs: the loaded
//! manifest, the current [`FilterState`] and the last rendered
//! [`IndexView`]. Input sources drive it through [`PostIndex::set_filter`]
//! or, for plain query updates, the [`FilterSink`] trait.

mod filter;
mod render;
mod sequence;

use std::sync::Mutex;

pub use filter::{all_tags, FilterState};
pub use render::{post_card, tag_filter};
pub use sequence::{LoadSequence, LoadTicket};

use crate::config::SiteConfig;
use crate::content::{manifest, PostSummary};
use crate::fetch::{FetchError, Fetcher};
use crate::i18n::I18n;

/// Receives query updates from an input source such as the search box
pub trait FilterSink: Send + Sync {
    /// Re-filter with `query`, keeping the selected tag
    fn filter(&self, query: &str);
}

/// What the list page currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexView {
    /// True until the first load completes
    pub loading: bool,
    /// Card markup; empty when nothing matches
    pub cards_html: String,
    /// Show the "no results" placeholder instead of cards
    pub no_results: bool,
    /// Tag filter bar; `None` when no post has tags
    pub tag_filter_html: Option<String>,
    /// Number of cards rendered
    pub visible: usize,
}

/// Post list state and renderer
#[derive(Debug)]
pub struct PostIndex {
    manifest_path: String,
    i18n: I18n,
    posts: Vec<PostSummary>,
    filter: FilterState,
    sequence: LoadSequence,
    view: IndexView,
}

impl PostIndex {
    pub fn new(config: &SiteConfig, i18n: I18n) -> Self {
        Self {
            manifest_path: config.manifest.clone(),
            i18n,
            posts: Vec::new(),
            filter: FilterState::default(),
            sequence: LoadSequence::new(),
            view: IndexView {
                loading: true,
                ..Default::default()
            },
        }
    }

    /// Fetch the manifest and render every post plus the tag filter.
    /// A failed fetch renders an empty list. Returns whether the result was
    /// applied (it always is unless another load started meanwhile).
    pub async fn load_and_render(&mut self, fetcher: &dyn Fetcher) -> bool {
        let ticket = self.begin_load();
        let result = fetcher.fetch_text(&self.manifest_path).await;
        self.finish_load(ticket, result)
    }

    /// Like [`load_and_render`](Self::load_and_render) for a shared index;
    /// the lock is not held while fetching.
    pub async fn load_shared(index: &Mutex<PostIndex>, fetcher: &dyn Fetcher) -> bool {
        let (ticket, path) = match index.lock() {
            Ok(mut idx) => (idx.begin_load(), idx.manifest_path.clone()),
            Err(e) => {
                tracing::error!("Post index lock poisoned: {}", e);
                return false;
            }
        };

        let result = fetcher.fetch_text(&path).await;

        match index.lock() {
            Ok(mut idx) => idx.finish_load(ticket, result),
            Err(e) => {
                tracing::error!("Post index lock poisoned: {}", e);
                false
            }
        }
    }

    /// Start a load; any load started earlier becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.sequence.begin()
    }

    /// Apply a finished manifest fetch if `ticket` is still the newest load
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<String, FetchError>) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!("Dropping superseded manifest response {:?}", ticket);
            return false;
        }

        self.posts = match result {
            Ok(json) => match manifest::parse(&json) {
                Ok(posts) => posts,
                Err(e) => {
                    tracing::error!("Error fetching posts: invalid manifest: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::error!("Error fetching posts: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} posts", self.posts.len());

        self.view.loading = false;
        self.render();
        true
    }

    /// Set both filters at once and re-render
    pub fn set_filter(&mut self, tag: Option<&str>, query: &str) {
        self.filter.active_tag = tag.filter(|t| !t.is_empty()).map(str::to_string);
        self.filter.query = query.trim().to_string();
        self.render();
    }

    /// Select a tag (`None` = "all"), keeping the current query
    pub fn select_tag(&mut self, tag: Option<&str>) {
        let query = self.filter.query.clone();
        self.set_filter(tag, &query);
    }

    /// Re-filter with a new query, keeping the selected tag
    pub fn filter_and_render(&mut self, query: &str) {
        let tag = self.filter.active_tag.clone();
        self.set_filter(tag.as_deref(), query);
    }

    fn render(&mut self) {
        let language = self.i18n.language().to_string();
        let visible = self.filter.apply(&self.posts);

        self.view.visible = visible.len();
        self.view.no_results = visible.is_empty();
        self.view.cards_html = visible
            .iter()
            .map(|post| post_card(post, &language))
            .collect::<Vec<_>>()
            .join("\n");
        self.view.tag_filter_html = tag_filter(
            &self.tags(),
            self.filter.active_tag.as_deref(),
            self.i18n.t("all"),
        );
    }

    pub fn view(&self) -> &IndexView {
        &self.view
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    /// Posts matching the current filter
    pub fn visible(&self) -> Vec<&PostSummary> {
        self.filter.apply(&self.posts)
    }

    pub fn tags(&self) -> Vec<String> {
        all_tags(&self.posts)
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }
}

impl FilterSink for Mutex<PostIndex> {
    fn filter(&self, query: &str) {
        match self.lock() {
            Ok(mut index) => index.filter_and_render(query),
            Err(e) => tracing::error!("Post index lock poisoned: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;

    const MANIFEST: &str = r#"[
        {"file": "rust-ownership.md", "title": "Rust Ownership", "excerpt": "Borrowing rules", "date": "2024-03-01", "category": "Programming", "tags": ["rust", "memory"]},
        {"file": "async-rust.md", "title": "Async Rust", "excerpt": "Futures and tasks", "date": "2024-02-01", "tags": ["rust", "async"]},
        {"file": "giscus.md", "title": "Comments with Giscus", "excerpt": "Blog setup notes", "date": "2024-01-01", "category": "Meta", "tags": ["blog"]}
    ]"#;

    fn index() -> PostIndex {
        PostIndex::new(&SiteConfig::default(), I18n::new("en"))
    }

    async fn loaded() -> PostIndex {
        let mut index = index();
        let fetcher = StaticFetcher::new().with("posts.json", MANIFEST);
        assert!(index.load_and_render(&fetcher).await);
        index
    }

    #[tokio::test]
    async fn test_load_renders_all_posts_and_tags() {
        let index = loaded().await;
        let view = index.view();
        assert!(!view.loading);
        assert_eq!(view.visible, 3);
        assert!(!view.no_results);
        assert_eq!(view.cards_html.matches("class=\"post-card\"").count(), 3);
        assert!(view.cards_html.contains("post.html?file=async-rust.md"));

        let tags = view.tag_filter_html.as_deref().unwrap();
        assert_eq!(tags.matches("tag-btn").count(), 5);
        assert!(tags.contains(">All</a>"));
    }

    #[tokio::test]
    async fn test_failed_fetch_renders_nothing() {
        let mut index = index();
        assert!(index.load_and_render(&StaticFetcher::new()).await);
        assert!(index.posts().is_empty());
        assert!(index.view().no_results);
        assert!(index.view().cards_html.is_empty());
        assert!(index.view().tag_filter_html.is_none());
    }

    #[tokio::test]
    async fn test_invalid_manifest_renders_nothing() {
        let mut index = index();
        let fetcher = StaticFetcher::new().with("posts.json", "<html>oops</html>");
        index.load_and_render(&fetcher).await;
        assert!(index.posts().is_empty());
        assert!(!index.view().loading);
    }

    #[tokio::test]
    async fn test_query_then_tag_intersect() {
        let mut index = loaded().await;

        index.filter_and_render("  ASYNC ");
        assert_eq!(index.filter_state().query, "ASYNC");
        assert_eq!(index.view().visible, 1);

        index.select_tag(Some("blog"));
        assert!(index.view().no_results);
        assert!(index.view().cards_html.is_empty());

        index.select_tag(Some("rust"));
        assert_eq!(index.view().visible, 1);

        index.select_tag(None);
        index.filter_and_render("");
        assert_eq!(index.view().visible, 3);
    }

    #[tokio::test]
    async fn test_set_filter_treats_empty_tag_as_all() {
        let mut index = loaded().await;
        index.set_filter(Some("rust"), "");
        assert_eq!(index.view().visible, 2);
        index.set_filter(Some(""), "");
        assert_eq!(index.filter_state().active_tag, None);
        assert_eq!(index.view().visible, 3);
    }

    #[tokio::test]
    async fn test_superseded_load_is_dropped() {
        let mut index = index();
        let stale = index.begin_load();
        let fresh = index.begin_load();

        assert!(index.finish_load(fresh, Ok(MANIFEST.to_string())));
        assert!(!index.finish_load(stale, Ok("[]".to_string())));
        assert_eq!(index.posts().len(), 3);
    }

    #[tokio::test]
    async fn test_filter_sink_on_shared_index() {
        let shared = Mutex::new(index());
        let fetcher = StaticFetcher::new().with("posts.json", MANIFEST);
        assert!(PostIndex::load_shared(&shared, &fetcher).await);

        let sink: &dyn FilterSink = &shared;
        sink.filter("giscus");
        assert_eq!(shared.lock().unwrap().view().visible, 1);
    }
}
