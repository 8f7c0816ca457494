//! Tag and free-text filtering over manifest entries

use std::collections::BTreeSet;

use crate::content::PostSummary;

/// Current filter selection of an index page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected tag; `None` shows every tag ("all")
    pub active_tag: Option<String>,
    /// Last free-text query, already trimmed
    pub query: String,
}

impl FilterState {
    /// Posts passing both the tag and the query filter, in manifest order.
    /// An inactive filter lets everything through.
    pub fn apply<'a>(&self, posts: &'a [PostSummary]) -> Vec<&'a PostSummary> {
        let needle = self.query.to_lowercase();
        posts
            .iter()
            .filter(|post| match &self.active_tag {
                Some(tag) => post.has_tag(tag),
                None => true,
            })
            .filter(|post| needle.is_empty() || post.matches(&needle))
            .collect()
    }
}

/// Sorted, deduplicated tags across all posts
pub fn all_tags(posts: &[PostSummary]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, tags: &[&str], category: Option<&str>) -> PostSummary {
        PostSummary {
            file: format!("{}.md", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            excerpt: format!("About {}", title),
            date: "2024-01-01".to_string(),
            category: category.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn posts() -> Vec<PostSummary> {
        vec![
            post("Rust Ownership", &["rust", "memory"], Some("Programming")),
            post("Async Rust", &["rust", "async"], None),
            post("Giscus Setup", &["blog"], Some("Meta")),
            post("Memory Leaks in JS", &["javascript", "memory"], Some("Programming")),
        ]
    }

    #[test]
    fn test_no_filter_shows_all() {
        let posts = posts();
        assert_eq!(FilterState::default().apply(&posts).len(), posts.len());
    }

    #[test]
    fn test_query_matches_count() {
        let posts = posts();
        let cases = [("rust", 2), ("MEMORY", 2), ("programming", 2), ("setup", 1), ("python", 0)];
        for (query, expected) in cases {
            let state = FilterState {
                active_tag: None,
                query: query.to_string(),
            };
            assert_eq!(state.apply(&posts).len(), expected, "query {:?}", query);
        }
    }

    #[test]
    fn test_tag_and_query_intersect() {
        let posts = posts();
        let state = FilterState {
            active_tag: Some("memory".to_string()),
            query: "rust".to_string(),
        };
        let visible = state.apply(&posts);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Rust Ownership");
    }

    #[test]
    fn test_tag_match_is_exact() {
        let posts = posts();
        let state = FilterState {
            active_tag: Some("mem".to_string()),
            query: String::new(),
        };
        assert!(state.apply(&posts).is_empty());
    }

    #[test]
    fn test_all_tags_sorted_and_unique() {
        assert_eq!(
            all_tags(&posts()),
            vec!["async", "blog", "javascript", "memory", "rust"]
        );
        assert!(all_tags(&[]).is_empty());
    }
}
