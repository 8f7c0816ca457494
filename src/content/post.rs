//! Post models

use serde::{Deserialize, Serialize};

use super::FrontMatter;

/// One manifest entry, as listed in `posts.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// File name relative to the pages directory
    pub file: String,

    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    /// ISO date string
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Tags in authored order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostSummary {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match over title, excerpt, tags and category.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// A markdown post split into metadata and body
#[derive(Debug, Clone)]
pub struct PostDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

impl PostDocument {
    pub fn parse(raw: &str) -> Self {
        let (front_matter, body) = FrontMatter::parse(raw);
        Self { front_matter, body }
    }

    /// Title from front-matter, else the file name without its `.md` extension
    pub fn title_or(&self, file: &str) -> String {
        match self.front_matter.title() {
            Some(title) => title.to_string(),
            None => file.replacen(".md", "", 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> PostSummary {
        PostSummary {
            file: "hello.md".to_string(),
            title: "Hello Rust".to_string(),
            excerpt: "Ownership explained".to_string(),
            date: "2024-01-15".to_string(),
            category: Some("Programming".to_string()),
            tags: vec!["rust".to_string(), "Memory".to_string()],
        }
    }

    #[test]
    fn test_matches_each_field() {
        let post = summary();
        assert!(post.matches("hello"));
        assert!(post.matches("ownership"));
        assert!(post.matches("memory"));
        assert!(post.matches("program"));
        assert!(!post.matches("python"));
    }

    #[test]
    fn test_has_tag_is_exact() {
        let post = summary();
        assert!(post.has_tag("rust"));
        assert!(!post.has_tag("Rust"));
        assert!(!post.has_tag("rus"));
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let post: PostSummary =
            serde_json::from_str(r#"{"file":"a.md","title":"A","date":"2024-02-01"}"#).unwrap();
        assert_eq!(post.excerpt, "");
        assert!(post.tags.is_empty());
        assert!(post.category.is_none());
    }

    #[test]
    fn test_title_falls_back_to_file_name() {
        let doc = PostDocument::parse("no front matter here");
        assert_eq!(doc.title_or("my-post.md"), "my-post");

        let doc = PostDocument::parse("---\ntitle: Real Title\n---\nbody");
        assert_eq!(doc.title_or("my-post.md"), "Real Title");
    }
}
