//! Post manifest (`posts.json`): parsing and generation from the pages directory

use anyhow::Result;
use chrono::{DateTime, Local};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{PostDocument, PostSummary};

/// Longest generated excerpt, in characters
const EXCERPT_LENGTH: usize = 160;

/// Parse manifest JSON
pub fn parse(json: &str) -> serde_json::Result<Vec<PostSummary>> {
    serde_json::from_str(json)
}

/// Build manifest entries from every markdown file under `pages_dir`,
/// newest first
pub fn build(pages_dir: &Path) -> Result<Vec<PostSummary>> {
    if !pages_dir.exists() {
        tracing::warn!("Pages directory {:?} does not exist", pages_dir);
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();

    for entry in WalkDir::new(pages_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_markdown_file(path) {
            continue;
        }

        match summarize(pages_dir, path) {
            Ok(post) => posts.push(post),
            Err(e) => tracing::warn!("Failed to read post {:?}: {}", path, e),
        }
    }

    // ISO dates sort lexically
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(posts)
}

/// Build and write the manifest, returning the number of posts
pub fn write(pages_dir: &Path, manifest_path: &Path) -> Result<usize> {
    let posts = build(pages_dir)?;
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(manifest_path, serde_json::to_string_pretty(&posts)?)?;
    tracing::info!("Wrote {} posts to {:?}", posts.len(), manifest_path);
    Ok(posts.len())
}

fn summarize(pages_dir: &Path, path: &Path) -> Result<PostSummary> {
    let raw = fs::read_to_string(path)?;
    let doc = PostDocument::parse(&raw);
    let fm = &doc.front_matter;

    let file = path
        .strip_prefix(pages_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");

    let date = match fm.date() {
        Some(date) => date.to_string(),
        None => {
            let modified = fs::metadata(path)?.modified()?;
            DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string()
        }
    };

    let excerpt = match fm.description() {
        Some(description) => description.to_string(),
        None => excerpt_from_markdown(&doc.body),
    };

    // Untitled posts are named after the file itself, not its directory
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.clone());

    Ok(PostSummary {
        title: doc.title_or(&name),
        file,
        excerpt,
        date,
        category: fm.category().map(str::to_string),
        tags: fm.tags().to_vec(),
    })
}

/// Plain text of the first paragraph, truncated
pub fn excerpt_from_markdown(body: &str) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) => {
                if !text.trim().is_empty() {
                    break;
                }
                in_paragraph = false;
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim();
    if text.chars().count() <= EXCERPT_LENGTH {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(EXCERPT_LENGTH - 3).collect();
        format!("{}...", truncated.trim_end())
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "md" | "markdown"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_manifest() {
        let json = r#"[
            {"file": "a.md", "title": "A", "excerpt": "first", "date": "2024-01-01", "tags": ["x"]},
            {"file": "b.md", "title": "B", "excerpt": "second", "date": "2024-02-01", "category": "Dev", "tags": []}
        ]"#;
        let posts = parse(json).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].category.as_deref(), Some("Dev"));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse(r#"{"file": "a.md"}"#).is_err());
    }

    #[test]
    fn test_excerpt_skips_headings_and_strips_markup() {
        let body = "# Heading\n\nSome *emphasis* and `code`\nacross lines.\n\nSecond paragraph.";
        assert_eq!(
            excerpt_from_markdown(body),
            "Some emphasis and code across lines."
        );
    }

    #[test]
    fn test_excerpt_truncates() {
        let body = "word ".repeat(100);
        let excerpt = excerpt_from_markdown(&body);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_LENGTH);
    }

    #[test]
    fn test_build_from_pages_dir() {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir_all(pages.join("nested")).unwrap();
        fs::write(
            pages.join("older.md"),
            "---\ntitle: Older\ndate: 2024-01-01\ncategory: Dev\ntags: [rust, web]\n---\nOld body.",
        )
        .unwrap();
        fs::write(
            pages.join("nested/newer.md"),
            "---\ntitle: Newer\ndate: 2024-03-01\ndescription: Custom excerpt\n---\nNew body.",
        )
        .unwrap();
        fs::write(pages.join("notes.txt"), "not a post").unwrap();

        let posts = build(&pages).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].file, "nested/newer.md");
        assert_eq!(posts[0].excerpt, "Custom excerpt");
        assert_eq!(posts[1].title, "Older");
        assert_eq!(posts[1].tags, vec!["rust", "web"]);
        assert_eq!(posts[1].excerpt, "Old body.");

        let manifest_path = dir.path().join("posts.json");
        assert_eq!(write(&pages, &manifest_path).unwrap(), 2);
        let written = parse(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        assert_eq!(written, posts);
    }

    #[test]
    fn test_build_without_front_matter_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("untitled-note.md"), "Just text.").unwrap();

        let posts = build(dir.path()).unwrap();
        assert_eq!(posts[0].title, "untitled-note");
        assert_eq!(posts[0].date.len(), 10);
    }

    #[test]
    fn test_nested_untitled_post_uses_file_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("2024/rust")).unwrap();
        fs::write(dir.path().join("2024/rust/borrowing.md"), "Borrow checker notes.").unwrap();

        let posts = build(dir.path()).unwrap();
        assert_eq!(posts[0].file, "2024/rust/borrowing.md");
        assert_eq!(posts[0].title, "borrowing");
    }
}
