//! Front-matter parsing
//!
//! Posts may start with a block of `key: value` lines fenced by `---`.
//! Parsing is line based and forgiving: anything that does not look like
//! a fenced block leaves the whole text as body, and lines without a key
//! are skipped.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FRONT_MATTER_RE: Regex =
        Regex::new(r"^---\n([\s\S]*?)\n---\n?([\s\S]*)$").expect("valid front-matter regex");
}

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(items) => Some(items),
            MetaValue::Text(_) => None,
        }
    }
}

/// Front-matter data from a post, in authored order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, MetaValue>,
}

impl FrontMatter {
    /// Split front-matter from content.
    /// Returns (front_matter, body). Without a fenced block the body is
    /// the original text, untouched.
    pub fn parse(content: &str) -> (Self, String) {
        let normalized = content.replace("\r\n", "\n");

        let Some(caps) = FRONT_MATTER_RE.captures(&normalized) else {
            return (FrontMatter::default(), content.to_string());
        };

        let block = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        let mut fm = FrontMatter::default();
        for line in block.split('\n') {
            let Some(colon) = line.find(':') else {
                continue;
            };
            if colon == 0 {
                continue;
            }

            let key = line[..colon].trim();
            let value = strip_quotes(line[colon + 1..].trim());

            let value = if key == "tags" && value.starts_with('[') && value.ends_with(']') {
                MetaValue::List(parse_list(value))
            } else {
                MetaValue::Text(value.to_string())
            };

            fm.fields.insert(key.to_string(), value);
        }

        (fm, body.to_string())
    }

    /// Text value of a key, if present and not a list
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(MetaValue::as_text)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title").filter(|t| !t.is_empty())
    }

    pub fn date(&self) -> Option<&str> {
        self.text("date").filter(|d| !d.is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.text("category").filter(|c| !c.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description").filter(|d| !d.is_empty())
    }

    /// Tags, only when written as a list literal
    pub fn tags(&self) -> &[String] {
        self.fields
            .get("tags")
            .and_then(MetaValue::as_list)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Remove one pair of matching surrounding quotes
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.starts_with(quote) && value.ends_with(quote) {
            // A lone quote character counts as both ends
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}

/// Parse a `[...]` literal: strict JSON first, then a lenient comma split
fn parse_list(value: &str) -> Vec<String> {
    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(value) {
        return items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
    }

    value[1..value.len() - 1]
        .split(',')
        .map(|item| strip_edge_quotes(item.trim()).to_string())
        .collect()
}

/// Strip at most one quote character from each end, independently
fn strip_edge_quotes(item: &str) -> &str {
    let item = item.strip_prefix(['"', '\'']).unwrap_or(item);
    item.strip_suffix(['"', '\'']).unwrap_or(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_frontmatter() {
        let (fm, body) = FrontMatter::parse("---\ntitle: Hello\ntags: [a, b]\n---\nBody");
        assert_eq!(fm.title(), Some("Hello"));
        assert_eq!(fm.tags(), ["a", "b"]);
        assert_eq!(fm.len(), 2);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter_keeps_original_text() {
        let content = "# Title\r\n\r\nJust a body with key: value";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let content = "---\ntitle: Hello\nno closing fence";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (fm, body) = FrontMatter::parse("---\r\ntitle: Windows\r\n---\r\nLine one\r\nLine two");
        assert_eq!(fm.title(), Some("Windows"));
        assert_eq!(body, "Line one\nLine two");
    }

    #[test]
    fn test_quoted_values_are_unwrapped() {
        let content = "---\ntitle: \"Quoted: with colon\"\ncategory: 'Dev'\n---\n";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Quoted: with colon"));
        assert_eq!(fm.category(), Some("Dev"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_json_tags() {
        let (fm, _) = FrontMatter::parse("---\ntags: [\"rust\", \"web dev\"]\n---\nx");
        assert_eq!(fm.tags(), ["rust", "web dev"]);
    }

    #[test]
    fn test_lenient_tags_fallback() {
        let (fm, _) = FrontMatter::parse("---\ntags: ['rust', \"js\", plain ]\n---\nx");
        assert_eq!(fm.tags(), ["rust", "js", "plain"]);
    }

    #[test]
    fn test_non_list_tags_are_text() {
        let (fm, _) = FrontMatter::parse("---\ntags: rust\n---\nx");
        assert!(fm.tags().is_empty());
        assert_eq!(fm.text("tags"), Some("rust"));
    }

    #[test]
    fn test_lines_without_key_are_ignored() {
        let content = "---\ntitle: Kept\njust some words\n: orphan value\n---\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.title(), Some("Kept"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let (fm, _) = FrontMatter::parse("---\ndate: 2024-01-15 10:30:00\n---\n");
        assert_eq!(fm.date(), Some("2024-01-15 10:30:00"));
    }

    #[test]
    fn test_body_keeps_horizontal_rules() {
        let content = "---\ntitle: Rules\n---\nAbove\n\n---\n\nBelow";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Rules"));
        assert_eq!(body, "Above\n\n---\n\nBelow");
    }
}
