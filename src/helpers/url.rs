//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value for use inside a query string
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Link from the index to a post's detail page
///
/// # Examples
/// ```ignore
/// post_url("my post.md") // -> "post.html?file=my%20post.md"
/// ```
pub fn post_url(file: &str) -> String {
    format!("post.html?file={}", encode_component(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("a b/c?.md"), "a%20b%2Fc%3F.md");
        assert_eq!(encode_component("it's-(ok)~"), "it's-(ok)~");
        assert_eq!(encode_component("한글.md"), "%ED%95%9C%EA%B8%80.md");
    }

    #[test]
    fn test_post_url() {
        assert_eq!(post_url("hello world.md"), "post.html?file=hello%20world.md");
    }
}
