//! Content module - handles posts, the manifest, and markdown processing

mod frontmatter;
pub mod manifest;
mod markdown;
mod post;

pub use frontmatter::{FrontMatter, MetaValue};
pub use markdown::MarkdownRenderer;
pub use post::{PostDocument, PostSummary};
