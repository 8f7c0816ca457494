//! List posts or tags from the manifest

use anyhow::Result;

use crate::helpers::long_date;
use crate::Blog;

/// List site content by type, optionally filtered like the index page
pub async fn run(blog: &Blog, content_type: &str, tag: Option<&str>, query: &str) -> Result<()> {
    let mut index = blog.post_index();
    index.load_and_render(&blog.fetcher()).await;

    match content_type {
        "post" | "posts" => {
            index.set_filter(tag, query);
            let visible = index.visible();
            if visible.is_empty() {
                println!("{}", blog.i18n.t("no_results"));
                return Ok(());
            }
            println!("Posts ({}/{}):", visible.len(), index.posts().len());
            for post in visible {
                println!(
                    "  {} - {} [{}]",
                    long_date(&post.date, &blog.config.language),
                    post.title,
                    post.file
                );
            }
        }
        "tag" | "tags" => {
            let posts = index.posts();
            let tags = index.tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                let count = posts.iter().filter(|p| p.has_tag(&tag)).count();
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}
