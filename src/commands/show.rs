//! Render a single post to stdout

use anyhow::Result;

use crate::detail::DetailView;
use crate::Blog;

/// Print a post's metadata and rendered HTML
pub async fn run(blog: &Blog, file: &str) -> Result<()> {
    let detail = blog.post_detail();

    match detail.load_post(Some(file), &blog.fetcher()).await {
        DetailView::Post(page) => {
            println!("{}", page.title);
            if let Some(date) = &page.date_display {
                println!("{}", date);
            }
            if let Some(category) = &page.category {
                println!("· {}", category);
            }
            if !page.tags.is_empty() {
                println!("#{}", page.tags.join(" #"));
            }
            println!();
            println!("{}", page.content_html);
            Ok(())
        }
        DetailView::NotFound(panel) | DetailView::Error(panel) => {
            anyhow::bail!("{}: {}", panel.title, panel.message)
        }
    }
}
