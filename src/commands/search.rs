//! Interactive search over the post list
//!
//! Every line read from stdin is treated as the new content of the search
//! box. `:esc` clears it, as Escape does in the browser.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::index::{FilterSink, PostIndex};
use crate::search::{Key, KeyTarget, SearchController};
use crate::Blog;

/// Prints the filtered list whenever the query is applied
struct PrintingSink {
    index: Mutex<PostIndex>,
}

impl FilterSink for PrintingSink {
    fn filter(&self, query: &str) {
        let Ok(mut index) = self.index.lock() else {
            tracing::error!("Post index lock poisoned");
            return;
        };
        index.filter_and_render(query);

        let visible = index.visible();
        println!("─ {:?}: {} post(s)", query, visible.len());
        if visible.is_empty() {
            println!("  {}", index.i18n().t("no_results"));
        }
        for post in visible {
            println!("  {} [{}]", post.title, post.file);
        }
    }
}

/// Read queries from stdin until EOF
pub async fn run(blog: &Blog) -> Result<()> {
    let index = Mutex::new(blog.post_index());
    PostIndex::load_shared(&index, &blog.fetcher()).await;

    let sink = Arc::new(PrintingSink { index });
    let mut search = SearchController::from_config(sink, &blog.config.search);
    search.on_key(Key::Slash, KeyTarget::Other);

    println!("{}", blog.i18n.t("search_placeholder"));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == ":esc" {
            search.on_key(Key::Escape, KeyTarget::SearchBox);
            search.on_key(Key::Slash, KeyTarget::Other);
        } else {
            search.on_input(&line);
        }
    }

    // Let a trailing query fire before exiting
    tokio::time::sleep(std::time::Duration::from_millis(blog.config.search.debounce_ms + 10)).await;
    Ok(())
}
