//! Local server: renders the index and post pages, serves everything else
//! from the site directory, and optionally live-reloads on post changes

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header, HeaderMap, HeaderValue, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::detail::PostDetail;
use crate::fetch::FsFetcher;
use crate::templates;
use crate::theme::{MemoryThemeStore, Theme, ThemeController};
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Client hint carrying the OS color scheme
const PREFERS_COLOR_SCHEME: &str = "sec-ch-prefers-color-scheme";

/// Server state
struct ServerState {
    blog: Blog,
    fetcher: FsFetcher,
    detail: PostDetail,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

#[derive(Debug, Deserialize)]
struct IndexParams {
    tag: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostParams {
    file: Option<String>,
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        blog: blog.clone(),
        fetcher: blog.fetcher(),
        detail: blog.post_detail(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        let url = format!("http://{}:{}", ip, port);
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let blog = blog.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(blog, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/post.html", get(post_handler))
        .route("/theme/toggle", get(toggle_theme_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Regenerate the manifest whenever a post changes
async fn watch_and_reload(blog: Blog, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if blog.pages_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.pages_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", blog.pages_dir);
    }

    // The receiver blocks, so run the loop off the async workers
    tokio::task::spawn_blocking(move || {
        // Keep the watcher alive for as long as the loop runs
        let _debouncer = debouncer;
        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    let relevant = events.iter().any(|e| {
                        let path = e.path.to_string_lossy();
                        !path.contains(".DS_Store") && !path.ends_with('~')
                    });
                    if !relevant {
                        continue;
                    }

                    for event in &events {
                        println!("📝 File changed: {}", event.path.display());
                    }

                    match blog.build_manifest() {
                        Ok(count) => {
                            println!("✅ Manifest rebuilt ({} posts)", count);
                            let _ = reload_tx.send(());
                        }
                        Err(e) => println!("❌ Manifest rebuild failed: {}", e),
                    }
                }
                Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
                Err(e) => {
                    tracing::error!("Channel error: {:?}", e);
                    break;
                }
            }
        }
    })
    .await?;

    Ok(())
}

/// Theme for a request: cookie, then the OS client hint, then the default
fn request_theme(blog: &Blog, headers: &HeaderMap) -> ThemeController<MemoryThemeStore> {
    let stored = cookie_value(headers, &blog.config.theme.storage_key);
    let prefers_dark = headers
        .get(PREFERS_COLOR_SCHEME)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_matches('"') == "dark");
    let fallback: Theme = blog.config.theme.default.parse().unwrap_or_default();

    let mut controller =
        ThemeController::new(MemoryThemeStore::with_value(stored.as_deref()), prefers_dark)
            .with_fallback(fallback);
    controller.init();
    controller
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

impl ServerState {
    fn page(&self, html: String) -> Response {
        let html = if self.live_reload {
            inject_live_reload(&html)
        } else {
            html
        };
        let mut response = Html(html).into_response();
        response.headers_mut().insert(
            header::HeaderName::from_static("accept-ch"),
            HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
        );
        response
    }
}

async fn index_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<IndexParams>,
    headers: HeaderMap,
) -> Response {
    let theme = request_theme(&state.blog, &headers).current();

    let mut index = state.blog.post_index();
    index.load_and_render(&state.fetcher).await;
    index.set_filter(params.tag.as_deref(), params.q.as_deref().unwrap_or(""));

    let html = templates::index_page(
        &state.blog.config,
        &state.blog.i18n,
        index.view(),
        index.filter_state(),
        Some(theme),
    );
    state.page(html)
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<PostParams>,
    headers: HeaderMap,
) -> Response {
    let theme = request_theme(&state.blog, &headers).current();

    let view = state
        .detail
        .load_post(params.file.as_deref(), &state.fetcher)
        .await;

    let html = templates::post_page(&state.blog.config, &state.blog.i18n, &view, Some(theme));
    state.page(html)
}

/// Flip the theme, remember it in a cookie, and go back
async fn toggle_theme_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    let mut controller = request_theme(&state.blog, &headers);
    let theme = controller.toggle();
    tracing::debug!("Theme toggled to {}", theme);

    let cookie = format!(
        "{}={}; Path=/; Max-Age=31536000; SameSite=Lax",
        state.blog.config.theme.storage_key,
        controller.store().raw().unwrap_or(theme.as_str())
    );
    let back = redirect_target(&headers);

    let mut response = Redirect::to(&back).into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(e) => tracing::warn!("Invalid theme cookie: {}", e),
    }
    response
}

/// Local path to return to: the Referer's path and query when it points at
/// this site, else `/`
fn redirect_target(headers: &HeaderMap) -> String {
    let Some(referer) = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok())
    else {
        return "/".to_string();
    };

    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let same_origin = match (referer.authority(), host) {
        (Some(authority), Some(host)) => authority.as_str().eq_ignore_ascii_case(host),
        (Some(_), None) => false,
        (None, _) => true,
    };

    referer
        .path_and_query()
        .map(|pq| pq.as_str())
        .filter(|path| same_origin && path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or("/")
        .to_string()
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve `posts.json`, `pages/…`, stylesheets and other files as-is
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service =
        ServeDir::new(&state.blog.base_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open URL in default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
