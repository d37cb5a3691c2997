//! Development server: directory page, static files and live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::config::IndexSourceKind;
use crate::helpers::Location;
use crate::Directory;

/// Live reload script injected into the directory page
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

/// Server state
struct ServerState {
    directory: Directory,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Build the router serving the directory page and the public directory
pub fn router(directory: Directory, live_reload: bool) -> (Router, broadcast::Sender<()>) {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        directory,
        reload_tx: reload_tx.clone(),
        live_reload,
    });

    let app = Router::new()
        .route("/", get(page_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(static_handler)
        .with_state(state);

    (app, reload_tx)
}

/// Start the development server
pub async fn start(
    directory: &Directory,
    ip: &str,
    port: u16,
    watch: bool,
    open: bool,
) -> Result<()> {
    let (app, reload_tx) = router(directory.clone(), watch);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching index for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch && directory.config.source == IndexSourceKind::File {
        let index_path = directory.public_dir.join(directory.config.index_path());

        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_index(index_path, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the index file and tell connected browsers to reload
fn watch_index(index_path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let Some(watch_dir) = index_path.parent().filter(|dir| dir.exists()) else {
        tracing::warn!("Not watching {:?}: directory does not exist", index_path);
        return Ok(());
    };

    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce so a regenerated index triggers one reload
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(watch_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", index_path);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                if !events
                    .iter()
                    .any(|e| e.path.file_name() == index_path.file_name())
                {
                    continue;
                }

                println!("📝 Index changed: {}", index_path.display());
                // No receivers just means no browser is connected
                let _ = reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Render the directory page for the request's query
async fn page_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let location = Location {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
    };
    let directory = state.directory.clone();

    // The index fetch blocks
    let rendered =
        tokio::task::spawn_blocking(move || directory.render_page(&location).0.to_html()).await;

    match rendered {
        Ok(html) if state.live_reload => Html(inject_live_reload(&html)).into_response(),
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
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

/// Serve everything else, index.json included, from the public directory
async fn static_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let mut service =
        ServeDir::new(&state.directory.public_dir).append_index_html_on_directories(true);
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

/// Open a URL in the default browser
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::loader::{HttpSource, IndexLoader, IndexSource, LoadError};
    use std::fs;

    const INDEX: &str = r#"[{"title": "Served", "url": "/served/", "tags": ["net"]}]"#;

    async fn spawn_server(directory: Directory) -> SocketAddr {
        let (app, _) = router(directory, false);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn site() -> (tempfile::TempDir, Directory) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/index.json"), INDEX).unwrap();
        let directory = Directory::new(dir.path()).unwrap();
        (dir, directory)
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.contains("__livereload"));
        assert!(html.ends_with("</body>\n</html>"));
        assert!(inject_live_reload("<p>x</p>").starts_with("<p>x</p>"));
    }

    #[test]
    fn test_watch_index_without_directory_returns() {
        let dir = tempfile::tempdir().unwrap();
        let (reload_tx, _reload_rx) = broadcast::channel(1);
        let index_path = dir.path().join("missing/index.json");
        assert!(watch_index(index_path, reload_tx).is_ok());
    }

    #[test]
    fn test_watch_index_reloads_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index.json");
        fs::write(&index_path, "[]").unwrap();

        let (reload_tx, mut reload_rx) = broadcast::channel(4);
        let watched = index_path.clone();
        std::thread::spawn(move || watch_index(watched, reload_tx));

        std::thread::sleep(Duration::from_millis(300));
        fs::write(&index_path, INDEX).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        loop {
            if reload_rx.try_recv().is_ok() {
                break;
            }
            assert!(std::time::Instant::now() < deadline, "no reload after index change");
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    #[tokio::test]
    async fn test_http_source_against_server() {
        let (_dir, directory) = site();
        let addr = spawn_server(directory).await;

        let posts = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(
                &format!("http://{}/index.json", addr),
                Duration::from_secs(5),
            );
            IndexLoader::new(source, crate::i18n::I18n::default()).load()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title.as_deref(), Some("Served"));
    }

    #[tokio::test]
    async fn test_http_source_reads_index_over_ten_megabytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        let padding = "a".repeat(11 * 1024 * 1024);
        fs::write(
            dir.path().join("public/index.json"),
            format!(r#"[{{"title": "Big", "url": "/big/", "pad": "{}"}}]"#, padding),
        )
        .unwrap();
        let addr = spawn_server(Directory::new(dir.path()).unwrap()).await;

        let posts = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(
                &format!("http://{}/index.json", addr),
                Duration::from_secs(30),
            );
            IndexLoader::new(source, crate::i18n::I18n::default()).load()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].extra["pad"].as_str().map(str::len), Some(padding.len()));
    }

    #[tokio::test]
    async fn test_http_source_missing_index_is_status_error() {
        let dir = tempfile::tempdir().unwrap();
        let directory = Directory::new(dir.path()).unwrap();
        let addr = spawn_server(directory).await;

        let result = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(
                &format!("http://{}/index.json", addr),
                Duration::from_secs(5),
            );
            assert_eq!(source.fetch().unwrap().status, 404);
            IndexLoader::new(source, crate::i18n::I18n::default()).load()
        })
        .await
        .unwrap();

        assert!(matches!(result, Err(LoadError::Status { status: 404 })));
    }

    #[tokio::test]
    async fn test_page_handler_renders_query() {
        let (_dir, directory) = site();
        let addr = spawn_server(directory).await;

        let html = tokio::task::spawn_blocking(move || {
            let mut response = ureq::get(&format!("http://{}/?tag=net", addr))
                .call()
                .unwrap();
            response.body_mut().read_to_string().unwrap()
        })
        .await
        .unwrap();

        assert!(html.contains(r#"<a href="/served/">Served</a>"#));
        assert!(html.contains(r#"<a href="?tag=net" class="tag visible active">net (1)</a>"#));
        assert!(!html.contains("__livereload"));
    }

    #[tokio::test]
    async fn test_http_config_source_through_directory() {
        let (_dir, served) = site();
        let addr = spawn_server(served).await;

        let client_dir = tempfile::tempdir().unwrap();
        let config = WidgetConfig {
            source: IndexSourceKind::Http,
            base_url: format!("http://{}", addr),
            ..WidgetConfig::default()
        };
        let directory = Directory::with_config(client_dir.path(), config).unwrap();

        let (page, result) =
            tokio::task::spawn_blocking(move || directory.render_page(&Location::default()))
                .await
                .unwrap();

        assert_eq!(result.unwrap().len(), 1);
        assert!(page.posts().content().contains("Served"));
    }
}
