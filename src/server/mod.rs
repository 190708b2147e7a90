//! Development server
//!
//! Serves the build tree over HTTP with live-reload:
//! - Static files via `tower-http`'s `ServeDir`
//! - Server-Sent Events on [`EVENTS_PATH`]
//! - A small client script on [`CLIENT_PATH`], injected into served HTML
//!
//! Each [`DevServer`] is an independent instance with an explicit
//! start/stop lifecycle.

mod reload;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::{Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::{SitepipeError, SitepipeResult};

pub use reload::{LiveReload, ReloadMessage};

/// SSE endpoint browsers subscribe to
pub const EVENTS_PATH: &str = "/__sitepipe/events";
/// Live-reload client script
pub const CLIENT_PATH: &str = "/__sitepipe/client.js";

const CLIENT_JS: &str = include_str!("client.js");

/// Holds the running server for the lifetime of a dev session
pub type ServerSlot = Arc<tokio::sync::Mutex<Option<DevServer>>>;

/// A running development server
pub struct DevServer {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl std::fmt::Debug for DevServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevServer").field("addr", &self.addr).finish()
    }
}

#[derive(Clone)]
struct AppState {
    reload: LiveReload,
    shutdown: watch::Receiver<bool>,
}

impl DevServer {
    /// Bind and start serving `root`.
    ///
    /// Returns once the listener is bound; port `0` picks an ephemeral port.
    pub async fn start(
        config: &ServerConfig,
        root: impl Into<PathBuf>,
        reload: LiveReload,
    ) -> SitepipeResult<Self> {
        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .map_err(|e| {
                SitepipeError::Server(format!("cannot bind {}:{}: {e}", config.host, config.port))
            })?;
        let addr = listener.local_addr()?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let app = router(root.into(), reload, config.cors, shutdown_rx.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(stopped(shutdown_rx))
                .await
        });

        debug!(%addr, "dev server listening");
        Ok(Self {
            addr,
            shutdown,
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Close live-reload streams and wait for open connections to finish
    pub async fn stop(mut self) -> SitepipeResult<()> {
        let _ = self.shutdown.send(true);
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.await {
            Ok(result) => result.map_err(|e| SitepipeError::Server(e.to_string())),
            Err(e) => Err(SitepipeError::Server(e.to_string())),
        }
    }
}

impl Drop for DevServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn router(root: PathBuf, reload: LiveReload, cors: bool, shutdown: watch::Receiver<bool>) -> Router {
    let app = Router::new()
        .route(EVENTS_PATH, get(events))
        .route(CLIENT_PATH, get(client_script))
        .fallback_service(ServeDir::new(root))
        .layer(middleware::from_fn(inject_client))
        .with_state(AppState { reload, shutdown });

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Resolves once shutdown is requested or the server handle is gone
async fn stopped(mut shutdown: watch::Receiver<bool>) {
    loop {
        let stop = *shutdown.borrow_and_update();
        if stop || shutdown.changed().await.is_err() {
            break;
        }
    }
}

async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("live reload client connected");
    let stream = BroadcastStream::new(state.reload.subscribe())
        .filter_map(|message| async move {
            let message = message.ok()?;
            let data = message.path().unwrap_or("/").to_string();
            Some(Ok(Event::default().event(message.kind()).data(data)))
        })
        .take_until(stopped(state.shutdown));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn client_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        CLIENT_JS,
    )
}

async fn inject_client(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));
    if response.status() != StatusCode::OK || !is_html {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "failed to buffer html response");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let html = inject_script(&bytes);
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Response::from_parts(parts, Body::from(html))
}

/// Insert the client script tag before the last `</body>`, or append it
pub fn inject_script(html: &[u8]) -> Vec<u8> {
    let tag = format!(r#"<script src="{CLIENT_PATH}"></script>"#);
    let needle = b"</body>";
    let position = html
        .windows(needle.len())
        .rposition(|w| w.eq_ignore_ascii_case(needle));

    let mut out = Vec::with_capacity(html.len() + tag.len());
    match position {
        Some(i) => {
            out.extend_from_slice(&html[..i]);
            out.extend_from_slice(tag.as_bytes());
            out.extend_from_slice(&html[i..]);
        }
        None => {
            out.extend_from_slice(html);
            out.extend_from_slice(tag.as_bytes());
        }
    }
    out
}
