//! Preview server for the generated site

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::Error;
use crate::Stationary;

/// Extension to content type; anything else is served as HTML
const MIME_TYPES: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("html", "text/html"),
    ("js", "application/javascript"),
];

const DEFAULT_MIME_TYPE: &str = "text/html";

/// Server state
struct ServerState {
    public_dir: PathBuf,
}

/// Build the router serving files below `public_dir`
pub fn router(public_dir: impl Into<PathBuf>) -> Router {
    let state = Arc::new(ServerState {
        public_dir: public_dir.into(),
    });

    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the preview server
pub async fn start(site: &Stationary, ip: &str, port: u16) -> Result<()> {
    let app = router(&site.public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {} at http://{}:{}", site.public_dir.display(), ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Map a request path onto a file below `public_dir`.
///
/// `/a/b.css` maps to `<public_dir>/a/b.css` and `/a/` to
/// `<public_dir>/a/index.html`. Paths that would leave `public_dir` map to nothing.
pub fn resolve_path(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    let mut file = public_dir.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => file.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if decoded.ends_with('/') {
        file.push("index.html");
    }
    Some(file)
}

/// Content type for a request path, chosen by its extension
pub fn content_type(request_path: &str) -> &'static str {
    Path::new(request_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Fallback handler that serves every request from the output tree
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
) -> Response {
    let path = uri.path();

    let Some(file_path) = resolve_path(&state.public_dir, path) else {
        tracing::debug!("Refusing path outside the output directory: {}", path);
        return not_found();
    };

    match tokio::fs::read(&file_path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(path))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            let err = Error::NotFound(file_path);
            tracing::warn!("{}: {}", err, e);
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
