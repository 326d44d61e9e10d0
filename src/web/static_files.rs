//! Embedded asset serving.
//!
//! The client script and base stylesheet are embedded into the binary at
//! compile time from the `assets` directory and served under `/assets`.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

/// Assets embedded from the `assets` directory.
#[derive(Embed)]
#[folder = "assets"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.svg"]
#[include = "*.png"]
#[include = "*.ico"]
pub struct StaticAssets;

/// GET /assets/{*path} - Serves an embedded asset.
pub async fn serve_asset(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match StaticAssets::get(path) {
        Some(content) => file_response(path, content.data.as_ref()),
        None => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

/// Creates an HTTP response for a file with appropriate content type.
fn file_response(path: &str, content: &[u8]) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, cache_control_for_path(path))
        .body(Body::from(content.to_vec()))
        .unwrap_or_else(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create response",
            )
                .into_response()
        })
}

/// Returns the Cache-Control header for an asset.
///
/// Script and stylesheet change with the binary, so they are revalidated;
/// images get a short cache.
fn cache_control_for_path(path: &str) -> &'static str {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    if ext.eq_ignore_ascii_case("js") || ext.eq_ignore_ascii_case("css") {
        "no-cache, must-revalidate"
    } else {
        "public, max-age=3600"
    }
}

/// Returns true if the client script was embedded.
#[must_use]
pub fn has_embedded_assets() -> bool {
    StaticAssets::get("app.js").is_some()
}
