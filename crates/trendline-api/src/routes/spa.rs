//! # Single-Page App Fallback
//!
//! Every request no other route matched ends up here:
//!
//! - `/api/*` answers 404 in the JSON error shape (a bare `/api` does not);
//! - a path whose last segment has a file extension is served from the
//!   static directory;
//! - anything else gets `index.html`, so client-side routes such as
//!   `/p/{projectId}` load the app.
//!
//! Without a configured static directory every fallback answers 404.

use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::AppError;
use crate::state::AppState;

/// Whether the final path segment ends in `.<word characters>`.
pub fn has_file_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rsplit_once('.') {
        Some((_, ext)) => !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Only paths under `/api/` are API routes; a bare `/api` is an app route.
fn is_api_path(path: &str) -> bool {
    path.starts_with("/api/")
}

/// Fallback handler for unmatched routes.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_owned();

    if is_api_path(&path) {
        return AppError::NotFound("Not found".to_string()).into_response();
    }

    let Some(dir) = state.config.static_dir.as_ref() else {
        return AppError::NotFound("Not found".to_string()).into_response();
    };

    let served = if has_file_extension(&path) {
        ServeDir::new(dir).oneshot(request).await
    } else {
        tracing::trace!(%path, "serving app entry point");
        ServeFile::new(dir.join("index.html")).oneshot(request).await
    };

    match served {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
