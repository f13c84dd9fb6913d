//! # trendline-api: Axum API Service for Trendline
//!
//! Persists burndown projects in a key-value store and serves the
//! single-page app that draws them.
//!
//! ## API Surface
//!
//! | Route                    | Module                   | Purpose                     |
//! |--------------------------|--------------------------|-----------------------------|
//! | `GET/POST/PUT /api/project` | [`routes::project`]   | Read, create, patch         |
//! | `POST /api/progress`     | [`routes::progress`]     | Upsert one day's count      |
//! | `GET /api/burndown`      | [`routes::burndown`]     | Computed burndown report    |
//! | `/health/*`              | this module              | Liveness and readiness      |
//! | `/metrics`               | [`middleware::metrics`]  | Prometheus exposition       |
//! | `/openapi.json`          | [`openapi`]              | Generated OpenAPI spec      |
//! | anything else            | [`routes::spa`]          | Static assets, `index.html` |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware (when enabled) → BodyLimit → Handler
//! ```

pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = if state.config.metrics_enabled {
        match ApiMetrics::new() {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::error!(error = %e, "metrics registry setup failed; /metrics disabled");
                None
            }
        }
    } else {
        None
    };

    let mut router = Router::new()
        .merge(routes::project::router())
        .merge(routes::progress::router())
        .merge(routes::burndown::router())
        .merge(openapi::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if metrics.is_some() {
        router = router.route("/metrics", get(middleware::metrics::metrics_handler));
    }

    let mut router = router
        .fallback(routes::spa::fallback)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    if let Some(metrics) = metrics {
        router = router
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics));
    }

    router
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: 200 once the key-value backend answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.projects.backend().ping().await {
        Ok(()) => "ready".into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
        }
    }
}
