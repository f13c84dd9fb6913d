//! # Prometheus Metrics
//!
//! HTTP request counters and latency recorded by middleware into a
//! `prometheus` registry, served in the text exposition format at
//! `GET /metrics`.
//!
//! Requests are labelled by matched route template, never by raw path, so
//! arbitrary SPA paths and project IDs cannot grow label cardinality.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use prometheus::core::Collector;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create the metric families and register them in a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("trendline_http_requests_total", "Total HTTP requests"),
            &["method", "route", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "trendline_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "route"],
        )?;

        let http_errors_total = IntCounterVec::new(
            Opts::new(
                "trendline_http_errors_total",
                "Total HTTP error responses (4xx and 5xx)",
            ),
            &["method", "route", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
            }),
        })
    }

    /// Total request count across all labels.
    pub fn requests(&self) -> u64 {
        counter_total(&self.inner.http_requests_total)
    }

    /// Total 4xx and 5xx count across all labels.
    pub fn errors(&self) -> u64 {
        counter_total(&self.inner.http_errors_total)
    }

    fn record_request(&self, method: &str, route: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, route, &status_str])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration_secs);
        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, route, &status_str])
                .inc();
        }
    }

    /// Gather all families and encode them in the Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.inner.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn counter_total(vec: &IntCounterVec) -> u64 {
    vec.collect()
        .iter()
        .flat_map(|family| family.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

/// Middleware that records request count, latency, and errors.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record_request(
            &method,
            &route,
            response.status().as_u16(),
            start.elapsed().as_secs_f64(),
        );
    }

    response
}

/// GET /metrics: Prometheus text exposition.
pub async fn metrics_handler(Extension(metrics): Extension<ApiMetrics>) -> Response {
    match metrics.gather_and_encode() {
        Ok(body) => (
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metrics_start_at_zero() {
        let m = ApiMetrics::new().unwrap();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn clones_share_the_registry() {
        let m = ApiMetrics::new().unwrap();
        let other = m.clone();
        m.record_request("GET", "/api/project", 200, 0.01);
        m.record_request("GET", "/api/project", 200, 0.01);
        m.record_request("POST", "/api/progress", 200, 0.02);
        assert_eq!(other.requests(), 3);
        assert_eq!(other.errors(), 0);
    }

    #[test]
    fn client_and_server_errors_both_count() {
        let m = ApiMetrics::new().unwrap();
        m.record_request("GET", "/api/project", 404, 0.01);
        m.record_request("GET", "/api/burndown", 500, 0.01);
        m.record_request("GET", "/health/liveness", 200, 0.001);
        assert_eq!(m.requests(), 3);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn encoded_output_uses_exposition_format() {
        let m = ApiMetrics::new().unwrap();
        m.record_request("GET", "/api/project", 400, 0.01);
        let text = m.gather_and_encode().unwrap();
        assert!(text.contains("# TYPE trendline_http_requests_total counter"));
        assert!(text.contains(
            "trendline_http_requests_total{method=\"GET\",route=\"/api/project\",status=\"400\"} 1"
        ));
        assert!(text.contains("# TYPE trendline_http_request_duration_seconds histogram"));
        assert!(text.contains("trendline_http_errors_total{"));
    }
}
