//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every error response is a JSON object with a single `error` field.
//!
//! Store failures never expose the underlying cause. The response carries
//! a fixed, operation-specific message and the cause goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trendline_core::{BurndownError, ValidationError};
use utoipa::ToSchema;

use crate::store::StoreError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or invalid (400).
    #[error("{0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeds the configured limit (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// No project under the requested ID (404).
    #[error("{0}")]
    NotFound(String),

    /// Create-only write collided with an existing project (409).
    #[error("{0}")]
    Conflict(String),

    /// The stored record cannot produce a burndown (422).
    #[error("{0}")]
    Unprocessable(String),

    /// The key-value backend failed (500). Only `message` reaches the client.
    #[error("{message}")]
    Store {
        /// Client-facing description of the failed operation.
        message: &'static str,
        /// Underlying cause, logged only.
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Adapter for `map_err` that wraps a [`StoreError`] under a fixed message.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    /// Return the HTTP status code and log label for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_RANGE"),
            Self::Store { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_FAILURE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            Self::Store { message, source } => {
                tracing::error!(code, error = %source, "{}", message);
            }
            other => {
                tracing::debug!(code, error = %other, "request rejected");
            }
        }

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert core validation errors to API errors.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convert engine errors to API errors.
impl From<BurndownError> for AppError {
    fn from(err: BurndownError) -> Self {
        match err {
            BurndownError::InvalidRange { .. } | BurndownError::RangeTooLong { .. } => {
                Self::Unprocessable(err.to_string())
            }
        }
    }
}
