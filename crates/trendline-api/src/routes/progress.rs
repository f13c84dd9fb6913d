//! # Progress API
//!
//! Upsert of one day's completed-task count. The date is not checked
//! against the project's timeline or the current day; callers apply
//! those guards before submitting.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use trendline_core::parse_date;
use utoipa::ToSchema;

use super::{present, project_not_found, require_project_id, SuccessBody, MISSING_FIELDS};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Set the tasks completed on one date.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub project_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Tasks completed that day. Zero counts as present; `null` does not.
    pub tasks_completed: Option<i64>,
}

impl Validate for ProgressRequest {
    fn validate(&self) -> Result<(), String> {
        if !present(&self.project_id) || !present(&self.date) || self.tasks_completed.is_none() {
            return Err(MISSING_FIELDS.to_string());
        }
        Ok(())
    }
}

/// Build the progress router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/progress", post(upsert_progress))
}

/// POST /api/progress: Record the tasks completed on a date, replacing any
/// earlier value for that date.
#[utoipa::path(
    post,
    path = "/api/progress",
    request_body = ProgressRequest,
    responses(
        (status = 200, description = "Progress recorded", body = SuccessBody),
        (status = 400, description = "Missing required fields", body = ErrorBody),
        (status = 404, description = "Project not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "progress"
)]
pub(crate) async fn upsert_progress(
    State(state): State<AppState>,
    body: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<SuccessBody>, AppError> {
    let req = extract_validated_json(body)?;
    let id = require_project_id(req.project_id.as_deref())?;
    let date = parse_date(req.date.as_deref().unwrap_or_default())?;
    let tasks = req
        .tasks_completed
        .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))?;

    let mut project = state
        .projects
        .get(&id)
        .await
        .map_err(AppError::store("Failed to update progress"))?
        .ok_or_else(project_not_found)?;

    let previous = project.record_progress(date, tasks);

    state
        .projects
        .put(&project)
        .await
        .map_err(AppError::store("Failed to update progress"))?;

    tracing::info!(project_id = %id, %date, tasks, ?previous, "progress recorded");
    Ok(Json(SuccessBody::ok()))
}
