//! # Burndown API
//!
//! Serves the engine's report for a stored project so that thin clients
//! can draw the chart without reimplementing the arithmetic.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use trendline_core::{burndown, parse_date, today_utc, BurndownReport};
use utoipa::IntoParams;

use super::{project_not_found, require_project_id};
use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_query;
use crate::state::AppState;

/// Query string for `GET /api/burndown`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BurndownQuery {
    /// Project identifier.
    pub id: Option<String>,
    /// Reference date, `YYYY-MM-DD`. Defaults to the current UTC date.
    pub today: Option<String>,
}

/// Build the burndown router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/burndown", get(get_burndown))
}

/// GET /api/burndown: Compute the burndown report for a project.
#[utoipa::path(
    get,
    path = "/api/burndown",
    params(BurndownQuery),
    responses(
        (status = 200, description = "Burndown report", body = BurndownReport),
        (status = 400, description = "Project ID required or malformed date", body = ErrorBody),
        (status = 404, description = "Project not found", body = ErrorBody),
        (status = 422, description = "Project date range is empty or inverted", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "burndown"
)]
pub(crate) async fn get_burndown(
    State(state): State<AppState>,
    query: Result<Query<BurndownQuery>, QueryRejection>,
) -> Result<Json<BurndownReport>, AppError> {
    let query = extract_query(query)?;
    let id = require_project_id(query.id.as_deref())?;
    let today = match query.today.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today_utc(),
    };

    let project = state
        .projects
        .get(&id)
        .await
        .map_err(AppError::store("Failed to load project"))?
        .ok_or_else(project_not_found)?;

    let report = burndown::compute(&project, today)?;
    tracing::debug!(project_id = %id, %today, status = %report.status, "burndown computed");
    Ok(Json(report))
}
