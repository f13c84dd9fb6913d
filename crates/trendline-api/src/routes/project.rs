//! # Project API
//!
//! Create, read, and partially update project records. Every write is a
//! whole-record put; updates read the record, apply the patch, and put it
//! back with no concurrency check.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use trendline_core::{parse_date, MetadataPatch, Project};
use utoipa::{IntoParams, ToSchema};

use super::{present, project_not_found, require_project_id, SuccessBody, MISSING_FIELDS};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_json, extract_query, extract_validated_json, Validate};
use crate::state::AppState;

/// Query string for `GET /api/project`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectQuery {
    /// Project identifier.
    pub id: Option<String>,
}

/// Request to create (or overwrite) a project.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub total_tasks: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Initial per-day progress, keyed by `YYYY-MM-DD`. Defaults to empty.
    #[schema(value_type = Option<Object>)]
    pub daily_progress: Option<BTreeMap<String, i64>>,
    /// Refuse to replace an existing project (409) instead of overwriting it.
    #[serde(default)]
    pub create_only: bool,
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> Result<(), String> {
        if !present(&self.project_id)
            || self.total_tasks.is_none()
            || !present(&self.start_date)
            || !present(&self.end_date)
        {
            return Err(MISSING_FIELDS.to_string());
        }
        Ok(())
    }
}

impl CreateProjectRequest {
    fn into_project(self) -> Result<Project, AppError> {
        let project_id = require_project_id(self.project_id.as_deref())?;
        let total_tasks = self
            .total_tasks
            .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))?;
        let start = parse_date(self.start_date.as_deref().unwrap_or_default())?;
        let end = parse_date(self.end_date.as_deref().unwrap_or_default())?;

        let daily_progress = self
            .daily_progress
            .unwrap_or_default()
            .into_iter()
            .map(|(date, tasks)| Ok((parse_date(&date)?, tasks)))
            .collect::<Result<BTreeMap<_, _>, AppError>>()?;

        let mut project =
            Project::new(project_id, total_tasks, start, end)?.with_progress(daily_progress);
        project.project_name = self.project_name;
        Ok(project)
    }
}

/// Partial metadata update. Only the fields present are changed.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UpdateProjectRequest {
    fn patch(&self) -> Result<MetadataPatch, AppError> {
        let date = |value: &Option<String>| value.as_deref().map(parse_date).transpose();
        Ok(MetadataPatch {
            project_name: self.project_name.clone(),
            start_date: date(&self.start_date)?,
            end_date: date(&self.end_date)?,
        })
    }
}

/// Build the project router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/project",
        get(get_project).post(create_project).put(update_project),
    )
}

/// GET /api/project: Fetch a stored project.
#[utoipa::path(
    get,
    path = "/api/project",
    params(ProjectQuery),
    responses(
        (status = 200, description = "Stored project", body = Project),
        (status = 400, description = "Project ID required", body = ErrorBody),
        (status = 404, description = "Project not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "projects"
)]
pub(crate) async fn get_project(
    State(state): State<AppState>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Result<Json<Project>, AppError> {
    let query = extract_query(query)?;
    let id = require_project_id(query.id.as_deref())?;

    let project = state
        .projects
        .get(&id)
        .await
        .map_err(AppError::store("Failed to load project"))?
        .ok_or_else(project_not_found)?;

    Ok(Json(project))
}

/// POST /api/project: Create a project, overwriting any existing one
/// unless `createOnly` is set.
#[utoipa::path(
    post,
    path = "/api/project",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project stored", body = SuccessBody),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 409, description = "Project already exists (createOnly)", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "projects"
)]
pub(crate) async fn create_project(
    State(state): State<AppState>,
    body: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<Json<SuccessBody>, AppError> {
    let req = extract_validated_json(body)?;
    let create_only = req.create_only;
    let project = req.into_project()?;

    if create_only {
        let inserted = state
            .projects
            .insert_if_absent(&project)
            .await
            .map_err(AppError::store("Failed to create project"))?;
        if !inserted {
            return Err(AppError::Conflict("Project already exists".to_string()));
        }
    } else {
        state
            .projects
            .put(&project)
            .await
            .map_err(AppError::store("Failed to create project"))?;
    }

    tracing::info!(project_id = %project.project_id, create_only, "project created");
    Ok(Json(SuccessBody::ok()))
}

/// PUT /api/project: Patch `projectName`, `startDate`, and/or `endDate`.
#[utoipa::path(
    put,
    path = "/api/project",
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = SuccessBody),
        (status = 400, description = "Project ID required", body = ErrorBody),
        (status = 404, description = "Project not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    tag = "projects"
)]
pub(crate) async fn update_project(
    State(state): State<AppState>,
    body: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> Result<Json<SuccessBody>, AppError> {
    let req = extract_json(body)?;
    let id = require_project_id(req.project_id.as_deref())?;
    let patch = req.patch()?;

    let mut project = state
        .projects
        .get(&id)
        .await
        .map_err(AppError::store("Failed to update project"))?
        .ok_or_else(project_not_found)?;

    project.apply_patch(&patch);

    state
        .projects
        .put(&project)
        .await
        .map_err(AppError::store("Failed to update project"))?;

    tracing::info!(project_id = %id, "project metadata updated");
    Ok(Json(SuccessBody::ok()))
}
