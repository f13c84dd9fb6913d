//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trendline API",
        version = "0.1.0",
        description = "Burndown tracking: projects, daily progress, and computed burndown reports.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::project::get_project,
        crate::routes::project::create_project,
        crate::routes::project::update_project,
        crate::routes::progress::upsert_progress,
        crate::routes::burndown::get_burndown,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::SuccessBody,
        crate::routes::project::CreateProjectRequest,
        crate::routes::project::UpdateProjectRequest,
        crate::routes::progress::ProgressRequest,
        trendline_core::Project,
        trendline_core::ProjectId,
        trendline_core::BurndownReport,
        trendline_core::BurndownStatus,
        trendline_core::ChartPoint,
        trendline_core::HistoryEntry,
    )),
    tags(
        (name = "projects", description = "Project records"),
        (name = "progress", description = "Daily progress entries"),
        (name = "burndown", description = "Computed burndown reports"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
