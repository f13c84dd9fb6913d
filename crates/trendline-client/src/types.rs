//! Request bodies for the Trendline API.
//!
//! Dates serialize as `YYYY-MM-DD`; field names are camelCase to match the
//! server's JSON contract.

use chrono::NaiveDate;
use serde::Serialize;
use trendline_core::{MetadataPatch, Project, ProjectId};

/// Body of `POST /api/project`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub total_tasks: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Ask the server to refuse (409) rather than overwrite an existing project.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub create_only: bool,
}

impl From<&Project> for CreateProjectRequest {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.project_id.clone(),
            project_name: project.project_name.clone(),
            total_tasks: project.total_tasks,
            start_date: project.start_date,
            end_date: project.end_date,
            create_only: false,
        }
    }
}

/// Body of `PUT /api/project`. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub project_id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl UpdateProjectRequest {
    /// Build an update carrying the fields of `patch`.
    pub fn new(project_id: ProjectId, patch: MetadataPatch) -> Self {
        Self {
            project_id,
            project_name: patch.project_name,
            start_date: patch.start_date,
            end_date: patch.end_date,
        }
    }
}

/// Body of `POST /api/progress`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub project_id: ProjectId,
    pub date: NaiveDate,
    pub tasks_completed: i64,
}
