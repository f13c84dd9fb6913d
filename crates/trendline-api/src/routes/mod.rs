//! # Route Handlers
//!
//! | Route                 | Module        |
//! |-----------------------|---------------|
//! | `/api/project`        | [`project`]   |
//! | `/api/progress`       | [`progress`]  |
//! | `/api/burndown`       | [`burndown`]  |
//! | anything unmatched    | [`spa`]       |

pub mod burndown;
pub mod progress;
pub mod project;
pub mod spa;

use serde::{Deserialize, Serialize};
use trendline_core::ProjectId;
use utoipa::ToSchema;

use crate::error::AppError;

/// Acknowledgment returned by every successful write.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessBody {
    /// Always `true`.
    pub success: bool,
}

impl SuccessBody {
    pub(crate) fn ok() -> Self {
        Self { success: true }
    }
}

pub(crate) const PROJECT_ID_REQUIRED: &str = "Project ID required";
pub(crate) const MISSING_FIELDS: &str = "Missing required fields";
pub(crate) const PROJECT_NOT_FOUND: &str = "Project not found";

/// Turn an optional, possibly empty ID into a [`ProjectId`].
pub(crate) fn require_project_id(id: Option<&str>) -> Result<ProjectId, AppError> {
    id.filter(|id| !id.is_empty())
        .and_then(|id| ProjectId::new(id).ok())
        .ok_or_else(|| AppError::Validation(PROJECT_ID_REQUIRED.to_string()))
}

pub(crate) fn project_not_found() -> AppError {
    AppError::NotFound(PROJECT_NOT_FOUND.to_string())
}

/// Whether a string field counts as present: given and non-empty.
pub(crate) fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
