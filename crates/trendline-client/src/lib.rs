//! # trendline-client -- Typed Rust client for the Trendline API
//!
//! Wraps the server's JSON routes:
//!
//! | Method | Path             | Client method                        |
//! |--------|------------------|--------------------------------------|
//! | GET    | `/api/project`   | [`TrendlineClient::get_project`]     |
//! | POST   | `/api/project`   | [`TrendlineClient::create_project`]  |
//! | PUT    | `/api/project`   | [`TrendlineClient::update_project`]  |
//! | POST   | `/api/progress`  | [`TrendlineClient::record_progress`] |
//! | GET    | `/api/burndown`  | [`TrendlineClient::burndown`]        |
//!
//! Requests are sent once. Failures are returned immediately with the
//! server's `{"error": ...}` message attached.

pub mod config;
pub mod error;
pub mod types;

pub use config::ClientConfig;
pub use error::ClientError;
pub use types::{CreateProjectRequest, ProgressRequest, UpdateProjectRequest};

use std::time::Duration;

use chrono::NaiveDate;
use trendline_core::{BurndownReport, Project, ProjectId};
use url::Url;

/// Trendline API client.
#[derive(Debug, Clone)]
pub struct TrendlineClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TrendlineClient {
    /// Create a new client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config::with_trailing_slash(config.base_url),
        })
    }

    /// The server origin this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch a project. Returns `None` when the server answers 404.
    pub async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, ClientError> {
        let endpoint = "GET /api/project";
        let url = self.endpoint_url("api/project")?;

        let resp = self
            .http
            .get(url)
            .query(&[("id", id.as_str())])
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = check_status(endpoint, resp).await?;
        resp.json()
            .await
            .map(Some)
            .map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }

    /// Create a project. Overwrites an existing one unless `create_only` is set.
    pub async fn create_project(&self, req: &CreateProjectRequest) -> Result<(), ClientError> {
        let endpoint = "POST /api/project";
        let url = self.endpoint_url("api/project")?;

        let resp = self
            .http
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        check_status(endpoint, resp).await?;
        tracing::debug!(project_id = %req.project_id, "project created");
        Ok(())
    }

    /// Patch a project's name and/or dates.
    pub async fn update_project(&self, req: &UpdateProjectRequest) -> Result<(), ClientError> {
        let endpoint = "PUT /api/project";
        let url = self.endpoint_url("api/project")?;

        let resp = self
            .http
            .put(url)
            .json(req)
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        check_status(endpoint, resp).await?;
        Ok(())
    }

    /// Record the tasks completed on one date.
    pub async fn record_progress(&self, req: &ProgressRequest) -> Result<(), ClientError> {
        let endpoint = "POST /api/progress";
        let url = self.endpoint_url("api/progress")?;

        let resp = self
            .http
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        check_status(endpoint, resp).await?;
        tracing::debug!(project_id = %req.project_id, date = %req.date, "progress recorded");
        Ok(())
    }

    /// Fetch the server-computed burndown report. `today` defaults to the
    /// server's current UTC date.
    pub async fn burndown(
        &self,
        id: &ProjectId,
        today: Option<NaiveDate>,
    ) -> Result<BurndownReport, ClientError> {
        let endpoint = "GET /api/burndown";
        let url = self.endpoint_url("api/burndown")?;

        let mut query = vec![("id", id.to_string())];
        if let Some(today) = today {
            query.push(("today", today.to_string()));
        }

        let resp = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        let resp = check_status(endpoint, resp).await?;
        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Shareable link that opens the project in the web app.
    pub fn share_link(&self, id: &ProjectId) -> Result<Url, ClientError> {
        share_link(&self.base_url, id)
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path).map_err(|e| {
            ClientError::Config(config::ConfigError::InvalidUrl(
                self.base_url.to_string(),
                e.to_string(),
            ))
        })
    }
}

/// `{base}/p/{projectId}`, with the ID percent-encoded as a single path segment.
pub fn share_link(base: &Url, id: &ProjectId) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| {
            ClientError::Config(config::ConfigError::InvalidUrl(
                base.to_string(),
                "cannot be used as a base URL".into(),
            ))
        })?
        .pop_if_empty()
        .push("p")
        .push(id.as_str());
    Ok(url)
}

fn http_error(endpoint: &str, source: reqwest::Error) -> ClientError {
    ClientError::Http {
        endpoint: endpoint.into(),
        source,
    }
}

/// Pass 2xx responses through; turn anything else into [`ClientError::Api`].
async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        endpoint: endpoint.into(),
        status,
        message: error::error_message(&body),
    })
}
