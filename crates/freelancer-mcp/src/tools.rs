//! Tool dispatch: validate → session → upstream call → normalize → envelope.
//!
//! Each operation returns a typed `Result` internally. [`envelope`] is the boundary that
//! turns it into the JSON a caller sees; upstream error detail is logged there and never
//! returned.

use crate::error::{FreelancerError, Result};
use crate::normalize::{self, FreelancerRecord, ProjectRecord};
use crate::requests::{ProjectSearchRequest, SearchRequest, UserSearchRequest};
use crate::session::FreelancerSession;
use chrono::{SecondsFormat, Utc};
use rmcp::model::JsonObject;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SEARCH_PROJECTS: &str = "search_projects";
pub const SEARCH_FREELANCERS: &str = "search_freelancers";
pub const HEALTH_CHECK: &str = "health_check";

pub const SEARCH_FAILED: &str = "Search failed";
pub const SEARCH_FAILED_MESSAGE: &str = "Please check your OAuth token and try again";
pub const INVALID_REQUEST: &str = "Invalid request";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSearchResults {
    pub success: bool,
    pub query: String,
    pub total_results: usize,
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreelancerSearchResults {
    pub success: bool,
    pub query: String,
    pub total_results: usize,
    pub freelancers: Vec<FreelancerRecord>,
}

/// `{ success: false, error, message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFailure {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ToolFailure {
    #[must_use]
    pub fn search_failed() -> Self {
        Self {
            success: false,
            error: SEARCH_FAILED.to_string(),
            message: SEARCH_FAILED_MESSAGE.to_string(),
        }
    }

    /// Validation failures only echo what the caller sent, so the detail is returned.
    #[must_use]
    pub fn invalid_request(detail: String) -> Self {
        Self {
            success: false,
            error: INVALID_REQUEST.to_string(),
            message: detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "server_status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy {
        api_connection: &'static str,
        session_valid: bool,
        timestamp: String,
        api_url: String,
        version: String,
    },
    Degraded {
        api_connection: &'static str,
        session_valid: bool,
        error: String,
        timestamp: String,
    },
}

/// Map a tool result onto the caller-visible envelope.
pub fn envelope<T: Serialize>(tool: &str, result: Result<T>) -> Value {
    let out = match result {
        Ok(ok) => serde_json::to_value(ok),
        Err(FreelancerError::InvalidRequest(detail)) => {
            warn!(tool, %detail, "rejected tool arguments");
            serde_json::to_value(ToolFailure::invalid_request(detail))
        }
        Err(e) => {
            error!(tool, error = %e, "tool call failed");
            serde_json::to_value(ToolFailure::search_failed())
        }
    };
    // Serializing these plain structs cannot fail; fall back to the generic failure anyway.
    out.unwrap_or_else(|_| {
        serde_json::json!({
            "success": false,
            "error": SEARCH_FAILED,
            "message": SEARCH_FAILED_MESSAGE,
        })
    })
}

/// The three Freelancer tools, sharing one session handle.
#[derive(Debug, Clone)]
pub struct FreelancerTools {
    session: Arc<FreelancerSession>,
}

impl FreelancerTools {
    #[must_use]
    pub fn new(session: Arc<FreelancerSession>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<FreelancerSession> {
        &self.session
    }

    /// Run a tool by name. Returns `None` for unknown names.
    pub async fn call(&self, name: &str, arguments: Option<&JsonObject>) -> Option<Value> {
        let value = match name {
            SEARCH_PROJECTS => envelope(name, self.search_projects(arguments).await),
            SEARCH_FREELANCERS => envelope(name, self.search_freelancers(arguments).await),
            HEALTH_CHECK => serde_json::to_value(self.health_check()).ok()?,
            _ => return None,
        };
        Some(value)
    }

    /// Search active projects.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid arguments, missing credentials, or upstream failure.
    pub async fn search_projects(
        &self,
        arguments: Option<&JsonObject>,
    ) -> Result<ProjectSearchResults> {
        let request = ProjectSearchRequest::from_arguments(arguments)?;
        let client = self.session.get()?;

        let page = client
            .search_projects(&request.query, &request.filter())
            .await?;

        let upstream_total = page.total_count;
        let projects = normalize::take_normalized(
            page.projects.unwrap_or_default(),
            request.limit_len(),
            normalize::project_from_value,
        );
        info!(
            tool = SEARCH_PROJECTS,
            query = %request.query,
            results = projects.len(),
            upstream_total = ?upstream_total,
            "search complete"
        );

        Ok(ProjectSearchResults {
            success: true,
            total_results: projects.len(),
            query: request.query,
            projects,
        })
    }

    /// Search the freelancer directory.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid arguments, missing credentials, or upstream failure.
    pub async fn search_freelancers(
        &self,
        arguments: Option<&JsonObject>,
    ) -> Result<FreelancerSearchResults> {
        let request = UserSearchRequest::from_arguments(arguments)?;
        let client = self.session.get()?;

        let page = client.search_freelancers(&request.params()).await?;

        let upstream_total = page.total_count;
        let freelancers = normalize::take_normalized(
            page.users.unwrap_or_default(),
            request.limit_len(),
            normalize::freelancer_from_value,
        );
        info!(
            tool = SEARCH_FREELANCERS,
            query = %request.query,
            results = freelancers.len(),
            upstream_total = ?upstream_total,
            "search complete"
        );

        Ok(FreelancerSearchResults {
            success: true,
            total_results: freelancers.len(),
            query: request.query,
            freelancers,
        })
    }

    /// Report whether a session can be obtained. Never fails.
    #[must_use]
    pub fn health_check(&self) -> HealthReport {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        match self.session.get() {
            Ok(_) => {
                let settings = self.session.settings();
                HealthReport::Healthy {
                    api_connection: "active",
                    session_valid: true,
                    timestamp,
                    api_url: settings.api_url.clone(),
                    version: settings.server_version.clone(),
                }
            }
            Err(e) => {
                error!(error = %e, "health check failed");
                HealthReport::Degraded {
                    api_connection: "failed",
                    session_valid: false,
                    error: e.to_string(),
                    timestamp,
                }
            }
        }
    }
}
