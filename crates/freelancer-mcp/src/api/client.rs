//! `reqwest`-based Freelancer API client.

use super::models::{ApiEnvelope, ProjectsPage, UsersPage};
use super::{FreelancerApi, FreelancerSearchParams, ProjectSearchFilter};
use crate::error::{FreelancerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Header carrying the OAuth token on every Freelancer API request.
pub const OAUTH_HEADER: &str = "freelancer-oauth-v1";

const PROJECTS_ACTIVE_PATH: &str = "projects/0.1/projects/active/";
const USERS_DIRECTORY_PATH: &str = "users/0.1/users/directory/";

/// User-detail flags requested with directory searches so that location, reputation, and
/// skills come back populated.
const USER_DETAIL_FLAGS: &[&str] = &[
    "avatar",
    "display_info",
    "jobs",
    "location_details",
    "reputation",
    "status",
];

/// An authenticated client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct FreelancerClient {
    http: Client,
    api_base: Url,
}

impl FreelancerClient {
    /// Build a client for `<base_url>/api/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http(s)` URL, the token is not a
    /// valid header value, or the HTTP client cannot be built.
    pub fn new(base_url: &str, oauth_token: &str, timeout: Option<Duration>) -> Result<Self> {
        let api_base = api_base_url(base_url)?;

        let mut token = HeaderValue::from_str(oauth_token).map_err(|_| {
            FreelancerError::Authentication("OAuth token is not a valid header value".to_string())
        })?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(OAUTH_HEADER, token);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("freelancer-mcp/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| FreelancerError::Http(sanitize_reqwest_error(&e)))?;

        Ok(Self { http, api_base })
    }

    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    async fn get<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .api_base
            .join(path)
            .map_err(|e| FreelancerError::Http(format!("invalid request path '{path}': {e}")))?;

        debug!(url = %redact_url(&url), params = query.len(), "freelancer api request");
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        decode_envelope(status, &bytes)
    }
}

/// Unwrap `{ status, result }`, turning HTTP and API-level failures into errors.
fn decode_envelope<T: DeserializeOwned + Default>(status: StatusCode, body: &[u8]) -> Result<T> {
    let envelope: Option<ApiEnvelope<T>> = serde_json::from_slice(body).ok();

    let api_ok = envelope
        .as_ref()
        .and_then(|e| e.status.as_deref())
        .is_none_or(|s| s.eq_ignore_ascii_case("success"));

    if !status.is_success() || !api_ok {
        let message = envelope
            .as_ref()
            .and_then(|e| e.message.clone().or_else(|| e.error_code.clone()))
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(FreelancerError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let Some(envelope) = envelope else {
        return Err(FreelancerError::Decode(
            "response body is not a JSON API envelope".to_string(),
        ));
    };
    Ok(envelope.result.unwrap_or_default())
}

fn api_base_url(base_url: &str) -> Result<Url> {
    let mut parsed = Url::parse(base_url.trim()).map_err(|e| {
        FreelancerError::Authentication(format!("Invalid API URL '{base_url}': {e}"))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FreelancerError::Authentication(format!(
            "Invalid API URL '{base_url}': unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    parsed.set_query(None);
    parsed.set_fragment(None);
    let trimmed = parsed.as_str().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/api/")).map_err(|e| {
        FreelancerError::Authentication(format!("Invalid API URL '{base_url}': {e}"))
    })
}

fn project_search_query(query: &str, filter: &ProjectSearchFilter) -> Vec<(&'static str, String)> {
    vec![
        ("query", query.to_string()),
        ("sort_field", filter.sort_field.clone()),
        ("or_search_query", filter.or_search_query.to_string()),
        ("full_description", "true".to_string()),
    ]
}

fn freelancer_search_query(params: &FreelancerSearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("query", params.query.clone())];
    for id in params.job_ids.iter().flatten() {
        query.push(("jobs[]", id.to_string()));
    }
    for id in params.location_ids.iter().flatten() {
        query.push(("location_ids[]", id.to_string()));
    }
    query.extend(USER_DETAIL_FLAGS.iter().map(|f| (*f, "true".to_string())));
    query
}

#[async_trait]
impl FreelancerApi for FreelancerClient {
    async fn search_projects(
        &self,
        query: &str,
        filter: &ProjectSearchFilter,
    ) -> Result<ProjectsPage> {
        self.get(PROJECTS_ACTIVE_PATH, &project_search_query(query, filter))
            .await
    }

    async fn search_freelancers(&self, params: &FreelancerSearchParams) -> Result<UsersPage> {
        self.get(USERS_DIRECTORY_PATH, &freelancer_search_query(params))
            .await
    }
}

impl From<reqwest::Error> for FreelancerError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(sanitize_reqwest_error(&value))
    }
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
