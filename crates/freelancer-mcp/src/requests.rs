//! Tool argument shapes and their validation.

use crate::api::{FreelancerSearchParams, ProjectSearchFilter};
use crate::error::{FreelancerError, Result};
use rmcp::model::JsonObject;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Number, Value, json};

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_LIMIT: i64 = 10;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Integers, including floats with no fractional part (`5.0`).
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        #[allow(clippy::cast_possible_truncation)]
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
        _ => Err(D::Error::custom(format!("invalid value: {n}, expected an integer"))),
    }
}

fn default_sort_field() -> String {
    "time_updated".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectSearchRequest {
    pub query: String,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    #[serde(default = "default_true")]
    pub or_search_query: bool,
    #[serde(default = "default_limit", deserialize_with = "whole_number")]
    pub limit: i64,
}

impl ProjectSearchRequest {
    #[must_use]
    pub fn filter(&self) -> ProjectSearchFilter {
        ProjectSearchFilter {
            sort_field: self.sort_field.clone(),
            or_search_query: self.or_search_query,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSearchRequest {
    pub query: String,
    #[serde(default)]
    pub job_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub location_ids: Option<Vec<i64>>,
    #[serde(default = "default_limit", deserialize_with = "whole_number")]
    pub limit: i64,
}

impl UserSearchRequest {
    /// Upstream parameters; empty id lists are dropped.
    #[must_use]
    pub fn params(&self) -> FreelancerSearchParams {
        FreelancerSearchParams {
            query: self.query.clone(),
            job_ids: self.job_ids.clone().filter(|ids| !ids.is_empty()),
            location_ids: self.location_ids.clone().filter(|ids| !ids.is_empty()),
        }
    }
}

/// A validated search request.
pub trait SearchRequest: DeserializeOwned {
    fn limit(&self) -> i64;
    fn query(&self) -> &str;

    /// Parse tool arguments and check ranges.
    ///
    /// Arguments may be given flat or wrapped as `{ "request": { ... } }`.
    ///
    /// # Errors
    ///
    /// Returns [`FreelancerError::InvalidRequest`] on missing/mistyped fields or an
    /// out-of-range `limit`.
    fn from_arguments(arguments: Option<&JsonObject>) -> Result<Self> {
        let args = match arguments {
            Some(obj) => match obj.get("request") {
                Some(Value::Object(inner)) if obj.len() == 1 => Value::Object(inner.clone()),
                _ => Value::Object(obj.clone()),
            },
            None => Value::Object(JsonObject::new()),
        };

        let request: Self = serde_json::from_value(args)
            .map_err(|e| FreelancerError::InvalidRequest(e.to_string()))?;

        let limit = request.limit();
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(FreelancerError::InvalidRequest(format!(
                "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
            )));
        }
        Ok(request)
    }

    /// The validated limit as a slice length.
    fn limit_len(&self) -> usize {
        usize::try_from(self.limit()).unwrap_or(0)
    }
}

impl SearchRequest for ProjectSearchRequest {
    fn limit(&self) -> i64 {
        self.limit
    }

    fn query(&self) -> &str {
        &self.query
    }
}

impl SearchRequest for UserSearchRequest {
    fn limit(&self) -> i64 {
        self.limit
    }

    fn query(&self) -> &str {
        &self.query
    }
}

fn limit_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": MIN_LIMIT,
        "maximum": MAX_LIMIT,
        "default": DEFAULT_LIMIT,
        "description": "Maximum number of results"
    })
}

#[must_use]
pub fn project_search_schema() -> JsonObject {
    schema_object(json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": "Search query for projects" },
            "sort_field": {
                "type": "string",
                "default": "time_updated",
                "description": "Field to sort by"
            },
            "or_search_query": {
                "type": "boolean",
                "default": true,
                "description": "Use OR logic for search terms"
            },
            "limit": limit_schema()
        },
        "required": ["query"]
    }))
}

#[must_use]
pub fn user_search_schema() -> JsonObject {
    schema_object(json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": "Search query for freelancers" },
            "job_ids": {
                "type": "array",
                "items": { "type": "integer" },
                "description": "Filter by specific job/skill IDs"
            },
            "location_ids": {
                "type": "array",
                "items": { "type": "integer" },
                "description": "Filter by location IDs"
            },
            "limit": limit_schema()
        },
        "required": ["query"]
    }))
}

#[must_use]
pub fn empty_schema() -> JsonObject {
    schema_object(json!({ "type": "object", "properties": {} }))
}

fn schema_object(v: Value) -> JsonObject {
    match v {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}
