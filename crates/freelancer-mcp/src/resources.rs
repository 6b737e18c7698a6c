//! Read-only informational resources.

use crate::session::FreelancerSession;
use crate::tools::{HEALTH_CHECK, SEARCH_FREELANCERS, SEARCH_PROJECTS};
use serde_json::{Value, json};

pub const CONFIG_URI: &str = "freelancer://config";
pub const HELP_URI: &str = "freelancer://help";
pub const EXAMPLES_URI: &str = "freelancer://examples";

pub const JSON_MIME_TYPE: &str = "application/json";

/// Static description of one resource, used for `resources/list`.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        uri: CONFIG_URI,
        name: "config",
        description: "Current API configuration status",
    },
    ResourceSpec {
        uri: HELP_URI,
        name: "help",
        description: "Help information about available tools and resources",
    },
    ResourceSpec {
        uri: EXAMPLES_URI,
        name: "examples",
        description: "Usage examples for all tools",
    },
];

/// Render a resource as pretty-printed JSON, or `None` if the URI is unknown.
#[must_use]
pub fn read(uri: &str, session: &FreelancerSession) -> Option<String> {
    let doc = match uri {
        CONFIG_URI => config_document(session),
        HELP_URI => help_document(),
        EXAMPLES_URI => examples_document(),
        _ => return None,
    };
    Some(serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string()))
}

/// Config snapshot. Reports whether a token is set, never the token itself.
#[must_use]
pub fn config_document(session: &FreelancerSession) -> Value {
    let settings = session.settings();
    json!({
        "api_url": settings.api_url,
        "has_token": settings.has_token(),
        "session_active": session.is_active(),
        "server_name": settings.server_name,
        "version": settings.server_version,
    })
}

#[must_use]
pub fn help_document() -> Value {
    json!({
        "tools": {
            SEARCH_PROJECTS: "Search for projects by query with filtering options",
            SEARCH_FREELANCERS: "Search for freelancers with various filters",
            HEALTH_CHECK: "Check server and API connectivity status",
        },
        "resources": {
            CONFIG_URI: "Current API configuration status",
            HELP_URI: "This help information",
            EXAMPLES_URI: "Usage examples for all tools",
        },
        "authentication": {
            "required_env_vars": {
                "FLN_OAUTH_TOKEN": "OAuth2 token for Freelancer API (required)",
                "FLN_URL": "API base URL (optional, defaults to https://www.freelancer.com)",
            },
            "how_to_get_token": "Visit https://developers.freelancer.com to create an app and get OAuth token",
        },
    })
}

#[must_use]
pub fn examples_document() -> Value {
    json!({
        SEARCH_PROJECTS: [
            { "query": "logo design" },
            { "query": "python scraping", "sort_field": "time_updated", "or_search_query": false, "limit": 5 },
        ],
        SEARCH_FREELANCERS: [
            { "query": "rust developer" },
            { "query": "translator", "job_ids": [3, 13], "location_ids": [1], "limit": 20 },
        ],
        HEALTH_CHECK: [{}],
    })
}
