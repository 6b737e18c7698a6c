//! Freelancer.com REST API access.
//!
//! [`FreelancerApi`] is the seam between the tool dispatcher and the network: the
//! production implementation is [`client::FreelancerClient`], tests substitute stubs.

pub mod client;
pub mod models;

use crate::error::Result;
use async_trait::async_trait;

pub use client::FreelancerClient;
pub use models::{ProjectsPage, UsersPage};

/// Sort/search options for an active-project search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSearchFilter {
    pub sort_field: String,
    pub or_search_query: bool,
}

impl Default for ProjectSearchFilter {
    fn default() -> Self {
        Self {
            sort_field: "time_updated".to_string(),
            or_search_query: true,
        }
    }
}

/// Parameters for a freelancer directory search.
///
/// Empty id lists are treated the same as absent ones and are not sent upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreelancerSearchParams {
    pub query: String,
    pub job_ids: Option<Vec<i64>>,
    pub location_ids: Option<Vec<i64>>,
}

#[async_trait]
pub trait FreelancerApi: Send + Sync {
    /// Search active projects.
    async fn search_projects(&self, query: &str, filter: &ProjectSearchFilter)
    -> Result<ProjectsPage>;

    /// Search the freelancer directory.
    async fn search_freelancers(&self, params: &FreelancerSearchParams) -> Result<UsersPage>;
}
