//! MCP server exposing Freelancer.com project search, freelancer search, and a health
//! check as tools, plus read-only configuration/help resources.
//!
//! Upstream records are normalized into fixed-shape JSON so MCP clients never have to
//! probe for missing fields, and every upstream failure is reported through one generic
//! envelope.

pub mod api;
pub mod config;
pub mod error;
pub mod normalize;
pub mod requests;
pub mod resources;
pub mod server;
pub mod session;
pub mod tools;

pub use error::{FreelancerError, Result};
pub use server::FreelancerMcpServer;
