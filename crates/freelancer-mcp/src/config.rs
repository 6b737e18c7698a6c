//! Process configuration.
//!
//! Every setting is a CLI flag with an environment fallback. The parsed [`Cli`] is turned
//! into an immutable [`Settings`] once at startup and handed to the components that need it.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://www.freelancer.com";
pub const DEFAULT_SERVER_NAME: &str = "freelancer-mcp";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// MCP transport served by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout (what most desktop MCP hosts spawn).
    #[default]
    Stdio,
    /// Streamable HTTP at `/mcp`, plus `/health`.
    Http,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "freelancer-mcp", version, about)]
pub struct Cli {
    /// OAuth2 token for the Freelancer API.
    #[arg(long, env = "FLN_OAUTH_TOKEN", hide_env_values = true)]
    pub oauth_token: Option<String>,

    /// Freelancer API base URL.
    #[arg(long, env = "FLN_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Name reported to MCP clients.
    #[arg(long, env = "MCP_SERVER_NAME", default_value = DEFAULT_SERVER_NAME)]
    pub server_name: String,

    /// Log filter (`info`, `debug`, or a full `tracing` filter directive).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Listen address for `--transport http`.
    #[arg(long, env = "MCP_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Per-request timeout for Freelancer API calls, in seconds (0 disables it).
    #[arg(long, env = "FLN_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

/// Immutable settings shared by the session handle, dispatcher, and resources.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub oauth_token: Option<String>,
    pub server_name: String,
    pub server_version: String,
    pub request_timeout: Option<Duration>,
}

impl Settings {
    /// Settings with defaults for everything but the token.
    #[must_use]
    pub fn new(oauth_token: Option<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            oauth_token,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Whether a non-blank token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// The configured token, ignoring empty/whitespace-only values.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.oauth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            oauth_token: cli.oauth_token.clone(),
            server_name: cli.server_name.clone(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout: (cli.request_timeout_secs > 0)
                .then(|| Duration::from_secs(cli.request_timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["freelancer-mcp", "--oauth-token", "tok"]).expect("parse");
        assert_eq!(cli.transport, Transport::Stdio);
        assert_eq!(cli.log_format, LogFormat::Text);

        let settings = Settings::from(&cli);
        assert_eq!(settings.token(), Some("tok"));
        assert_eq!(settings.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(
            settings.request_timeout,
            Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_and_zero_timeout_disables() {
        let cli = Cli::try_parse_from([
            "freelancer-mcp",
            "--api-url",
            "https://www.freelancer-sandbox.com/",
            "--request-timeout-secs",
            "0",
        ])
        .expect("parse");
        let settings = Settings::from(&cli);
        assert_eq!(settings.api_url, "https://www.freelancer-sandbox.com");
        assert_eq!(settings.request_timeout, None);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        assert!(!Settings::new(Some("   ".to_string())).has_token());
        assert!(!Settings::new(None).has_token());
        assert!(Settings::new(Some("abc".to_string())).has_token());
    }
}
