//! Lazily-constructed, process-wide Freelancer API session.
//!
//! The handle owns at most one authenticated client. It is built on first use and then
//! reused; there is no refresh or expiry. Construction happens under a lock so concurrent
//! tool calls cannot build two clients.

use crate::api::{FreelancerApi, FreelancerClient};
use crate::config::Settings;
use crate::error::{FreelancerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Builds an authenticated client from the settings and a (non-blank) token.
pub type Connector =
    Box<dyn Fn(&Settings, &str) -> Result<Arc<dyn FreelancerApi>> + Send + Sync + 'static>;

pub struct FreelancerSession {
    settings: Arc<Settings>,
    connector: Connector,
    client: Mutex<Option<Arc<dyn FreelancerApi>>>,
}

impl fmt::Debug for FreelancerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreelancerSession")
            .field("api_url", &self.settings.api_url)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl FreelancerSession {
    /// Session handle backed by the real HTTP client.
    #[must_use]
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_connector(
            settings,
            Box::new(|settings, token| {
                let client =
                    FreelancerClient::new(&settings.api_url, token, settings.request_timeout)?;
                Ok(Arc::new(client) as Arc<dyn FreelancerApi>)
            }),
        )
    }

    /// Session handle with a custom client constructor.
    #[must_use]
    pub fn with_connector(settings: Arc<Settings>, connector: Connector) -> Self {
        Self {
            settings,
            connector,
            client: Mutex::new(None),
        }
    }

    /// Return the current client, constructing it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`FreelancerError::Authentication`] if no token is configured or the client
    /// cannot be constructed.
    pub fn get(&self) -> Result<Arc<dyn FreelancerApi>> {
        let mut slot = self.client.lock();
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = self.connect()?;
        *slot = Some(Arc::clone(&client));
        tracing::debug!(api_url = %self.settings.api_url, "freelancer session created");
        Ok(client)
    }

    /// Whether a client has been constructed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.client.lock().is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn connect(&self) -> Result<Arc<dyn FreelancerApi>> {
        let Some(token) = self.settings.token() else {
            return Err(FreelancerError::Authentication(
                "OAuth token is required".to_string(),
            ));
        };

        (self.connector)(&self.settings, token)
            .map_err(|e| FreelancerError::Authentication(format!("Failed to create session: {e}")))
    }
}
