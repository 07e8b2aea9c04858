//! Execution context shared by the interactive layers and command handlers.
//!
//! [`CloudConfig`] is the capability handle passed to every options loader
//! and operation: the API client plus the settings that produced it.

use std::{fmt, sync::Arc};

use tracing::debug;
use url::Url;

use crate::{
    api::HttpCloudClient,
    client::{ApiError, CloudClient},
};

/// Connection settings resolved from flags, environment and configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_domain: Url,
    pub auth_domain: String,
    pub token: Option<String>,
    /// Log request and response details
    pub debug: bool,
}

#[derive(Clone)]
pub struct CloudConfig {
    client: Arc<dyn CloudClient>,
    settings: Arc<Settings>,
}

impl CloudConfig {
    pub fn new(client: Arc<dyn CloudClient>, settings: Settings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }

    /// Build a context backed by the HTTP API client.
    pub fn connect(settings: Settings) -> Result<Self, ApiError> {
        debug!("Connecting to {}", settings.api_domain);
        let client = HttpCloudClient::new(&settings)?;
        Ok(Self::new(Arc::new(client), settings))
    }

    pub fn client(&self) -> Arc<dyn CloudClient> {
        self.client.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConfig")
            .field("api_domain", &self.settings.api_domain.as_str())
            .field("auth_domain", &self.settings.auth_domain)
            .finish_non_exhaustive()
    }
}
