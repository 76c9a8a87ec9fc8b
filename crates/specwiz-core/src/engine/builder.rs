//! Builder for creating and configuring WizardEngine instances.

use std::{sync::Arc, time::Duration};

use log::debug;

use super::WizardEngine;
use crate::{
    backend::{HttpBackend, JobBackend, WizardBackend},
    config::Config,
    error::Result,
};

/// Builder for creating and configuring WizardEngine instances.
#[derive(Clone, Default)]
pub struct EngineBuilder {
    config: Config,
    backend: Option<(Arc<dyn WizardBackend>, Arc<dyn JobBackend>)>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fully resolved configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets a custom API base URL.
    ///
    /// If not specified, the configured URL is used, which defaults to
    /// `http://localhost:8000`.
    pub fn with_api_url<S: Into<String>>(mut self, url: Option<S>) -> Self {
        if let Some(url) = url {
            self.config.api_url = url.into();
        }
        self
    }

    /// Sets a custom request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.config.timeout_secs = secs;
        }
        self
    }

    /// Uses a specific backend instead of the REST client.
    pub fn with_backend<B>(mut self, backend: Arc<B>) -> Self
    where
        B: WizardBackend + JobBackend + 'static,
    {
        let jobs: Arc<dyn JobBackend> = backend.clone();
        let backend: Arc<dyn WizardBackend> = backend;
        self.backend = Some((backend, jobs));
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Configuration` if the URL or timeout, after the
    /// `with_*` overrides, cannot produce a working client, and
    /// `WizardError::Http` if the HTTP client cannot be created
    pub fn build(self) -> Result<WizardEngine> {
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs.max(1));

        let (backend, jobs) = match self.backend {
            Some(pair) => pair,
            None => {
                self.config.validate()?;
                debug!("Using API at {}", self.config.api_url);
                let http = Arc::new(HttpBackend::new(
                    self.config.api_url.clone(),
                    Duration::from_secs(self.config.timeout_secs),
                )?);
                let jobs: Arc<dyn JobBackend> = http.clone();
                let backend: Arc<dyn WizardBackend> = http;
                (backend, jobs)
            }
        };

        Ok(WizardEngine::new(backend, jobs, poll_interval))
    }
}
