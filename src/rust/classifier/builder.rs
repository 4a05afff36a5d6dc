use std::time::Duration;

use log::{info, warn};

use super::client::{ClassificationClient, Transport};
use super::error::ClassifyError;
use super::multipart::MultipartTransport;
use super::rpc::RpcTransport;
use crate::config::{ClientConfig, TransportStrategy, SHARED_HTTP};

/// A builder for constructing a [`ClassificationClient`] with a fluent interface.
#[derive(Default, Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a builder with the default configuration (multipart transport, production base)
    ///
    /// # Example
    /// ```
    /// use jangle::ClientBuilder;
    ///
    /// let builder = ClientBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration, e.g. one produced by [`ClientConfig::from_env`]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_transport(mut self, transport: TransportStrategy) -> Self {
        self.config.transport = transport;
        self
    }

    /// Sets the base URL the `/api/predict` path is appended to
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.api_base = api_base.into();
        self
    }

    /// Sets the hosted space used by the RPC transport
    pub fn with_space_url(mut self, space_url: impl Into<String>) -> Self {
        self.config.space_url = space_url.into();
        self
    }

    /// Switches the multipart endpoint to the local development server
    pub fn with_development(mut self, development: bool) -> Self {
        self.config = self.config.with_development(development);
        self
    }

    /// Gives up on requests that take longer than `timeout`.
    ///
    /// Without this a hung remote call keeps the request in progress indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Uses the given HTTP client instead of the shared one
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    fn validate_url(name: &str, url: &str) -> Result<(), ClassifyError> {
        if url.trim().is_empty() {
            return Err(ClassifyError::InvalidInput(format!("{} cannot be empty", name)));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClassifyError::InvalidInput(format!(
                "{} must be an http(s) URL, got '{}'",
                name, url
            )));
        }
        Ok(())
    }

    fn http_client(&mut self) -> Result<reqwest::Client, ClassifyError> {
        match (self.http.take(), self.config.timeout) {
            (Some(http), Some(_)) => {
                warn!("Explicit HTTP client supplied; ignoring configured timeout");
                Ok(http)
            }
            (Some(http), None) => Ok(http),
            (None, Some(timeout)) => Ok(reqwest::Client::builder().timeout(timeout).build()?),
            (None, None) => Ok(SHARED_HTTP.clone()),
        }
    }

    /// Builds and returns the final client
    ///
    /// # Returns
    /// * `Result<ClassificationClient, ClassifyError>` - the client, or `InvalidInput` if
    ///   the endpoint for the selected transport is empty or not an http(s) URL
    pub fn build(mut self) -> Result<ClassificationClient, ClassifyError> {
        let http = self.http_client()?;

        let transport = match self.config.transport {
            TransportStrategy::MultipartPost => {
                Self::validate_url("API base", &self.config.api_base)?;
                Transport::Multipart(MultipartTransport::new(http.clone(), self.config.predict_url()))
            }
            TransportStrategy::RpcPredict => {
                Self::validate_url("Space URL", &self.config.space_url)?;
                Transport::Rpc(RpcTransport::new(http.clone(), self.config.space_url.clone()))
            }
        };

        let client = ClassificationClient { http, transport };
        info!("Built {} client for {}", client.strategy(), client.endpoint());
        Ok(client)
    }
}
