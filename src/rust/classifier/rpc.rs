use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use super::error::ClassifyError;
use super::response::{normalize_rpc, ClassificationResult};
use crate::source::ImagePayload;

/// Name of the remote operation invoked for every prediction
pub(crate) const PREDICT_OPERATION: &str = "/predict";

/// Subset of the space's `/config` document we care about
#[derive(Debug, Default, Deserialize)]
struct SpaceConfig {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// An opened connection to a hosted space.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RpcSession {
    pub(crate) root: String,
}

impl RpcSession {
    fn operation_url(&self, operation: &str) -> String {
        format!("{}/run/{}", self.root.trim_end_matches('/'), operation.trim_start_matches('/'))
    }
}

/// Calls the `predict` operation of a hosted space.
///
/// Speaks the Gradio 3.x REST protocol: the image travels inline as a base64
/// `data:` URL in `POST <root>/run/predict`. Gradio 4+ servers, which expect a
/// prior `/upload` and a file reference, are not supported.
///
/// The session is opened lazily on first use and shared by all later calls.
#[derive(Debug)]
pub(crate) struct RpcTransport {
    http: reqwest::Client,
    space_url: String,
    session: OnceCell<RpcSession>,
}

impl RpcTransport {
    pub(crate) fn new(http: reqwest::Client, space_url: String) -> Self {
        Self {
            http,
            space_url,
            session: OnceCell::new(),
        }
    }

    pub(crate) fn space_url(&self) -> &str {
        &self.space_url
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.session.initialized()
    }

    async fn session(&self) -> Result<&RpcSession, ClassifyError> {
        self.session.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<RpcSession, ClassifyError> {
        let base = self.space_url.trim_end_matches('/');
        info!("Connecting to space at {}", base);

        let response = self.http.get(format!("{}/config", base)).send().await?;
        if !response.status().is_success() {
            return Err(ClassifyError::status(response.status()));
        }
        let config: SpaceConfig = match response.json().await {
            Ok(config) => config,
            Err(e) => {
                warn!("Unreadable space config ({}); using {} as root", e, base);
                SpaceConfig::default()
            }
        };
        debug!("Space config version: {:?}", config.version);

        let root = config
            .root
            .filter(|r| r.starts_with("http"))
            .unwrap_or_else(|| base.to_string());
        Ok(RpcSession { root })
    }

    pub(crate) async fn predict(&self, payload: ImagePayload) -> Result<ClassificationResult, ClassifyError> {
        let session = self.session().await?;
        let url = session.operation_url(PREDICT_OPERATION);

        info!("Making prediction request to {}", url);
        let body = json!({ "data": [payload.to_data_url()] });
        let response = self.http.post(&url).json(&body).send().await?;
        debug!("Prediction response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ClassifyError::status(response.status()));
        }

        let body: Value = response.json().await?;
        debug!("API response: {}", body);
        normalize_rpc(body)
    }
}
