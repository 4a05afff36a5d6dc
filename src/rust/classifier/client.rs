use async_trait::async_trait;
use log::{error, info};

use super::error::ClassifyError;
use super::multipart::MultipartTransport;
use super::response::ClassificationResult;
use super::rpc::RpcTransport;
use crate::config::TransportStrategy;
use crate::source::{ImagePayload, ImageSource};

/// Anything that can turn an image source into a classification.
///
/// [`ClassificationClient`] is the real implementation; the session only
/// depends on this trait.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, source: &ImageSource) -> Result<ClassificationResult, ClassifyError>;
}

#[derive(Debug)]
pub(crate) enum Transport {
    Multipart(MultipartTransport),
    Rpc(RpcTransport),
}

/// Sends images to the remote classifier and normalizes what comes back.
///
/// ```rust,no_run
/// # async fn run() -> Result<(), jangle::ClassifyError> {
/// use jangle::{ClassificationClient, Classify, ImageSource, TransportStrategy};
///
/// let client = ClassificationClient::builder()
///     .with_transport(TransportStrategy::MultipartPost)
///     .with_api_base("http://127.0.0.1:5000")
///     .build()?;
///
/// let result = client
///     .classify(&ImageSource::Url("https://example.com/durian.jpg".into()))
///     .await?;
/// println!("{} ({:.0}%)", result.label, result.confidence * 100.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClassificationClient {
    pub(crate) http: reqwest::Client,
    pub(crate) transport: Transport,
}

impl ClassificationClient {
    /// Creates a new ClientBuilder for fluent construction
    pub fn builder() -> super::builder::ClientBuilder {
        super::builder::ClientBuilder::new()
    }

    pub fn strategy(&self) -> TransportStrategy {
        match self.transport {
            Transport::Multipart(_) => TransportStrategy::MultipartPost,
            Transport::Rpc(_) => TransportStrategy::RpcPredict,
        }
    }

    /// The URL requests are sent to: the predict endpoint or the space URL
    pub fn endpoint(&self) -> &str {
        match &self.transport {
            Transport::Multipart(t) => t.predict_url(),
            Transport::Rpc(t) => t.space_url(),
        }
    }

    async fn run(&self, source: &ImageSource) -> Result<ClassificationResult, ClassifyError> {
        let payload = ImagePayload::resolve(&self.http, source).await?;
        match &self.transport {
            Transport::Multipart(t) => t.predict(payload).await,
            Transport::Rpc(t) => t.predict(payload).await,
        }
    }
}

#[async_trait]
impl Classify for ClassificationClient {
    async fn classify(&self, source: &ImageSource) -> Result<ClassificationResult, ClassifyError> {
        info!("Classifying {} source via {}", source.kind(), self.strategy());
        let result = self.run(source).await;
        match &result {
            Ok(r) => info!("Prediction: {} ({:.2})", r.label, r.confidence),
            Err(e) => error!("Prediction error: {}", e),
        }
        result
    }
}
