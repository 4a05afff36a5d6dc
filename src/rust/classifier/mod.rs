use crate::config::TransportStrategy;

pub(crate) mod error;
mod client;
pub mod builder;
mod multipart;
mod rpc;
pub mod response;

pub use error::ClassifyError;
pub use client::{ClassificationClient, Classify};
pub use builder::ClientBuilder;
pub use response::{normalize_flat, normalize_rpc, ClassificationResult};

/// Information about how a client reaches the remote classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInfo {
    pub strategy: TransportStrategy,
    /// Predict endpoint for multipart, space URL for RPC
    pub endpoint: String,
    /// Whether the RPC session has been opened yet (always false for multipart)
    pub connected: bool,
}

impl ClassificationClient {
    /// Returns information about the client's current state
    pub fn info(&self) -> ClientInfo {
        let connected = match &self.transport {
            client::Transport::Rpc(t) => t.is_connected(),
            client::Transport::Multipart(_) => false,
        };
        ClientInfo {
            strategy: self.strategy(),
            endpoint: self.endpoint().to_string(),
            connected,
        }
    }
}
