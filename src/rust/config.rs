use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use lazy_static::lazy_static;

/// Loopback address used when running against a local development server
pub const DEV_API_BASE: &str = "http://127.0.0.1:5000";
/// Origin the relative production path is resolved against
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
/// Path of the multipart prediction endpoint
pub const PREDICT_PATH: &str = "/api/predict";
/// Hosted space serving the RPC `predict` operation
pub const DEFAULT_SPACE_URL: &str = "https://defijangle-will-jangle-eat.hf.space/--replicas/pgkvd/";
/// Sample image offered as a one-click test
pub const EXAMPLE_IMAGE_URL: &str =
    "https://raw.githubusercontent.com/gradio-app/gradio/main/test/test_files/bus.png";

lazy_static! {
    // Shared so every client built without an explicit one reuses a single connection pool
    pub(crate) static ref SHARED_HTTP: reqwest::Client = reqwest::Client::new();
}

/// How image bytes reach the remote classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportStrategy {
    /// `POST <base>/api/predict` with a multipart `file` field
    #[default]
    MultipartPost,
    /// Session-based `/predict` call against a hosted space
    RpcPredict,
}

/// Which kinds of input the session accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    FileOnly,
    UrlOnly,
    #[default]
    Tabbed,
}

impl FromStr for TransportStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "multipart" | "multipart-post" | "http" => Ok(Self::MultipartPost),
            "rpc" | "rpc-predict" | "gradio" => Ok(Self::RpcPredict),
            other => Err(format!("unknown transport '{}' (expected multipart or rpc)", other)),
        }
    }
}

impl fmt::Display for TransportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipartPost => write!(f, "multipart"),
            Self::RpcPredict => write!(f, "rpc"),
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" | "file-only" => Ok(Self::FileOnly),
            "url" | "url-only" => Ok(Self::UrlOnly),
            "tabbed" | "both" => Ok(Self::Tabbed),
            other => Err(format!("unknown input mode '{}' (expected file, url or tabbed)", other)),
        }
    }
}

/// Endpoint and transport settings for a [`crate::ClassificationClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub transport: TransportStrategy,
    /// Base the multipart endpoint path is appended to
    pub api_base: String,
    pub space_url: String,
    /// `None` means wait indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: TransportStrategy::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            space_url: DEFAULT_SPACE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Resolves the configuration from the environment.
    ///
    /// 1. `JANGLE_API_BASE` wins if set
    /// 2. `JANGLE_ENV=development` selects the local loopback server
    /// 3. Otherwise the production base is used
    ///
    /// `JANGLE_SPACE_URL` overrides the hosted space.
    pub fn from_env() -> Self {
        let development = env::var("JANGLE_ENV")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        let mut config = Self::default().with_development(development);
        if let Ok(base) = env::var("JANGLE_API_BASE") {
            config.api_base = base;
        }
        if let Ok(space) = env::var("JANGLE_SPACE_URL") {
            config.space_url = space;
        }
        log::debug!("Resolved client config: {:?}", config);
        config
    }

    /// Points the multipart endpoint at the local development server when `development` is set
    pub fn with_development(mut self, development: bool) -> Self {
        if development {
            self.api_base = DEV_API_BASE.to_string();
        }
        self
    }

    /// Full URL of the multipart prediction endpoint
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), PREDICT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url() {
        let config = ClientConfig {
            api_base: "http://example.test/".into(),
            ..ClientConfig::default()
        };
        assert_eq!(config.predict_url(), "http://example.test/api/predict");
    }

    #[test]
    fn test_development_endpoint() {
        let config = ClientConfig::default().with_development(true);
        assert_eq!(config.predict_url(), "http://127.0.0.1:5000/api/predict");

        let config = ClientConfig::default().with_development(false);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_from_env() {
        env::set_var("JANGLE_ENV", "development");
        env::remove_var("JANGLE_API_BASE");
        let config = ClientConfig::from_env();
        assert_eq!(config.api_base, DEV_API_BASE);

        env::set_var("JANGLE_API_BASE", "http://override.test");
        let config = ClientConfig::from_env();
        assert_eq!(config.api_base, "http://override.test");

        env::remove_var("JANGLE_ENV");
        env::remove_var("JANGLE_API_BASE");
    }

    #[test]
    fn test_parse_strategy_and_mode() {
        assert_eq!("rpc".parse::<TransportStrategy>(), Ok(TransportStrategy::RpcPredict));
        assert_eq!("Multipart".parse::<TransportStrategy>(), Ok(TransportStrategy::MultipartPost));
        assert!("carrier-pigeon".parse::<TransportStrategy>().is_err());
        assert_eq!("url".parse::<InputMode>(), Ok(InputMode::UrlOnly));
        assert_eq!(InputMode::default(), InputMode::Tabbed);
    }
}
