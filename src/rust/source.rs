use std::path::Path;

use base64::Engine as _;
use log::{debug, info};

use crate::classifier::error::{describe, ClassifyError, SELECT_IMAGE_FILE};

/// An image the user picked from local storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads `path` and guesses its MIME type from the extension.
    ///
    /// Unknown extensions come back as `application/octet-stream`, which
    /// [`ImageFile::is_image`] rejects.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Loaded {} ({} bytes, {})", name, bytes.len(), mime_type);
        Ok(Self::new(name, mime_type.essence_str(), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Materializes the bytes as a `data:` URL usable as a preview reference
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.bytes)
    }

    pub(crate) fn ensure_image(&self) -> Result<(), ClassifyError> {
        if self.is_image() {
            Ok(())
        } else {
            Err(ClassifyError::InvalidInput(SELECT_IMAGE_FILE.to_string()))
        }
    }
}

/// Where the image for a request comes from. Exactly one is active per request.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File(ImageFile),
    Url(String),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::File(_) => "file",
            ImageSource::Url(_) => "url",
        }
    }
}

/// Resolved bytes ready for transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

impl ImagePayload {
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.content_type, &self.bytes)
    }

    /// Resolves a source into bytes. URL sources are fetched; file sources are used as-is.
    pub(crate) async fn resolve(
        http: &reqwest::Client,
        source: &ImageSource,
    ) -> Result<Self, ClassifyError> {
        match source {
            ImageSource::File(file) => Ok(Self {
                bytes: file.bytes.clone(),
                content_type: file.mime_type.clone(),
                file_name: file.name.clone(),
            }),
            ImageSource::Url(address) => Self::fetch(http, address).await,
        }
    }

    async fn fetch(http: &reqwest::Client, address: &str) -> Result<Self, ClassifyError> {
        info!("Fetching image from URL: {}", address);
        let response = http
            .get(address)
            .send()
            .await
            .map_err(|e| ClassifyError::Fetch(describe(&e)))?;
        debug!("Image response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ClassifyError::Fetch(response.status().as_u16().to_string()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| {
                mime_guess::from_path(address)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });
        let file_name = file_name_from_url(address);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClassifyError::Fetch(describe(&e)))?;
        debug!("Fetched {} bytes ({})", bytes.len(), content_type);

        Ok(Self {
            bytes: bytes.to_vec(),
            content_type,
            file_name,
        })
    }
}

fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, b64)
}

fn file_name_from_url(address: &str) -> String {
    address
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("image")
        .to_string()
}
