use log::{debug, info};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::error::ClassifyError;
use super::response::{normalize_flat, ClassificationResult};
use crate::source::ImagePayload;

/// Posts the image as multipart form data under the `file` field.
#[derive(Debug, Clone)]
pub(crate) struct MultipartTransport {
    http: reqwest::Client,
    predict_url: String,
}

impl MultipartTransport {
    pub(crate) fn new(http: reqwest::Client, predict_url: String) -> Self {
        Self { http, predict_url }
    }

    pub(crate) fn predict_url(&self) -> &str {
        &self.predict_url
    }

    pub(crate) async fn predict(&self, payload: ImagePayload) -> Result<ClassificationResult, ClassifyError> {
        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.content_type)?;
        let form = Form::new().part("file", part);

        info!("Posting image to {}", self.predict_url);
        let response = self.http.post(&self.predict_url).multipart(form).send().await?;
        debug!("Prediction response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ClassifyError::status(response.status()));
        }

        let body: Value = response.json().await?;
        debug!("API response: {}", body);
        normalize_flat(body)
    }
}
