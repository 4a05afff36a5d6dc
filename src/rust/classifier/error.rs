use std::io;

pub(crate) const SELECT_IMAGE_FILE: &str = "Please select an image file";
pub(crate) const ENTER_IMAGE_URL: &str = "Please enter an image URL";
pub(crate) const UNEXPECTED_FORMAT: &str = "Unexpected response format from API";
pub(crate) const TIMED_OUT: &str = "Request timed out";

/// Represents the different ways a classification request can fail.
///
/// Every variant is terminal for the request that produced it. Nothing is
/// retried, and the message is shown to the user as `Error: <message>`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    /// User-correctable input problem (empty URL, non-image file, nothing selected)
    #[error("{0}")]
    InvalidInput(String),
    /// Dereferencing an image URL failed
    #[error("Failed to fetch image: {0}")]
    Fetch(String),
    /// The classification endpoint was unreachable, answered with a
    /// non-success status, or reported an explicit error
    #[error("{0}")]
    Transport(String),
    /// A response arrived but did not have the expected shape
    #[error("{0}")]
    UnexpectedResponse(String),
}

impl ClassifyError {
    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        ClassifyError::Transport(format!("API request failed: {}", status.as_u16()))
    }

    pub(crate) fn unexpected() -> Self {
        ClassifyError::UnexpectedResponse(UNEXPECTED_FORMAT.to_string())
    }

    /// The line shown to the user for this error
    pub fn user_message(&self) -> String {
        format!("Error: {}", self)
    }
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClassifyError::UnexpectedResponse(format!("{}: {}", UNEXPECTED_FORMAT, err))
        } else {
            ClassifyError::Transport(describe(&err))
        }
    }
}

/// Readable text for a failed HTTP call; timeouts name themselves instead of the URL
pub(crate) fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        TIMED_OUT.to_string()
    } else {
        err.to_string()
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(err: serde_json::Error) -> Self {
        ClassifyError::UnexpectedResponse(format!("{}: {}", UNEXPECTED_FORMAT, err))
    }
}

impl From<io::Error> for ClassifyError {
    fn from(err: io::Error) -> Self {
        ClassifyError::InvalidInput(format!("Could not read image file: {}", err))
    }
}
