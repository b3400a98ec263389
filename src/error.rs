//! Error types shared across the crate.
//!
//! `AppError` covers everything that can go wrong inside the uploader itself
//! (I/O, HTTP transport, configuration, image decoding). `UploadError` is what
//! `FileQueueManager::upload` hands back to the host when the server refuses
//! the request.

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Image(err.to_string())
    }
}

/// Hosts render errors as plain strings.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Failure of an upload request.
///
/// A non-2xx response whose body is JSON becomes `Rejected`; any other body is
/// kept verbatim in `Opaque`. Failures before a response was received are
/// `Transport`.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload rejected with status {status}: {payload}")]
    Rejected {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("upload failed with status {status}: {text}")]
    Opaque { status: u16, text: String },

    #[error(transparent)]
    Transport(#[from] AppError),
}

impl UploadError {
    /// The message a host should show to the user.
    ///
    /// For JSON bodies this is the `message` field, if the server sent one.
    pub fn message(&self) -> Option<String> {
        match self {
            UploadError::Rejected { payload, .. } => payload
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string()),
            UploadError::Opaque { text, .. } => Some(text.clone()),
            UploadError::Transport(err) => Some(err.to_string()),
        }
    }

    /// HTTP status of the refused request, `None` if no response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Rejected { status, .. } | UploadError::Opaque { status, .. } => {
                Some(*status)
            }
            UploadError::Transport(_) => None,
        }
    }
}
