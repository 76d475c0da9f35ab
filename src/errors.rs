use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("image payload is empty")]
    Empty,
    #[error("image payload is not a base64 data URI")]
    NotDataUri,
    #[error("unsupported image type: {0}")]
    UnsupportedMimeType(String),
    #[error("image data is not valid base64")]
    InvalidBase64,
}

/// Failure reported by a generative model.
///
/// Callers can only tell overload apart from other failures by the
/// message text, so `Status` keeps the status line in its `Display`.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API credential is not configured")]
    MissingCredential,
    #[error("[{status}] {body}")]
    Status { status: StatusCode, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reply contained no text: {0}")]
    EmptyReply(String),
}

impl ProviderError {
    pub fn is_transient_overload(&self) -> bool {
        let message = self.to_string().to_lowercase();
        message.contains("unavailable") || message.contains("overloaded")
    }
}
