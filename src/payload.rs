use crate::errors::PayloadError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Png,
    Jpeg,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
        }
    }
}

impl Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image/png" => Ok(MimeType::Png),
            "image/jpeg" | "image/jpg" => Ok(MimeType::Jpeg),
            _ => Err(PayloadError::UnsupportedMimeType(s.to_string())),
        }
    }
}

/// A still image taken from a `data:<mime>;base64,<data>` URI.
///
/// Only constructed through [`ImagePayload::from_data_uri`], so the body is
/// always non-empty, valid base64 and tagged with a supported type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: MimeType,
    data: String,
}

impl ImagePayload {
    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(PayloadError::Empty);
        }
        let rest = uri.strip_prefix("data:").ok_or(PayloadError::NotDataUri)?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or(PayloadError::NotDataUri)?;
        let mime_type: MimeType = mime_type.parse()?;
        if data.is_empty() {
            return Err(PayloadError::Empty);
        }
        STANDARD
            .decode(data)
            .map_err(|_| PayloadError::InvalidBase64)?;
        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }

    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    /// Base64 body without the data URI prefix.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl FromStr for ImagePayload {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_data_uri(s)
    }
}
