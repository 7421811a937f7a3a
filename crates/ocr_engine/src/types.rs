use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use serde::{Deserialize, Deserializer};

pub type RequestId = u64;
pub type SelectionId = u64;

/// One document upload plus the form fields sent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub content: Bytes,
    pub language: String,
    /// `None` omits the `save_to_db` field entirely.
    pub save_to_db: Option<bool>,
}

/// Success body of the extraction endpoint, taken as-is from the top level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OcrResponse {
    pub text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(
        default,
        rename = "processingTime",
        alias = "processing_time",
        deserialize_with = "lenient_f64"
    )]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "fileSize", alias = "file_size")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub dimensions: Option<ResponseDimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResponseDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupportedLanguages {
    pub languages: Vec<String>,
}

/// Accepts numbers and numeric strings; anything else reads as absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    })
}

/// Structured fields of a non-2xx response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPayload {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorPayload {
    /// Best-effort parse; returns `None` unless the body is a JSON object.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let object = value.as_object()?;
        Some(Self {
            error: object.get("error").and_then(field_text),
            message: object.get("message").and_then(field_text),
        })
    }
}

fn field_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
    pub payload: Option<ErrorPayload>,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            payload: None,
        }
    }

    pub(crate) fn http_status(status: reqwest::StatusCode, payload: Option<ErrorPayload>) -> Self {
        Self {
            kind: FailureKind::HttpStatus(status.as_u16()),
            message: status.to_string(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    Network,
    Timeout,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ExtractionCompleted {
        request_id: RequestId,
        result: Result<OcrResponse, ServiceError>,
    },
    PreviewCompleted {
        selection_id: SelectionId,
        data_url: Option<String>,
    },
    HealthCompleted {
        result: Result<HealthStatus, ServiceError>,
    },
    LanguagesCompleted {
        result: Result<SupportedLanguages, ServiceError>,
    },
    SaveCompleted {
        result: Result<PathBuf, String>,
    },
}
