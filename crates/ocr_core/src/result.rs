use std::fmt;

/// Shown when no more specific failure message is available.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred during text extraction";

/// Shown when extraction is requested before a document was selected.
pub const NO_DOCUMENT_MESSAGE: &str = "Please select a file first";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentMetadata {
    pub filename: Option<String>,
    pub file_size: Option<u64>,
    pub dimensions: Option<Dimensions>,
}

/// Text and metadata returned by a successful extraction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionResult {
    pub text: String,
    /// Percentage in `[0, 100]`.
    pub confidence: Option<f64>,
    pub detected_language: Option<String>,
    pub processing_time_seconds: Option<f64>,
    pub metadata: Option<DocumentMetadata>,
}

/// Why an extraction did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No response was received.
    Network { message: String },
    /// The service answered outside 2xx. `error`/`message` come from its JSON body, if any.
    Server {
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },
    /// Rejected locally, or the response did not have the expected shape.
    Validation { message: String },
}

impl ExtractionError {
    pub fn no_document() -> Self {
        Self::Validation {
            message: NO_DOCUMENT_MESSAGE.to_string(),
        }
    }

    /// Message shown to the user.
    ///
    /// Priority: server `error` field, server `message` field, transport message,
    /// then [`FALLBACK_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        let chosen = match self {
            ExtractionError::Server { error, message, .. } => {
                non_blank(error.as_deref()).or_else(|| non_blank(message.as_deref()))
            }
            ExtractionError::Network { message } | ExtractionError::Validation { message } => {
                non_blank(Some(message))
            }
        };
        chosen.unwrap_or(FALLBACK_ERROR_MESSAGE).to_string()
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Network { message } => write!(f, "network error: {message}"),
            ExtractionError::Server { status, .. } => {
                write!(f, "server error {status}: {}", self.user_message())
            }
            ExtractionError::Validation { message } => write!(f, "validation error: {message}"),
        }
    }
}

impl std::error::Error for ExtractionError {}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ExtractionError, FALLBACK_ERROR_MESSAGE, NO_DOCUMENT_MESSAGE};

    fn server(error: Option<&str>, message: Option<&str>) -> ExtractionError {
        ExtractionError::Server {
            status: 500,
            error: error.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn server_error_field_wins() {
        let err = server(Some("unsupported format"), Some("ignored"));
        assert_eq!(err.user_message(), "unsupported format");
    }

    #[test]
    fn server_message_used_when_error_missing_or_blank() {
        assert_eq!(server(None, Some("try later")).user_message(), "try later");
        assert_eq!(server(Some("  "), Some("try later")).user_message(), "try later");
    }

    #[test]
    fn server_without_body_falls_back() {
        assert_eq!(server(None, None).user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn network_uses_transport_message() {
        let err = ExtractionError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.user_message(), "connection refused");

        let empty = ExtractionError::Network {
            message: String::new(),
        };
        assert_eq!(empty.user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn no_document_is_a_validation_error() {
        assert_eq!(
            ExtractionError::no_document().user_message(),
            NO_DOCUMENT_MESSAGE
        );
    }
}
