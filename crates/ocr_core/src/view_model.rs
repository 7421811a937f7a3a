use crate::{AppState, ExtractionResult, Language, Preview, RequestLifecycle, ServiceInfo};

pub const SUBMIT_LABEL: &str = "Extract Text";
pub const SUBMIT_LABEL_PENDING: &str = "Extracting...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Extracted text, verbatim.
    pub text: String,
    pub confidence: Option<String>,
    pub processing_time: Option<String>,
    pub detected_language: Option<String>,
    pub metadata: Vec<MetadataRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultPanel {
    #[default]
    Empty,
    Loading,
    Error(String),
    Result(ResultView),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub document: Option<DocumentView>,
    pub preview: Preview,
    pub language: Language,
    pub persist: Option<bool>,
    pub can_submit: bool,
    pub submit_label: &'static str,
    pub panel: ResultPanel,
    /// Action bar line: readiness or the current error.
    pub status_line: Option<String>,
    pub copied: bool,
    pub notice: Option<String>,
    pub service_info: Option<ServiceInfo>,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let document = state.document().map(|doc| DocumentView {
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.clone(),
            size: doc.size(),
        });

        let panel = match state.lifecycle() {
            RequestLifecycle::Idle => ResultPanel::Empty,
            RequestLifecycle::Pending { .. } => ResultPanel::Loading,
            RequestLifecycle::Failed(message) => ResultPanel::Error(message.clone()),
            RequestLifecycle::Succeeded(result) => ResultPanel::Result(result_view(result)),
        };

        let status_line = match (&panel, &document) {
            (ResultPanel::Error(message), _) => Some(format!("Error: {message}")),
            (_, Some(doc)) => Some(format!("Ready to extract text from {}", doc.file_name)),
            _ => None,
        };

        let options = state.options();
        Self {
            document,
            preview: state.preview().clone(),
            language: options.language,
            persist: options.persist,
            can_submit: state.can_submit(),
            submit_label: if state.is_pending() {
                SUBMIT_LABEL_PENDING
            } else {
                SUBMIT_LABEL
            },
            panel,
            status_line,
            copied: state.copy_ack().is_some(),
            notice: state.notice().map(str::to_string),
            service_info: state.service_info().cloned(),
        }
    }
}

fn result_view(result: &ExtractionResult) -> ResultView {
    let mut metadata = Vec::new();
    if let Some(meta) = &result.metadata {
        if let Some(filename) = &meta.filename {
            metadata.push(MetadataRow {
                label: "File",
                value: filename.clone(),
            });
        }
        if let Some(size) = meta.file_size {
            metadata.push(MetadataRow {
                label: "File size",
                value: format!("{size} bytes"),
            });
        }
        if let Some(dim) = meta.dimensions {
            metadata.push(MetadataRow {
                label: "Dimensions",
                value: format!("{}x{}", dim.width, dim.height),
            });
        }
    }

    ResultView {
        text: result.text.clone(),
        confidence: result.confidence.map(format_confidence),
        processing_time: result.processing_time_seconds.map(format_processing_time),
        detected_language: result
            .detected_language
            .clone()
            .filter(|lang| !lang.is_empty()),
        metadata,
    }
}

/// One decimal place, as a percentage: `97.25 -> "97.3%"`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", round_half_away(confidence, 10.0))
}

/// Two decimal places, in seconds: `1.234 -> "1.23s"`.
pub fn format_processing_time(seconds: f64) -> String {
    format!("{:.2}s", round_half_away(seconds, 100.0))
}

// `format!` rounds the binary value, which turns 97.25 into "97.2".
fn round_half_away(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::{format_confidence, format_processing_time};

    #[test]
    fn confidence_has_one_decimal() {
        assert_eq!(format_confidence(97.25), "97.3%");
        assert_eq!(format_confidence(100.0), "100.0%");
        assert_eq!(format_confidence(0.04), "0.0%");
    }

    #[test]
    fn processing_time_has_two_decimals() {
        assert_eq!(format_processing_time(1.234), "1.23s");
        assert_eq!(format_processing_time(0.5), "0.50s");
    }
}
