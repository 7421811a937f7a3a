use std::time::Duration;

use crate::{AckId, ExtractionOptions, RequestId, SelectedDocument, SelectionId};

/// Everything the service needs for one extraction. Built at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub document: SelectedDocument,
    pub options: ExtractionOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartPreview {
        selection_id: SelectionId,
        document: SelectedDocument,
    },
    CancelPreview {
        selection_id: SelectionId,
    },
    SubmitExtraction {
        request_id: RequestId,
        request: ExtractionRequest,
    },
    CopyToClipboard {
        text: String,
    },
    ScheduleCopyReset {
        ack_id: AckId,
        after: Duration,
    },
    SaveText {
        source_name: Option<String>,
        text: String,
    },
    CheckHealth,
    ListLanguages,
}
