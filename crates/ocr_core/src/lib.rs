//! OCR client core: pure state machine and view-model helpers.
mod document;
mod effect;
mod msg;
mod options;
mod result;
mod state;
mod update;
mod view_model;

pub use document::{mime_type_for, SelectedDocument, ACCEPTED_EXTENSIONS, PDF_MIME};
pub use effect::{Effect, ExtractionRequest};
pub use msg::Msg;
pub use options::{ExtractionOptions, Language};
pub use result::{
    Dimensions, DocumentMetadata, ExtractionError, ExtractionResult, FALLBACK_ERROR_MESSAGE,
    NO_DOCUMENT_MESSAGE,
};
pub use state::{
    AckId, AppState, Preview, RequestId, RequestLifecycle, SelectionId, ServiceInfo,
    COPY_ACK_DURATION,
};
pub use update::update;
pub use view_model::{
    format_confidence, format_processing_time, AppViewModel, DocumentView, MetadataRow,
    ResultPanel, ResultView, SUBMIT_LABEL, SUBMIT_LABEL_PENDING,
};
