//! OCR client engine: HTTP adapter, background IO and file output.
mod client;
mod engine;
mod filename;
mod persist;
mod preview;
mod types;

pub use client::{
    form_fields, ClientSettings, OcrService, ReqwestOcrClient, BASE_URL_ENV, DEFAULT_BASE_URL,
    EXTRACT_PATH, FILE_FIELD, HEALTH_PATH, LANGUAGES_PATH, LANGUAGE_FIELD, SAVE_TO_DB_FIELD,
};
pub use engine::{EngineError, EngineHandle};
pub use filename::download_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use preview::{image_data_url, MAX_PREVIEW_BYTES};
pub use types::{
    EngineEvent, ErrorPayload, FailureKind, HealthStatus, OcrResponse, RequestId,
    ResponseDimensions, ResponseMetadata, SelectionId, ServiceError, SupportedLanguages,
    UploadRequest,
};
