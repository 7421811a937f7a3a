use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use ocr_core::{
    Dimensions, DocumentMetadata, Effect, ExtractionError, ExtractionRequest, ExtractionResult,
    Msg, ServiceInfo,
};
use ocr_engine::{
    download_filename, EngineEvent, EngineHandle, FailureKind, OcrResponse, ServiceError,
    UploadRequest,
};
use ocr_logging::{ocr_info, ocr_warn};

use super::app::AppEvent;
use super::clipboard;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Executes core effects against the engine and feeds results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    download_dir: PathBuf,
    event_tx: mpsc::Sender<AppEvent>,
    clipboard: Mutex<Box<dyn Write + Send>>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        download_dir: PathBuf,
        event_tx: mpsc::Sender<AppEvent>,
        clipboard: Box<dyn Write + Send>,
    ) -> Self {
        let runner = Self {
            engine,
            download_dir,
            event_tx,
            clipboard: Mutex::new(clipboard),
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPreview {
                    selection_id,
                    document,
                } => {
                    self.engine
                        .start_preview(selection_id, document.mime_type, document.content);
                }
                Effect::CancelPreview { selection_id } => {
                    self.engine.cancel_preview(selection_id);
                }
                Effect::SubmitExtraction {
                    request_id,
                    request,
                } => {
                    ocr_info!(
                        "SubmitExtraction request_id={} file={}",
                        request_id,
                        request.document.file_name
                    );
                    self.engine.extract(request_id, to_upload(request));
                }
                Effect::CopyToClipboard { text } => {
                    if let Err(err) = self.copy(&text) {
                        ocr_warn!("Clipboard copy failed: {}", err);
                    }
                }
                Effect::ScheduleCopyReset { ack_id, after } => {
                    let event_tx = self.event_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = event_tx.send(AppEvent::Msg(Msg::CopyAckExpired { ack_id }));
                    });
                }
                Effect::SaveText { source_name, text } => {
                    let filename =
                        download_filename(source_name.as_deref(), Utc::now().timestamp_millis());
                    self.engine
                        .save_text(self.download_dir.clone(), filename, text);
                }
                Effect::CheckHealth => self.engine.check_health(),
                Effect::ListLanguages => self.engine.list_languages(),
            }
        }
    }

    fn copy(&self, text: &str) -> io::Result<()> {
        let mut out = self
            .clipboard
            .lock()
            .map_err(|_| io::Error::other("clipboard sink poisoned"))?;
        clipboard::write_osc52(&mut *out, text)
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let event_tx = self.event_tx.clone();
        thread::spawn(move || forward_events(|timeout| engine.recv_timeout(timeout), &event_tx));
    }
}

/// Forwards engine events as messages until either side goes away.
fn forward_events(
    mut next: impl FnMut(Duration) -> Result<EngineEvent, RecvTimeoutError>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    loop {
        match next(EVENT_POLL) {
            Ok(event) => {
                if event_tx.send(AppEvent::Msg(to_msg(event))).is_err() {
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                ocr_warn!("Engine event channel closed");
                let _ = event_tx.send(AppEvent::EngineStopped);
                return;
            }
        }
    }
}

fn to_upload(request: ExtractionRequest) -> UploadRequest {
    UploadRequest {
        file_name: request.document.file_name,
        mime_type: request.document.mime_type,
        content: request.document.content,
        language: request.options.language.code().to_string(),
        save_to_db: request.options.persist,
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ExtractionCompleted { request_id, result } => Msg::ExtractionFinished {
            request_id,
            outcome: result.map(to_result).map_err(|err| {
                ocr_warn!("Extraction {} failed: {}", request_id, err);
                to_error(err)
            }),
        },
        EngineEvent::PreviewCompleted {
            selection_id,
            data_url,
        } => Msg::PreviewReady {
            selection_id,
            data_url,
        },
        EngineEvent::HealthCompleted { result } => Msg::ServiceInfoReceived(match result {
            Ok(health) => ServiceInfo::Health {
                status: health.status,
                available: health.available,
            },
            Err(err) => ServiceInfo::Unreachable(err.to_string()),
        }),
        EngineEvent::LanguagesCompleted { result } => Msg::ServiceInfoReceived(match result {
            Ok(list) => ServiceInfo::Languages(list.languages),
            Err(err) => ServiceInfo::Unreachable(err.to_string()),
        }),
        EngineEvent::SaveCompleted { result } => Msg::DownloadFinished {
            outcome: result.map(|path| path.display().to_string()),
        },
    }
}

fn to_result(response: OcrResponse) -> ExtractionResult {
    ExtractionResult {
        text: response.text,
        confidence: response.confidence,
        detected_language: response.language,
        processing_time_seconds: response.processing_time,
        metadata: response.metadata.map(|meta| DocumentMetadata {
            filename: meta.filename,
            file_size: meta.file_size,
            dimensions: meta.dimensions.map(|dim| Dimensions {
                width: dim.width,
                height: dim.height,
            }),
        }),
    }
}

fn to_error(err: ServiceError) -> ExtractionError {
    match err.kind {
        FailureKind::HttpStatus(status) => {
            let payload = err.payload.unwrap_or_default();
            ExtractionError::Server {
                status,
                error: payload.error,
                message: payload.message,
            }
        }
        FailureKind::InvalidResponse | FailureKind::InvalidRequest => {
            ExtractionError::Validation {
                message: format!("{}: {}", err.kind, err.message),
            }
        }
        FailureKind::InvalidUrl
        | FailureKind::Network
        | FailureKind::Timeout
        | FailureKind::TooLarge { .. } => ExtractionError::Network {
            message: err.message,
        },
    }
}
