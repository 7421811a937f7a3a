use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use ocr_logging::{ocr_debug, ocr_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, OcrService, ReqwestOcrClient};
use crate::persist::AtomicFileWriter;
use crate::preview::run_preview;
use crate::{EngineEvent, RequestId, SelectionId, ServiceError, UploadRequest};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot build OCR client: {0}")]
    Client(#[from] ServiceError),
    #[error("cannot start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Extract {
        request_id: RequestId,
        upload: UploadRequest,
    },
    Preview {
        selection_id: SelectionId,
        mime_type: String,
        content: Bytes,
    },
    CancelPreview {
        selection_id: SelectionId,
    },
    CheckHealth,
    ListLanguages,
    SaveText {
        dir: PathBuf,
        filename: String,
        text: String,
    },
}

/// Handle to the background IO thread. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let service = ReqwestOcrClient::new(settings)?;
        Self::with_service(Arc::new(service))
    }

    pub fn with_service(service: Arc<dyn OcrService>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let mut current_preview: Option<(SelectionId, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Preview {
                        selection_id,
                        mime_type,
                        content,
                    } => {
                        // Only one selection exists at a time.
                        if let Some((_, previous)) = current_preview.take() {
                            previous.cancel();
                        }
                        let token = CancellationToken::new();
                        current_preview = Some((selection_id, token.clone()));
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            match run_preview(token, mime_type, content).await {
                                Some(data_url) => {
                                    let _ = event_tx.send(EngineEvent::PreviewCompleted {
                                        selection_id,
                                        data_url,
                                    });
                                }
                                None => ocr_debug!("Preview {} cancelled", selection_id),
                            }
                        });
                    }
                    EngineCommand::CancelPreview { selection_id } => {
                        if matches!(&current_preview, Some((id, _)) if *id == selection_id) {
                            if let Some((_, token)) = current_preview.take() {
                                token.cancel();
                            }
                        }
                    }
                    other => {
                        let service = service.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_command(service.as_ref(), other, event_tx).await;
                        });
                    }
                }
            }
            ocr_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn extract(&self, request_id: RequestId, upload: UploadRequest) {
        self.send(EngineCommand::Extract { request_id, upload });
    }

    pub fn start_preview(
        &self,
        selection_id: SelectionId,
        mime_type: impl Into<String>,
        content: Bytes,
    ) {
        self.send(EngineCommand::Preview {
            selection_id,
            mime_type: mime_type.into(),
            content,
        });
    }

    pub fn cancel_preview(&self, selection_id: SelectionId) {
        self.send(EngineCommand::CancelPreview { selection_id });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn list_languages(&self) {
        self.send(EngineCommand::ListLanguages);
    }

    pub fn save_text(&self, dir: PathBuf, filename: impl Into<String>, text: impl Into<String>) {
        self.send(EngineCommand::SaveText {
            dir,
            filename: filename.into(),
            text: text.into(),
        });
    }

    /// Waits for the next event. `Disconnected` means the engine thread is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        let event_rx = self
            .event_rx
            .lock()
            .map_err(|_| mpsc::RecvTimeoutError::Disconnected)?;
        event_rx.recv_timeout(timeout)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            ocr_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    service: &dyn OcrService,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Extract { request_id, upload } => EngineEvent::ExtractionCompleted {
            request_id,
            result: service.extract(&upload).await,
        },
        EngineCommand::CheckHealth => EngineEvent::HealthCompleted {
            result: service.health_check().await,
        },
        EngineCommand::ListLanguages => EngineEvent::LanguagesCompleted {
            result: service.supported_languages().await,
        },
        EngineCommand::SaveText {
            dir,
            filename,
            text,
        } => {
            let written = tokio::task::spawn_blocking(move || {
                AtomicFileWriter::new(dir)
                    .write(&filename, &text)
                    .map_err(|err| err.to_string())
            })
            .await;
            EngineEvent::SaveCompleted {
                result: written.unwrap_or_else(|err| Err(err.to_string())),
            }
        }
        EngineCommand::Preview { .. } | EngineCommand::CancelPreview { .. } => return,
    };
    let _ = event_tx.send(event);
}
