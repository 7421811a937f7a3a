use crate::{
    AppState, Effect, ExtractionError, ExtractionOptions, ExtractionRequest, Msg, Preview,
    RequestLifecycle, COPY_ACK_DURATION,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(document) => {
            let mut effects = cancel_running_preview(&state);
            state.set_notice(None);
            let wants_preview = document.is_image();
            let selection_id = state.select_document(document.clone());
            if wants_preview {
                effects.push(Effect::StartPreview {
                    selection_id,
                    document,
                });
            }
            effects
        }
        Msg::FileCleared => {
            let effects = cancel_running_preview(&state);
            state.set_notice(None);
            state.clear_document();
            effects
        }
        Msg::PreviewReady {
            selection_id,
            data_url,
        } => {
            // Late previews for an older selection are dropped.
            if selection_id == state.selection_id() && *state.preview() == Preview::Loading {
                state.set_preview(match data_url {
                    Some(url) => Preview::Image(url),
                    None => Preview::Unavailable,
                });
            }
            Vec::new()
        }
        Msg::LanguageChanged(language) => {
            state.set_options(ExtractionOptions {
                language,
                ..state.options()
            });
            Vec::new()
        }
        Msg::PersistChanged(persist) => {
            state.set_options(ExtractionOptions {
                persist,
                ..state.options()
            });
            Vec::new()
        }
        Msg::ExtractClicked => {
            if state.is_pending() {
                return (state, Vec::new());
            }
            let Some(document) = state.document().cloned() else {
                state.set_notice(Some(ExtractionError::no_document().user_message()));
                return (state, Vec::new());
            };
            state.set_notice(None);
            let request = ExtractionRequest {
                document,
                options: state.options(),
            };
            let request_id = state.begin_request();
            vec![Effect::SubmitExtraction {
                request_id,
                request,
            }]
        }
        Msg::ExtractionFinished {
            request_id,
            outcome,
        } => {
            // Only the response to the current pending request may land.
            if state.pending_request() == Some(request_id) {
                state.finish_request(match outcome {
                    Ok(result) => RequestLifecycle::Succeeded(result),
                    Err(err) => RequestLifecycle::Failed(err.user_message()),
                });
            }
            Vec::new()
        }
        Msg::CopyClicked => match state.result().map(|result| result.text.clone()) {
            Some(text) => {
                let ack_id = state.acknowledge_copy();
                vec![
                    Effect::CopyToClipboard { text },
                    Effect::ScheduleCopyReset {
                        ack_id,
                        after: COPY_ACK_DURATION,
                    },
                ]
            }
            None => Vec::new(),
        },
        Msg::CopyAckExpired { ack_id } => {
            state.expire_copy_ack(ack_id);
            Vec::new()
        }
        Msg::DownloadClicked => match state.result().map(|result| result.text.clone()) {
            Some(text) => vec![Effect::SaveText {
                source_name: state.document().map(|doc| doc.file_name.clone()),
                text,
            }],
            None => Vec::new(),
        },
        Msg::DownloadFinished { outcome } => {
            state.set_notice(Some(match outcome {
                Ok(path) => format!("Saved extracted text to {path}"),
                Err(message) => format!("Could not save extracted text: {message}"),
            }));
            Vec::new()
        }
        Msg::HealthCheckRequested => vec![Effect::CheckHealth],
        Msg::LanguagesRequested => vec![Effect::ListLanguages],
        Msg::ServiceInfoReceived(info) => {
            state.set_service_info(info);
            Vec::new()
        }
    };

    (state, effects)
}

fn cancel_running_preview(state: &AppState) -> Vec<Effect> {
    if *state.preview() == Preview::Loading {
        vec![Effect::CancelPreview {
            selection_id: state.selection_id(),
        }]
    } else {
        Vec::new()
    }
}
