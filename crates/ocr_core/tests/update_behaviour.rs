use std::sync::Once;

use ocr_core::{
    update, AppState, Effect, ExtractionOptions, ExtractionRequest, Language, Msg, Preview,
    ResultPanel, SelectedDocument, NO_DOCUMENT_MESSAGE, SUBMIT_LABEL, SUBMIT_LABEL_PENDING,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ocr_logging::initialize_for_tests);
}

fn png(name: &str) -> SelectedDocument {
    SelectedDocument::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn pdf(name: &str) -> SelectedDocument {
    SelectedDocument::new(name, "application/pdf", b"%PDF-1.7".to_vec())
}

#[test]
fn selecting_image_starts_preview() {
    init_logging();
    let doc = png("scan.png");
    let (mut state, effects) = update(AppState::new(), Msg::FileSelected(doc.clone()));

    assert_eq!(
        effects,
        vec![Effect::StartPreview {
            selection_id: 1,
            document: doc,
        }]
    );
    let view = state.view();
    assert_eq!(view.preview, Preview::Loading);
    assert_eq!(view.document.as_ref().unwrap().file_name, "scan.png");
    assert_eq!(view.document.as_ref().unwrap().size, 4);
    assert_eq!(
        view.status_line.as_deref(),
        Some("Ready to extract text from scan.png")
    );
    assert!(state.consume_dirty());
}

#[test]
fn selecting_pdf_uses_placeholder_without_preview_task() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FileSelected(pdf("report.pdf")));

    assert!(effects.is_empty());
    assert_eq!(state.view().preview, Preview::Placeholder);
}

#[test]
fn new_selection_replaces_previous_and_cancels_its_preview() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(png("first.png")));
    let second = png("second.png");
    let (state, effects) = update(state, Msg::FileSelected(second.clone()));

    assert_eq!(
        effects,
        vec![
            Effect::CancelPreview { selection_id: 1 },
            Effect::StartPreview {
                selection_id: 2,
                document: second,
            },
        ]
    );
    assert_eq!(state.document().unwrap().file_name, "second.png");
}

#[test]
fn stale_preview_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(png("first.png")));
    let (state, _) = update(state, Msg::FileSelected(png("second.png")));

    let (state, _) = update(
        state,
        Msg::PreviewReady {
            selection_id: 1,
            data_url: Some("data:image/png;base64,AAAA".to_string()),
        },
    );
    assert_eq!(state.view().preview, Preview::Loading);

    let (state, _) = update(
        state,
        Msg::PreviewReady {
            selection_id: 2,
            data_url: Some("data:image/png;base64,BBBB".to_string()),
        },
    );
    assert_eq!(
        state.view().preview,
        Preview::Image("data:image/png;base64,BBBB".to_string())
    );
}

#[test]
fn failed_preview_keeps_selection() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(png("scan.png")));
    let (state, _) = update(
        state,
        Msg::PreviewReady {
            selection_id: 1,
            data_url: None,
        },
    );

    let view = state.view();
    assert_eq!(view.preview, Preview::Unavailable);
    assert!(view.can_submit);
}

#[test]
fn clear_drops_document_and_cancels_preview() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(png("scan.png")));
    let (state, effects) = update(state, Msg::FileCleared);

    assert_eq!(effects, vec![Effect::CancelPreview { selection_id: 1 }]);
    let view = state.view();
    assert_eq!(view.document, None);
    assert_eq!(view.preview, Preview::None);
    assert_eq!(view.panel, ResultPanel::Empty);
    assert_eq!(view.status_line, None);
    assert!(!view.can_submit);
}

#[test]
fn extract_without_document_prompts_and_emits_nothing() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ExtractClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.notice.as_deref(), Some(NO_DOCUMENT_MESSAGE));
    assert_eq!(view.panel, ResultPanel::Empty);
}

#[test]
fn submission_carries_document_and_current_options() {
    init_logging();
    let doc = pdf("report.pdf");
    let (state, _) = update(AppState::new(), Msg::FileSelected(doc.clone()));
    let (state, _) = update(state, Msg::LanguageChanged(Language::UzbekCyrillic));
    let (state, _) = update(state, Msg::PersistChanged(Some(true)));
    let (_state, effects) = update(state, Msg::ExtractClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitExtraction {
            request_id: 1,
            request: ExtractionRequest {
                document: doc,
                options: ExtractionOptions {
                    language: Language::UzbekCyrillic,
                    persist: Some(true),
                },
            },
        }]
    );
}

#[test]
fn unset_persist_is_forwarded_as_none() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(pdf("a.pdf")));
    let (state, _) = update(state, Msg::PersistChanged(None));
    let (_state, effects) = update(state, Msg::ExtractClicked);

    match effects.as_slice() {
        [Effect::SubmitExtraction { request, .. }] => assert_eq!(request.options.persist, None),
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn submit_control_follows_document_and_pending() {
    init_logging();
    let state = AppState::new();
    assert!(!state.view().can_submit);

    let (state, _) = update(state, Msg::FileSelected(pdf("a.pdf")));
    let view = state.view();
    assert!(view.can_submit);
    assert_eq!(view.submit_label, SUBMIT_LABEL);

    let (state, _) = update(state, Msg::ExtractClicked);
    let view = state.view();
    assert!(!view.can_submit);
    assert_eq!(view.submit_label, SUBMIT_LABEL_PENDING);
    assert_eq!(view.panel, ResultPanel::Loading);
}

#[test]
fn extract_while_pending_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(pdf("a.pdf")));
    let (mut state, _) = update(state, Msg::ExtractClicked);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::ExtractClicked);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(state.is_pending());
}

#[test]
fn options_change_marks_dirty_only_when_different() {
    init_logging();
    let mut state = AppState::new();
    let (mut state2, _) = update(state.clone(), Msg::LanguageChanged(Language::English));
    assert!(!state.consume_dirty());
    assert!(!state2.consume_dirty());

    let (mut state3, _) = update(state2, Msg::LanguageChanged(Language::Korean));
    assert!(state3.consume_dirty());
    assert_eq!(state3.view().language, Language::Korean);
}

#[test]
fn service_queries_emit_effects_and_store_answers() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::HealthCheckRequested);
    assert_eq!(effects, vec![Effect::CheckHealth]);

    let (state, effects) = update(state, Msg::LanguagesRequested);
    assert_eq!(effects, vec![Effect::ListLanguages]);

    let info = ocr_core::ServiceInfo::Languages(vec!["eng".to_string(), "rus".to_string()]);
    let (state, _) = update(state, Msg::ServiceInfoReceived(info.clone()));
    assert_eq!(state.view().service_info, Some(info));
}
