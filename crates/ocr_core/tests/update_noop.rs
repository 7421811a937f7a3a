use ocr_core::{update, AppState, ExtractionResult, Msg};

#[test]
fn copy_without_result_is_noop() {
    let mut state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::CopyClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(!next.consume_dirty());
}

#[test]
fn download_without_result_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::DownloadClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn response_without_request_changes_nothing() {
    let state = AppState::new();
    let (mut next, effects) = update(
        state.clone(),
        Msg::ExtractionFinished {
            request_id: 7,
            outcome: Ok(ExtractionResult::default()),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
