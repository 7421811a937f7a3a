use std::fmt::Write as _;

use ocr_core::{AppViewModel, Preview, ResultPanel, ResultView, ServiceInfo};

/// Full screen: document, options, action bar and results.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    match &view.document {
        Some(doc) => {
            let _ = writeln!(
                out,
                "Document: {} ({}, {}) [{}]",
                doc.file_name,
                doc.mime_type,
                format_size(doc.size),
                preview_label(&view.preview)
            );
        }
        None => out.push_str("Document: none selected\n"),
    }

    let persist = match view.persist {
        Some(true) => "yes",
        Some(false) => "no",
        None => "not sent",
    };
    let _ = writeln!(out, "Language: {} | Save to database: {}", view.language, persist);

    let button = if view.can_submit { "enabled" } else { "disabled" };
    let _ = writeln!(out, "[{}] {}", view.submit_label, button);
    if let Some(status) = &view.status_line {
        let _ = writeln!(out, "{status}");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    if let Some(info) = &view.service_info {
        let _ = writeln!(out, "Service: {}", service_label(info));
    }

    out.push_str("----------------------------------------\n");
    out.push_str(&render_panel(view));
    out
}

/// Results area only.
pub fn render_panel(view: &AppViewModel) -> String {
    match &view.panel {
        ResultPanel::Empty => {
            "No results yet\nOpen a document and run `extract` to see results\n".to_string()
        }
        ResultPanel::Loading => {
            "Processing document...\nThis may take a few moments\n".to_string()
        }
        ResultPanel::Error(message) => format!("Extraction Failed\n{message}\n"),
        ResultPanel::Result(result) => render_result(result, view.copied),
    }
}

fn render_result(result: &ResultView, copied: bool) -> String {
    let mut out = String::from("Extraction Results");
    if copied {
        out.push_str(" (copied)");
    }
    out.push('\n');

    if let Some(confidence) = &result.confidence {
        let _ = writeln!(out, "Confidence: {confidence}");
    }
    if let Some(time) = &result.processing_time {
        let _ = writeln!(out, "Processing Time: {time}");
    }
    if let Some(language) = &result.detected_language {
        let _ = writeln!(out, "Language: {language}");
    }
    for row in &result.metadata {
        let _ = writeln!(out, "{}: {}", row.label, row.value);
    }

    out.push_str("--- Extracted Text ---\n");
    out.push_str(&result.text);
    if !result.text.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn preview_label(preview: &Preview) -> &'static str {
    match preview {
        Preview::None => "no preview",
        Preview::Loading => "preview loading",
        Preview::Image(_) => "image preview ready",
        Preview::Unavailable => "preview unavailable",
        Preview::Placeholder => "PDF document",
    }
}

pub(crate) fn service_label(info: &ServiceInfo) -> String {
    match info {
        ServiceInfo::Health { status, available } => {
            let availability = if *available { "available" } else { "unavailable" };
            format!("{status} ({availability})")
        }
        ServiceInfo::Languages(languages) => format!("languages {}", languages.join(", ")),
        ServiceInfo::Unreachable(message) => format!("unreachable: {message}"),
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KB", value / KIB)
    } else {
        format!("{:.1} MB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use ocr_core::{update, AppState, ExtractionResult, Msg, SelectedDocument};
    use pretty_assertions::assert_eq;

    use super::{format_size, render, render_panel};

    fn finished(result: ExtractionResult) -> AppState {
        let doc = SelectedDocument::new("scan.pdf", "application/pdf", vec![0u8; 2048]);
        let (state, _) = update(AppState::new(), Msg::FileSelected(doc));
        let (state, _) = update(state, Msg::ExtractClicked);
        let (state, _) = update(
            state,
            Msg::ExtractionFinished {
                request_id: 1,
                outcome: Ok(result),
            },
        );
        state
    }

    #[test]
    fn result_panel_shows_present_metadata_only() {
        let state = finished(ExtractionResult {
            text: "  keep   spacing\nline two".to_string(),
            confidence: Some(97.25),
            detected_language: Some("eng".to_string()),
            ..ExtractionResult::default()
        });

        assert_eq!(
            render_panel(&state.view()),
            "Extraction Results\n\
             Confidence: 97.3%\n\
             Language: eng\n\
             --- Extracted Text ---\n  keep   spacing\nline two\n"
        );
    }

    #[test]
    fn idle_screen_lists_options_and_disabled_button() {
        let screen = render(&AppState::new().view());
        assert!(screen.contains("Document: none selected"));
        assert!(screen.contains("Language: English (eng) | Save to database: no"));
        assert!(screen.contains("[Extract Text] disabled"));
        assert!(screen.contains("No results yet"));
    }

    #[test]
    fn selected_pdf_shows_placeholder_and_ready_line() {
        let doc = SelectedDocument::new("scan.pdf", "application/pdf", vec![0u8; 2048]);
        let (state, _) = update(AppState::new(), Msg::FileSelected(doc));
        let screen = render(&state.view());
        assert!(screen.contains("Document: scan.pdf (application/pdf, 2.0 KB) [PDF document]"));
        assert!(screen.contains("Ready to extract text from scan.pdf"));
        assert!(screen.contains("[Extract Text] enabled"));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
