use std::io::{self, BufRead, Write};
use std::mem;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use ocr_core::{
    update, AppState, AppViewModel, ExtractionResult, Language, Msg, RequestLifecycle, ServiceInfo,
};
use ocr_engine::EngineHandle;
use ocr_logging::{ocr_debug, ocr_info, ocr_warn};
use serde::Serialize;

use super::clipboard;
use super::commands::{parse_command, Command as UserCommand, HELP};
use super::effects::EffectRunner;
use super::picker::pick_document;
use super::render::{render, render_panel, service_label};
use crate::cli::{Cli, Command, ExtractArgs};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Input(String),
    InputClosed,
    /// The engine thread is gone; no further results will arrive.
    EngineStopped,
}

struct App {
    state: AppState,
    runner: EffectRunner,
    event_tx: mpsc::Sender<AppEvent>,
    event_rx: mpsc::Receiver<AppEvent>,
}

impl App {
    fn new(engine: EngineHandle, download_dir: PathBuf) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let runner = EffectRunner::new(
            engine,
            download_dir,
            event_tx.clone(),
            clipboard::terminal_sink(),
        );
        Self {
            state: AppState::new(),
            runner,
            event_tx,
            event_rx,
        }
    }

    /// Run one message through `update`, start its effects and return a fresh view when the state changed.
    fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        ocr_debug!("dispatch {:?}", MsgName(&msg));
        let state = mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    fn next_event(&self) -> anyhow::Result<AppEvent> {
        match self
            .event_rx
            .recv()
            .context("event channel closed unexpectedly")?
        {
            AppEvent::EngineStopped => anyhow::bail!("OCR engine stopped unexpectedly"),
            event => Ok(event),
        }
    }

    /// Pump engine messages until `is_last` matches one of them.
    fn wait_for(&mut self, is_last: impl Fn(&Msg) -> bool) -> anyhow::Result<()> {
        loop {
            if let AppEvent::Msg(msg) = self.next_event()? {
                let done = is_last(&msg);
                self.dispatch(msg);
                if done {
                    return Ok(());
                }
            }
        }
    }

    fn wait_while_pending(&mut self) -> anyhow::Result<()> {
        while self.state.is_pending() {
            if let AppEvent::Msg(msg) = self.next_event()? {
                self.dispatch(msg);
            }
        }
        Ok(())
    }
}

/// Compact message name for debug logs; file contents stay out of the log.
struct MsgName<'a>(&'a Msg);

impl std::fmt::Debug for MsgName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Msg::FileSelected(doc) => write!(f, "FileSelected({})", doc.file_name),
            Msg::PreviewReady { selection_id, .. } => write!(f, "PreviewReady({selection_id})"),
            Msg::ExtractionFinished { request_id, outcome } => write!(
                f,
                "ExtractionFinished({request_id}, ok={})",
                outcome.is_ok()
            ),
            other => write!(f, "{other:?}"),
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = cli.client_settings();
    ocr_info!("OCR service at {}", settings.base_url);
    let engine = EngineHandle::new(settings).context("starting OCR engine")?;

    match cli.cmd {
        Command::Extract(args) => run_extract(engine, &args),
        Command::Interactive { download_dir } => run_interactive(engine, download_dir),
        Command::Health => run_query(engine, Msg::HealthCheckRequested),
        Command::Languages => run_query(engine, Msg::LanguagesRequested),
    }
}

fn run_extract(engine: EngineHandle, args: &ExtractArgs) -> anyhow::Result<ExitCode> {
    let download_dir = args.download.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut app = App::new(engine, download_dir);

    let document = pick_document(&args.file)?;
    app.dispatch(Msg::FileSelected(document));
    app.dispatch(Msg::LanguageChanged(args.language));
    app.dispatch(Msg::PersistChanged(args.persist()));
    app.dispatch(Msg::ExtractClicked);
    app.wait_while_pending()?;

    let result = match app.state.lifecycle() {
        RequestLifecycle::Succeeded(result) => result.clone(),
        RequestLifecycle::Failed(message) => {
            eprintln!("Extraction Failed: {message}");
            return Ok(ExitCode::FAILURE);
        }
        RequestLifecycle::Idle | RequestLifecycle::Pending { .. } => {
            anyhow::bail!("extraction did not start")
        }
    };

    if args.json {
        let report = serde_json::to_string_pretty(&JsonReport::from(&result))?;
        println!("{report}");
    } else {
        print!("{}", render_panel(&app.state.view()));
    }

    if args.copy {
        app.dispatch(Msg::CopyClicked);
    }
    if args.download.is_some() {
        app.dispatch(Msg::DownloadClicked);
        app.wait_for(|msg| matches!(msg, Msg::DownloadFinished { .. }))?;
        if let Some(notice) = app.state.notice() {
            eprintln!("{notice}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_query(engine: EngineHandle, request: Msg) -> anyhow::Result<ExitCode> {
    let mut app = App::new(engine, PathBuf::from("."));
    app.dispatch(request);
    app.wait_for(|msg| matches!(msg, Msg::ServiceInfoReceived(_)))?;

    let Some(info) = app.state.service_info() else {
        anyhow::bail!("no answer from the OCR service");
    };
    match info {
        ServiceInfo::Languages(codes) => {
            for code in codes {
                match Language::from_code(code) {
                    Some(language) => println!("{code}\t{}", language.label()),
                    None => println!("{code}"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        ServiceInfo::Health { available, .. } => {
            println!("{}", service_label(info));
            Ok(if *available {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        ServiceInfo::Unreachable(message) => {
            eprintln!("OCR service unreachable: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_interactive(engine: EngineHandle, download_dir: PathBuf) -> anyhow::Result<ExitCode> {
    let mut app = App::new(engine, download_dir);
    spawn_input_reader(app.event_tx.clone());

    println!("{HELP}\n");
    show(&app.state.view());

    loop {
        match app.next_event()? {
            AppEvent::Msg(msg) => {
                if let Some(view) = app.dispatch(msg) {
                    show(&view);
                }
            }
            AppEvent::Input(line) => match parse_command(&line) {
                Ok(UserCommand::Quit) => break,
                Ok(UserCommand::Help) => {
                    println!("{HELP}");
                    prompt();
                }
                Ok(UserCommand::Status) => show(&app.state.view()),
                Ok(UserCommand::Open(path)) => match pick_document(&path) {
                    Ok(document) => {
                        if let Some(view) = app.dispatch(Msg::FileSelected(document)) {
                            show(&view);
                        }
                    }
                    Err(err) => {
                        println!("{err}");
                        prompt();
                    }
                },
                Ok(command) => {
                    let Some(msg) = command.as_msg() else {
                        prompt();
                        continue;
                    };
                    match app.dispatch(msg) {
                        Some(view) => show(&view),
                        None => prompt(),
                    }
                }
                Err(message) => {
                    println!("{message}");
                    prompt();
                }
            },
            AppEvent::InputClosed | AppEvent::EngineStopped => break,
        }
    }

    ocr_info!("Interactive session ended");
    Ok(ExitCode::SUCCESS)
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if event_tx.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    ocr_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

fn show(view: &AppViewModel) {
    println!("\n{}", render(view));
    prompt();
}

fn prompt() {
    let mut out = io::stdout().lock();
    let _ = write!(out, "> ");
    let _ = out.flush();
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    text: &'a str,
    confidence: Option<f64>,
    language: Option<&'a str>,
    #[serde(rename = "processingTime")]
    processing_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<JsonMetadata<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMetadata<'a> {
    filename: Option<&'a str>,
    file_size: Option<u64>,
    width: Option<u32>,
    height: Option<u32>,
}

impl<'a> From<&'a ExtractionResult> for JsonReport<'a> {
    fn from(result: &'a ExtractionResult) -> Self {
        Self {
            text: &result.text,
            confidence: result.confidence,
            language: result.detected_language.as_deref(),
            processing_time: result.processing_time_seconds,
            metadata: result.metadata.as_ref().map(|meta| JsonMetadata {
                filename: meta.filename.as_deref(),
                file_size: meta.file_size,
                width: meta.dimensions.map(|dim| dim.width),
                height: meta.dimensions.map(|dim| dim.height),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use ocr_core::{Dimensions, DocumentMetadata, ExtractionResult};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::JsonReport;

    #[test]
    fn json_report_uses_service_field_names() {
        let result = ExtractionResult {
            text: "Hello".to_string(),
            confidence: Some(88.5),
            detected_language: Some("eng".to_string()),
            processing_time_seconds: Some(1.5),
            metadata: Some(DocumentMetadata {
                filename: Some("a.png".to_string()),
                file_size: Some(42),
                dimensions: Some(Dimensions {
                    width: 10,
                    height: 20,
                }),
            }),
        };

        let value = serde_json::to_value(JsonReport::from(&result)).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "Hello",
                "confidence": 88.5,
                "language": "eng",
                "processingTime": 1.5,
                "metadata": {"filename": "a.png", "fileSize": 42, "width": 10, "height": 20}
            })
        );
    }

    #[test]
    fn json_report_omits_missing_metadata() {
        let result = ExtractionResult {
            text: "x".to_string(),
            ..ExtractionResult::default()
        };
        let value = serde_json::to_value(JsonReport::from(&result)).unwrap();
        assert!(value.get("metadata").is_none());
        assert_eq!(value["confidence"], serde_json::Value::Null);
    }
}
