use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use ocr_core::Language;
use ocr_engine::ClientSettings;
use ocr_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "ocr_client")]
#[command(about = "Extract text from images and PDFs with a remote OCR service")]
pub struct Cli {
    /// Base URL of the OCR service. Falls back to $OCR_API_URL, then http://localhost:8001.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(long, default_value_t = 10, global = true)]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value_t = 120, global = true)]
    pub request_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log_to: LogTarget,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract text from one document and print it.
    Extract(ExtractArgs),
    /// Line-driven session: open, extract, copy, save, ...
    Interactive {
        /// Where `save` writes downloaded text.
        #[arg(long, default_value = ".")]
        download_dir: PathBuf,
    },
    /// Ask the service whether OCR is available.
    Health,
    /// List the languages the service supports.
    Languages,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    pub file: PathBuf,

    #[arg(short, long, default_value = "eng", value_parser = parse_language)]
    pub language: Language,

    /// Ask the service to store the result (`true` or `false`).
    #[arg(long, action = ArgAction::Set, conflicts_with = "omit_save_to_db")]
    pub save_to_db: Option<bool>,

    /// Do not send the `save_to_db` field at all.
    #[arg(long)]
    pub omit_save_to_db: bool,

    /// Also save the text into this directory.
    #[arg(long)]
    pub download: Option<PathBuf>,

    /// Also copy the text to the terminal clipboard.
    #[arg(long)]
    pub copy: bool,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl ExtractArgs {
    pub fn persist(&self) -> Option<bool> {
        if self.omit_save_to_db {
            None
        } else {
            Some(self.save_to_db.unwrap_or(false))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
    None,
}

impl Cli {
    pub fn client_settings(&self) -> ClientSettings {
        let settings = match &self.api_url {
            Some(url) => ClientSettings::default().with_base_url(url.clone()),
            None => ClientSettings::from_env(),
        };
        ClientSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..settings
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_to {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::default_file(),
            LogTarget::Both => LogDestination::Both(ocr_logging::DEFAULT_LOG_FILE.into()),
            LogTarget::None => LogDestination::Off,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

pub fn parse_language(code: &str) -> Result<Language, String> {
    Language::from_code(code).ok_or_else(|| {
        let known: Vec<_> = Language::ALL.iter().map(|lang| lang.code()).collect();
        format!("unknown language `{code}` (expected one of {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use ocr_core::Language;

    fn extract_args(args: &[&str]) -> super::ExtractArgs {
        let mut argv = vec!["ocr_client", "extract"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).cmd {
            Command::Extract(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn extract_defaults_to_english_without_persisting() {
        let args = extract_args(&["scan.png"]);
        assert_eq!(args.language, Language::English);
        assert_eq!(args.persist(), Some(false));
    }

    #[test]
    fn persist_flag_variants() {
        assert_eq!(extract_args(&["a.pdf", "--save-to-db", "true"]).persist(), Some(true));
        assert_eq!(extract_args(&["a.pdf", "--omit-save-to-db"]).persist(), None);
    }

    #[test]
    fn language_codes_are_validated() {
        assert_eq!(
            extract_args(&["a.pdf", "-l", "uzb_cyrl"]).language,
            Language::UzbekCyrillic
        );
        assert!(Cli::try_parse_from(["ocr_client", "extract", "a.pdf", "-l", "xx"]).is_err());
    }

    #[test]
    fn explicit_api_url_wins() {
        let cli = Cli::parse_from([
            "ocr_client",
            "--api-url",
            "http://ocr.internal:9000",
            "--request-timeout-secs",
            "5",
            "health",
        ]);
        let settings = cli.client_settings();
        assert_eq!(settings.base_url, "http://ocr.internal:9000");
        assert_eq!(settings.request_timeout.as_secs(), 5);
    }
}
