use std::path::PathBuf;

use ocr_core::{Language, Msg};

use crate::cli::parse_language;

pub const HELP: &str = "\
Commands:
  open <path>              select an image or PDF
  clear                    drop the selected document
  lang <code>              eng, uzb, uzb_cyrl, rus, kor
  persist on|off|unset     save_to_db field sent with the upload
  extract                  send the document to the OCR service
  copy                     copy the extracted text to the clipboard
  save                     write the extracted text to a .txt file
  health                   ask the service whether OCR is available
  languages                list the service's languages
  status                   redraw the screen
  help                     show this list
  quit                     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Clear,
    Language(Language),
    Persist(Option<bool>),
    Extract,
    Copy,
    Save,
    Health,
    Languages,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Commands that map straight onto a core message.
    pub fn as_msg(&self) -> Option<Msg> {
        match self {
            Command::Clear => Some(Msg::FileCleared),
            Command::Language(language) => Some(Msg::LanguageChanged(*language)),
            Command::Persist(persist) => Some(Msg::PersistChanged(*persist)),
            Command::Extract => Some(Msg::ExtractClicked),
            Command::Copy => Some(Msg::CopyClicked),
            Command::Save => Some(Msg::DownloadClicked),
            Command::Health => Some(Msg::HealthCheckRequested),
            Command::Languages => Some(Msg::LanguagesRequested),
            Command::Open(_) | Command::Status | Command::Help | Command::Quit => None,
        }
    }
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "open" => {
            if rest.is_empty() {
                return Err("usage: open <path>".to_string());
            }
            Command::Open(PathBuf::from(rest))
        }
        "clear" => Command::Clear,
        "lang" | "language" => Command::Language(parse_language(rest)?),
        "persist" => Command::Persist(match rest {
            "on" | "true" => Some(true),
            "off" | "false" => Some(false),
            "unset" => None,
            _ => return Err("usage: persist on|off|unset".to_string()),
        }),
        "extract" => Command::Extract,
        "copy" => Command::Copy,
        "save" | "download" => Command::Save,
        "health" => Command::Health,
        "languages" => Command::Languages,
        "status" | "" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ocr_core::{Language, Msg};
    use pretty_assertions::assert_eq;

    use super::{parse_command, Command};

    #[test]
    fn open_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("open  My Scans/receipt 1.png ").unwrap(),
            Command::Open(PathBuf::from("My Scans/receipt 1.png"))
        );
        assert!(parse_command("open").is_err());
    }

    #[test]
    fn language_and_persist_arguments() {
        assert_eq!(
            parse_command("lang kor").unwrap(),
            Command::Language(Language::Korean)
        );
        assert!(parse_command("lang klingon").is_err());
        assert_eq!(parse_command("persist on").unwrap(), Command::Persist(Some(true)));
        assert_eq!(parse_command("persist unset").unwrap(), Command::Persist(None));
        assert!(parse_command("persist maybe").is_err());
    }

    #[test]
    fn commands_map_to_messages() {
        assert_eq!(parse_command("EXTRACT").unwrap().as_msg(), Some(Msg::ExtractClicked));
        assert_eq!(parse_command("save").unwrap().as_msg(), Some(Msg::DownloadClicked));
        assert_eq!(parse_command("quit").unwrap().as_msg(), None);
        assert_eq!(parse_command("").unwrap(), Command::Status);
    }

    #[test]
    fn unknown_word_is_reported() {
        assert_eq!(
            parse_command("ocr now").unwrap_err(),
            "unknown command `ocr` (try `help`)"
        );
    }
}
