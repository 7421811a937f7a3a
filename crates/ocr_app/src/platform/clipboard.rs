//! Terminal clipboard via the OSC 52 escape sequence.

use std::fs::OpenOptions;
use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub fn write_osc52(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
    out.flush()
}

/// The controlling terminal, else stderr. Stdout carries reports only.
pub fn terminal_sink() -> Box<dyn Write + Send> {
    match OpenOptions::new().write(true).open("/dev/tty") {
        Ok(tty) => Box::new(tty),
        Err(_) => Box::new(io::stderr()),
    }
}

#[cfg(test)]
mod tests {
    use super::write_osc52;

    #[test]
    fn wraps_base64_text_in_osc52() {
        let mut out = Vec::new();
        write_osc52(&mut out, "hi!").unwrap();
        assert_eq!(out, b"\x1b]52;c;aGkh\x07");
    }
}
