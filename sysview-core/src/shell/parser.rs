//! Kommandozeilen-Parser
//!
//! Zerlegt eine Zeile in Kommando-Wort und Argumente. Die Slices leihen
//! sich die Zeile und leben nur für einen Dispatch-Aufruf.

use core::fmt;

use heapless::Vec;

/// Maximale Anzahl Argumente pro Zeile
pub const MAX_ARGS: usize = 16;

/// Fehler beim Zerlegen einer Zeile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Kein Kommando-Wort
    Empty,
    InvalidUtf8,
    /// Mehr als `MAX_ARGS` Argumente, nichts wird ausgeführt
    TooManyArguments,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty command"),
            ParseError::InvalidUtf8 => f.write_str("invalid characters in command"),
            ParseError::TooManyArguments => {
                write!(f, "too many arguments (max {})", MAX_ARGS)
            }
        }
    }
}

/// Zerlegtes Kommando
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub command: &'a str,
    pub args: Vec<&'a str, MAX_ARGS>,
}

impl<'a> ParsedCommand<'a> {
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }
}

fn is_separator(byte: &u8) -> bool {
    *byte == b' ' || *byte == 0
}

/// Zerlegt eine Zeile
///
/// 1. Kommando-Wort = alles bis zum ersten Leerzeichen oder NUL
/// 2. Argument-Bereich = Rest nach diesem Trenner, bis zum nächsten NUL
/// 3. Argumente = durch Leerzeichen getrennte Tokens, leere Tokens
///    (mehrfache Leerzeichen) werden übersprungen
///
/// # Beispiele
///
/// ```
/// # use sysview_core::shell::parser::parse;
/// let cmd = parse(b"get temperature").unwrap();
/// assert_eq!(cmd.command, "get");
/// assert_eq!(cmd.args.as_slice(), &["temperature"]);
/// ```
pub fn parse(line: &[u8]) -> Result<ParsedCommand<'_>, ParseError> {
    let (command, rest) = match line.iter().position(is_separator) {
        Some(end) => (&line[..end], &line[end + 1..]),
        None => (line, &[][..]),
    };
    let region = match rest.iter().position(|&b| b == 0) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let command = core::str::from_utf8(command).map_err(|_| ParseError::InvalidUtf8)?;
    if command.is_empty() {
        return Err(ParseError::Empty);
    }
    let region = core::str::from_utf8(region).map_err(|_| ParseError::InvalidUtf8)?;

    let mut args = Vec::new();
    for token in region.split(' ').filter(|token| !token.is_empty()) {
        args.push(token).map_err(|_| ParseError::TooManyArguments)?;
    }

    Ok(ParsedCommand { command, args })
}
