//! Serielle Kommando-Shell
//!
//! Datenfluss:
//! ```text
//! UART-Byte → ShellInput::feed() → LineReceiver → LineGate
//!          → Shell-Task: take_line() → parse() → Shell::dispatch()
//! ```

pub mod dispatch;
pub mod input;
pub mod line;
pub mod parser;

pub use dispatch::{COMMANDS, CommandEntry, DispatchError, PRINT_BUFFER_SIZE, Shell};
pub use input::ShellInput;
pub use line::{LineReady, LineReceiver, SHELL_BUFFER_SIZE};
pub use parser::{MAX_ARGS, ParseError, ParsedCommand, parse};
