//! Kommando-Tabelle und Dispatch
//!
//! Die Shell wird mit allen Kollaborateuren konstruiert (Sensoren,
//! LED-Queue, Debug-Ausgabe, Systemstatus, CPU-Last). Ein fehlender Handler ist
//! damit ein Compile-Fehler und kein stiller No-Op zur Laufzeit.

use core::fmt::{self, Write};

use heapless::String;

use crate::sensors::{SensorId, SensorReading};
use crate::shell::parser::{ParseError, ParsedCommand, parse};
use crate::traits::{
    DebugSink, LedCommandSink, LedError, LoadControl, LoadError, SensorBank, SensorError,
    SystemDiagnostics, SystemStatus,
};
use crate::types::{LedAction, LedCommand, LedIndex, LedSet};

/// Größe des Formatierungs-Puffers für eine Ausgabe
pub const PRINT_BUFFER_SIZE: usize = 512;

/// Text einer Ausgabezeile, `\r\n` hat immer noch Platz
const LINE_TEXT_SIZE: usize = PRINT_BUFFER_SIZE - 2;

/// Ziel von `led <key>` ohne LED-Nummer
pub const DEFAULT_LED: LedSet = LedSet::LED1;

const BANNER: &str = "=================================================";

/// Fehler an der Parser/Dispatch-Grenze
///
/// Wird als eine Diagnose-Zeile ausgegeben und nie weitergereicht.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    UnknownCommand,
    MissingArgument,
    UnknownArgument,
    Parse(ParseError),
    Sensor(SensorError),
    Led(LedError),
    Load(LoadError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownCommand => f.write_str("unknown command"),
            DispatchError::MissingArgument => f.write_str("missing argument"),
            DispatchError::UnknownArgument => f.write_str("unknown argument"),
            DispatchError::Parse(e) => write!(f, "{}", e),
            DispatchError::Sensor(e) => write!(f, "sensor read failed: {}", e),
            DispatchError::Led(e) => write!(f, "{}", e),
            DispatchError::Load(e) => write!(f, "{}", e),
        }
    }
}

impl From<ParseError> for DispatchError {
    fn from(e: ParseError) -> Self {
        DispatchError::Parse(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Help,
    Rtos,
    Get,
    Plot,
    Led,
    Consume,
}

/// Eintrag der Kommando-Tabelle
pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    /// Erlaubte Werte für das erste Argument (für `help`)
    pub keys: &'static [&'static str],
    kind: CommandKind,
}

/// Statische Zuordnung Kommando-Wort → Handler
pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "help",
        usage: "help",
        keys: &[],
        kind: CommandKind::Help,
    },
    CommandEntry {
        name: "rtos",
        usage: "rtos",
        keys: &[],
        kind: CommandKind::Rtos,
    },
    CommandEntry {
        name: "get",
        usage: "get <v1>",
        keys: &[
            "temperature",
            "humidity",
            "pressure",
            "gyro",
            "magneto",
            "accelero",
            "all",
        ],
        kind: CommandKind::Get,
    },
    CommandEntry {
        name: "plot",
        usage: "plot",
        keys: &[],
        kind: CommandKind::Plot,
    },
    CommandEntry {
        name: "led",
        usage: "led <v1> [1-8]",
        keys: &["on", "off", "blink", "fast", "heartbeat"],
        kind: CommandKind::Led,
    },
    CommandEntry {
        name: "consume",
        usage: "consume <v1>",
        keys: &["create", "delete"],
        kind: CommandKind::Consume,
    },
];

/// Sucht ein Kommando in der Tabelle
pub fn lookup(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.name == name)
}

/// Shell mit allen Kollaborateuren
///
/// # Parameter
/// - `S`: Sensor-Zugriff
/// - `L`: Eingang der LED-Engine
/// - `D`: Debug-/Shell-Ausgabe
/// - `R`: Scheduler-/Heap-Status
/// - `C`: CPU-Last für `consume`
pub struct Shell<S, L, D, R, C> {
    sensors: S,
    leds: L,
    sink: D,
    diagnostics: R,
    load: C,
    reading: SensorReading,
}

impl<S, L, D, R, C> Shell<S, L, D, R, C>
where
    S: SensorBank,
    L: LedCommandSink,
    D: DebugSink,
    R: SystemDiagnostics,
    C: LoadControl,
{
    pub fn new(sensors: S, leds: L, sink: D, diagnostics: R, load: C) -> Self {
        Self {
            sensors,
            leds,
            sink,
            diagnostics,
            load,
            reading: SensorReading::default(),
        }
    }

    /// Verarbeitet eine komplette Zeile: parsen, Echo, Dispatch, Fehlerausgabe
    ///
    /// Leere Zeilen werden still ignoriert.
    pub async fn handle_line(&mut self, line: &[u8]) -> Result<(), DispatchError> {
        let cmd = match parse(line) {
            Ok(cmd) => cmd,
            Err(ParseError::Empty) => return Ok(()),
            Err(e) => {
                self.print(format_args!("(X) {}", e)).await;
                return Err(e.into());
            }
        };

        self.echo(&cmd).await;

        let result = self.dispatch(&cmd).await;
        if let Err(e) = result {
            self.print(format_args!("(X) {}: {}", cmd.command, e)).await;
        }
        result
    }

    /// Führt ein bereits zerlegtes Kommando aus
    pub async fn dispatch(&mut self, cmd: &ParsedCommand<'_>) -> Result<(), DispatchError> {
        let entry = lookup(cmd.command).ok_or(DispatchError::UnknownCommand)?;
        match entry.kind {
            CommandKind::Help => {
                self.help().await;
                Ok(())
            }
            CommandKind::Rtos => {
                self.rtos().await;
                Ok(())
            }
            CommandKind::Get => self.get(cmd).await,
            CommandKind::Plot => self.plot().await,
            CommandKind::Led => self.led(cmd).await,
            CommandKind::Consume => self.consume(cmd),
        }
    }

    /// Letzte bekannte Sensorwerte
    pub fn reading(&self) -> &SensorReading {
        &self.reading
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    // ========================================================================
    // Handler
    // ========================================================================

    async fn help(&self) {
        let mut out: String<PRINT_BUFFER_SIZE> = String::new();
        let _ = out.write_str("Supported commands:\r\n");
        for entry in COMMANDS {
            let _ = write!(out, "> {}\r\n", entry.usage);
            for key in entry.keys {
                let _ = write!(out, "\t {}\r\n", key);
            }
        }
        self.write_out(&out).await;
    }

    async fn rtos(&self) {
        let status = self.diagnostics.status();
        let mut out: String<PRINT_BUFFER_SIZE> = String::new();
        let _ = write!(out, "{}\r\n\t\tCPU\r\n{}\r\n", BANNER, BANNER);
        let _ = write!(out, "Clock CPU  : {} Hz\r\n", status.cpu_clock_hz);
        let _ = write!(out, "RTOS ticks : {} Hz\r\n", status.tick_hz);
        let _ = write!(out, "{}\r\n\t\tHEAP\r\n{}\r\n", BANNER, BANNER);
        let _ = write!(out, "Size heap: {}\r\n", status.heap_size);
        let _ = write!(out, "Free heap: {}\r\n", status.heap_free);
        if status.heap_low() {
            let _ = out.write_str("(X) Heap near limit\r\n");
        }
        let _ = write!(out, "Uptime: {} ms\r\n", status.uptime_ms);
        self.write_out(&out).await;
        self.task_list(&status).await;
    }

    /// Task-Liste als eigener Block, passt nicht mehr in einen Puffer
    async fn task_list(&self, status: &SystemStatus) {
        let mut out: String<PRINT_BUFFER_SIZE> = String::new();
        let _ = write!(out, "{}\r\n{:<16}State\tLoops\r\n{}\r\n", BANNER, "Task", BANNER);
        for task in &status.tasks {
            let _ = write!(
                out,
                "{:<16}{}\t{}\r\n",
                task.name,
                task.state.as_char(),
                task.loops
            );
        }
        self.write_out(&out).await;
    }

    async fn get(&mut self, cmd: &ParsedCommand<'_>) -> Result<(), DispatchError> {
        let key = cmd.arg(0).ok_or(DispatchError::MissingArgument)?;
        let mut out: String<PRINT_BUFFER_SIZE> = String::new();

        let result = if key == "all" {
            let result = self.read_all();
            let _ = self.reading.write_full_report(&mut out);
            result
        } else {
            let sensor = SensorId::try_from(key).map_err(|_| DispatchError::UnknownArgument)?;
            let result = self.read(sensor);
            // Bei Fehler werden die alten Werte ausgegeben
            let _ = self.reading.write_report(sensor, &mut out);
            result
        };

        self.write_out(&out).await;
        result
    }

    async fn plot(&mut self) -> Result<(), DispatchError> {
        let result = self.read_all();
        let mut out: String<PRINT_BUFFER_SIZE> = String::new();
        let _ = self.reading.write_plot_line(&mut out);
        self.write_out(&out).await;
        result
    }

    async fn led(&mut self, cmd: &ParsedCommand<'_>) -> Result<(), DispatchError> {
        let key = cmd.arg(0).ok_or(DispatchError::MissingArgument)?;
        let action = LedAction::try_from(key).map_err(|_| DispatchError::UnknownArgument)?;
        let target = match cmd.arg(1) {
            Some(number) => number
                .parse::<u8>()
                .ok()
                .and_then(LedIndex::from_number)
                .map(LedSet::single)
                .ok_or(DispatchError::UnknownArgument)?,
            None => DEFAULT_LED,
        };

        self.leds
            .post(LedCommand::new(target, action))
            .await
            .map_err(DispatchError::Led)
    }

    fn consume(&self, cmd: &ParsedCommand<'_>) -> Result<(), DispatchError> {
        let result = match cmd.arg(0).ok_or(DispatchError::MissingArgument)? {
            "create" => self.load.start(),
            "delete" => self.load.stop(),
            _ => return Err(DispatchError::UnknownArgument),
        };
        result.map_err(DispatchError::Load)
    }

    // ========================================================================
    // Hilfsfunktionen
    // ========================================================================

    fn read(&mut self, sensor: SensorId) -> Result<(), DispatchError> {
        let reading = self.sensors.read(sensor).map_err(DispatchError::Sensor)?;
        self.reading.apply(reading);
        Ok(())
    }

    /// Liest alle Sensoren, der erste Fehler wird gemeldet
    fn read_all(&mut self) -> Result<(), DispatchError> {
        SensorId::ALL
            .into_iter()
            .map(|sensor| self.read(sensor))
            .fold(Ok(()), Result::and)
    }

    /// `$ <cmd> <args>`, zu lange Zeilen werden abgeschnitten
    async fn echo(&self, cmd: &ParsedCommand<'_>) {
        let mut text: String<LINE_TEXT_SIZE> = String::new();
        let _ = text.push('$');
        for word in core::iter::once(cmd.command).chain(cmd.args.iter().copied()) {
            let room = LINE_TEXT_SIZE.saturating_sub(text.len() + 1);
            if room == 0 {
                break;
            }
            let mut cut = room.min(word.len());
            while !word.is_char_boundary(cut) {
                cut -= 1;
            }
            let _ = text.push(' ');
            let _ = text.push_str(&word[..cut]);
            if cut < word.len() {
                break;
            }
        }
        self.print(format_args!("{}", text)).await;
    }

    /// Eine Zeile formatieren und ausgeben (`\r\n` wird angehängt)
    ///
    /// Überlanger Text wird gekürzt, das Zeilenende geht nie verloren.
    async fn print(&self, args: fmt::Arguments<'_>) {
        let mut text: String<LINE_TEXT_SIZE> = String::new();
        let _ = text.write_fmt(args);
        let mut out: String<PRINT_BUFFER_SIZE> = String::new();
        let _ = out.push_str(&text);
        let _ = out.push_str("\r\n");
        self.write_out(&out).await;
    }

    /// Ausgabe verwerfen wenn die Debug-Schnittstelle belegt ist
    async fn write_out(&self, text: &str) {
        let _ = self.sink.write(text.as_bytes()).await;
    }
}
