// Library-Root: Board-Adapter und Tasks
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von sysview-core
pub use sysview_core::LedCommand;

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::LED_QUEUE_DEPTH;
use crate::hal::{BoardDiagnostics, BoardSensors, CpuLoad, LedQueue, LineSignal, SerialSink};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// Statt:  Sender<'static, NoopRawMutex, LedCommand, 4>
// Nutze:  LedCommandSender

/// Channel für LED-Kommandos (Shell → LED Task)
/// - LED_QUEUE_DEPTH: Nachrichten-Kapazität, FIFO
pub type LedCommandChannel = Channel<NoopRawMutex, LedCommand, LED_QUEUE_DEPTH>;

/// Sender für LED-Kommandos (Shell → LED Task)
/// Erzeugt aus LedCommandChannel
pub type LedCommandSender = Sender<'static, NoopRawMutex, LedCommand, LED_QUEUE_DEPTH>;

/// Receiver für LED-Kommandos (LED Task empfängt)
/// Empfängt Commands von LedCommandSender
pub type LedCommandReceiver = Receiver<'static, NoopRawMutex, LedCommand, LED_QUEUE_DEPTH>;

/// Shell-Eingang: Line Receiver + Gate zum Shell-Task
pub type BoardShellInput = sysview_core::ShellInput<LineSignal>;

/// Shell mit den Board-Adaptern
pub type BoardShell = sysview_core::Shell<
    BoardSensors,
    LedQueue,
    &'static SerialSink,
    BoardDiagnostics,
    &'static CpuLoad,
>;
