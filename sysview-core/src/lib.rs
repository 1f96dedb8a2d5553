//! SysView Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Traits zu den Kollaborateuren und die reine Logik:
//! LED-Engine, Line Receiver, Parser und Kommando-Dispatch.

#![no_std]

pub mod bitfield;
pub mod leds;
pub mod sensors;
pub mod shell;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use leds::LedEngine;
pub use sensors::{Reading, SensorId, SensorReading};
pub use shell::{DispatchError, LineReady, LineReceiver, ParseError, Shell, ShellInput};
pub use traits::{
    DebugSink, LedCommandSink, LedError, LedPins, LineGate, LoadControl, LoadError, MAX_TASKS,
    SensorBank, SensorError, SinkError, SystemDiagnostics, SystemStatus, TaskInfo, TaskState,
};
pub use types::{LedAction, LedCommand, LedIndex, LedSet, Polarity};
