//! Hardware Abstraction Traits
//!
//! Diese Traits definieren die Schnittstellen zu den Kollaborateuren
//! (LED-Pins, Sensoren, Debug-Ausgabe, Last-Task, Scheduler-Status) ohne konkrete
//! Implementierung.
//!
//! # Implementierungen
//! - **Production:** `sysview-firmware` (ESP32-C6, embassy)
//! - **Testing:** Mocks in `sysview-tests`

use core::fmt;

use heapless::Vec;

use crate::sensors::{Reading, SensorId};
use crate::shell::line::LineReady;
use crate::types::{LedCommand, LedIndex};

// ============================================================================
// Fehler-Typen
// ============================================================================

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Pin konnte nicht geschrieben werden
    WriteFailed,
    /// Command-Queue blieb bis zum Timeout voll, Kommando verworfen
    QueueTimeout,
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::WriteFailed => f.write_str("LED write failed"),
            LedError::QueueTimeout => f.write_str("LED queue full, command dropped"),
        }
    }
}

/// Fehler beim Lesen eines Sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus-/Kommunikationsfehler
    Bus,
    /// Sensor ist auf dem Board nicht bestückt
    NotPresent,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Bus => f.write_str("bus error"),
            SensorError::NotPresent => f.write_str("sensor not present"),
        }
    }
}

/// Fehler der Debug-Ausgabe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Lock nicht innerhalb des Timeouts erhalten, Ausgabe verworfen
    Busy,
    WriteFailed,
}

/// Fehler beim Starten/Stoppen der CPU-Last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    AlreadyRunning,
    NotRunning,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::AlreadyRunning => f.write_str("load task already running"),
            LoadError::NotRunning => f.write_str("load task not running"),
        }
    }
}

// ============================================================================
// LED
// ============================================================================

/// Trait für den Zugriff auf die LED-Pins
///
/// Die Engine übergibt bereits den physikalischen Pegel (Polarität
/// ist eingerechnet).
pub trait LedPins {
    /// Setzt den Pin der LED `led` auf High (`true`) oder Low
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn set_level(&mut self, led: LedIndex, high: bool) -> Result<(), LedError>;
}

/// Eingang der LED-Engine (`Post`)
///
/// Blockiert höchstens bis zum konfigurierten Timeout und meldet dann
/// `LedError::QueueTimeout`. Kein Retry.
#[allow(async_fn_in_trait)]
pub trait LedCommandSink {
    async fn post(&self, command: LedCommand) -> Result<(), LedError>;
}

impl<T: LedCommandSink + ?Sized> LedCommandSink for &T {
    async fn post(&self, command: LedCommand) -> Result<(), LedError> {
        (**self).post(command).await
    }
}

// ============================================================================
// Sensoren
// ============================================================================

/// Zugriff auf die Sensoren des Boards
pub trait SensorBank {
    fn read(&mut self, sensor: SensorId) -> Result<Reading, SensorError>;
}

// ============================================================================
// Debug-Ausgabe
// ============================================================================

/// Serielle Debug-/Shell-Ausgabe
#[allow(async_fn_in_trait)]
pub trait DebugSink {
    /// Schreibt die Bytes vollständig oder gar nicht
    async fn write(&self, bytes: &[u8]) -> Result<(), SinkError>;
}

impl<T: DebugSink + ?Sized> DebugSink for &T {
    async fn write(&self, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(bytes).await
    }
}

// ============================================================================
// Line Gate (Synchronisation Line Receiver → Shell-Task)
// ============================================================================

/// Ein-Slot-Signal "Zeile fertig"
#[allow(async_fn_in_trait)]
pub trait LineGate {
    /// Freigabe aus dem Task-Kontext (darf warten)
    async fn release(&self, ready: LineReady);

    /// Freigabe aus dem Interrupt-Kontext, blockiert nie
    ///
    /// Gibt `false` zurück wenn der Slot schon belegt war.
    fn try_release(&self, ready: LineReady) -> bool;
}

// ============================================================================
// CPU-Last (`consume`)
// ============================================================================

/// Startet und stoppt einen Task, der periodisch Rechenzeit verbraucht
///
/// Zum Beobachten des Schedulers unter Last.
pub trait LoadControl {
    /// # Fehlerbehandlung
    /// `LoadError::AlreadyRunning` wenn die Last schon läuft
    fn start(&self) -> Result<(), LoadError>;

    /// # Fehlerbehandlung
    /// `LoadError::NotRunning` wenn keine Last läuft
    fn stop(&self) -> Result<(), LoadError>;
}

impl<T: LoadControl + ?Sized> LoadControl for &T {
    fn start(&self) -> Result<(), LoadError> {
        (**self).start()
    }

    fn stop(&self) -> Result<(), LoadError> {
        (**self).stop()
    }
}

// ============================================================================
// Scheduler-/Heap-Status
// ============================================================================

/// Maximale Anzahl Tasks in einer Momentaufnahme
pub const MAX_TASKS: usize = 8;

/// Zustand eines Tasks aus Sicht der Anwendung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskState {
    /// Task läuft seine Schleife
    Running,
    /// Task wartet auf Freigabe (z.B. Last-Task nach `consume delete`)
    Stopped,
}

impl TaskState {
    /// Ein Zeichen für die Task-Liste
    pub const fn as_char(self) -> char {
        match self {
            TaskState::Running => 'R',
            TaskState::Stopped => 'S',
        }
    }
}

/// Eine Zeile der Task-Liste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskInfo {
    pub name: &'static str,
    pub state: TaskState,
    /// Durchläufe der Task-Schleife seit dem Start
    pub loops: u32,
}

/// Momentaufnahme für das `rtos` Kommando
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    pub cpu_clock_hz: u32,
    pub tick_hz: u64,
    pub heap_size: usize,
    pub heap_free: usize,
    pub uptime_ms: u64,
    pub tasks: Vec<TaskInfo, MAX_TASKS>,
}

impl SystemStatus {
    /// Heap gilt als knapp unter 20% freiem Speicher
    pub const fn heap_low(&self) -> bool {
        self.heap_free < (self.heap_size / 10) * 2
    }
}

pub trait SystemDiagnostics {
    fn status(&self) -> SystemStatus;
}
