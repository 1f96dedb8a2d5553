// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use sysview_core::{LedIndex, Polarity};

// ============================================================================
// System
// ============================================================================

/// CPU-Takt mit `CpuClock::max()` auf dem ESP32-C6
pub const CPU_CLOCK_HZ: u32 = 160_000_000;

/// Heap-Größe (Bytes)
/// Wird nur für die Heap-Statistik des `rtos` Kommandos belegt
pub const HEAP_SIZE: usize = 32768; // 32 KB

// ============================================================================
// LED Konfiguration
// ============================================================================

/// LED1: On-Board RGB LED (WS2812/Neopixel) an GPIO8
pub const SMART_LED: LedIndex = LedIndex::LED1;

/// Polarität von LED1 (logisch, die SmartLED kennt keinen Pegel)
pub const SMART_LED_POLARITY: Polarity = Polarity::ActiveHigh;

/// Helligkeits-Level für die RGB LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// LED2: externe LED an GPIO4, leuchtet bei High
pub const GPIO_LED: LedIndex = LedIndex::LED2;

/// Polarität von LED2
pub const GPIO_LED_POLARITY: Polarity = Polarity::ActiveHigh;

/// Tick-Periode der LED-Engine in Millisekunden
/// Alle Blink-/Heartbeat-Zeiten sind Vielfache davon
pub const LED_TICK_MS: u64 = 10;

/// Kapazität der LED-Command-Queue
pub const LED_QUEUE_DEPTH: usize = 4;

/// Maximale Wartezeit beim Einreihen eines LED-Kommandos
pub const LED_POST_TIMEOUT_MS: u64 = 1000;

// ============================================================================
// Serielle Shell
// ============================================================================

/// Baudrate der Shell auf UART0
pub const UART_BAUDRATE: u32 = 115_200;

/// Maximale Wartezeit auf den UART-TX Lock, danach wird die Ausgabe verworfen
pub const SINK_LOCK_TIMEOUT_MS: u64 = 1000;

/// Größe des UART-Lesepuffers
pub const UART_RX_CHUNK: usize = 32;

// ============================================================================
// CPU-Last (`consume`)
// ============================================================================

/// Rechenschritte pro Durchlauf des Last-Tasks
pub const CPU_LOAD_ITERATIONS: u32 = 10_000;

/// Pause zwischen zwei Durchläufen des Last-Tasks
pub const CPU_LOAD_PERIOD_MS: u64 = 100;
