// Hardware Abstraction Layer (HAL) Module
//
// Board-Adapter für die Traits aus sysview-core. Jeder Adapter übersetzt
// HAL-Fehler an der Grenze in die Fehler-Enums des Cores.

pub mod diagnostics;
pub mod led_pins;
pub mod load;
pub mod queue;
pub mod sensors;
pub mod serial;

pub use diagnostics::BoardDiagnostics;
pub use led_pins::BoardLedPins;
pub use load::CpuLoad;
pub use queue::{LedQueue, LineSignal};
pub use sensors::BoardSensors;
pub use serial::SerialSink;
