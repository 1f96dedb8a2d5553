// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (UART → Shell → LED).
// Der Last-Task wird nur über `consume` ein- und ausgeschaltet.

pub mod cpu_load;
pub mod leds;
pub mod shell;
pub mod uart_rx;

// Re-export Tasks für einfachen Import
pub use cpu_load::cpu_load_task;
pub use leds::led_engine_task;
pub use shell::shell_task;
pub use uart_rx::uart_rx_task;
