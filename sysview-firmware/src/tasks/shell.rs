// Shell Task - führt fertige Zeilen aus
use defmt::{info, warn};
use sysview_core::DebugSink;

use crate::hal::diagnostics::SHELL_LOOPS;
use crate::{BoardShell, BoardShellInput};

const GREETING: &[u8] = b"\r\nSysView shell ready, type 'help'\r\n";

/// Shell Task
///
/// Wartet ohne Timeout auf das Gate, holt die Zeile aus dem Line Receiver
/// und übergibt sie dem Dispatcher. Fehler wurden dort bereits als
/// Diagnose-Zeile ausgegeben.
///
/// # Parameter
/// - `input`: Shell-Eingang (gemeinsam mit `uart_rx_task`)
/// - `shell`: Dispatcher mit allen Board-Adaptern
#[embassy_executor::task]
pub async fn shell_task(input: &'static BoardShellInput, mut shell: BoardShell) {
    info!("Shell task started");
    let _ = shell.sink().write(GREETING).await;

    loop {
        let ready = input.gate().wait().await;
        SHELL_LOOPS.tick();
        let line = input.take_line();
        info!("Line received ({} bytes)", ready.len);

        if let Err(e) = shell.handle_line(&line).await {
            warn!("Command failed: {}", e);
        }
    }
}
