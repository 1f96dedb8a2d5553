// UART RX Task - speist empfangene Bytes in den Line Receiver
use defmt::{Debug2Format, error, info};
use esp_hal::Async;
use esp_hal::uart::UartRx;

use crate::BoardShellInput;
use crate::config::UART_RX_CHUNK;
use crate::hal::diagnostics::UART_RX_LOOPS;

/// UART RX Task
///
/// # Parameter
/// - `rx`: Empfangs-Hälfte von UART0
/// - `input`: Shell-Eingang (gemeinsam mit `shell_task`)
#[embassy_executor::task]
pub async fn uart_rx_task(mut rx: UartRx<'static, Async>, input: &'static BoardShellInput) {
    info!("UART RX task started");
    let mut buffer = [0u8; UART_RX_CHUNK];

    loop {
        let result = rx.read_async(&mut buffer).await;
        UART_RX_LOOPS.tick();
        match result {
            Ok(count) => {
                for &byte in &buffer[..count] {
                    input.feed(byte).await;
                }
            }
            Err(e) => {
                error!("UART read failed: {}", Debug2Format(&e));
            }
        }
    }
}
