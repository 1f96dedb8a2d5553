// Serielle Debug-/Shell-Ausgabe über UART0
//
// Alle Ausgaben laufen über einen Mutex. Wer ihn nicht innerhalb von
// SINK_LOCK_TIMEOUT_MS bekommt, verwirft seine Ausgabe.

use defmt::warn;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, with_timeout};
use esp_hal::Async;
use esp_hal::uart::UartTx;
use sysview_core::{DebugSink, SinkError};

use crate::config::SINK_LOCK_TIMEOUT_MS;

pub struct SerialSink {
    tx: Mutex<NoopRawMutex, UartTx<'static, Async>>,
}

impl SerialSink {
    pub fn new(tx: UartTx<'static, Async>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl DebugSink for SerialSink {
    async fn write(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut tx = match with_timeout(
            Duration::from_millis(SINK_LOCK_TIMEOUT_MS),
            self.tx.lock(),
        )
        .await
        {
            Ok(tx) => tx,
            Err(_) => {
                warn!("UART busy, {} bytes dropped", bytes.len());
                return Err(SinkError::Busy);
            }
        };

        // write_async() schreibt nur so viel wie in den FIFO passt
        let mut pending = bytes;
        while !pending.is_empty() {
            let written = tx
                .write_async(pending)
                .await
                .map_err(|_| SinkError::WriteFailed)?;
            pending = &pending[written..];
        }
        tx.flush_async().await.map_err(|_| SinkError::WriteFailed)
    }
}
