// Embassy Channels hinter den Core-Traits
//
// LedQueue: Shell → LED Task (FIFO, Wartezeit begrenzt)
// LineSignal: Line Receiver → Shell Task (ein Slot, auch aus ISR)

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, with_timeout};
use sysview_core::{LedCommandSink, LedError, LineGate, LineReady};

use crate::config::LED_POST_TIMEOUT_MS;
use crate::{LedCommand, LedCommandSender};

/// `Post` für die LED-Engine
pub struct LedQueue {
    sender: LedCommandSender,
}

impl LedQueue {
    pub fn new(sender: LedCommandSender) -> Self {
        Self { sender }
    }
}

impl LedCommandSink for LedQueue {
    async fn post(&self, command: LedCommand) -> Result<(), LedError> {
        with_timeout(
            Duration::from_millis(LED_POST_TIMEOUT_MS),
            self.sender.send(command),
        )
        .await
        .map_err(|_| LedError::QueueTimeout)
    }
}

/// Ein-Slot-Signal "Zeile fertig"
///
/// CriticalSectionRawMutex statt NoopRawMutex: `try_release()` wird
/// auch aus Interrupt-Handlern aufgerufen.
pub struct LineSignal {
    channel: Channel<CriticalSectionRawMutex, LineReady, 1>,
}

impl LineSignal {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Wartet auf die nächste fertige Zeile (Shell Task)
    pub async fn wait(&self) -> LineReady {
        self.channel.receive().await
    }
}

impl Default for LineSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl LineGate for LineSignal {
    async fn release(&self, ready: LineReady) {
        self.channel.send(ready).await;
    }

    fn try_release(&self, ready: LineReady) -> bool {
        self.channel.try_send(ready).is_ok()
    }
}
