//! Shell-Eingang für Task- und Interrupt-Kontext
//!
//! Beide Einstiegspunkte rufen dieselbe `LineReceiver::feed()` auf. Nur
//! das Wecken des Shell-Tasks unterscheidet sich: `feed()` darf auf das
//! Gate warten, `feed_from_interrupt()` blockiert nie.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

use crate::shell::line::{LineReady, LineReceiver, SHELL_BUFFER_SIZE};
use crate::traits::LineGate;

pub struct ShellInput<G: LineGate, const N: usize = SHELL_BUFFER_SIZE> {
    receiver: Mutex<RefCell<LineReceiver<N>>>,
    gate: G,
}

impl<G: LineGate, const N: usize> ShellInput<G, N> {
    pub const fn new(gate: G) -> Self {
        Self {
            receiver: Mutex::new(RefCell::new(LineReceiver::new())),
            gate,
        }
    }

    fn feed_locked(&self, byte: u8) -> Option<LineReady> {
        critical_section::with(|cs| self.receiver.borrow_ref_mut(cs).feed(byte))
    }

    /// Byte aus dem Task-Kontext (z.B. UART-Task)
    pub async fn feed(&self, byte: u8) {
        if let Some(ready) = self.feed_locked(byte) {
            self.gate.release(ready).await;
        }
    }

    /// Byte aus einem Interrupt-Handler
    ///
    /// Gibt `true` zurück wenn eine fertige Zeile signalisiert wurde.
    pub fn feed_from_interrupt(&self, byte: u8) -> bool {
        match self.feed_locked(byte) {
            Some(ready) => self.gate.try_release(ready),
            None => false,
        }
    }

    /// Zeile abholen (Shell-Task nach dem Gate)
    ///
    /// Wurde hinter der Zeile schon die nächste komplett, wird das Gate
    /// sofort wieder freigegeben. Der Slot ist zu diesem Zeitpunkt leer,
    /// der Shell-Task hat das Signal gerade abgeholt.
    pub fn take_line(&self) -> Vec<u8, N> {
        let (line, next) = critical_section::with(|cs| {
            let mut receiver = self.receiver.borrow_ref_mut(cs);
            let line = receiver.take_line();
            (line, receiver.take_deferred())
        });
        if let Some(ready) = next {
            self.gate.try_release(ready);
        }
        line
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }
}
