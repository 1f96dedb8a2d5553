//! Line Receiver: setzt eingehende Bytes zu Zeilen zusammen
//!
//! `feed()` ist eine reine Zustandsübergangsfunktion und wird identisch
//! aus Task- und Interrupt-Kontext aufgerufen (siehe `ShellInput`).

use heapless::Vec;

/// Größe des Zeilenpuffers in Bytes
pub const SHELL_BUFFER_SIZE: usize = 512;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Signal "Zeile fertig" mit der Länge der Zeile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineReady {
    pub len: usize,
}

/// Ringpuffer plus Schreibcursor
///
/// Invariante: `cursor < N`. Ein Überlauf überschreibt still den Anfang,
/// solange keine Zeile auf Abholung wartet.
///
/// Pro Zeile wird höchstens ein `LineReady` gemeldet. Solange die
/// gemeldete Zeile nicht abgeholt ist, bleibt ihr Ende in `ready`
/// markiert. Dahinter wird höchstens eine weitere Zeile vorgehalten,
/// ihr Signal kommt erst nach `take_line()` über `take_deferred()`.
pub struct LineReceiver<const N: usize = SHELL_BUFFER_SIZE> {
    buffer: [u8; N],
    cursor: usize,
    /// Länge der gemeldeten, noch nicht abgeholten Zeile
    ready: Option<usize>,
    /// Hinter der gemeldeten Zeile liegt eine weitere komplette Zeile
    queued: bool,
    /// Signal für die nachgerückte Zeile steht noch aus
    deferred: bool,
}

impl<const N: usize> LineReceiver<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            cursor: 0,
            ready: None,
            queued: false,
            deferred: false,
        }
    }

    /// Verarbeitet ein Byte
    ///
    /// - `\r` / `\n`: bei mehr als einem Byte im Puffer `Some(LineReady)`,
    ///   sonst wird der Cursor still auf 0 gesetzt
    /// - Backspace/Delete: ein Zeichen zurück, Slot wird mit Leerzeichen
    ///   überschrieben. Bei Cursor 0 passiert nichts.
    /// - `0x00` bei Cursor 0 wird ignoriert
    ///
    /// Wartet bereits eine Zeile, meldet ein Terminator nichts (z.B. das
    /// `\n` von CR+LF). Bytes danach gehören zur nächsten Zeile.
    pub fn feed(&mut self, byte: u8) -> Option<LineReady> {
        if let Some(len) = self.ready {
            self.feed_behind(len, byte);
            return None;
        }

        match byte {
            b'\r' | b'\n' => {
                if self.cursor > 1 {
                    self.ready = Some(self.cursor);
                    return Some(LineReady { len: self.cursor });
                }
                self.cursor = 0;
            }
            BACKSPACE | DELETE => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer[self.cursor] = b' ';
                }
            }
            0 if self.cursor == 0 => {}
            _ => {
                self.buffer[self.cursor] = byte;
                self.cursor = (self.cursor + 1) % N;
            }
        }
        None
    }

    /// Byte hinter einer wartenden Zeile der Länge `len`
    ///
    /// Die wartende Zeile wird nie überschrieben: Backspace stoppt an
    /// ihrem Ende, ein voller Puffer verwirft weitere Bytes.
    fn feed_behind(&mut self, len: usize, byte: u8) {
        if self.queued {
            return;
        }

        match byte {
            b'\r' | b'\n' => {
                if self.cursor - len > 1 {
                    self.queued = true;
                } else {
                    self.cursor = len;
                }
            }
            BACKSPACE | DELETE => {
                if self.cursor > len {
                    self.cursor -= 1;
                    self.buffer[self.cursor] = b' ';
                }
            }
            0 if self.cursor == len => {}
            _ => {
                if self.cursor + 1 < N {
                    self.buffer[self.cursor] = byte;
                    self.cursor += 1;
                }
            }
        }
    }

    /// Bisher empfangene Bytes
    pub fn line(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Wartet eine gemeldete Zeile auf Abholung?
    pub fn is_pending(&self) -> bool {
        self.ready.is_some()
    }

    /// Puffer nullen und Cursor zurücksetzen
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.cursor = 0;
        self.ready = None;
        self.queued = false;
        self.deferred = false;
    }

    /// Kopiert die anstehende Zeile heraus
    ///
    /// Ohne gemeldete Zeile wird der ganze Puffer geleert. Sonst rücken
    /// die Bytes hinter der Zeile an den Anfang. War dort schon eine
    /// komplette Zeile, wird sie zur gemeldeten Zeile (`take_deferred()`).
    pub fn take_line(&mut self) -> Vec<u8, N> {
        let mut line = Vec::new();
        let Some(len) = self.ready.take() else {
            // Kann nicht fehlschlagen: cursor < N
            let _ = line.extend_from_slice(self.line());
            self.clear();
            return line;
        };

        let _ = line.extend_from_slice(&self.buffer[..len]);
        self.buffer.copy_within(len..self.cursor, 0);
        self.cursor -= len;
        self.buffer[self.cursor..].fill(0);

        if self.queued {
            self.queued = false;
            self.ready = Some(self.cursor);
            self.deferred = true;
        }
        line
    }

    /// Signal für eine Zeile, die während des Wartens komplett wurde
    ///
    /// Liefert jedes nachgerückte Signal genau einmal.
    pub fn take_deferred(&mut self) -> Option<LineReady> {
        if !self.deferred {
            return None;
        }
        self.deferred = false;
        self.ready.map(|len| LineReady { len })
    }
}

impl<const N: usize> Default for LineReceiver<N> {
    fn default() -> Self {
        Self::new()
    }
}
