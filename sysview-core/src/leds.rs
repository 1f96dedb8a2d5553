//! LED Animation Engine
//!
//! Besitzt den kompletten LED-Zustand: Polarität pro LED, die vier
//! Animations-Mengen und den zuletzt geschriebenen Ausgangszustand.
//! Wird ausschließlich vom LED-Task verändert, alle anderen Tasks
//! gehen über die Command-Queue.
//!
//! Zeitbasis: ein `tick()` pro Periode (10 ms auf der Firmware).

use crate::traits::{LedError, LedPins};
use crate::types::{LedAction, LedCommand, LedIndex, LedSet, MAX_LEDS, Polarity};

/// Ticks zwischen zwei Umschaltungen bei langsamem Blinken
pub const BLINK_SLOW_STEP: u16 = 70;

/// Ticks zwischen zwei Umschaltungen bei schnellem Blinken
pub const BLINK_FAST_STEP: u16 = 20;

/// Haltezeiten der vier Heartbeat-Phasen in Ticks
pub const HEARTBEAT_PHASES: [u16; 4] = [10, 20, 10, 120];

/// Länge eines kompletten Heartbeat-Zyklus in Ticks
pub const HEARTBEAT_CYCLE: u16 =
    HEARTBEAT_PHASES[0] + HEARTBEAT_PHASES[1] + HEARTBEAT_PHASES[2] + HEARTBEAT_PHASES[3];

/// Umschalt-Zähler für eine Blink-Klasse
#[derive(Debug, Clone, Copy)]
struct BlinkCounter {
    step: u16,
    count: u16,
}

impl BlinkCounter {
    const fn new(step: u16) -> Self {
        Self { step, count: 0 }
    }

    /// Liefert `true` wenn in diesem Tick umgeschaltet wird
    fn advance(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.step {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

/// Vier-Phasen-Zustandsautomat für den Heartbeat
#[derive(Debug, Clone, Copy)]
struct Heartbeat {
    phase: usize,
    remaining: u16,
}

impl Heartbeat {
    // Startet mit 1: die erste Umschaltung erfolgt im ersten Tick
    const fn new() -> Self {
        Self {
            phase: 0,
            remaining: 1,
        }
    }

    fn advance(&mut self) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = HEARTBEAT_PHASES[self.phase];
            self.phase = (self.phase + 1) % HEARTBEAT_PHASES.len();
            true
        } else {
            false
        }
    }
}

/// LED Engine - testbare Logik ohne Hardware-Abhängigkeit
///
/// Der generische Parameter `P: LedPins` ermöglicht:
/// - Real Hardware (`BoardLedPins`) im Production-Code
/// - Mock Implementation (`MockPins`) in Tests
pub struct LedEngine<P: LedPins> {
    pins: P,
    polarity: [Option<Polarity>; MAX_LEDS],
    on: LedSet,
    blink_slow: LedSet,
    blink_fast: LedSet,
    heartbeat: LedSet,
    /// Logischer Ausgangszustand (1 = LED leuchtet)
    status: LedSet,
    slow: BlinkCounter,
    fast: BlinkCounter,
    beat: Heartbeat,
}

impl<P: LedPins> LedEngine<P> {
    /// Erstellt die Engine mit leeren Mengen und ohne angeschlossene LEDs
    pub fn new(pins: P) -> Self {
        Self {
            pins,
            polarity: [None; MAX_LEDS],
            on: LedSet::EMPTY,
            blink_slow: LedSet::EMPTY,
            blink_fast: LedSet::EMPTY,
            heartbeat: LedSet::EMPTY,
            status: LedSet::EMPTY,
            slow: BlinkCounter::new(BLINK_SLOW_STEP),
            fast: BlinkCounter::new(BLINK_FAST_STEP),
            beat: Heartbeat::new(),
        }
    }

    /// Meldet eine LED an der Engine an
    ///
    /// Nur angemeldete LEDs werden auf die Pins geschrieben.
    pub fn attach(&mut self, led: LedIndex, polarity: Polarity) -> Result<(), LedError> {
        self.polarity[led.get() as usize] = Some(polarity);
        let lit = self.status.contains(led);
        self.pins.set_level(led, polarity.level(lit))
    }

    /// Eine Iteration der Task-Schleife
    ///
    /// Ein empfangenes Kommando wird immer vor dem nächsten Tick verarbeitet.
    pub fn step(&mut self, command: Option<LedCommand>) -> Result<(), LedError> {
        match command {
            Some(command) => self.set_action(command.target, command.action),
            None => self.tick(),
        }
    }

    /// Ordnet jede LED aus `mask` genau einer Animations-Menge zu
    pub fn set_action(&mut self, mask: LedSet, action: LedAction) -> Result<(), LedError> {
        self.on = self.on.difference(mask);
        self.blink_slow = self.blink_slow.difference(mask);
        self.blink_fast = self.blink_fast.difference(mask);
        self.heartbeat = self.heartbeat.difference(mask);

        match action {
            LedAction::Off => self.turn_off(mask),
            LedAction::On => {
                self.on = self.on.union(mask);
                self.turn_on(self.on)
            }
            // Blink-Modi übernehmen den aktuellen Ausgang, der nächste
            // Umschalt-Zeitpunkt kommt vom Zähler
            LedAction::BlinkSlow => {
                self.blink_slow = self.blink_slow.union(mask);
                Ok(())
            }
            LedAction::BlinkFast => {
                self.blink_fast = self.blink_fast.union(mask);
                Ok(())
            }
            LedAction::Heartbeat => {
                self.heartbeat = self.heartbeat.union(mask);
                Ok(())
            }
        }
    }

    /// Animationsschritt, einmal pro Periode ohne anstehendes Kommando
    ///
    /// Dauerhaft ein-/ausgeschaltete LEDs werden nie angefasst.
    pub fn tick(&mut self) -> Result<(), LedError> {
        let mut reverse = LedSet::EMPTY;

        if self.slow.advance() {
            reverse = reverse.union(self.blink_slow);
        }
        if self.fast.advance() {
            reverse = reverse.union(self.blink_fast);
        }
        if self.beat.advance() {
            reverse = reverse.union(self.heartbeat);
        }

        self.reverse(reverse)
    }

    /// Invertiert den Ausgang aller LEDs in `mask`
    fn reverse(&mut self, mask: LedSet) -> Result<(), LedError> {
        if mask.is_empty() {
            return Ok(());
        }
        self.status = self.status.symmetric_difference(mask);
        self.write(mask)
    }

    fn turn_on(&mut self, mask: LedSet) -> Result<(), LedError> {
        self.status = self.status.union(mask);
        self.write(mask)
    }

    fn turn_off(&mut self, mask: LedSet) -> Result<(), LedError> {
        self.status = self.status.difference(mask);
        self.write(mask)
    }

    /// Schreibt den Zustand der LEDs aus `mask` auf die Pins
    ///
    /// Alle Pins werden versucht, der erste Fehler wird zurückgegeben.
    fn write(&mut self, mask: LedSet) -> Result<(), LedError> {
        let mut result = Ok(());
        for led in mask.iter() {
            let Some(polarity) = self.polarity[led.get() as usize] else {
                continue;
            };
            let level = polarity.level(self.status.contains(led));
            if let Err(e) = self.pins.set_level(led, level) {
                result = result.and(Err(e));
            }
        }
        result
    }

    // ========================================================================
    // Abfragen
    // ========================================================================

    /// Logischer Ausgangszustand aller LEDs
    pub fn status(&self) -> LedSet {
        self.status
    }

    /// Mitglieder einer Animations-Menge (`Off` = keiner Menge zugeordnet)
    pub fn members(&self, action: LedAction) -> LedSet {
        match action {
            LedAction::On => self.on,
            LedAction::BlinkSlow => self.blink_slow,
            LedAction::BlinkFast => self.blink_fast,
            LedAction::Heartbeat => self.heartbeat,
            LedAction::Off => LedSet::ALL
                .difference(self.on)
                .difference(self.blink_slow)
                .difference(self.blink_fast)
                .difference(self.heartbeat),
        }
    }

    /// Aktueller Modus einer einzelnen LED
    pub fn mode_of(&self, led: LedIndex) -> LedAction {
        [
            LedAction::On,
            LedAction::BlinkSlow,
            LedAction::BlinkFast,
            LedAction::Heartbeat,
        ]
        .into_iter()
        .find(|&action| self.members(action).contains(led))
        .unwrap_or(LedAction::Off)
    }

    /// Index der als nächstes geladenen Heartbeat-Phase (0..=3)
    ///
    /// Liefert die Funktion `k`, hält die Engine gerade
    /// `HEARTBEAT_PHASES[k - 1]`, bei `k == 0` also `HEARTBEAT_PHASES[3]`
    /// (die lange Pause). Vor dem ersten Tick steht sie auf 0.
    pub fn heartbeat_phase(&self) -> usize {
        self.beat.phase
    }

    /// Prüft die Invariante: jede LED in höchstens einer Menge
    pub fn is_consistent(&self) -> bool {
        let sets = [self.on, self.blink_slow, self.blink_fast, self.heartbeat];
        sets.iter().enumerate().all(|(i, a)| {
            sets[i + 1..].iter().all(|b| a.is_disjoint(*b))
        })
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Levels {
        levels: [Option<bool>; MAX_LEDS],
        writes: usize,
    }

    impl LedPins for Levels {
        fn set_level(&mut self, led: LedIndex, high: bool) -> Result<(), LedError> {
            self.levels[led.get() as usize] = Some(high);
            self.writes += 1;
            Ok(())
        }
    }

    fn engine() -> LedEngine<Levels> {
        let mut engine = LedEngine::new(Levels::default());
        engine.attach(LedIndex::LED1, Polarity::ActiveHigh).unwrap();
        engine.attach(LedIndex::LED2, Polarity::ActiveLow).unwrap();
        engine
    }

    #[test]
    fn test_attach_writes_off_level() {
        let engine = engine();
        assert_eq!(engine.pins().levels[0], Some(false));
        assert_eq!(engine.pins().levels[1], Some(true));
        assert_eq!(engine.pins().levels[2], None);
    }

    #[test]
    fn test_on_then_off() {
        let mut engine = engine();
        engine.set_action(LedSet::LED1, LedAction::On).unwrap();
        assert!(engine.status().contains(LedIndex::LED1));
        assert_eq!(engine.pins().levels[0], Some(true));

        engine.set_action(LedSet::LED1, LedAction::Off).unwrap();
        assert!(engine.status().is_empty());
        assert_eq!(engine.pins().levels[0], Some(false));
        assert_eq!(engine.mode_of(LedIndex::LED1), LedAction::Off);
    }

    #[test]
    fn test_active_low_polarity_inverts_pin() {
        let mut engine = engine();
        engine.set_action(LedSet::LED2, LedAction::On).unwrap();
        assert_eq!(engine.pins().levels[1], Some(false));
    }

    #[test]
    fn test_unattached_led_is_never_written() {
        let mut engine = engine();
        let writes = engine.pins().writes;
        engine
            .set_action(LedSet::single(LedIndex::LED5), LedAction::On)
            .unwrap();
        assert_eq!(engine.pins().writes, writes);
        // Logisch trotzdem eingeschaltet
        assert!(engine.status().contains(LedIndex::LED5));
    }

    #[test]
    fn test_blink_fast_toggles_every_step() {
        let mut engine = engine();
        engine.set_action(LedSet::LED1, LedAction::BlinkFast).unwrap();

        for _ in 0..BLINK_FAST_STEP - 1 {
            engine.tick().unwrap();
        }
        assert!(!engine.status().contains(LedIndex::LED1));
        engine.tick().unwrap();
        assert!(engine.status().contains(LedIndex::LED1));

        for _ in 0..BLINK_FAST_STEP {
            engine.tick().unwrap();
        }
        assert!(!engine.status().contains(LedIndex::LED1));
    }

    #[test]
    fn test_tick_leaves_on_leds_alone() {
        let mut engine = engine();
        engine.set_action(LedSet::LED1, LedAction::On).unwrap();
        for _ in 0..(HEARTBEAT_CYCLE * 2) {
            engine.tick().unwrap();
        }
        assert!(engine.status().contains(LedIndex::LED1));
    }

    #[test]
    fn test_heartbeat_phase_is_one_ahead_of_held_duration() {
        let mut engine = engine();
        engine.tick().unwrap();

        for _ in 0..HEARTBEAT_PHASES.len() {
            let phase = engine.heartbeat_phase();
            let count = HEARTBEAT_PHASES.len();
            let held = HEARTBEAT_PHASES[(phase + count - 1) % count];
            let mut ticks = 0;
            while engine.heartbeat_phase() == phase {
                engine.tick().unwrap();
                ticks += 1;
            }
            assert_eq!(ticks, held);
        }
    }

    #[test]
    fn test_heartbeat_phase_sequence() {
        let mut engine = engine();
        assert_eq!(engine.heartbeat_phase(), 0);
        engine.tick().unwrap();
        assert_eq!(engine.heartbeat_phase(), 1);
        for (expected, ticks) in [(2, 10), (3, 20), (0, 10), (1, 120)] {
            for _ in 0..ticks {
                engine.tick().unwrap();
            }
            assert_eq!(engine.heartbeat_phase(), expected);
        }
    }

    #[test]
    fn test_step_prefers_command() {
        let mut engine = engine();
        engine
            .step(Some(LedCommand::new(LedSet::LED1, LedAction::On)))
            .unwrap();
        // Kein Tick gelaufen: Heartbeat steht noch in Phase 0
        assert_eq!(engine.heartbeat_phase(), 0);
        engine.step(None).unwrap();
        assert_eq!(engine.heartbeat_phase(), 1);
    }

    #[test]
    fn test_reassignment_keeps_sets_disjoint() {
        let mut engine = engine();
        let mask = LedSet::from_bits(0b0000_0011);
        engine.set_action(mask, LedAction::On).unwrap();
        engine.set_action(LedSet::LED1, LedAction::Heartbeat).unwrap();
        engine.set_action(mask, LedAction::BlinkFast).unwrap();
        engine.set_action(LedSet::LED2, LedAction::BlinkSlow).unwrap();

        assert!(engine.is_consistent());
        assert_eq!(engine.mode_of(LedIndex::LED1), LedAction::BlinkFast);
        assert_eq!(engine.mode_of(LedIndex::LED2), LedAction::BlinkSlow);
        assert!(engine.members(LedAction::On).is_empty());
    }
}
