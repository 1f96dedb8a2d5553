//! Core Types für die LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use crate::bitfield::{self, BITS};

/// Maximale Anzahl LEDs (ein Bit pro LED)
pub const MAX_LEDS: usize = BITS as usize;

/// Index einer LED (0..=7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedIndex(u8);

impl LedIndex {
    pub const LED1: Self = Self(0);
    pub const LED2: Self = Self(1);
    pub const LED3: Self = Self(2);
    pub const LED4: Self = Self(3);
    pub const LED5: Self = Self(4);
    pub const LED6: Self = Self(5);
    pub const LED7: Self = Self(6);
    pub const LED8: Self = Self(7);

    /// Erstellt einen Index, `None` wenn außerhalb von 0..=7
    pub const fn new(index: u8) -> Option<Self> {
        if index < BITS { Some(Self(index)) } else { None }
    }

    /// Erstellt einen Index aus der 1-basierten Nummer (LED1 = 1)
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=8 => Some(Self(number - 1)),
            _ => None,
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// 1-basierte Nummer für Ausgaben
    pub const fn number(self) -> u8 {
        self.0 + 1
    }
}

/// Menge von LEDs als 8-Bit-Bitset
///
/// Ersetzt rohe Bitmasken durch benannte Mengenoperationen, damit
/// die Disjunktheit der Animations-Mengen prüfbar bleibt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LedSet(u8);

impl LedSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0xFF);
    pub const LED1: Self = Self::single(LedIndex::LED1);
    pub const LED2: Self = Self::single(LedIndex::LED2);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn single(index: LedIndex) -> Self {
        Self(bitfield::set_bit(0, index.0))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn contains(self, index: LedIndex) -> bool {
        bitfield::test_bit(self.0, index.0)
    }

    pub const fn insert(self, index: LedIndex) -> Self {
        Self(bitfield::set_bit(self.0, index.0))
    }

    pub const fn remove(self, index: LedIndex) -> Self {
        Self(bitfield::clear_bit(self.0, index.0))
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Alle Elemente von `self` ohne die von `other`
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Umschalten: Elemente aus `other` werden hinzugefügt bzw. entfernt
    pub const fn symmetric_difference(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    pub const fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Niedrigster LED-Index in der Menge
    pub const fn first(self) -> Option<LedIndex> {
        match bitfield::first_set_bit(self.0) {
            Some(bit) => Some(LedIndex(bit)),
            None => None,
        }
    }

    /// Iteriert über die enthaltenen LEDs in aufsteigender Reihenfolge
    pub fn iter(self) -> impl Iterator<Item = LedIndex> {
        (0..BITS)
            .filter(move |&bit| bitfield::test_bit(self.0, bit))
            .map(LedIndex)
    }
}

impl From<LedIndex> for LedSet {
    fn from(index: LedIndex) -> Self {
        Self::single(index)
    }
}

impl fmt::Display for LedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010b}", self.0)
    }
}

/// Polarität einer LED am Pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// LED leuchtet bei Low-Pegel
    ActiveLow,
    /// LED leuchtet bei High-Pegel
    #[default]
    ActiveHigh,
}

impl Polarity {
    /// Physikalischer Pin-Pegel für einen logischen Zustand
    pub const fn level(self, lit: bool) -> bool {
        match self {
            Polarity::ActiveHigh => lit,
            Polarity::ActiveLow => !lit,
        }
    }
}

/// Aktion bzw. Animations-Modus einer LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedAction {
    Off,
    On,
    BlinkSlow,
    BlinkFast,
    Heartbeat,
}

impl LedAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            LedAction::Off => "off",
            LedAction::On => "on",
            LedAction::BlinkSlow => "blink",
            LedAction::BlinkFast => "fast",
            LedAction::Heartbeat => "heartbeat",
        }
    }
}

/// Shell-Schlüsselwort → Aktion (`led <key>`)
impl TryFrom<&str> for LedAction {
    type Error = ();

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        match key {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "blink" => Ok(Self::BlinkSlow),
            "fast" => Ok(Self::BlinkFast),
            "heartbeat" => Ok(Self::Heartbeat),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LED Command für die Channel-Kommunikation
///
/// Wird von beliebigen Tasks (Shell, Applikation) gesendet und genau
/// einmal vom LED-Task verarbeitet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedCommand {
    pub target: LedSet,
    pub action: LedAction,
}

impl LedCommand {
    pub const fn new(target: LedSet, action: LedAction) -> Self {
        Self { target, action }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LedSet {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "LedSet({=u8:#b})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedCommand {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LedCommand {{ target: {=u8:#b}, action: {} }}",
            self.target.bits(),
            self.action.as_str()
        )
    }
}
