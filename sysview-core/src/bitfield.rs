//! Bit-Hilfsfunktionen
//!
//! Setzen, Löschen, Umschalten und Testen einzelner Bits, BCD-Konvertierung
//! und Suche nach dem ersten gesetzten Bit. Grundlage für `LedSet`.

/// Anzahl Bits in einem Byte
pub const BITS: u8 = 8;

/// Setzt Bit `bit` auf 1
///
/// Bits außerhalb von 0..8 lassen den Wert unverändert.
pub const fn set_bit(value: u8, bit: u8) -> u8 {
    if bit < BITS { value | (1 << bit) } else { value }
}

/// Setzt Bit `bit` auf 0
pub const fn clear_bit(value: u8, bit: u8) -> u8 {
    if bit < BITS { value & !(1 << bit) } else { value }
}

/// Invertiert Bit `bit`
pub const fn toggle_bit(value: u8, bit: u8) -> u8 {
    if bit < BITS { value ^ (1 << bit) } else { value }
}

/// Liefert `true` wenn Bit `bit` gesetzt ist
pub const fn test_bit(value: u8, bit: u8) -> bool {
    bit < BITS && (value & (1 << bit)) != 0
}

/// Schreibt 0 oder 1 in Bit `bit`
pub const fn write_bit(value: u8, bit: u8, high: bool) -> u8 {
    if high {
        set_bit(value, bit)
    } else {
        clear_bit(value, bit)
    }
}

/// Index des niedrigsten gesetzten Bits
///
/// # Beispiele
///
/// ```
/// # use sysview_core::bitfield::first_set_bit;
/// assert_eq!(first_set_bit(0b0000_0100), Some(2));
/// assert_eq!(first_set_bit(0), None);
/// ```
pub const fn first_set_bit(value: u8) -> Option<u8> {
    if value == 0 {
        None
    } else {
        Some(value.trailing_zeros() as u8)
    }
}

/// Dezimal (0..=99) → BCD, größere Werte werden auf 99 begrenzt
pub const fn dec_to_bcd(value: u8) -> u8 {
    let value = if value > 99 { 99 } else { value };
    (value / 10) * 16 + (value % 10)
}

/// BCD → Dezimal
pub const fn bcd_to_dec(value: u8) -> u8 {
    (value / 16) * 10 + (value % 16)
}
