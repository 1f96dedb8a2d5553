// LED-Pins des Boards
//
// LED1 ist die On-Board RGB LED (WS2812) über RMT, LED2 eine normale
// GPIO-LED. Für die Engine sind beide nur ein Pin mit Pegel.

use esp_hal::Blocking;
use esp_hal::gpio::{Level, Output};
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;
use sysview_core::{LedError, LedIndex, LedPins};

use crate::config::{GPIO_LED, LED_BRIGHTNESS, SMART_LED};

// Buffer-Größe für 1 LED (3 Farben * 8 Bits + 1 Reset)
pub const LED_BUFFER_SIZE: usize = 25;

/// Farbe der RGB LED im Zustand "High"
const LIT_COLOR: RGB8 = RGB8 {
    r: 0,
    g: LED_BRIGHTNESS,
    b: 0,
};

/// Real Hardware LED-Pins
///
/// Hinweis: Der RMT-Buffer muss die Lebensdauer des Adapters haben, daher
/// wird er im Task erstellt und als Parameter übergeben.
pub struct BoardLedPins<'a> {
    smart_led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
    gpio_led: Output<'a>,
}

impl<'a> BoardLedPins<'a> {
    /// Erstellt die Pins
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für die Datenleitung der RGB LED
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(1) Macro)
    /// - `gpio_led`: bereits konfigurierter Ausgang für LED2
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn das RMT nicht startet
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; LED_BUFFER_SIZE],
        gpio_led: Output<'a>,
    ) -> Result<Self, LedError> {
        // RMT initialisieren
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        // SmartLED Adapter erstellen
        let smart_led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self {
            smart_led,
            gpio_led,
        })
    }
}

impl LedPins for BoardLedPins<'_> {
    fn set_level(&mut self, led: LedIndex, high: bool) -> Result<(), LedError> {
        if led == SMART_LED {
            let color = if high { LIT_COLOR } else { RGB8::default() };
            self.smart_led
                .write([color].into_iter())
                .map_err(|_| LedError::WriteFailed)
        } else if led == GPIO_LED {
            self.gpio_led.set_level(Level::from(high));
            Ok(())
        } else {
            // Nicht bestückt
            Err(LedError::WriteFailed)
        }
    }
}
