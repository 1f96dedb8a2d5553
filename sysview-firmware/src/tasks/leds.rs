// LED Engine Task - Animationen auf LED1 (RGB über RMT) und LED2 (GPIO)
use defmt::{error, info};
use embassy_time::{Duration, with_timeout};
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal_smartled::smart_led_buffer;
use sysview_core::{LedEngine, LedPins};

use crate::LedCommandReceiver;
use crate::config::{
    GPIO_LED, GPIO_LED_POLARITY, LED_TICK_MS, RMT_CLOCK_MHZ, SMART_LED, SMART_LED_POLARITY,
};
use crate::hal::BoardLedPins;
use crate::hal::diagnostics::LED_ENGINE_LOOPS;

/// LED Engine Logic - Task-Schleife ohne Hardware-Abhängigkeit
///
/// Wartet höchstens eine Tick-Periode auf ein Kommando:
/// - Kommando empfangen → Mengen umsortieren
/// - Timeout → ein Animations-Tick
///
/// # Parameter
/// - `engine`: LED-Engine mit angemeldeten LEDs (Hardware oder Mock)
/// - `command_receiver`: Channel Receiver für Shell-Kommandos
pub async fn led_engine_logic<P: LedPins>(
    mut engine: LedEngine<P>,
    command_receiver: LedCommandReceiver,
) -> ! {
    loop {
        LED_ENGINE_LOOPS.tick();
        let command = with_timeout(
            Duration::from_millis(LED_TICK_MS),
            command_receiver.receive(),
        )
        .await
        .ok();

        if let Some(command) = command {
            info!("Command received: {}", command);
        }

        if let Err(e) = engine.step(command) {
            error!("Failed to write to LED: {}", e);
        }
    }
}

/// LED Engine Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung und ruft dann
/// `led_engine_logic()` auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für die RGB LED
/// - `gpio4`: GPIO4 Peripheral für die externe LED
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `command_receiver`: Channel Receiver für Shell-Kommandos
#[embassy_executor::task]
pub async fn led_engine_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    gpio4: esp_hal::peripherals::GPIO4<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    command_receiver: LedCommandReceiver,
) {
    // Buffer für SmartLED Daten erstellen (1 LED)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(1);

    let gpio_led = Output::new(gpio4, Level::Low, OutputConfig::default());

    let pins = match BoardLedPins::new(
        gpio8,
        rmt_peripheral,
        RMT_CLOCK_MHZ,
        &mut rmt_buffer,
        gpio_led,
    ) {
        Ok(pins) => pins,
        Err(e) => {
            error!("LED init failed: {}", e);
            return;
        }
    };

    let mut engine = LedEngine::new(pins);
    for (led, polarity) in [
        (SMART_LED, SMART_LED_POLARITY),
        (GPIO_LED, GPIO_LED_POLARITY),
    ] {
        if let Err(e) = engine.attach(led, polarity) {
            error!("Failed to attach {}: {}", led, e);
        }
    }

    info!("LED engine started, tick {} ms", LED_TICK_MS);
    led_engine_logic(engine, command_receiver).await
}
