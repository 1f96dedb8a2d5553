// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::tsens::{Config as TsensConfig, TemperatureSensor};
use esp_hal::uart::{Config as UartConfig, Uart};

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_sysview::config::{HEAP_SIZE, UART_BAUDRATE};
use esp_sysview::hal::{
    BoardDiagnostics, BoardSensors, CpuLoad, LedQueue, LineSignal, SerialSink,
};
use esp_sysview::tasks::{cpu_load_task, led_engine_task, shell_task, uart_rx_task};
use esp_sysview::{BoardShell, BoardShellInput, LedCommandChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Einzige Stelle, an der die Board-Adapter, Channels, die LED-Engine und
/// die Shell gebaut und an die Tasks verteilt werden.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (Statistik für `rtos`)
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // UART0 für die Shell (TX GPIO16, RX GPIO17)
    let uart = Uart::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(UART_BAUDRATE),
    )
    .expect("Failed to initialize UART0")
    .with_tx(peripherals.GPIO16)
    .with_rx(peripherals.GPIO17)
    .into_async();
    let (uart_rx, uart_tx) = uart.split();

    static SERIAL_SINK: static_cell::StaticCell<SerialSink> = static_cell::StaticCell::new();
    let serial_sink = &*SERIAL_SINK.init(SerialSink::new(uart_tx));

    // Interner Temperatursensor
    let tsens = TemperatureSensor::new(peripherals.TSENS, TsensConfig::default())
        .expect("Failed to initialize temperature sensor");

    // LED Command-Channel erstellen (Shell → LED Task)
    static COMMAND_CHANNEL: static_cell::StaticCell<LedCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = &*COMMAND_CHANNEL.init(LedCommandChannel::new());
    let command_sender = command_channel.sender();
    let command_receiver = command_channel.receiver();

    // Shell-Eingang: Line Receiver + Gate (UART RX Task → Shell Task)
    static SHELL_INPUT: static_cell::StaticCell<BoardShellInput> = static_cell::StaticCell::new();
    let shell_input = &*SHELL_INPUT.init(BoardShellInput::new(LineSignal::new()));

    // Schalter für den Last-Task (Shell → CPU-Last Task)
    static CPU_LOAD: static_cell::StaticCell<CpuLoad> = static_cell::StaticCell::new();
    let cpu_load = &*CPU_LOAD.init(CpuLoad::new());

    // Shell mit allen Kollaborateuren
    let shell = BoardShell::new(
        BoardSensors::new(tsens),
        LedQueue::new(command_sender),
        serial_sink,
        BoardDiagnostics::new(cpu_load),
        cpu_load,
    );

    // Spawn LED Task
    spawner
        .spawn(led_engine_task(
            peripherals.GPIO8,
            peripherals.GPIO4,
            peripherals.RMT,
            command_receiver,
        ))
        .unwrap();

    // Spawn Shell Tasks
    spawner.spawn(shell_task(shell_input, shell)).unwrap();
    spawner.spawn(uart_rx_task(uart_rx, shell_input)).unwrap();

    // CPU-Last Task parkt bis `consume create`
    spawner.spawn(cpu_load_task(cpu_load)).unwrap();

    info!("SysView started");

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
