//! Integration Tests für die serielle Shell
//!
//! Line Receiver → Gate → Parser → Dispatch, mit Mock-Kollaborateuren.
//! Async-Aufrufe werden mit `embassy_futures::block_on` ausgeführt.

use std::cell::{Cell, RefCell};

use embassy_futures::block_on;
use sysview_core::{
    DebugSink, DispatchError, LedAction, LedCommand, LedCommandSink, LedError, LedSet, LineGate,
    LineReady, LoadControl, LoadError, ParseError, Reading, SensorBank, SensorError, SensorId,
    Shell, ShellInput, SinkError, SystemDiagnostics, SystemStatus, TaskInfo, TaskState,
};
use sysview_core::shell::PRINT_BUFFER_SIZE;

// ============================================================================
// Mocks
// ============================================================================

/// Sammelt die komplette Shell-Ausgabe
#[derive(Default)]
struct MockSink {
    output: RefCell<Vec<u8>>,
    /// Simuliert einen belegten UART
    busy: Cell<bool>,
}

impl MockSink {
    fn text(&self) -> String {
        String::from_utf8(self.output.borrow().clone()).unwrap()
    }
}

impl DebugSink for MockSink {
    async fn write(&self, bytes: &[u8]) -> Result<(), SinkError> {
        if self.busy.get() {
            return Err(SinkError::Busy);
        }
        self.output.borrow_mut().extend_from_slice(bytes);
        Ok(())
    }
}

#[derive(Default)]
struct MockLedQueue {
    posted: RefCell<Vec<LedCommand>>,
    full: Cell<bool>,
}

impl LedCommandSink for MockLedQueue {
    async fn post(&self, command: LedCommand) -> Result<(), LedError> {
        if self.full.get() {
            return Err(LedError::QueueTimeout);
        }
        self.posted.borrow_mut().push(command);
        Ok(())
    }
}

struct MockSensors {
    failing: Option<SensorId>,
}

impl SensorBank for MockSensors {
    fn read(&mut self, sensor: SensorId) -> Result<Reading, SensorError> {
        if self.failing == Some(sensor) {
            return Err(SensorError::Bus);
        }
        Ok(match sensor {
            SensorId::Temperature => Reading::Temperature(23.5),
            SensorId::Humidity => Reading::Humidity(41.0),
            SensorId::Pressure => Reading::Pressure {
                pressure: 1013.25,
                temperature: 22.0,
            },
            SensorId::Gyro => Reading::Gyro([1.0, 2.0, 3.0]),
            SensorId::Accelero => Reading::Accelero([10, 20, 30]),
            SensorId::Magneto => Reading::Magneto([-1, -2, -3]),
        })
    }
}

struct MockDiagnostics(SystemStatus);

impl SystemDiagnostics for MockDiagnostics {
    fn status(&self) -> SystemStatus {
        self.0.clone()
    }
}

fn healthy() -> SystemStatus {
    SystemStatus {
        cpu_clock_hz: 160_000_000,
        tick_hz: 1_000_000,
        heap_size: 32768,
        heap_free: 30000,
        uptime_ms: 4200,
        tasks: Default::default(),
    }
}

/// Schalter für die CPU-Last, zählt Starts
#[derive(Default)]
struct MockLoad {
    running: Cell<bool>,
    starts: Cell<usize>,
}

impl LoadControl for MockLoad {
    fn start(&self) -> Result<(), LoadError> {
        if self.running.replace(true) {
            return Err(LoadError::AlreadyRunning);
        }
        self.starts.set(self.starts.get() + 1);
        Ok(())
    }

    fn stop(&self) -> Result<(), LoadError> {
        if !self.running.replace(false) {
            return Err(LoadError::NotRunning);
        }
        Ok(())
    }
}

/// Zählt Freigaben, ein Slot wie der Gate-Channel der Firmware
#[derive(Default)]
struct CountingGate {
    releases: Cell<usize>,
    pending: Cell<Option<LineReady>>,
}

impl CountingGate {
    fn take(&self) -> Option<LineReady> {
        self.pending.take()
    }
}

impl LineGate for CountingGate {
    async fn release(&self, ready: LineReady) {
        self.releases.set(self.releases.get() + 1);
        self.pending.set(Some(ready));
    }

    fn try_release(&self, ready: LineReady) -> bool {
        if self.pending.get().is_some() {
            return false;
        }
        self.releases.set(self.releases.get() + 1);
        self.pending.set(Some(ready));
        true
    }
}

type TestShell<'a> =
    Shell<MockSensors, &'a MockLedQueue, &'a MockSink, MockDiagnostics, MockLoad>;

fn shell<'a>(queue: &'a MockLedQueue, sink: &'a MockSink) -> TestShell<'a> {
    Shell::new(
        MockSensors { failing: None },
        queue,
        sink,
        MockDiagnostics(healthy()),
        MockLoad::default(),
    )
}

fn run(line: &str) -> (Result<(), DispatchError>, String, Vec<LedCommand>) {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let result = block_on(shell(&queue, &sink).handle_line(line.as_bytes()));
    let posted = queue.posted.borrow().clone();
    (result, sink.text(), posted)
}

// ============================================================================
// Tests: Line Receiver + Gate
// ============================================================================

#[test]
fn test_led_on_line_signals_once() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());

    for byte in b"led on\r" {
        block_on(input.feed(*byte));
    }

    assert_eq!(input.gate().releases.get(), 1);
    assert_eq!(input.gate().take(), Some(LineReady { len: 6 }));
    assert_eq!(input.take_line().as_slice(), b"led on");
}

#[test]
fn test_bare_carriage_return_does_not_signal() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());

    block_on(input.feed(b'\r'));

    assert_eq!(input.gate().releases.get(), 0);
    assert!(input.take_line().is_empty());
}

#[test]
fn test_interrupt_path_never_blocks() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());

    let signalled: Vec<bool> = b"help\r".iter().map(|&b| input.feed_from_interrupt(b)).collect();
    assert_eq!(signalled, vec![false, false, false, false, true]);

    // Slot noch belegt: weitere Freigabe schlägt fehl statt zu warten
    assert!(!input.feed_from_interrupt(b'\n'));
    assert_eq!(input.gate().releases.get(), 1);

    assert_eq!(input.take_line().as_slice(), b"help");
}

#[test]
fn test_task_and_interrupt_share_one_buffer() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());

    block_on(input.feed(b'g'));
    input.feed_from_interrupt(b'e');
    block_on(input.feed(b't'));

    assert_eq!(input.take_line().as_slice(), b"get");
}

#[test]
fn test_crlf_terminal_signals_once_per_line() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());

    // CR+LF, dann die ersten Bytes des nächsten Kommandos
    for byte in b"led on\r\nhe" {
        block_on(input.feed(*byte));
    }
    assert_eq!(input.gate().releases.get(), 1);
    assert_eq!(input.gate().take(), Some(LineReady { len: 6 }));
    assert_eq!(input.take_line().as_slice(), b"led on");
    assert_eq!(input.gate().take(), None);

    for byte in b"lp\r\n" {
        block_on(input.feed(*byte));
    }
    assert_eq!(input.gate().releases.get(), 2);
    assert!(input.gate().take().is_some());
    assert_eq!(input.take_line().as_slice(), b"help");
}

#[test]
fn test_line_typed_before_drain_is_released_after_drain() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let mut shell = shell(&queue, &sink);

    for byte in b"led on 2\r\nled off 2\r\n" {
        block_on(input.feed(*byte));
    }
    assert_eq!(input.gate().releases.get(), 1);

    // Shell-Task-Schleife: warten, abholen, ausführen
    while input.gate().take().is_some() {
        let line = input.take_line();
        block_on(shell.handle_line(&line)).unwrap();
    }

    assert_eq!(input.gate().releases.get(), 2);
    assert_eq!(
        *queue.posted.borrow(),
        vec![
            LedCommand::new(LedSet::LED2, LedAction::On),
            LedCommand::new(LedSet::LED2, LedAction::Off),
        ]
    );
    assert_eq!(sink.text(), "$ led on 2\r\n$ led off 2\r\n");
}

// ============================================================================
// Tests: Dispatch
// ============================================================================

#[test]
fn test_get_temperature_echoes_and_reports() {
    let (result, output, _) = run("get temperature");
    assert_eq!(result, Ok(()));
    assert_eq!(output, "$ get temperature\r\n1-TEMPERATURE = 23.50 C\r\n");
}

#[test]
fn test_get_pressure_prints_pressure_value() {
    let (_, output, _) = run("get pressure");
    assert!(output.contains("2-PRESSURE = 1013.25 mBar\r\n"));
    assert!(output.contains("2-TEMPERATURE = 22.00 C\r\n"));
}

#[test]
fn test_get_all_reports_every_sensor() {
    let (result, output, _) = run("get all");
    assert_eq!(result, Ok(()));
    // Echo + 13 Messzeilen
    assert_eq!(output.lines().count(), 14);
    assert!(output.contains("4-MAGNETO_Z = -3\r\n"));
}

#[test]
fn test_plot_prints_csv_line() {
    let (result, output, _) = run("plot");
    assert_eq!(result, Ok(()));
    let csv = output.lines().nth(1).unwrap();
    assert_eq!(
        csv,
        "23.50,41.00,1013.25,22.00,1.00,2.00,3.00,10,20,30,-1,-2,-3"
    );
}

#[test]
fn test_unknown_command() {
    let (result, output, _) = run("reboot now");
    assert_eq!(result, Err(DispatchError::UnknownCommand));
    assert_eq!(output, "$ reboot now\r\n(X) reboot: unknown command\r\n");
}

#[test]
fn test_get_without_argument() {
    let (result, output, _) = run("get");
    assert_eq!(result, Err(DispatchError::MissingArgument));
    assert!(output.ends_with("(X) get: missing argument\r\n"));
}

#[test]
fn test_get_unknown_sensor() {
    let (result, _, _) = run("get light");
    assert_eq!(result, Err(DispatchError::UnknownArgument));
}

#[test]
fn test_sensor_failure_prints_stale_values() {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let mut shell = shell(&queue, &sink);

    block_on(shell.handle_line(b"get humidity")).unwrap();

    // Sensor fällt aus, der alte Wert bleibt stehen
    let mut failing = Shell::new(
        MockSensors {
            failing: Some(SensorId::Humidity),
        },
        &queue,
        &sink,
        MockDiagnostics(healthy()),
        MockLoad::default(),
    );
    let result = block_on(failing.handle_line(b"get humidity"));
    assert_eq!(result, Err(DispatchError::Sensor(SensorError::Bus)));
    assert_eq!(failing.reading().humidity, 0.0);
    assert!(sink.text().ends_with(
        "$ get humidity\r\n1-HUMIDITY =  0 %\r\n(X) get: sensor read failed: bus error\r\n"
    ));
    assert_eq!(shell.reading().humidity, 41.0);
}

#[test]
fn test_led_defaults_to_led1() {
    let (result, output, posted) = run("led heartbeat");
    assert_eq!(result, Ok(()));
    assert_eq!(output, "$ led heartbeat\r\n");
    assert_eq!(
        posted,
        vec![LedCommand::new(LedSet::LED1, LedAction::Heartbeat)]
    );
}

#[test]
fn test_led_with_number() {
    let (_, _, posted) = run("led fast 2");
    assert_eq!(
        posted,
        vec![LedCommand::new(LedSet::LED2, LedAction::BlinkFast)]
    );
}

#[test]
fn test_led_invalid_arguments() {
    assert_eq!(run("led").0, Err(DispatchError::MissingArgument));
    assert_eq!(run("led dance").0, Err(DispatchError::UnknownArgument));
    assert_eq!(run("led on 9").0, Err(DispatchError::UnknownArgument));
    assert_eq!(run("led on 0").0, Err(DispatchError::UnknownArgument));
    assert_eq!(run("led on x").0, Err(DispatchError::UnknownArgument));
    assert!(run("led on 9").2.is_empty());
}

#[test]
fn test_led_queue_timeout_is_reported() {
    let queue = MockLedQueue::default();
    queue.full.set(true);
    let sink = MockSink::default();

    let result = block_on(shell(&queue, &sink).handle_line(b"led off"));
    assert_eq!(result, Err(DispatchError::Led(LedError::QueueTimeout)));
    assert!(sink
        .text()
        .ends_with("(X) led: LED queue full, command dropped\r\n"));
}

#[test]
fn test_help_lists_every_command() {
    let (result, output, _) = run("help");
    assert_eq!(result, Ok(()));
    for usage in [
        "> help",
        "> rtos",
        "> get <v1>",
        "> plot",
        "> led <v1> [1-8]",
        "> consume <v1>",
    ] {
        assert!(output.contains(usage), "missing {}", usage);
    }
    assert!(output.contains("\t heartbeat\r\n"));
    assert!(output.contains("\t create\r\n\t delete\r\n"));
}

#[test]
fn test_rtos_status() {
    let (_, output, _) = run("rtos");
    assert!(output.contains("Clock CPU  : 160000000 Hz\r\n"));
    assert!(output.contains("Free heap: 30000\r\n"));
    assert!(output.contains("Uptime: 4200 ms\r\n"));
    assert!(!output.contains("Heap near limit"));
}

#[test]
fn test_rtos_warns_on_low_heap() {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let status = SystemStatus {
        heap_free: 1000,
        ..healthy()
    };
    let mut shell = Shell::new(
        MockSensors { failing: None },
        &queue,
        &sink,
        MockDiagnostics(status),
        MockLoad::default(),
    );

    block_on(shell.handle_line(b"rtos")).unwrap();
    assert!(sink.text().contains("(X) Heap near limit\r\n"));
}

#[test]
fn test_empty_line_is_ignored() {
    let (result, output, _) = run("   ");
    assert_eq!(result, Ok(()));
    assert!(output.is_empty());
}

#[test]
fn test_too_many_arguments_executes_nothing() {
    let (result, output, posted) = run("led on 1 a b c d e f g h i j k l m n o");
    assert_eq!(
        result,
        Err(DispatchError::Parse(ParseError::TooManyArguments))
    );
    assert_eq!(output, "(X) too many arguments (max 16)\r\n");
    assert!(posted.is_empty());
}

#[test]
fn test_busy_sink_drops_output_but_runs_command() {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    sink.busy.set(true);

    let result = block_on(shell(&queue, &sink).handle_line(b"led on"));
    assert_eq!(result, Ok(()));
    assert!(sink.text().is_empty());
    assert_eq!(queue.posted.borrow().len(), 1);
}

#[test]
fn test_line_from_receiver_dispatches() {
    let input: ShellInput<CountingGate> = ShellInput::new(CountingGate::default());
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let mut shell = shell(&queue, &sink);

    for byte in b"led blink 2\r\n" {
        block_on(input.feed(*byte));
    }
    assert!(input.gate().take().is_some());
    let line = input.take_line();

    block_on(shell.handle_line(&line)).unwrap();
    assert_eq!(
        *queue.posted.borrow(),
        vec![LedCommand::new(LedSet::LED2, LedAction::BlinkSlow)]
    );
}

#[test]
fn test_long_echo_keeps_line_ending() {
    // Echo "$ x " + 508 Zeichen passt nicht in den Ausgabepuffer
    let line = format!("x {}", "a".repeat(508));
    let (result, output, _) = run(&line);
    assert_eq!(result, Err(DispatchError::UnknownCommand));

    let mut lines = output.split("\r\n");
    let echo = lines.next().unwrap();
    assert!(echo.starts_with("$ x aaaa"));
    assert_eq!(echo.len(), PRINT_BUFFER_SIZE - 2);
    assert_eq!(lines.next(), Some("(X) x: unknown command"));
    assert_eq!(lines.next(), Some(""));
}

// ============================================================================
// Tests: consume
// ============================================================================

#[test]
fn test_consume_create_and_delete() {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let mut shell = shell(&queue, &sink);

    assert_eq!(block_on(shell.handle_line(b"consume create")), Ok(()));
    assert_eq!(block_on(shell.handle_line(b"consume delete")), Ok(()));
    assert_eq!(block_on(shell.handle_line(b"consume create")), Ok(()));
    assert_eq!(
        sink.text(),
        "$ consume create\r\n$ consume delete\r\n$ consume create\r\n"
    );
}

#[test]
fn test_consume_create_twice_is_reported() {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let load = MockLoad::default();
    let mut shell = Shell::new(
        MockSensors { failing: None },
        &queue,
        &sink,
        MockDiagnostics(healthy()),
        &load,
    );

    block_on(shell.handle_line(b"consume create")).unwrap();
    let result = block_on(shell.handle_line(b"consume create"));

    assert_eq!(result, Err(DispatchError::Load(LoadError::AlreadyRunning)));
    assert_eq!(load.starts.get(), 1);
    assert!(load.running.get());
    assert!(sink
        .text()
        .ends_with("(X) consume: load task already running\r\n"));
}

#[test]
fn test_consume_delete_without_load() {
    let (result, output, _) = run("consume delete");
    assert_eq!(result, Err(DispatchError::Load(LoadError::NotRunning)));
    assert!(output.ends_with("(X) consume: load task not running\r\n"));
}

#[test]
fn test_consume_invalid_arguments() {
    assert_eq!(run("consume").0, Err(DispatchError::MissingArgument));
    assert_eq!(run("consume all").0, Err(DispatchError::UnknownArgument));
}

// ============================================================================
// Tests: rtos Task-Liste
// ============================================================================

#[test]
fn test_rtos_lists_tasks() {
    let queue = MockLedQueue::default();
    let sink = MockSink::default();
    let mut status = healthy();
    for (name, state, loops) in [
        ("led_engine", TaskState::Running, 4200),
        ("shell", TaskState::Running, 3),
        ("uart_rx", TaskState::Running, 17),
        ("cpu_load", TaskState::Stopped, 0),
    ] {
        status.tasks.push(TaskInfo { name, state, loops }).unwrap();
    }
    let mut shell = Shell::new(
        MockSensors { failing: None },
        &queue,
        &sink,
        MockDiagnostics(status),
        MockLoad::default(),
    );

    block_on(shell.handle_line(b"rtos")).unwrap();
    let output = sink.text();

    assert!(output.contains("Task            State\tLoops\r\n"));
    assert!(output.contains("led_engine      R\t4200\r\n"));
    assert!(output.contains("shell           R\t3\r\n"));
    assert!(output.contains("uart_rx         R\t17\r\n"));
    assert!(output.contains("cpu_load        S\t0\r\n"));
    // Task-Liste nach dem Heap-Block
    assert!(output.find("Uptime").unwrap() < output.find("led_engine").unwrap());
}
