// Scheduler-/Heap-Status für das `rtos` Kommando

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_time::{Instant, TICK_HZ};
use heapless::Vec;
use sysview_core::{SystemDiagnostics, SystemStatus, TaskInfo, TaskState};

use crate::config::CPU_CLOCK_HZ;
use crate::hal::CpuLoad;

/// Schleifenzähler eines Tasks
///
/// Embassy führt keine Task-Liste, jeder Task zählt selbst mit.
pub struct TaskCounter {
    name: &'static str,
    loops: AtomicU32,
}

impl TaskCounter {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            loops: AtomicU32::new(0),
        }
    }

    /// Ein Durchlauf der Task-Schleife
    pub fn tick(&self) {
        self.loops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn info(&self, state: TaskState) -> TaskInfo {
        TaskInfo {
            name: self.name,
            state,
            loops: self.loops.load(Ordering::Relaxed),
        }
    }
}

pub static LED_ENGINE_LOOPS: TaskCounter = TaskCounter::new("led_engine");
pub static SHELL_LOOPS: TaskCounter = TaskCounter::new("shell");
pub static UART_RX_LOOPS: TaskCounter = TaskCounter::new("uart_rx");
pub static CPU_LOAD_LOOPS: TaskCounter = TaskCounter::new("cpu_load");

#[derive(Clone, Copy)]
pub struct BoardDiagnostics {
    load: &'static CpuLoad,
}

impl BoardDiagnostics {
    pub fn new(load: &'static CpuLoad) -> Self {
        Self { load }
    }
}

impl SystemDiagnostics for BoardDiagnostics {
    fn status(&self) -> SystemStatus {
        let load_state = if self.load.is_running() {
            TaskState::Running
        } else {
            TaskState::Stopped
        };

        let mut tasks = Vec::new();
        for (counter, state) in [
            (&LED_ENGINE_LOOPS, TaskState::Running),
            (&SHELL_LOOPS, TaskState::Running),
            (&UART_RX_LOOPS, TaskState::Running),
            (&CPU_LOAD_LOOPS, load_state),
        ] {
            let _ = tasks.push(counter.info(state));
        }

        let heap_free = esp_alloc::HEAP.free();
        SystemStatus {
            cpu_clock_hz: CPU_CLOCK_HZ,
            tick_hz: TICK_HZ,
            heap_size: heap_free + esp_alloc::HEAP.used(),
            heap_free,
            uptime_ms: Instant::now().as_millis(),
            tasks,
        }
    }
}
