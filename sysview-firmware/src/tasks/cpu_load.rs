// CPU-Last Task - verbraucht periodisch Rechenzeit (`consume create`)
use core::hint::black_box;

use defmt::info;
use embassy_time::{Duration, Timer};

use crate::config::{CPU_LOAD_ITERATIONS, CPU_LOAD_PERIOD_MS};
use crate::hal::CpuLoad;
use crate::hal::diagnostics::CPU_LOAD_LOOPS;

/// Rechnet `iterations` Gleitkomma-Multiplikationen (Soft-Float auf dem C6)
fn burn(iterations: u32) -> f32 {
    let mut acc = 1.0f32;
    for i in 0..iterations {
        acc = black_box(acc * (i as f32 + 12.34));
    }
    acc
}

/// CPU-Last Task
///
/// Parkt bis `consume create`, danach ein Rechenblock pro Periode.
/// Nach `consume delete` parkt der Task wieder.
///
/// # Parameter
/// - `load`: Schalter, gemeinsam mit der Shell
#[embassy_executor::task]
pub async fn cpu_load_task(load: &'static CpuLoad) {
    info!("CPU load task started (parked)");

    loop {
        if !load.is_running() {
            info!("CPU load parked");
            load.wait_started().await;
            info!("CPU load running");
        }

        black_box(burn(CPU_LOAD_ITERATIONS));
        CPU_LOAD_LOOPS.tick();
        Timer::after(Duration::from_millis(CPU_LOAD_PERIOD_MS)).await;
    }
}
