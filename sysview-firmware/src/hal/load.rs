// CPU-Last für das `consume` Kommando
//
// Der Last-Task läuft von Anfang an und parkt, bis `start()` ihn weckt.
// `stop()` setzt nur das Flag, der Task parkt nach dem laufenden Durchlauf.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use sysview_core::{LoadControl, LoadError};

pub struct CpuLoad {
    running: AtomicBool,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl CpuLoad {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            wake: Signal::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Wartet bis die Last eingeschaltet ist (Last-Task)
    pub async fn wait_started(&self) {
        while !self.is_running() {
            self.wake.wait().await;
        }
    }
}

impl Default for CpuLoad {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadControl for CpuLoad {
    fn start(&self) -> Result<(), LoadError> {
        if self.running.swap(true, Ordering::Relaxed) {
            return Err(LoadError::AlreadyRunning);
        }
        self.wake.signal(());
        Ok(())
    }

    fn stop(&self) -> Result<(), LoadError> {
        if !self.running.swap(false, Ordering::Relaxed) {
            return Err(LoadError::NotRunning);
        }
        Ok(())
    }
}
