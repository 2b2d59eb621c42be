//! Handle to the emulator core
//!
//! The core runs elsewhere; the shell only ever asks it to pause when the
//! scene leaves the foreground.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub trait EmulatorCore: Send + Sync {
    fn pause(&self);
}

/// Pause flag polled by a frame loop
#[derive(Debug, Default)]
pub struct EmulationControl {
    paused: AtomicBool,
    pause_requests: AtomicU64,
}

impl EmulationControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// How many times `pause` has been called
    pub fn pause_requests(&self) -> u64 {
        self.pause_requests.load(Ordering::Relaxed)
    }
}

impl EmulatorCore for EmulationControl {
    fn pause(&self) {
        self.pause_requests.fetch_add(1, Ordering::Relaxed);
        if !self.paused.swap(true, Ordering::AcqRel) {
            log::info!("Emulation paused");
        }
    }
}
