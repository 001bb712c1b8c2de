//! Time sources for the idle timer and ink drop ages.
//!
//! The simulator never reads the wall clock directly. Production code hands
//! it a [`SystemClock`]; tests share a [`ManualClock`] and step it by hand.

use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond clock.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Milliseconds since construction. Backed by `instant` so the same code
/// runs on wasm32 and native targets.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-stepped clock. Clones share the same time, so a test keeps one
/// handle while the simulator owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set_ms(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms(secs * 1000.0);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
