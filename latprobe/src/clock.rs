//! Clock abstraction for timestamping measurements.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond-resolution clock used to timestamp probe measurements.
///
/// Implementations only need to be monotonic enough for subtraction within
/// one test run; wall-clock drift across runs does not matter.
pub trait ClockSource: Clone {
    /// Current time in milliseconds.
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl ClockSource for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Logical clock sharing a time cell with the probe world.
///
/// The world advances the cell as it processes events; cloned handles held by
/// the endpoints observe the same logical time. A shared cell sidesteps the
/// reborrow hazard of reading world state from inside a dispatched handler.
#[derive(Debug, Clone)]
pub struct SimClock {
    now_ms: Rc<Cell<u64>>,
}

impl SimClock {
    /// Create a new logical clock starting at 0 ms.
    pub fn new() -> Self {
        Self {
            now_ms: Rc::new(Cell::new(0)),
        }
    }

    /// Set the current logical time in milliseconds.
    ///
    /// Shared across all clones of this clock.
    pub fn set_millis(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for SimClock {
    fn now_millis(&self) -> u64 {
        self.now_ms.get()
    }
}
