//! Per-endpoint test session state.

use serde::{Deserialize, Serialize};

/// Which latency test is currently configured.
///
/// Owned by the authoritative side; the remote side learns it only through
/// the explicit initialization call, never through replication.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestMode {
    /// No test configured.
    #[default]
    None,
    /// Replicated-property round-trip latency test.
    ReplicationRoundTrip,
}

/// Timestamps and tick accounting for one endpoint's test session.
///
/// A single session exists per endpoint; issuing a second start while one is
/// pending overwrites the timing state. That race is part of the protocol's
/// observable behavior and is deliberately not guarded against.
#[derive(Debug, Clone, Default)]
pub struct TestSession {
    mode: TestMode,
    start_ms: Option<u64>,
    rpc_start_ms: Option<u64>,
    tick_budget: u32,
    ticks_elapsed: u32,
}

impl TestSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured test mode.
    pub fn mode(&self) -> TestMode {
        self.mode
    }

    /// Set the configured test mode.
    pub fn set_mode(&mut self, mode: TestMode) {
        self.mode = mode;
    }

    /// Record the replication-test start timestamp. Overwrites any pending one.
    pub fn record_start(&mut self, now_ms: u64) {
        self.start_ms = Some(now_ms);
    }

    /// The replication-test start timestamp, if a start was issued.
    pub fn start_ms(&self) -> Option<u64> {
        self.start_ms
    }

    /// Record the ping-pong start timestamp. Overwrites any pending one.
    pub fn record_rpc_start(&mut self, now_ms: u64) {
        self.rpc_start_ms = Some(now_ms);
    }

    /// The ping-pong start timestamp, if ball 0 was observed.
    pub fn rpc_start_ms(&self) -> Option<u64> {
        self.rpc_start_ms
    }

    /// Arm the tick driver with the given budget.
    ///
    /// Unconditional: re-arming a running session resets the budget and the
    /// elapsed-tick count without double-counting previous ticks.
    pub fn arm(&mut self, tick_budget: u32) {
        self.tick_budget = tick_budget;
        self.ticks_elapsed = 0;
    }

    /// Deactivate the tick driver.
    pub fn disarm(&mut self) {
        self.tick_budget = 0;
    }

    /// `true` while a tick budget remains.
    pub fn is_active(&self) -> bool {
        self.tick_budget > 0
    }

    /// Count one elapsed tick, returning the new total.
    pub fn count_tick(&mut self) -> u32 {
        self.ticks_elapsed += 1;
        self.ticks_elapsed
    }

    /// Ticks elapsed since the session was last armed.
    pub fn ticks_elapsed(&self) -> u32 {
        self.ticks_elapsed
    }

    /// Remaining tick budget.
    pub fn tick_budget(&self) -> u32 {
        self.tick_budget
    }
}
