//! Replication round-trip latency measurement.

use crate::counter::CounterId;
use crate::message::ProbeMessage;
use crate::session::{TestMode, TestSession};
use std::time::Duration;

/// A completed replication-latency measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationSample {
    /// The mirrored counter value that completed the measurement.
    pub target: u32,
    /// Time from the start request to the target transition.
    pub elapsed: Duration,
}

/// Orchestrates the replication round-trip test.
///
/// The remote side runs [`request_start`](Self::request_start) and
/// [`request_enable`](Self::request_enable) and observes mirrored counter
/// values; the authoritative side only reacts to the resulting messages.
/// Configure and trigger are deliberately separate calls so the measured
/// window is tied to the start request, not to mode configuration.
#[derive(Debug, Clone, Default)]
pub struct RoundTripController {
    target: u32,
    sample: Option<ReplicationSample>,
}

impl RoundTripController {
    /// Create a controller completing at the given mirrored target value.
    pub fn new(target: u32) -> Self {
        Self {
            target,
            sample: None,
        }
    }

    /// Start a replication test from the remote side.
    ///
    /// Records the start timestamp (overwriting any pending one — reentrant
    /// starts are permitted and simply restart the measurement window),
    /// configures the local mode, and returns the initialization call for
    /// the authoritative side.
    pub fn request_start(&mut self, session: &mut TestSession, now_ms: u64) -> ProbeMessage {
        session.record_start(now_ms);
        session.set_mode(TestMode::ReplicationRoundTrip);
        tracing::info!(now_ms, "requesting replication round-trip test");
        ProbeMessage::Initialize {
            mode: TestMode::ReplicationRoundTrip,
        }
    }

    /// Ask the authoritative side to arm its tick driver.
    ///
    /// The note is an opaque diagnostic payload; the receiver logs it and
    /// nothing else.
    pub fn request_enable(&self, note: impl Into<String>) -> ProbeMessage {
        ProbeMessage::Arm { note: note.into() }
    }

    /// Authority-side handler for the initialization call. Always succeeds.
    pub fn on_initialize(&self, session: &mut TestSession, mode: TestMode) {
        tracing::info!(?mode, "test mode configured");
        session.set_mode(mode);
    }

    /// Authority-side handler for the arm call.
    ///
    /// Unconditionally resets the tick budget; see
    /// [`TestSession::arm`] for the re-arm semantics.
    pub fn on_arm(&self, session: &mut TestSession, tick_budget: u32, note: &str) {
        tracing::info!(note, tick_budget, "arming tick driver");
        session.arm(tick_budget);
    }

    /// Remote-side observer for mirrored counter transitions.
    ///
    /// Fires once the `counter_a` mirror reaches the target; `counter_b`
    /// transitions are logged only.
    pub fn on_counter_replicated(
        &mut self,
        session: &TestSession,
        which: CounterId,
        value: u32,
        now_ms: u64,
    ) {
        match which {
            CounterId::A => {
                tracing::debug!(value, "counter_a mirror advanced");
                if value >= self.target && self.sample.is_none() {
                    let Some(start_ms) = session.start_ms() else {
                        tracing::warn!(
                            value,
                            "mirror reached target but no start request was recorded"
                        );
                        return;
                    };
                    let elapsed = Duration::from_millis(now_ms.saturating_sub(start_ms));
                    tracing::info!(
                        value,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "replication round-trip complete"
                    );
                    self.sample = Some(ReplicationSample {
                        target: value,
                        elapsed,
                    });
                }
            }
            CounterId::B => {
                tracing::debug!(value, "counter_b mirror advanced");
            }
        }
    }

    /// The completed measurement, if the mirror reached the target.
    pub fn sample(&self) -> Option<ReplicationSample> {
        self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_records_timestamp_and_mode() {
        let mut controller = RoundTripController::new(300);
        let mut session = TestSession::new();

        let message = controller.request_start(&mut session, 1000);
        assert_eq!(session.start_ms(), Some(1000));
        assert_eq!(session.mode(), TestMode::ReplicationRoundTrip);
        assert_eq!(
            message,
            ProbeMessage::Initialize {
                mode: TestMode::ReplicationRoundTrip
            }
        );
    }

    #[test]
    fn target_transition_completes_measurement() {
        let mut controller = RoundTripController::new(300);
        let mut session = TestSession::new();
        controller.request_start(&mut session, 1000);

        controller.on_counter_replicated(&session, CounterId::A, 299, 5000);
        assert!(controller.sample().is_none());

        controller.on_counter_replicated(&session, CounterId::A, 300, 10_900);
        let sample = controller.sample().expect("measurement complete");
        assert_eq!(sample.target, 300);
        assert_eq!(sample.elapsed, Duration::from_millis(9900));
    }

    #[test]
    fn counter_b_never_completes() {
        let mut controller = RoundTripController::new(300);
        let mut session = TestSession::new();
        controller.request_start(&mut session, 0);

        controller.on_counter_replicated(&session, CounterId::B, 300, 9999);
        assert!(controller.sample().is_none());
    }

    #[test]
    fn target_without_start_is_logged_not_recorded() {
        let mut controller = RoundTripController::new(300);
        let session = TestSession::new();

        controller.on_counter_replicated(&session, CounterId::A, 300, 9999);
        assert!(controller.sample().is_none());
    }
}
