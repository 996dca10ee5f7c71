//! Fixed-rate driver that mutates the counters on the authoritative side.

use crate::counter::{CounterId, CounterPair};
use crate::session::TestSession;

/// What one driver tick did, for the harness to turn into channel traffic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// New counter values to replicate, in deterministic order.
    pub replicate: Vec<(CounterId, u32)>,
    /// The tick budget was just exhausted; kick off the ping-pong probe.
    pub kick_ping_pong: bool,
}

/// Advances the replicated counters once per fixed simulation step.
///
/// Purely a local mutation with no failure modes; anything that can go wrong
/// belongs to the channels, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickDriver;

impl TickDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self
    }

    /// Run one tick against the session and counters.
    ///
    /// No-op while the session is inactive. Otherwise counts the tick,
    /// increments both counters by one, and on reaching the budget disarms
    /// the session and requests the ping-pong kickoff.
    pub fn advance(&self, session: &mut TestSession, counters: &mut CounterPair) -> TickOutcome {
        if !session.is_active() {
            return TickOutcome::default();
        }

        let elapsed = session.count_tick();
        let updates = counters.increment_both();

        let mut outcome = TickOutcome {
            replicate: updates.to_vec(),
            kick_ping_pong: false,
        };

        if elapsed >= session.tick_budget() {
            session.disarm();
            outcome.kick_ping_pong = true;
            tracing::info!(
                ticks = elapsed,
                counter_a = counters.get(CounterId::A),
                "tick budget exhausted, kicking off ping-pong probe"
            );
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_session_is_a_no_op() {
        let driver = TickDriver::new();
        let mut session = TestSession::new();
        let mut counters = CounterPair::new();

        let outcome = driver.advance(&mut session, &mut counters);
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(counters.get(CounterId::A), 0);
    }

    #[test]
    fn counters_track_tick_count_while_active() {
        let driver = TickDriver::new();
        let mut session = TestSession::new();
        let mut counters = CounterPair::new();
        session.arm(300);

        for n in 1..300u32 {
            let outcome = driver.advance(&mut session, &mut counters);
            assert_eq!(counters.get(CounterId::A), n);
            assert_eq!(counters.get(CounterId::B), n);
            assert!(!outcome.kick_ping_pong);
            assert!(session.is_active());
        }
    }

    #[test]
    fn budget_exhaustion_disarms_and_kicks_off() {
        let driver = TickDriver::new();
        let mut session = TestSession::new();
        let mut counters = CounterPair::new();
        session.arm(3);

        assert!(!driver.advance(&mut session, &mut counters).kick_ping_pong);
        assert!(!driver.advance(&mut session, &mut counters).kick_ping_pong);

        let last = driver.advance(&mut session, &mut counters);
        assert!(last.kick_ping_pong);
        assert_eq!(last.replicate, vec![(CounterId::A, 3), (CounterId::B, 3)]);
        assert!(!session.is_active());

        // Further ticks do nothing.
        let after = driver.advance(&mut session, &mut counters);
        assert_eq!(after, TickOutcome::default());
        assert_eq!(counters.get(CounterId::A), 3);
    }

    #[test]
    fn rearming_does_not_double_count() {
        let driver = TickDriver::new();
        let mut session = TestSession::new();
        let mut counters = CounterPair::new();

        session.arm(300);
        for _ in 0..5 {
            driver.advance(&mut session, &mut counters);
        }
        session.arm(300);
        assert_eq!(session.ticks_elapsed(), 0);

        // The full budget remains after the re-arm.
        for _ in 0..299 {
            assert!(!driver.advance(&mut session, &mut counters).kick_ping_pong);
        }
        assert!(driver.advance(&mut session, &mut counters).kick_ping_pong);
    }
}
