//! The replicated counter pair and its remote mirror.
//!
//! Single-writer discipline: [`CounterPair`] is mutated only by the
//! authoritative context, [`CounterMirror`] only observes values delivered
//! over the replication channel.

use serde::{Deserialize, Serialize};

/// Identifies one of the two replicated counters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterId {
    /// The counter whose mirror completes the round-trip test.
    A,
    /// The second counter, replicated but only logged on arrival.
    B,
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterId::A => write!(f, "counter_a"),
            CounterId::B => write!(f, "counter_b"),
        }
    }
}

/// Authority-owned writable counters, zeroed at spawn.
#[derive(Debug, Clone, Default)]
pub struct CounterPair {
    counter_a: u32,
    counter_b: u32,
}

impl CounterPair {
    /// Create a zeroed pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment both counters by one, returning the new values for
    /// replication as `(id, value)` pairs.
    pub fn increment_both(&mut self) -> [(CounterId, u32); 2] {
        self.counter_a += 1;
        self.counter_b += 1;
        [
            (CounterId::A, self.counter_a),
            (CounterId::B, self.counter_b),
        ]
    }

    /// Current value of the given counter.
    pub fn get(&self, which: CounterId) -> u32 {
        match which {
            CounterId::A => self.counter_a,
            CounterId::B => self.counter_b,
        }
    }
}

/// Read-only mirror kept eventually consistent on the remote side.
///
/// Values only ever advance within a run: a delivery that does not increase
/// the mirrored value (a duplicate, or an update overtaken by coalescing) is
/// ignored, so observers fire at most once per distinct transition.
#[derive(Debug, Clone, Default)]
pub struct CounterMirror {
    counter_a: u32,
    counter_b: u32,
}

impl CounterMirror {
    /// Create a zeroed mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a replicated value, returning `Some(value)` if the mirror
    /// advanced and `None` for duplicates or stale deliveries.
    pub fn apply(&mut self, which: CounterId, value: u32) -> Option<u32> {
        let slot = match which {
            CounterId::A => &mut self.counter_a,
            CounterId::B => &mut self.counter_b,
        };
        if value > *slot {
            *slot = value;
            Some(value)
        } else {
            if value < *slot {
                tracing::debug!(%which, value, current = *slot, "ignoring stale replicated value");
            }
            None
        }
    }

    /// Current mirrored value of the given counter.
    pub fn get(&self, which: CounterId) -> u32 {
        match which {
            CounterId::A => self.counter_a,
            CounterId::B => self.counter_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_stay_in_lockstep() {
        let mut pair = CounterPair::new();
        for expected in 1..=10u32 {
            let updates = pair.increment_both();
            assert_eq!(updates, [(CounterId::A, expected), (CounterId::B, expected)]);
        }
        assert_eq!(pair.get(CounterId::A), pair.get(CounterId::B));
    }

    #[test]
    fn mirror_advances_monotonically() {
        let mut mirror = CounterMirror::new();
        assert_eq!(mirror.apply(CounterId::A, 1), Some(1));
        assert_eq!(mirror.apply(CounterId::A, 2), Some(2));
        // Duplicate and stale deliveries are ignored.
        assert_eq!(mirror.apply(CounterId::A, 2), None);
        assert_eq!(mirror.apply(CounterId::A, 1), None);
        assert_eq!(mirror.get(CounterId::A), 2);
        assert_eq!(mirror.get(CounterId::B), 0);
    }

    #[test]
    fn mirror_accepts_coalesced_jumps() {
        let mut mirror = CounterMirror::new();
        // Intermediate values may be coalesced away by the channel.
        assert_eq!(mirror.apply(CounterId::B, 5), Some(5));
        assert_eq!(mirror.apply(CounterId::B, 300), Some(300));
    }
}
