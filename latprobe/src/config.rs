//! Channel and probe configuration.

use crate::rng::sim_random_range;
use std::time::Duration;

/// Latency specification with a fixed base and a random jitter component.
#[derive(Debug, Clone)]
pub struct LatencyRange {
    /// Base latency applied to every delivery.
    pub base: Duration,
    /// Maximum additional jitter (0 up to this value).
    pub jitter: Duration,
}

impl LatencyRange {
    /// Create a new latency range.
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// Create a fixed latency with no jitter.
    pub fn fixed(duration: Duration) -> Self {
        Self {
            base: duration,
            jitter: Duration::ZERO,
        }
    }

    /// Sample a concrete delay using the thread-local seeded RNG.
    ///
    /// The same seed always yields the same sequence of samples, so whole
    /// runs replay identically.
    pub fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            self.base
        } else {
            let jitter_nanos = sim_random_range(0..(self.jitter.as_nanos() as u64 + 1));
            self.base + Duration::from_nanos(jitter_nanos)
        }
    }
}

/// Latency configuration for the two directed channels between the contexts.
///
/// Delivery is fire-and-forget and FIFO per channel. The simulated channels
/// never drop a message; on a real transport a lost message stalls the
/// corresponding measurement indefinitely, which is a documented limitation
/// of the protocol rather than something this layer detects.
#[derive(Debug, Clone)]
pub struct ChannelConfiguration {
    /// Latency for remote calls (both directions).
    pub call_latency: LatencyRange,
    /// Latency for replicated-property mirroring (authority to remote).
    pub replication_latency: LatencyRange,
}

impl Default for ChannelConfiguration {
    fn default() -> Self {
        Self {
            call_latency: LatencyRange::new(Duration::from_millis(1), Duration::from_millis(4)),
            replication_latency: LatencyRange::new(
                Duration::from_millis(1),
                Duration::from_millis(4),
            ),
        }
    }
}

impl ChannelConfiguration {
    /// Deterministic near-zero latencies for fast local testing.
    pub fn fast_local() -> Self {
        Self {
            call_latency: LatencyRange::fixed(Duration::from_micros(10)),
            replication_latency: LatencyRange::fixed(Duration::from_micros(10)),
        }
    }

    /// WAN-like latencies with noticeable jitter.
    pub fn wan_simulation() -> Self {
        Self {
            call_latency: LatencyRange::new(Duration::from_millis(40), Duration::from_millis(20)),
            replication_latency: LatencyRange::new(
                Duration::from_millis(40),
                Duration::from_millis(20),
            ),
        }
    }
}

/// Tunables for the latency tests themselves.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Number of driver ticks before the replication test auto-disables.
    pub tick_budget: u32,
    /// Fixed interval between driver ticks.
    pub tick_interval: Duration,
    /// Mirrored `counter_a` value that completes the replication test.
    pub replication_target: u32,
    /// Number of alternating hops that completes the ping-pong probe.
    pub bounce_target: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            tick_budget: 300,
            tick_interval: Duration::from_millis(33), // ~30 Hz
            replication_target: 300,
            bounce_target: 500,
        }
    }
}
