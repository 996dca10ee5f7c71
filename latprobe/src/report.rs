//! Measurement results and run metrics.

use crate::pingpong::RpcSample;
use crate::roundtrip::ReplicationSample;
use std::fmt;
use std::time::Duration;

/// Both measurements of a probe run, each `None` until completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyReport {
    /// Replicated-property propagation measurement.
    pub replication: Option<ReplicationSample>,
    /// RPC ping-pong measurement.
    pub rpc: Option<RpcSample>,
}

impl fmt::Display for LatencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Latency Report ===")?;
        match &self.replication {
            Some(sample) => writeln!(
                f,
                "Replication round-trip: {} ms to mirrored target {}",
                sample.elapsed.as_millis(),
                sample.target
            )?,
            None => writeln!(f, "Replication round-trip: (pending)")?,
        }
        match &self.rpc {
            Some(sample) => writeln!(
                f,
                "RPC ping-pong: {} hops in {} ms",
                sample.hops,
                sample.elapsed.as_millis()
            )?,
            None => writeln!(f, "RPC ping-pong: (pending)")?,
        }
        Ok(())
    }
}

/// Core metrics for one probe world run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeMetrics {
    /// Logical time elapsed in the run.
    pub simulated_time: Duration,
    /// Number of events processed.
    pub events_processed: u64,
}
