//! # latprobe
//!
//! A deterministic client/server latency probe. Two execution contexts — an
//! authoritative side owning canonical state and a remote side observing
//! mirrored state — are connected by fire-and-forget channels with seeded,
//! configurable latency. The protocol measures two things:
//!
//! - **Replication round-trip**: the remote side requests a test, the
//!   authoritative tick driver mutates a replicated counter pair once per
//!   fixed step, and the elapsed time until the mirror reaches its target
//!   value is reported.
//! - **RPC ping-pong**: a ball value bounces between the sides for a fixed
//!   number of hops and the total round-trip time is reported.
//!
//! ## Example
//!
//! ```rust
//! use latprobe::{ChannelConfiguration, ProbeConfig, ProbeWorld};
//!
//! let mut world = ProbeWorld::new_with_config_and_seed(
//!     ChannelConfiguration::fast_local(),
//!     ProbeConfig::default(),
//!     42,
//! );
//! world.request_start();
//! world.request_enable("example");
//! world.run_until_empty();
//!
//! println!("{}", world.latency_report());
//! assert!(world.replication_elapsed().is_ok());
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Clock abstraction for timestamping measurements.
pub mod clock;
/// Channel and probe configuration.
pub mod config;
/// Replicated counter pair and its remote mirror.
pub mod counter;
/// Fixed-rate tick driver for the authoritative side.
pub mod driver;
/// Per-role endpoint state and role-gated dispatch.
pub mod endpoint;
/// Error types for probe operations.
pub mod error;
/// Event scheduling for the probe world.
pub mod events;
/// Wire messages carried by the remote-call channel.
pub mod message;
/// RPC ping-pong latency measurement.
pub mod pingpong;
/// Measurement results and run metrics.
pub mod report;
/// Thread-local seeded randomness for latency sampling.
pub mod rng;
/// Per-endpoint role type.
pub mod role;
/// Replication round-trip latency measurement.
pub mod roundtrip;
/// Per-endpoint test session state.
pub mod session;
/// Deterministic two-context harness.
pub mod world;

pub use clock::{ClockSource, SimClock, SystemClock};
pub use config::{ChannelConfiguration, LatencyRange, ProbeConfig};
pub use counter::{CounterId, CounterMirror, CounterPair};
pub use driver::{TickDriver, TickOutcome};
pub use endpoint::{Outgoing, ProbeEndpoint};
pub use error::{ProbeError, ProbeResult};
pub use events::{Event, EventQueue, ScheduledEvent};
pub use message::ProbeMessage;
pub use pingpong::{PingPongProbe, RpcSample};
pub use report::{LatencyReport, ProbeMetrics};
pub use rng::{current_sim_seed, reset_sim_rng, set_sim_seed, sim_random_range};
pub use role::Role;
pub use roundtrip::{ReplicationSample, RoundTripController};
pub use session::{TestMode, TestSession};
pub use world::ProbeWorld;
