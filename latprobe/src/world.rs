//! Deterministic two-context harness for the probe protocol.

use std::{cell::RefCell, collections::HashMap, rc::Rc, time::Duration};
use tracing::instrument;

use crate::{
    clock::SimClock,
    config::{ChannelConfiguration, ProbeConfig},
    endpoint::{Outgoing, ProbeEndpoint},
    error::{ProbeError, ProbeResult},
    events::{Event, EventQueue, ScheduledEvent},
    message::ProbeMessage,
    report::{LatencyReport, ProbeMetrics},
    rng::{reset_sim_rng, set_sim_seed},
    role::Role,
};

/// Key identifying one FIFO delivery channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum ChannelKey {
    /// Remote calls towards the given role.
    Call(Role),
    /// Authority-to-remote replication.
    Replication,
}

#[derive(Debug)]
struct WorldInner {
    current_time: Duration,
    event_queue: EventQueue,
    next_sequence: u64,

    channels: ChannelConfiguration,
    probe: ProbeConfig,
    clock: SimClock,

    authority: ProbeEndpoint<SimClock>,
    remote: ProbeEndpoint<SimClock>,

    // Per-channel delivery floor enforcing FIFO order under jitter.
    fifo_floors: HashMap<ChannelKey, Duration>,

    // A tick chain is currently scheduled.
    ticking: bool,

    events_processed: u64,
}

impl WorldInner {
    fn new(channels: ChannelConfiguration, probe: ProbeConfig) -> Self {
        let clock = SimClock::new();
        let authority = ProbeEndpoint::new(Role::Authoritative, clock.clone(), probe.clone());
        let remote = ProbeEndpoint::new(Role::Remote, clock.clone(), probe.clone());
        Self {
            current_time: Duration::ZERO,
            event_queue: EventQueue::new(),
            next_sequence: 0,
            channels,
            probe,
            clock,
            authority,
            remote,
            fifo_floors: HashMap::new(),
            ticking: false,
            events_processed: 0,
        }
    }
}

/// The central coordinator owning both endpoints, logical time, and the
/// event queue.
///
/// Both contexts are serialized through one deterministic loop: every event
/// carries a logical timestamp, same-time events order by sequence number,
/// and channel latency is sampled from the seeded RNG. Handlers run to
/// completion; their returned effects become scheduled traffic.
///
/// # Example
///
/// ```rust
/// use latprobe::ProbeWorld;
///
/// let mut world = ProbeWorld::new_with_seed(42);
/// world.request_start();
/// world.request_enable("demo run");
/// world.run_until_empty();
///
/// let report = world.latency_report();
/// assert!(report.replication.is_some());
/// assert!(report.rpc.is_some());
/// ```
#[derive(Debug)]
pub struct ProbeWorld {
    inner: Rc<RefCell<WorldInner>>,
}

impl ProbeWorld {
    /// Create a world with default configuration and seed 0.
    pub fn new() -> Self {
        Self::new_with_config_and_seed(ChannelConfiguration::default(), ProbeConfig::default(), 0)
    }

    /// Create a world with default configuration and a specific seed.
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_with_config_and_seed(ChannelConfiguration::default(), ProbeConfig::default(), seed)
    }

    /// Create a world with custom channel and probe configuration, seed 0.
    pub fn new_with_config(channels: ChannelConfiguration, probe: ProbeConfig) -> Self {
        Self::new_with_config_and_seed(channels, probe, 0)
    }

    /// Create a world with custom configuration and a specific seed.
    ///
    /// Resets the thread-local RNG first so consecutive worlds on the same
    /// thread replay identically from their seeds.
    pub fn new_with_config_and_seed(
        channels: ChannelConfiguration,
        probe: ProbeConfig,
        seed: u64,
    ) -> Self {
        reset_sim_rng();
        set_sim_seed(seed);

        Self {
            inner: Rc::new(RefCell::new(WorldInner::new(channels, probe))),
        }
    }

    /// Start a replication round-trip test from the remote side.
    ///
    /// Records the measurement window start and schedules the
    /// initialization call. Reentrant starts overwrite the pending window.
    pub fn request_start(&self) {
        let mut inner = self.inner.borrow_mut();
        let outgoing = inner.remote.request_start();
        Self::schedule_outgoing(&mut inner, outgoing);
    }

    /// Ask the authoritative side to arm its tick driver.
    ///
    /// The note travels opaquely and is only logged on receipt.
    pub fn request_enable(&self, note: &str) {
        let mut inner = self.inner.borrow_mut();
        let outgoing = inner.remote.request_enable(note);
        Self::schedule_outgoing(&mut inner, outgoing);
    }

    /// Inject ball 0 into the remote handler, starting a ping-pong probe.
    ///
    /// The probe also starts by itself when a replication test exhausts its
    /// tick budget; this entry point reinitializes the ball for a
    /// stand-alone run.
    pub fn start_ping_pong(&self) {
        let mut inner = self.inner.borrow_mut();
        let outgoing = inner.remote.dispatch(ProbeMessage::Pong { ball: 0 });
        Self::schedule_outgoing(&mut inner, outgoing);
    }

    /// Process the next scheduled event and advance logical time.
    ///
    /// Returns `true` while more events remain.
    #[instrument(skip(self))]
    pub fn step(&mut self) -> bool {
        let mut inner = self.inner.borrow_mut();

        if let Some(scheduled) = inner.event_queue.pop_earliest() {
            inner.current_time = scheduled.time();
            inner.clock.set_millis(scheduled.time().as_millis() as u64);
            Self::process_event_with_inner(&mut inner, scheduled.into_event());
            !inner.event_queue.is_empty()
        } else {
            false
        }
    }

    /// Process all scheduled events until the queue drains.
    #[instrument(skip(self))]
    pub fn run_until_empty(&mut self) {
        while self.step() {}
    }

    /// Like [`run_until_empty`](Self::run_until_empty) but bails out after
    /// `limit` events, guarding against a probe that never terminates.
    pub fn run_with_event_limit(&mut self, limit: u64) -> ProbeResult<()> {
        let mut processed = 0u64;
        while self.has_pending_events() {
            if processed >= limit {
                return Err(ProbeError::EventLimitExceeded { limit });
            }
            self.step();
            processed += 1;
        }
        Ok(())
    }

    /// Current logical time.
    pub fn current_time(&self) -> Duration {
        self.inner.borrow().current_time
    }

    /// `true` if events are waiting to be processed.
    pub fn has_pending_events(&self) -> bool {
        !self.inner.borrow().event_queue.is_empty()
    }

    /// Number of events waiting to be processed.
    pub fn pending_event_count(&self) -> usize {
        self.inner.borrow().event_queue.len()
    }

    /// `true` while the authoritative tick driver holds a budget.
    pub fn driver_active(&self) -> bool {
        self.inner.borrow().authority.session().is_active()
    }

    /// Both measurements, each `None` until completed.
    pub fn latency_report(&self) -> LatencyReport {
        let inner = self.inner.borrow();
        LatencyReport {
            replication: inner.remote.replication_sample(),
            rpc: inner.remote.rpc_sample(),
        }
    }

    /// The completed replication measurement.
    pub fn replication_elapsed(&self) -> ProbeResult<Duration> {
        self.inner
            .borrow()
            .remote
            .replication_sample()
            .map(|sample| sample.elapsed)
            .ok_or_else(|| {
                ProbeError::InvalidState("replication measurement not complete".to_string())
            })
    }

    /// The completed RPC ping-pong measurement.
    pub fn rpc_elapsed(&self) -> ProbeResult<Duration> {
        self.inner
            .borrow()
            .remote
            .rpc_sample()
            .map(|sample| sample.elapsed)
            .ok_or_else(|| ProbeError::InvalidState("rpc measurement not complete".to_string()))
    }

    /// Metrics for the run so far.
    pub fn extract_metrics(&self) -> ProbeMetrics {
        let inner = self.inner.borrow();
        ProbeMetrics {
            simulated_time: inner.current_time,
            events_processed: inner.events_processed,
        }
    }

    fn process_event_with_inner(inner: &mut WorldInner, event: Event) {
        inner.events_processed += 1;

        match event {
            Event::Deliver { to, message } => {
                tracing::debug!(%to, ?message, "delivering call");
                let outgoing = match to {
                    Role::Authoritative => inner.authority.dispatch(message),
                    Role::Remote => inner.remote.dispatch(message),
                };
                Self::schedule_outgoing(inner, outgoing);

                // An arm call activates the driver; start the tick chain once.
                if to == Role::Authoritative
                    && inner.authority.session().is_active()
                    && !inner.ticking
                {
                    inner.ticking = true;
                    let interval = inner.probe.tick_interval;
                    Self::schedule_after(inner, Event::Tick, interval);
                }
            }
            Event::Replicate { which, value } => {
                inner.remote.on_replicated(which, value);
            }
            Event::Tick => {
                let outgoing = inner.authority.on_tick();
                Self::schedule_outgoing(inner, outgoing);

                if inner.authority.session().is_active() {
                    let interval = inner.probe.tick_interval;
                    Self::schedule_after(inner, Event::Tick, interval);
                } else {
                    inner.ticking = false;
                }
            }
        }
    }

    fn schedule_outgoing(inner: &mut WorldInner, outgoing: Vec<Outgoing>) {
        for effect in outgoing {
            match effect {
                Outgoing::Call { to, message } => {
                    let delay = inner.channels.call_latency.sample();
                    Self::schedule_delivery(
                        inner,
                        ChannelKey::Call(to),
                        Event::Deliver { to, message },
                        delay,
                    );
                }
                Outgoing::Replicate { which, value } => {
                    let delay = inner.channels.replication_latency.sample();
                    Self::schedule_delivery(
                        inner,
                        ChannelKey::Replication,
                        Event::Replicate { which, value },
                        delay,
                    );
                }
            }
        }
    }

    /// Schedule a channel delivery, clamped so the channel stays FIFO even
    /// when jitter samples out of order.
    fn schedule_delivery(inner: &mut WorldInner, key: ChannelKey, event: Event, delay: Duration) {
        let sampled = inner.current_time + delay;
        let floor = inner
            .fifo_floors
            .get(&key)
            .copied()
            .unwrap_or(Duration::ZERO);
        let deliver_at = sampled.max(floor);
        inner.fifo_floors.insert(key, deliver_at);
        Self::schedule_at(inner, event, deliver_at);
    }

    fn schedule_after(inner: &mut WorldInner, event: Event, delay: Duration) {
        let time = inner.current_time + delay;
        Self::schedule_at(inner, event, time);
    }

    fn schedule_at(inner: &mut WorldInner, event: Event, time: Duration) {
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner
            .event_queue
            .schedule(ScheduledEvent::new(time, event, sequence));
    }
}

impl Default for ProbeWorld {
    fn default() -> Self {
        Self::new()
    }
}
