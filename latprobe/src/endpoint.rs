//! Per-role endpoint state and role-gated message dispatch.

use crate::clock::ClockSource;
use crate::config::ProbeConfig;
use crate::counter::{CounterId, CounterMirror, CounterPair};
use crate::driver::TickDriver;
use crate::message::ProbeMessage;
use crate::pingpong::{PingPongProbe, RpcSample};
use crate::role::Role;
use crate::roundtrip::{ReplicationSample, RoundTripController};
use crate::session::TestSession;

/// A side effect a handler wants the harness to perform.
///
/// Handlers run to completion and never touch the channels themselves; they
/// return effects and the harness schedules the traffic. That keeps each
/// context single-writer with no reentrancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Send a remote call to the given role's handler.
    Call {
        /// Destination role.
        to: Role,
        /// The call payload.
        message: ProbeMessage,
    },
    /// Replicate a new counter value to the remote mirror.
    Replicate {
        /// Which counter changed.
        which: CounterId,
        /// Its new value.
        value: u32,
    },
}

/// One execution context of the probe protocol.
///
/// Holds the session, the counters (written only when authoritative), the
/// mirror (written only from replication deliveries when remote), and the
/// two test controllers. Incoming calls go through [`dispatch`], which gates
/// on the handler's required role before any state is touched.
///
/// [`dispatch`]: ProbeEndpoint::dispatch
#[derive(Debug, Clone)]
pub struct ProbeEndpoint<C: ClockSource> {
    role: Role,
    clock: C,
    config: ProbeConfig,
    session: TestSession,
    counters: CounterPair,
    mirror: CounterMirror,
    driver: TickDriver,
    roundtrip: RoundTripController,
    pingpong: PingPongProbe,
}

impl<C: ClockSource> ProbeEndpoint<C> {
    /// Create an endpoint for the given role.
    pub fn new(role: Role, clock: C, config: ProbeConfig) -> Self {
        let roundtrip = RoundTripController::new(config.replication_target);
        let pingpong = PingPongProbe::new(config.bounce_target);
        Self {
            role,
            clock,
            config,
            session: TestSession::new(),
            counters: CounterPair::new(),
            mirror: CounterMirror::new(),
            driver: TickDriver::new(),
            roundtrip,
            pingpong,
        }
    }

    /// This endpoint's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The endpoint's session state.
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    /// Authority-side counter values.
    pub fn counters(&self) -> &CounterPair {
        &self.counters
    }

    /// Remote-side mirrored counter values.
    pub fn mirror(&self) -> &CounterMirror {
        &self.mirror
    }

    /// Completed replication measurement, if any.
    pub fn replication_sample(&self) -> Option<ReplicationSample> {
        self.roundtrip.sample()
    }

    /// Completed RPC measurement, if any.
    pub fn rpc_sample(&self) -> Option<RpcSample> {
        self.pingpong.sample()
    }

    /// Handle an incoming remote call.
    ///
    /// A message addressed to the other role is dropped here with a warning:
    /// no state mutation, no outgoing traffic. Handlers themselves never
    /// check roles.
    pub fn dispatch(&mut self, message: ProbeMessage) -> Vec<Outgoing> {
        if message.handled_by() != self.role {
            tracing::warn!(
                role = %self.role,
                ?message,
                "dropping call addressed to the other role"
            );
            return Vec::new();
        }

        match message {
            ProbeMessage::Initialize { mode } => {
                self.roundtrip.on_initialize(&mut self.session, mode);
                Vec::new()
            }
            ProbeMessage::Arm { note } => {
                self.roundtrip
                    .on_arm(&mut self.session, self.config.tick_budget, &note);
                Vec::new()
            }
            ProbeMessage::Ping { ball } => {
                let reply = self.pingpong.server_handler(ball);
                vec![Outgoing::Call {
                    to: Role::Remote,
                    message: reply,
                }]
            }
            ProbeMessage::Pong { ball } => {
                let now_ms = self.clock.now_millis();
                match self
                    .pingpong
                    .client_handler(&mut self.session, ball, now_ms)
                {
                    Some(reply) => vec![Outgoing::Call {
                        to: Role::Authoritative,
                        message: reply,
                    }],
                    None => Vec::new(),
                }
            }
        }
    }

    /// Run one fixed-rate driver tick. Only the authoritative side mutates.
    pub fn on_tick(&mut self) -> Vec<Outgoing> {
        if !self.role.is_authoritative() {
            return Vec::new();
        }

        let outcome = self.driver.advance(&mut self.session, &mut self.counters);
        let mut outgoing: Vec<Outgoing> = outcome
            .replicate
            .into_iter()
            .map(|(which, value)| Outgoing::Replicate { which, value })
            .collect();
        if outcome.kick_ping_pong {
            outgoing.push(Outgoing::Call {
                to: Role::Remote,
                message: ProbeMessage::Pong { ball: 0 },
            });
        }
        outgoing
    }

    /// Apply a replicated counter value to the mirror.
    ///
    /// Observers fire only for distinct advancing transitions; the
    /// round-trip controller completes its measurement on `counter_a`
    /// reaching the configured target.
    pub fn on_replicated(&mut self, which: CounterId, value: u32) {
        if self.role.is_authoritative() {
            tracing::warn!(%which, value, "authority received a replication delivery");
            return;
        }
        if let Some(new_value) = self.mirror.apply(which, value) {
            let now_ms = self.clock.now_millis();
            self.roundtrip
                .on_counter_replicated(&self.session, which, new_value, now_ms);
        }
    }

    /// Remote-side start of a replication test.
    ///
    /// Reentrant: a second start while one is pending overwrites the timing
    /// window, exactly as the protocol specifies.
    pub fn request_start(&mut self) -> Vec<Outgoing> {
        if self.role.is_authoritative() {
            tracing::warn!("request_start called on the authoritative side");
            return Vec::new();
        }
        let now_ms = self.clock.now_millis();
        let message = self.roundtrip.request_start(&mut self.session, now_ms);
        vec![Outgoing::Call {
            to: Role::Authoritative,
            message,
        }]
    }

    /// Remote-side arm request carrying an opaque note.
    pub fn request_enable(&mut self, note: &str) -> Vec<Outgoing> {
        if self.role.is_authoritative() {
            tracing::warn!("request_enable called on the authoritative side");
            return Vec::new();
        }
        let message = self.roundtrip.request_enable(note);
        vec![Outgoing::Call {
            to: Role::Authoritative,
            message,
        }]
    }
}
