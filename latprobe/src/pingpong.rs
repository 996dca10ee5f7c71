//! RPC round-trip latency measurement ("ping-pong").

use crate::message::ProbeMessage;
use crate::session::TestSession;
use std::time::Duration;

/// A completed RPC-latency measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcSample {
    /// Number of alternating hops measured.
    pub hops: u32,
    /// Total time for all hops.
    pub elapsed: Duration,
}

/// Bounces a ball value between the two sides until the bounce target.
///
/// The ball is both payload and sequence number. There is no implicit reset:
/// a subsequent probe must reinject ball 0 from outside.
#[derive(Debug, Clone, Default)]
pub struct PingPongProbe {
    bounce_target: u32,
    sample: Option<RpcSample>,
}

impl PingPongProbe {
    /// Create a probe completing after the given number of hops.
    pub fn new(bounce_target: u32) -> Self {
        Self {
            bounce_target,
            sample: None,
        }
    }

    /// Remote-side handler.
    ///
    /// Ball 0 starts the measurement window; the bounce target ends it and
    /// records the sample exactly once. Anything else increments the ball
    /// and returns the next hop for the authoritative side.
    pub fn client_handler(
        &mut self,
        session: &mut TestSession,
        ball: u32,
        now_ms: u64,
    ) -> Option<ProbeMessage> {
        if ball == 0 {
            session.record_rpc_start(now_ms);
        }

        if ball == self.bounce_target {
            let start_ms = session.rpc_start_ms().unwrap_or(now_ms);
            let elapsed = Duration::from_millis(now_ms.saturating_sub(start_ms));
            tracing::info!(
                ball,
                elapsed_ms = elapsed.as_millis() as u64,
                "ping-pong probe complete"
            );
            self.sample = Some(RpcSample {
                hops: ball,
                elapsed,
            });
            None
        } else {
            let ball = ball + 1;
            tracing::debug!(ball, "client returning ball");
            Some(ProbeMessage::Ping { ball })
        }
    }

    /// Authority-side handler: increment and return the ball.
    pub fn server_handler(&self, ball: u32) -> ProbeMessage {
        let ball = ball + 1;
        tracing::debug!(ball, "server returning ball");
        ProbeMessage::Pong { ball }
    }

    /// The completed measurement, if the bounce target was reached.
    pub fn sample(&self) -> Option<RpcSample> {
        self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_zero_opens_the_window() {
        let mut probe = PingPongProbe::new(500);
        let mut session = TestSession::new();

        let next = probe.client_handler(&mut session, 0, 1234);
        assert_eq!(session.rpc_start_ms(), Some(1234));
        assert_eq!(next, Some(ProbeMessage::Ping { ball: 1 }));
    }

    #[test]
    fn full_bounce_sequence_completes_once() {
        let mut probe = PingPongProbe::new(500);
        let mut session = TestSession::new();

        let mut ball = 0u32;
        let mut now_ms = 0u64;
        let mut completions = 0u32;
        loop {
            // Client side.
            match probe.client_handler(&mut session, ball, now_ms) {
                Some(ProbeMessage::Ping { ball: next }) => ball = next,
                Some(other) => panic!("unexpected message: {other:?}"),
                None => {
                    completions += 1;
                    break;
                }
            }
            now_ms += 2;

            // Server side.
            match probe.server_handler(ball) {
                ProbeMessage::Pong { ball: next } => ball = next,
                other => panic!("unexpected message: {other:?}"),
            }
            now_ms += 2;
        }

        assert_eq!(completions, 1);
        assert_eq!(ball, 500);
        let sample = probe.sample().expect("sample recorded");
        assert_eq!(sample.hops, 500);
        assert_eq!(sample.elapsed, Duration::from_millis(1000));
    }

    #[test]
    fn terminal_ball_issues_no_further_calls() {
        let mut probe = PingPongProbe::new(10);
        let mut session = TestSession::new();
        session.record_rpc_start(0);

        assert!(probe.client_handler(&mut session, 10, 40).is_none());
        assert_eq!(
            probe.sample(),
            Some(RpcSample {
                hops: 10,
                elapsed: Duration::from_millis(40)
            })
        );
    }
}
