//! Wire messages carried by the remote-call channel.

use crate::role::Role;
use crate::session::TestMode;
use serde::{Deserialize, Serialize};

/// A remote call addressed to the opposite-role context.
///
/// Payloads are exactly what the protocol names: a mode, an opaque string,
/// and an integer ball. The simulated channel hands these over in memory; a
/// real transport serializes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeMessage {
    /// Configure the test mode on the authoritative side.
    Initialize {
        /// The mode to configure.
        mode: TestMode,
    },
    /// Arm the authoritative tick driver. The note is logged, nothing more.
    Arm {
        /// Opaque diagnostic payload.
        note: String,
    },
    /// Ping-pong hop handled by the authoritative side.
    Ping {
        /// Hop counter doubling as payload.
        ball: u32,
    },
    /// Ping-pong hop handled by the remote side.
    Pong {
        /// Hop counter doubling as payload.
        ball: u32,
    },
}

impl ProbeMessage {
    /// The role whose handler this message is addressed to.
    ///
    /// Dispatch on the receiving endpoint gates on this, so a misrouted
    /// message is dropped at the boundary instead of inside a handler body.
    pub fn handled_by(&self) -> Role {
        match self {
            ProbeMessage::Initialize { .. }
            | ProbeMessage::Arm { .. }
            | ProbeMessage::Ping { .. } => Role::Authoritative,
            ProbeMessage::Pong { .. } => Role::Remote,
        }
    }
}
