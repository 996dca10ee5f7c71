use serde::{Deserialize, Serialize};

/// Execution context role for an endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Owns canonical state and decides outcomes (the "server" side).
    Authoritative,
    /// Receives mirrored state and issues requests (the "client" side).
    Remote,
}

impl Role {
    /// Returns `true` for the authoritative side.
    pub fn is_authoritative(self) -> bool {
        matches!(self, Role::Authoritative)
    }

    /// The role on the other end of the channel.
    pub fn opposite(self) -> Role {
        match self {
            Role::Authoritative => Role::Remote,
            Role::Remote => Role::Authoritative,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Authoritative => write!(f, "authoritative"),
            Role::Remote => write!(f, "remote"),
        }
    }
}
