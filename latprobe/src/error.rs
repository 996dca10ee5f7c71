use thiserror::Error;

/// Errors that can occur while driving a probe world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The event limit was reached before the queue drained.
    #[error("event limit {limit} exceeded before the event queue drained")]
    EventLimitExceeded {
        /// The limit that was exceeded.
        limit: u64,
    },
    /// The probe is in a state where the requested value is not available.
    #[error("invalid probe state: {0}")]
    InvalidState(String),
}

/// A type alias for `Result<T, ProbeError>`.
pub type ProbeResult<T> = Result<T, ProbeError>;
