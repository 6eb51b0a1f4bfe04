//! Error types for the session pool and the single environment.
//!
//! Every error is raised before any state is touched, so a failed call
//! leaves the pool exactly as it was.

use snake_sim::SimError;
use snake_types::SessionId;

/// Errors raised by [`EnvPool`](crate::pool::EnvPool) and
/// [`SingleEnv`](crate::single::SingleEnv).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The request cannot produce a usable session.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No session is registered under the identifier.
    #[error("session '{0}' not found")]
    SessionNotFound(SessionId),

    /// The actions array is neither a broadcast nor one per slot.
    #[error("actions length must be 1 (broadcast) or {expected}, got {got}")]
    ActionCountMismatch {
        /// Number of slots in the session.
        expected: usize,
        /// Number of actions supplied.
        got: usize,
    },

    /// A lock was poisoned by a panic on another thread.
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl From<SimError> for PoolError {
    fn from(err: SimError) -> Self {
        Self::Configuration(err.to_string())
    }
}
