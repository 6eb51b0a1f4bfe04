//! Shared application state for the REST adapter.

use std::sync::Arc;

use snake_core::{BoardConfig, EnvPool, PoolError, SingleEnv};

/// State shared by every handler.
///
/// Both services are synchronous and lock internally. Handlers move work
/// onto the blocking thread pool, so each service sits behind its own
/// [`Arc`] to be cloned into those closures.
#[derive(Debug)]
pub struct AppState {
    /// The single shared board behind `/v1/reset` and `/v1/step`.
    pub single: Arc<SingleEnv>,
    /// Named sessions behind `/v1/reset_many` and `/v1/step_many`.
    pub pool: Arc<EnvPool>,
    /// Board used by pool resets that do not name a size.
    pub board: BoardConfig,
}

impl AppState {
    /// Create state serving `board` by default.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Configuration`] if the board cannot hold the
    /// starting snake.
    pub fn new(board: BoardConfig) -> Result<Self, PoolError> {
        Ok(Self {
            single: Arc::new(SingleEnv::new(board)?),
            pool: Arc::new(EnvPool::new()),
            board,
        })
    }
}
