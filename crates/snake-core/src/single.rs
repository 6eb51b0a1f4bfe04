//! The single shared environment.
//!
//! One board behind a coarse lock, plus the observation type chosen by the
//! last reset. Unlike pool slots it never freezes: stepping after a death
//! re-evaluates the terminal conditions against the unchanged board until
//! the caller resets.

use std::sync::Mutex;

use snake_sim::SnakeEnv;
use snake_types::{Action, EnvSpec, ObsType, StepResponse};
use tracing::debug;

use crate::config::BoardConfig;
use crate::error::PoolError;
use crate::response;

#[derive(Debug)]
struct Inner {
    env: SnakeEnv,
    obs_type: ObsType,
}

/// A single lock-guarded board.
#[derive(Debug)]
pub struct SingleEnv {
    board: BoardConfig,
    inner: Mutex<Inner>,
}

impl SingleEnv {
    /// Create the board described by `board`, observed with
    /// [`ObsType::Dense11`] until the first reset.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Configuration`] if the board cannot hold the
    /// starting snake.
    pub fn new(board: BoardConfig) -> Result<Self, PoolError> {
        let env = SnakeEnv::new(board.cols, board.rows, board.timeout_mult)?;
        Ok(Self {
            board,
            inner: Mutex::new(Inner {
                env,
                obs_type: ObsType::Dense11,
            }),
        })
    }

    /// Reseed, reset and switch to `obs_type`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::LockPoisoned`] if a previous caller panicked
    /// while holding the lock.
    pub fn reset(
        &self,
        seed: u64,
        obs_type: ObsType,
        with_raw: bool,
    ) -> Result<StepResponse, PoolError> {
        let Ok(mut inner) = self.inner.lock() else {
            return Err(PoolError::LockPoisoned("single env"));
        };
        inner.obs_type = obs_type;
        inner.env.seed(seed);
        inner.env.reset();
        debug!(seed, obs_type = %obs_type, "Single env reset");
        Ok(response::initial(&inner.env, obs_type, with_raw))
    }

    /// Apply one action code. Codes outside `0..=2` are treated as
    /// straight.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::LockPoisoned`] if a previous caller panicked
    /// while holding the lock.
    pub fn step(&self, action: i64, with_raw: bool) -> Result<StepResponse, PoolError> {
        let Ok(mut inner) = self.inner.lock() else {
            return Err(PoolError::LockPoisoned("single env"));
        };
        let outcome = inner.env.step(Action::from_code(action));
        Ok(response::stepped(
            &inner.env,
            inner.obs_type,
            &outcome,
            with_raw,
        ))
    }

    /// Describe the served board.
    pub fn spec(&self) -> EnvSpec {
        EnvSpec::for_board(self.board.cols, self.board.rows, self.board.timeout_mult)
    }
}
