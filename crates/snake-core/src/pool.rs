//! Vectorized session pool.
//!
//! A session is a named group of boards ("slots") that share one
//! observation type and are stepped together. Each slot is either alive or
//! frozen: the tick that ends its episode caches the terminal response, and
//! every later step of the session echoes that response with zeroed
//! signals instead of touching the board. A slot stays frozen until the
//! whole session is replaced by another [`EnvPool::reset_many`] under the
//! same identifier.
//!
//! # Locking
//!
//! The registry maps identifiers to `Arc<Mutex<Session>>`. A reset builds
//! every board and every initial response before taking the registry write
//! lock, then swaps the new session in with a single insertion, so nobody
//! ever observes a half-built or half-discarded session. A step holds the
//! registry read lock only long enough to clone the session handle and then
//! serializes on that session's own mutex, so unrelated sessions step in
//! parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use snake_sim::SnakeEnv;
use snake_types::{Action, ObsType, SessionId, StepResponse};
use tracing::{debug, info};

use crate::config::BoardConfig;
use crate::error::PoolError;
use crate::response;

/// Most slots a single session may hold.
pub const MAX_SLOTS: usize = 1024;

/// Arguments of [`EnvPool::reset_many`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetMany {
    /// Number of slots to create, in `1..=MAX_SLOTS`.
    pub count: usize,
    /// Observation type shared by every slot.
    pub obs_type: ObsType,
    /// Per-slot seeds. Slot `i` without an entry is seeded with `i + 1`.
    pub seeds: Vec<u64>,
    /// Board geometry and timeout for every slot.
    pub board: BoardConfig,
    /// Identifier to create or replace. A fresh one is generated when
    /// absent.
    pub session: Option<SessionId>,
    /// Attach a raw render frame to every response.
    pub with_raw: bool,
}

impl ResetMany {
    /// Request `count` slots of `obs_type` on `board`, with default seeds,
    /// a generated identifier and no render frames.
    pub const fn new(count: usize, obs_type: ObsType, board: BoardConfig) -> Self {
        Self {
            count,
            obs_type,
            seeds: Vec::new(),
            board,
            session: None,
            with_raw: false,
        }
    }
}

/// One board plus its frozen terminal response, if any.
#[derive(Debug)]
struct Slot {
    env: SnakeEnv,
    terminal: Option<StepResponse>,
}

/// A named group of slots.
#[derive(Debug)]
struct Session {
    obs_type: ObsType,
    slots: Vec<Slot>,
}

type SessionHandle = Arc<Mutex<Session>>;

/// Registry of sessions keyed by [`SessionId`].
#[derive(Debug, Default)]
pub struct EnvPool {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl EnvPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or atomically replace a session and return its initial
    /// responses, one per slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Configuration`] when `count` is zero or above
    /// [`MAX_SLOTS`], or the board is too small for the starting snake or
    /// too large to host.
    pub fn reset_many(
        &self,
        request: ResetMany,
    ) -> Result<(SessionId, Vec<StepResponse>), PoolError> {
        if request.count == 0 {
            return Err(PoolError::Configuration(String::from(
                "count must be positive",
            )));
        }
        if request.count > MAX_SLOTS {
            return Err(PoolError::Configuration(format!(
                "count must be at most {MAX_SLOTS}, got {}",
                request.count
            )));
        }
        request
            .board
            .validate()
            .map_err(|e| PoolError::Configuration(e.to_string()))?;

        let mut slots = Vec::with_capacity(request.count);
        let mut responses = Vec::with_capacity(request.count);
        for i in 0..request.count {
            let BoardConfig {
                cols,
                rows,
                timeout_mult,
            } = request.board;
            let mut env = SnakeEnv::new(cols, rows, timeout_mult)?;
            env.seed(slot_seed(&request.seeds, i));
            env.reset();
            responses.push(response::initial(&env, request.obs_type, request.with_raw));
            slots.push(Slot {
                env,
                terminal: None,
            });
        }

        let id = request.session.unwrap_or_else(SessionId::generate);
        let session = Arc::new(Mutex::new(Session {
            obs_type: request.obs_type,
            slots,
        }));

        let Ok(mut sessions) = self.sessions.write() else {
            return Err(PoolError::LockPoisoned("session registry"));
        };
        let replaced = sessions.insert(id.clone(), session).is_some();
        let total = sessions.len();
        drop(sessions);

        info!(
            session = %id,
            count = request.count,
            obs_type = %request.obs_type,
            cols = request.board.cols,
            rows = request.board.rows,
            replaced,
            sessions = total,
            "Session reset"
        );

        Ok((id, responses))
    }

    /// Step every slot of a session once.
    ///
    /// `actions` holds one action code broadcast to every slot, or exactly
    /// one per slot. Codes outside `0..=2` are treated as straight. Frozen
    /// slots ignore their action and echo their terminal response.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::SessionNotFound`] for an unknown identifier and
    /// [`PoolError::ActionCountMismatch`] for a bad `actions` length. No
    /// slot is stepped when either is returned.
    pub fn step_many(
        &self,
        id: &SessionId,
        actions: &[i64],
        with_raw: bool,
    ) -> Result<Vec<StepResponse>, PoolError> {
        let handle = self.handle(id)?;
        let Ok(mut session) = handle.lock() else {
            return Err(PoolError::LockPoisoned("session"));
        };

        let expected = session.slots.len();
        let broadcast = actions.len() == 1;
        if !broadcast && actions.len() != expected {
            return Err(PoolError::ActionCountMismatch {
                expected,
                got: actions.len(),
            });
        }

        let obs_type = session.obs_type;
        let mut responses = Vec::with_capacity(expected);
        for (i, slot) in session.slots.iter_mut().enumerate() {
            if let Some(terminal) = &slot.terminal {
                responses.push(response::echo(terminal, &slot.env, with_raw));
                continue;
            }

            let code = actions.get(if broadcast { 0 } else { i }).copied().unwrap_or(0);
            let outcome = slot.env.step(Action::from_code(code));
            let r = response::stepped(&slot.env, obs_type, &outcome, with_raw);
            if r.done {
                debug!(
                    session = %id,
                    slot = i,
                    death = r.death.label(),
                    score = r.score,
                    steps = r.steps,
                    "Slot frozen"
                );
                slot.terminal = Some(r.clone());
            }
            responses.push(r);
        }

        Ok(responses)
    }

    /// Drop a session.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::SessionNotFound`] if no such session exists.
    pub fn close(&self, id: &SessionId) -> Result<(), PoolError> {
        let Ok(mut sessions) = self.sessions.write() else {
            return Err(PoolError::LockPoisoned("session registry"));
        };
        if sessions.remove(id).is_none() {
            return Err(PoolError::SessionNotFound(id.clone()));
        }
        let total = sessions.len();
        drop(sessions);
        info!(session = %id, sessions = total, "Session closed");
        Ok(())
    }

    /// Number of slots in a session.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::SessionNotFound`] if no such session exists.
    pub fn session_len(&self, id: &SessionId) -> Result<usize, PoolError> {
        let handle = self.handle(id)?;
        let Ok(session) = handle.lock() else {
            return Err(PoolError::LockPoisoned("session"));
        };
        Ok(session.slots.len())
    }

    /// Number of slots in a session that are still alive.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::SessionNotFound`] if no such session exists.
    pub fn alive_count(&self, id: &SessionId) -> Result<usize, PoolError> {
        let handle = self.handle(id)?;
        let Ok(session) = handle.lock() else {
            return Err(PoolError::LockPoisoned("session"));
        };
        Ok(session.slots.iter().filter(|s| s.terminal.is_none()).count())
    }

    /// Number of registered sessions.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::LockPoisoned`] if the registry lock is poisoned.
    pub fn session_count(&self) -> Result<usize, PoolError> {
        let Ok(sessions) = self.sessions.read() else {
            return Err(PoolError::LockPoisoned("session registry"));
        };
        Ok(sessions.len())
    }

    fn handle(&self, id: &SessionId) -> Result<SessionHandle, PoolError> {
        let Ok(sessions) = self.sessions.read() else {
            return Err(PoolError::LockPoisoned("session registry"));
        };
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| PoolError::SessionNotFound(id.clone()))
    }
}

/// Seed for slot `index`: the supplied seed if there is one, else
/// `index + 1`.
fn slot_seed(seeds: &[u64], index: usize) -> u64 {
    seeds.get(index).copied().unwrap_or_else(|| {
        u64::try_from(index)
            .unwrap_or(u64::MAX)
            .saturating_add(1)
    })
}
