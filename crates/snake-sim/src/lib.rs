//! Simulation engine and observation encoders for the Snake environment.
//!
//! The crate is pure CPU: no I/O, no locks, no shared state. Each
//! [`SnakeEnv`] owns its board and its seeded random source; the pool in
//! `snake-core` decides how instances are shared between callers.
//!
//! # Modules
//!
//! - [`env`] -- The steppable board state machine
//! - [`snapshot`] -- Immutable board view consumed by the encoders
//! - [`obs`] -- The five observation encoders
//! - [`error`] -- Construction errors

pub mod env;
pub mod error;
pub mod obs;
pub mod snapshot;

pub use env::{SnakeEnv, StepOutcome};
pub use error::SimError;
pub use snapshot::Snapshot;
