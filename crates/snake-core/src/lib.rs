//! Session pool, single environment and configuration for the Snake
//! environment.
//!
//! This crate turns the pure engine in `snake-sim` into services that can
//! be shared between callers: a lock-guarded single board and a pool of
//! named, vectorized sessions with terminal echoing.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `snake-config.yaml` into
//!   strongly-typed structs.
//! - [`pool`] -- [`EnvPool`]: named sessions of many boards stepped
//!   together.
//! - [`single`] -- [`SingleEnv`]: one shared board.
//! - [`response`] -- Building agent-facing responses from engine state.
//! - [`error`] -- Pool and single-environment errors.

pub mod config;
pub mod error;
pub mod pool;
pub mod response;
pub mod single;

pub use config::{BoardConfig, ConfigError, MAX_BOARD_CELLS, SnakeConfig};
pub use error::PoolError;
pub use pool::{EnvPool, MAX_SLOTS, ResetMany};
pub use single::SingleEnv;
