//! Shared type definitions for the Snake environment server.
//!
//! This crate is the single source of truth for the values that cross
//! crate boundaries: board geometry, actions, observation selectors and
//! the step responses handed to external agents. Wire-facing types flow
//! downstream to `TypeScript` via `ts-rs` for the JS clients.
//!
//! # Modules
//!
//! - [`ids`] -- Session identifier newtype
//! - [`enums`] -- Direction, action, death cause and observation type
//! - [`structs`] -- Points, raw board state, observations and responses

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, DeathCause, Direction, ObsType};
pub use ids::SessionId;
pub use structs::{
    EnvSpec, ManyResponse, Observation, Point, RawState, SIGNAL_COUNT, SIGNAL_NAMES, Signals,
    StepResponse,
};
