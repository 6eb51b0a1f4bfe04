//! REST adapter for the Snake environment.
//!
//! This crate provides an Axum HTTP server that exposes the single shared
//! board and the vectorized session pool from `snake-core` as JSON
//! endpoints:
//!
//! - **Single environment** (`/v1/reset`, `/v1/step`) for interactive play
//!   and simple agents
//! - **Session pool** (`/v1/reset_many`, `/v1/step_many`,
//!   `/v1/sessions/{id}`) for vectorized training
//! - **Discovery** (`/v1/spec`, `/healthz`, and a minimal HTML page at `/`)
//!
//! # Architecture
//!
//! Handlers decode the JSON body, resolve defaults (observation type,
//! board size, session identifier) and hand the engine call to the
//! blocking thread pool. Failures come back as [`ApiError`], which renders
//! as `{"error", "status"}` JSON with a 400, 404 or 500 status.
//!
//! [`ApiError`]: error::ApiError

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
