//! Axum router construction for the REST adapter.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled so browser-based clients can drive the environment directly.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /healthz` -- liveness probe
/// - `GET /v1/spec` -- board and observation description
/// - `POST /v1/reset`, `POST /v1/step` -- the single shared board
/// - `POST /v1/reset_many`, `POST /v1/step_many` -- vectorized sessions
/// - `DELETE /v1/sessions/{id}` -- drop a session
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/v1/spec", get(handlers::get_spec))
        // Single environment
        .route("/v1/reset", post(handlers::reset))
        .route("/v1/step", post(handlers::step))
        // Session pool
        .route("/v1/reset_many", post(handlers::reset_many))
        .route("/v1/step_many", post(handlers::step_many))
        .route("/v1/sessions/{id}", delete(handlers::close_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
