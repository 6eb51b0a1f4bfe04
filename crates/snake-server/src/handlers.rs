//! REST API endpoint handlers.
//!
//! Engine work is CPU-bound and guarded by blocking locks, so every call
//! into [`SingleEnv`](snake_core::SingleEnv) or
//! [`EnvPool`](snake_core::EnvPool) runs on
//! [`tokio::task::spawn_blocking`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/healthz` | Liveness probe |
//! | `GET` | `/v1/spec` | Board and observation description |
//! | `POST` | `/v1/reset` | Reset the single board |
//! | `POST` | `/v1/step` | Step the single board |
//! | `POST` | `/v1/reset_many` | Create or replace a session |
//! | `POST` | `/v1/step_many` | Step every slot of a session |
//! | `DELETE` | `/v1/sessions/{id}` | Drop a session |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use serde::Deserialize;
use snake_core::{BoardConfig, PoolError, ResetMany};
use snake_types::{EnvSpec, ManyResponse, ObsType, SessionId, StepResponse};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /v1/reset`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetBody {
    /// Food placement seed. Zero is treated as 1.
    pub seed: u64,
    /// Observation type name; unknown names fall back to `Dense32`.
    pub obs_type: String,
    /// Attach a raw render frame.
    pub with_raw: bool,
}

/// Body of `POST /v1/step`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StepBody {
    /// Action code: 0 straight, 1 turn right, 2 turn left.
    pub action: i64,
    /// Attach a raw render frame.
    pub with_raw: bool,
}

/// Body of `POST /v1/reset_many`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetManyBody {
    /// Number of slots, between 1 and [`snake_core::MAX_SLOTS`].
    pub count: i64,
    /// Observation type name; unknown names fall back to `Dense32`.
    pub obs_type: String,
    /// Per-slot seeds; missing entries default to `index + 1`.
    pub seeds: Option<Vec<u64>>,
    /// Session to create or replace; generated when absent or blank.
    pub session: Option<String>,
    /// Attach a raw render frame to every response.
    pub with_raw: bool,
    /// Board width, defaulting to the configured board.
    pub cols: Option<i32>,
    /// Board height, defaulting to the configured board.
    pub rows: Option<i32>,
    /// Timeout multiplier, defaulting to the configured board.
    pub timeout_mult: Option<u32>,
}

/// Body of `POST /v1/step_many`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StepManyBody {
    /// Session to step.
    pub session: String,
    /// One action broadcast to every slot, or one per slot.
    pub actions: Vec<i64>,
    /// Attach a raw render frame to every response.
    pub with_raw: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run a blocking engine call off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PoolError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {e}")))?
        .map_err(ApiError::from)
}

fn obs_type_or_default(name: &str) -> ObsType {
    ObsType::parse(name).unwrap_or_else(|| {
        if !name.trim().is_empty() {
            warn!(obs_type = name, fallback = %ObsType::DEFAULT, "Unknown observation type");
        }
        ObsType::DEFAULT
    })
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the board and the API routes.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let BoardConfig {
        cols,
        rows,
        timeout_mult,
    } = state.board;
    let pool = Arc::clone(&state.pool);
    let sessions = blocking(move || pool.session_count())
        .await
        .map_or_else(|_| String::from("?"), |n| n.to_string());

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Snake Env</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        code {{ color: #7ee787; }}
    </style>
</head>
<body>
    <h1>Snake Env</h1>
    <p>Status: <span class="status">RUNNING</span></p>
    <p>Board {cols}x{rows}, timeout multiplier {timeout_mult}, {sessions} active session(s).</p>

    <h2>API Endpoints</h2>
    <ul>
        <li><code>GET</code> <a href="/v1/spec">/v1/spec</a></li>
        <li><code>GET</code> <a href="/healthz">/healthz</a></li>
        <li><code>POST</code> /v1/reset</li>
        <li><code>POST</code> /v1/step</li>
        <li><code>POST</code> /v1/reset_many</li>
        <li><code>POST</code> /v1/step_many</li>
        <li><code>DELETE</code> /v1/sessions/{{id}}</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /healthz, GET /v1/spec
// ---------------------------------------------------------------------------

/// Liveness probe.
#[allow(clippy::unused_async)]
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Describe the single board and the supported observation types.
#[allow(clippy::unused_async)]
pub async fn get_spec(State(state): State<Arc<AppState>>) -> Json<EnvSpec> {
    Json(state.single.spec())
}

// ---------------------------------------------------------------------------
// Single environment
// ---------------------------------------------------------------------------

/// Reseed and reset the single board.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetBody>,
) -> Result<Json<StepResponse>, ApiError> {
    let obs_type = obs_type_or_default(&body.obs_type);
    let single = Arc::clone(&state.single);
    let response = blocking(move || single.reset(body.seed, obs_type, body.with_raw)).await?;
    Ok(Json(response))
}

/// Step the single board.
pub async fn step(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StepBody>,
) -> Result<Json<StepResponse>, ApiError> {
    let single = Arc::clone(&state.single);
    let response = blocking(move || single.step(body.action, body.with_raw)).await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Session pool
// ---------------------------------------------------------------------------

/// Create or replace a session.
pub async fn reset_many(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetManyBody>,
) -> Result<Json<ManyResponse>, ApiError> {
    let count = usize::try_from(body.count).unwrap_or(0);
    let board = BoardConfig {
        cols: body.cols.unwrap_or(state.board.cols),
        rows: body.rows.unwrap_or(state.board.rows),
        timeout_mult: body.timeout_mult.unwrap_or(state.board.timeout_mult),
    };
    let mut request = ResetMany::new(count, obs_type_or_default(&body.obs_type), board);
    request.seeds = body.seeds.unwrap_or_default();
    request.session = body.session.as_deref().and_then(SessionId::parse);
    request.with_raw = body.with_raw;

    let pool = Arc::clone(&state.pool);
    let (session, envs) = blocking(move || pool.reset_many(request)).await?;
    Ok(Json(ManyResponse { session, envs }))
}

/// Step every slot of a session.
pub async fn step_many(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StepManyBody>,
) -> Result<Json<ManyResponse>, ApiError> {
    let session = SessionId::parse(&body.session)
        .ok_or_else(|| ApiError::BadRequest(String::from("session is required")))?;

    let pool = Arc::clone(&state.pool);
    let id = session.clone();
    let envs = blocking(move || pool.step_many(&id, &body.actions, body.with_raw)).await?;
    Ok(Json(ManyResponse { session, envs }))
}

/// Drop a session.
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = SessionId::parse(&id)
        .ok_or_else(|| ApiError::BadRequest(String::from("session is required")))?;

    let pool = Arc::clone(&state.pool);
    let id = session.clone();
    blocking(move || pool.close(&id)).await?;
    Ok(Json(serde_json::json!({ "closed": session })))
}
