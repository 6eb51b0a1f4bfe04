//! Integration tests for the REST endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic, routing and the
//! JSON wire format without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use snake_core::BoardConfig;
use snake_server::router::build_router;
use snake_server::state::AppState;
use tower::ServiceExt;

fn make_router() -> Router {
    let board = BoardConfig {
        cols: 10,
        rows: 10,
        timeout_mult: 150,
    };
    build_router(Arc::new(AppState::new(board).unwrap()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let response = make_router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_healthz() {
    let response = make_router()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_get_spec() {
    let response = make_router()
        .oneshot(Request::get("/v1/spec").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cols"], 10);
    assert_eq!(json["rows"], 10);
    assert_eq!(json["timeout_mult"], 150);
    assert_eq!(
        json["supported_obs"],
        json!(["RawState", "Dense32", "Dense11", "Dense28Ego", "Raycasts19"])
    );
    assert_eq!(
        json["reward_signals"],
        json!(["eat_food", "death", "step_cost", "toward_food", "turning", "timeout"])
    );
}

#[tokio::test]
async fn test_single_reset_and_step() {
    let router = make_router();

    let (status, json) = post_json(
        &router,
        "/v1/reset",
        &json!({ "seed": 1, "obs_type": "dense11" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["obs"]["kind"], "dense");
    assert_eq!(json["obs"]["obs_type"], "Dense11");
    assert_eq!(json["obs"]["data"].as_array().unwrap().len(), 11);
    assert_eq!(json["done"], false);
    assert_eq!(json["length"], 3);
    assert_eq!(json["death"], "");
    assert!(json.get("raw_for_render").is_none());

    let (status, json) = post_json(&router, "/v1/step", &json!({ "action": 0, "with_raw": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["steps"], 1);
    assert_eq!(json["raw_for_render"]["head"], json!({ "x": 6, "y": 5 }));
    assert_eq!(json["raw_for_render"]["dir"], "RIGHT");
    assert_eq!(json["signals"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unknown_obs_type_falls_back_to_dense32() {
    let (status, json) = post_json(
        &make_router(),
        "/v1/reset",
        &json!({ "seed": 3, "obs_type": "pixels" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["obs"]["obs_type"], "Dense32");
    assert_eq!(json["obs"]["data"].as_array().unwrap().len(), 32);
}

#[tokio::test]
async fn test_raw_state_observation() {
    let (status, json) = post_json(
        &make_router(),
        "/v1/reset",
        &json!({ "seed": 1, "obs_type": "RawState" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["obs"]["kind"], "raw");
    assert_eq!(json["obs"]["head"], json!({ "x": 5, "y": 5 }));
    assert_eq!(
        json["obs"]["body"],
        json!([{ "x": 4, "y": 5 }, { "x": 3, "y": 5 }])
    );
}

#[tokio::test]
async fn test_reset_many_and_step_many() {
    let router = make_router();

    let (status, json) = post_json(
        &router,
        "/v1/reset_many",
        &json!({ "count": 3, "obs_type": "Dense11", "seeds": [1, 2, 3] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session = json["session"].as_str().unwrap().to_owned();
    assert_eq!(session.len(), 32);
    let envs = json["envs"].as_array().unwrap();
    assert_eq!(envs.len(), 3);
    assert!(envs.iter().all(|e| e["obs"]["data"].as_array().unwrap().len() == 11));

    let (status, json) = post_json(
        &router,
        "/v1/step_many",
        &json!({ "session": session, "actions": [0] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session"], session.as_str());
    let envs = json["envs"].as_array().unwrap();
    assert_eq!(envs.len(), 3);
    assert!(envs.iter().all(|e| e["steps"] == 1));
}

#[tokio::test]
async fn test_reset_many_with_named_session_and_board() {
    let router = make_router();
    let (status, json) = post_json(
        &router,
        "/v1/reset_many",
        &json!({
            "count": 2,
            "obs_type": "Raycasts19",
            "session": "team-a",
            "with_raw": true,
            "cols": 20,
            "rows": 12,
            "timeout_mult": 50
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session"], "team-a");
    assert_eq!(json["envs"][0]["raw_for_render"]["cols"], 20);
    assert_eq!(json["envs"][1]["raw_for_render"]["rows"], 12);
}

#[tokio::test]
async fn test_reset_many_rejects_zero_count() {
    let (status, json) = post_json(
        &make_router(),
        "/v1/reset_many",
        &json!({ "count": 0, "obs_type": "Dense11" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("count"));
}

#[tokio::test]
async fn test_reset_many_rejects_tiny_board() {
    let (status, _) = post_json(
        &make_router(),
        "/v1/reset_many",
        &json!({ "count": 1, "cols": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_many_rejects_oversized_requests() {
    let router = make_router();
    let (status, json) = post_json(
        &router,
        "/v1/reset_many",
        &json!({ "count": 1_099_511_627_776_i64, "obs_type": "Dense11" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("count"));

    let (status, _) = post_json(
        &router,
        "/v1/reset_many",
        &json!({ "count": 1, "cols": 40_000, "rows": 40_000 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_step_many_unknown_session_is_404() {
    let (status, json) = post_json(
        &make_router(),
        "/v1/step_many",
        &json!({ "session": "nope", "actions": [0] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_step_many_blank_session_is_400() {
    let (status, _) = post_json(
        &make_router(),
        "/v1/step_many",
        &json!({ "session": "  ", "actions": [0] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_step_many_action_count_mismatch_is_400() {
    let router = make_router();
    let (_, json) = post_json(
        &router,
        "/v1/reset_many",
        &json!({ "count": 3, "obs_type": "Dense11" }),
    )
    .await;
    let session = json["session"].as_str().unwrap().to_owned();

    let (status, json) = post_json(
        &router,
        "/v1/step_many",
        &json!({ "session": session, "actions": [0, 1] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("got 2"));
}

#[tokio::test]
async fn test_frozen_slots_echo_over_http() {
    let router = make_router();
    let (_, json) = post_json(
        &router,
        "/v1/reset_many",
        &json!({ "count": 2, "obs_type": "Dense32", "session": "frozen", "timeout_mult": 0 }),
    )
    .await;
    assert_eq!(json["envs"].as_array().unwrap().len(), 2);

    let (_, first) = post_json(
        &router,
        "/v1/step_many",
        &json!({ "session": "frozen", "actions": [1, 2] }),
    )
    .await;
    assert_eq!(first["envs"][0]["done"], true);
    assert_eq!(first["envs"][0]["death"], "timeout");

    let (_, echo) = post_json(
        &router,
        "/v1/step_many",
        &json!({ "session": "frozen", "actions": [0] }),
    )
    .await;
    for i in 0..2 {
        let e = &echo["envs"][i];
        let f = &first["envs"][i];
        assert_eq!(e["done"], true);
        assert_eq!(e["signals"], json!([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        assert_eq!(e["steps"], f["steps"]);
        assert_eq!(e["score"], f["score"]);
        assert_eq!(e["length"], f["length"]);
        assert_eq!(e["obs"], f["obs"]);
    }
}

#[tokio::test]
async fn test_close_session() {
    let router = make_router();
    let (_, _) = post_json(
        &router,
        "/v1/reset_many",
        &json!({ "count": 1, "session": "bye" }),
    )
    .await;

    let response = router
        .clone()
        .oneshot(
            Request::delete("/v1/sessions/bye")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["closed"], "bye");

    let response = router
        .oneshot(
            Request::delete("/v1/sessions/bye")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
