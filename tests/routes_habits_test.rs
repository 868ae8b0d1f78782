// ABOUTME: HTTP integration tests for habit, archive and completion routes
// ABOUTME: Exercises the full router with the stub verifier and an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::Router;
use common::{create_test_app, token_for, ScriptedProvider};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

async fn app() -> Router {
    create_test_app(ScriptedProvider::new(Vec::new()))
        .await
        .unwrap()
        .0
}

async fn create_habit(app: &Router, uid: &str, body: &Value) -> Value {
    let response = AxumTestRequest::post("/api/habits")
        .bearer(&token_for(uid))
        .json(body)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    response.json()
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let response = AxumTestRequest::get("/api/habits").send(app().await).await;
    assert_eq!(response.status(), 401);
    assert_eq!(response.error_code(), "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_invalid_and_expired_tokens() {
    let app = app().await;

    let response = AxumTestRequest::get("/api/habits")
        .bearer("garbage")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 401);
    assert_eq!(response.error_code(), "AUTH_INVALID");

    let response = AxumTestRequest::get("/api/habits")
        .bearer("expired")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 401);
    assert_eq!(response.error_code(), "AUTH_EXPIRED");

    let response = AxumTestRequest::get("/api/habits")
        .header("authorization", "Basic abc")
        .send(app)
        .await;
    assert_eq!(response.error_code(), "AUTH_INVALID");
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_create_get_and_list() {
    let app = app().await;
    let habit = create_habit(
        &app,
        "alice",
        &json!({ "name": "  Read  ", "frequency": "weekly", "targetDays": [3, 1] }),
    )
    .await;
    assert_eq!(habit["name"], "Read");
    assert_eq!(habit["targetDays"], json!([1, 3]));
    assert_eq!(habit["archived"], false);
    assert_eq!(habit["userId"], "alice");
    let id = habit["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/api/habits/{id}"))
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let loaded: Value = response.json();
    assert_eq!(loaded["id"], id);

    let response = AxumTestRequest::get("/api/habits")
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await;
    let list: Value = response.json();
    assert_eq!(list["total"], 1);

    let response = AxumTestRequest::get("/api/habits")
        .bearer(&token_for("bob"))
        .send(app)
        .await;
    let list: Value = response.json();
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_create_rejects_invalid_drafts() {
    let app = app().await;

    for body in [
        json!({ "name": "x", "frequency": "daily" }),
        json!({ "name": "Valid", "frequency": "weekly", "targetDays": [7] }),
        json!({ "name": "Valid", "frequency": "hourly" }),
        json!({ "frequency": "daily" }),
    ] {
        let response = AxumTestRequest::post("/api/habits")
            .bearer(&token_for("alice"))
            .json(&body)
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 400, "body {body}");
        assert_eq!(response.error_code(), "INVALID_INPUT");
    }

    let response = AxumTestRequest::post("/api/habits")
        .bearer(&token_for("alice"))
        .raw_body("application/json", "{ not json")
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = app().await;
    let habit = create_habit(&app, "alice", &json!({ "name": "Run", "frequency": "daily" })).await;
    let id = habit["id"].as_str().unwrap();

    let response = AxumTestRequest::put(&format!("/api/habits/{id}"))
        .bearer(&token_for("alice"))
        .json(&json!({ "name": "Run far", "description": "10k", "frequency": "daily" }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Run far");
    assert_eq!(updated["description"], "10k");

    let response = AxumTestRequest::delete(&format!("/api/habits/{id}"))
        .bearer(&token_for("bob"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::delete(&format!("/api/habits/{id}"))
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 204);
    assert!(response.is_empty());

    let response = AxumTestRequest::get(&format!("/api/habits/{id}"))
        .bearer(&token_for("alice"))
        .send(app)
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.error_code(), "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_archive_and_unarchive() {
    let app = app().await;
    let habit = create_habit(&app, "alice", &json!({ "name": "Floss", "frequency": "daily" })).await;
    let id = habit["id"].as_str().unwrap();

    let response = AxumTestRequest::post(&format!("/api/habits/{id}/archive"))
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let archived: Value = response.json();
    assert_eq!(archived["archived"], true);

    let active: Value = AxumTestRequest::get("/api/habits")
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await
        .json();
    assert_eq!(active["total"], 0);

    let listed: Value = AxumTestRequest::get("/api/habits?status=archived")
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await
        .json();
    assert_eq!(listed["total"], 1);

    let response = AxumTestRequest::post(&format!("/api/habits/{id}/unarchive"))
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await;
    let restored: Value = response.json();
    assert_eq!(restored["archived"], false);

    let response = AxumTestRequest::get("/api/habits?status=sometimes")
        .bearer(&token_for("alice"))
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
}

// ============================================================================
// Completion logs
// ============================================================================

#[tokio::test]
async fn test_toggle_completion_and_list_logs() {
    let app = app().await;
    let habit = create_habit(&app, "alice", &json!({ "name": "Water", "frequency": "daily" })).await;
    let id = habit["id"].as_str().unwrap();
    let uri = format!("/api/habits/{id}/logs/2024-06-10");

    let created: Value = AxumTestRequest::put(&uri)
        .bearer(&token_for("alice"))
        .json(&json!({ "completed": true }))
        .send(app.clone())
        .await
        .json();
    assert_eq!(created["outcome"], "created");
    assert_eq!(created["log"]["completed"], true);
    assert_eq!(created["log"]["date"], "2024-06-10");

    let updated: Value = AxumTestRequest::put(&uri)
        .bearer(&token_for("alice"))
        .json(&json!({ "completed": false }))
        .send(app.clone())
        .await
        .json();
    assert_eq!(updated["outcome"], "updated");
    assert_eq!(updated["log"]["completed"], false);

    let unchanged: Value = AxumTestRequest::put(&format!("/api/habits/{id}/logs/2024-06-11"))
        .bearer(&token_for("alice"))
        .json(&json!({ "completed": false }))
        .send(app.clone())
        .await
        .json();
    assert_eq!(unchanged["outcome"], "unchanged");

    let logs: Value = AxumTestRequest::get("/api/logs?from=2024-06-01&to=2024-06-30")
        .bearer(&token_for("alice"))
        .send(app.clone())
        .await
        .json();
    assert_eq!(logs["logs"].as_array().unwrap().len(), 1);

    let response = AxumTestRequest::get("/api/logs?from=2024-06-30&to=2024-06-01")
        .bearer(&token_for("alice"))
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_toggle_rejects_bad_date_and_foreign_habit() {
    let app = app().await;
    let habit = create_habit(&app, "alice", &json!({ "name": "Yoga", "frequency": "daily" })).await;
    let id = habit["id"].as_str().unwrap();

    let response = AxumTestRequest::put(&format!("/api/habits/{id}/logs/2024-13-40"))
        .bearer(&token_for("alice"))
        .json(&json!({ "completed": true }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_code(), "INVALID_INPUT");

    let response = AxumTestRequest::put(&format!("/api/habits/{id}/logs/2024-06-10"))
        .bearer(&token_for("bob"))
        .json(&json!({ "completed": true }))
        .send(app)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let response = AxumTestRequest::get("/api/nope").send(app().await).await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.error_code(), "RESOURCE_NOT_FOUND");
}
