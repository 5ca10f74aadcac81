// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use devloop_storage::SqliteStore;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use super::*;

fn app(secret: &str) -> Router {
    let state = Arc::new(AppState {
        store: SqliteStore::open_in_memory().unwrap(),
        code_webhook_secret: secret.to_string(),
        reviewer_webhook_secret: String::new(),
        retry_labels: vec!["agent-retry".to_string()],
    });
    router(state)
}

fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[tokio::test]
async fn health_reports_ok() {
    let resp = app("secret").oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn webhook_rejects_a_bad_signature() {
    let body = serde_json::json!({"action": "opened"}).to_string();
    let req = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("X-GitHub-Event", "issues")
        .header("X-GitHub-Delivery", "d1")
        .header("X-Hub-Signature-256", "sha256=deadbeef")
        .body(Body::from(body))
        .unwrap();
    let resp = app("secret").oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_accepts_and_enqueues_on_a_valid_signature() {
    let payload = serde_json::json!({
        "action": "opened",
        "issue": {"number": 5, "title": "Bug", "body": "fix it"},
        "repository": {"full_name": "acme/widgets"},
    });
    let body = payload.to_string();
    let signature = sign("secret", body.as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("X-GitHub-Event", "issues")
        .header("X-GitHub-Delivery", "d1")
        .header("X-Hub-Signature-256", signature)
        .body(Body::from(body))
        .unwrap();
    let resp = app("secret").oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let parsed: devloop_wire::WebhookResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.status, devloop_wire::WebhookStatus::Accepted);
    assert!(parsed.job_id.is_some());
}

#[tokio::test]
async fn webhook_skips_a_duplicate_delivery() {
    let payload = serde_json::json!({
        "action": "opened",
        "issue": {"number": 5, "title": "Bug", "body": "fix it"},
        "repository": {"full_name": "acme/widgets"},
    });
    let body = payload.to_string();
    let signature = sign("secret", body.as_bytes());
    let app = app("secret");

    let build = || {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("X-GitHub-Event", "issues")
            .header("X-GitHub-Delivery", "d1")
            .header("X-Hub-Signature-256", signature.clone())
            .body(Body::from(body.clone()))
            .unwrap()
    };

    let first = app.clone().oneshot(build()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(build()).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let body = axum::body::to_bytes(second.into_body(), usize::MAX).await.unwrap();
    let parsed: devloop_wire::WebhookResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.status, devloop_wire::WebhookStatus::Skipped);
}

#[tokio::test]
async fn ui_renders_jobs() {
    let resp = app("secret").oneshot(Request::builder().uri("/ui").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("<table"));
}
