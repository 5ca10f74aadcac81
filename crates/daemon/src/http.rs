// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP ingress (§4.B, §6): `POST /webhook`, `GET /health`, `GET /ui`.
//! Handlers stay short and read-mostly — the worker loop does the actual
//! work; ingress only verifies, dedups, classifies, and records.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use devloop_core::JobStatus;
use devloop_storage::SqliteStore;
use devloop_wire::{verify_signature, HealthResponse, JobRow, Translator, WebhookResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::ui::render_jobs_page;

pub struct AppState {
    pub store: SqliteStore,
    pub code_webhook_secret: String,
    pub reviewer_webhook_secret: String,
    pub retry_labels: Vec<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .route("/ui", get(ui))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn webhook(State(state): State<Arc<AppState>>, headers: HeaderMap, body: axum::body::Bytes) -> Response {
    let signature = headers.get("X-Hub-Signature-256").and_then(|v| v.to_str().ok());
    let event_name = headers.get("X-GitHub-Event").and_then(|v| v.to_str().ok()).unwrap_or("").to_string();
    let delivery_id = headers.get("X-GitHub-Delivery").and_then(|v| v.to_str().ok()).unwrap_or("").to_string();

    let span = tracing::info_span!("webhook", event = %event_name, delivery_id = %delivery_id);
    let _enter = span.enter();

    if !verify_signature(
        &body,
        signature,
        state.code_webhook_secret.as_bytes(),
        state.reviewer_webhook_secret.as_bytes(),
    ) {
        warn!("rejected webhook with invalid signature");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match handle_delivery(&state, &event_name, &delivery_id, &body) {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to record webhook delivery");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn handle_delivery(
    state: &AppState,
    event_name: &str,
    delivery_id: &str,
    body: &[u8],
) -> devloop_storage::StoreResult<WebhookResponse> {
    if !delivery_id.is_empty() && state.store.delivery_seen(delivery_id)? {
        info!("skipped duplicate delivery");
        return Ok(WebhookResponse::skipped());
    }

    let payload: serde_json::Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "malformed webhook payload, ignoring");
            return Ok(WebhookResponse::skipped());
        }
    };

    let translator = Translator::new(&state.store, &state.retry_labels);
    let job_id = translator.translate(event_name, &payload).unwrap_or_else(|e| {
        warn!(error = %e, "translator failed, treating as no-op");
        None
    });

    if !delivery_id.is_empty() {
        state.store.mark_delivery(delivery_id)?;
    }

    info!(job_id = ?job_id.map(devloop_core::JobId::get), "webhook processed");
    Ok(WebhookResponse::accepted(job_id))
}

#[derive(Debug, Deserialize)]
struct UiQuery {
    status: Option<String>,
    #[allow(dead_code)]
    job_id: Option<i64>,
}

async fn ui(State(state): State<Arc<AppState>>, Query(query): Query<UiQuery>) -> Html<String> {
    let filter = query.status.as_deref().and_then(parse_status_filter);
    let jobs = state.store.list_jobs(filter).unwrap_or_default();
    let rows: Vec<JobRow> = jobs.iter().map(JobRow::from).collect();
    Html(render_jobs_page(&rows))
}

fn parse_status_filter(s: &str) -> Option<JobStatus> {
    match s {
        "queued" => Some(JobStatus::Queued),
        "running" => Some(JobStatus::Running),
        "done" => Some(JobStatus::Done),
        "failed" => Some(JobStatus::Failed),
        _ => None,
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
