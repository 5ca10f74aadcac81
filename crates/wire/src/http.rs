// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format DTOs for the ingress HTTP surface (§4.B, §7).

use devloop_core::{Job, JobId};
use serde::{Deserialize, Serialize};

/// Response body for `POST /webhook`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: WebhookStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Accepted,
    Skipped,
}

impl WebhookResponse {
    pub fn accepted(job_id: Option<JobId>) -> Self {
        Self { status: WebhookStatus::Accepted, job_id: job_id.map(JobId::get) }
    }

    pub fn skipped() -> Self {
        Self { status: WebhookStatus::Skipped, job_id: None }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

/// One row handed to the status UI renderer (`GET /ui`, §4.B, §4.J).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRow {
    pub id: i64,
    pub kind: String,
    pub status: String,
    pub repo: Option<String>,
    pub issue_number: Option<i64>,
    pub pr_number: Option<i64>,
    pub iter: i64,
    pub updated_at: String,
    pub error: Option<String>,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.get(),
            kind: job.kind.as_str().to_string(),
            status: job.status.as_str().to_string(),
            repo: job.repo.clone(),
            issue_number: job.issue_number,
            pr_number: job.pr_number,
            iter: job.iter,
            updated_at: job.updated_at.clone(),
            error: job.error.clone(),
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
