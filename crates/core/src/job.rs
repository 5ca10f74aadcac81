// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, kind, status, and the `Job` record itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for a job, assigned at enqueue time by the store.
///
/// Backed by the `jobs.id` autoincrement primary key. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl JobId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for JobId {
    fn from(v: i64) -> Self {
        JobId(v)
    }
}

/// What kind of work a job performs.
///
/// Ordering here is declaration order only; dequeue priority is computed
/// separately in the store (fix < review < issue), not derived from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Issue,
    Fix,
    Review,
}

impl JobKind {
    /// Dequeue priority: lower sorts first. An in-flight PR fix must unblock
    /// before new work; reviews confirm CI health next; issue ingestion is
    /// the least urgent entry point.
    pub fn priority(self) -> i32 {
        match self {
            JobKind::Fix => 0,
            JobKind::Review => 1,
            JobKind::Issue => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Issue => "issue",
            JobKind::Fix => "fix",
            JobKind::Review => "review",
        }
    }
}

impl std::str::FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(JobKind::Issue),
            "fix" => Ok(JobKind::Fix),
            "review" => Ok(JobKind::Review),
            other => Err(UnknownJobKind(other.to_string())),
        }
    }
}

crate::simple_display! {
    JobKind {
        Issue => "issue",
        Fix => "fix",
        Review => "review",
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown job kind: {0}")]
pub struct UnknownJobKind(pub String);

/// Lifecycle status of a job. Transitions are strictly
/// `Queued -> Running -> {Done | Failed}`; `Done`/`Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }

    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "done" => Ok(JobStatus::Done),
            "failed" => Ok(JobStatus::Failed),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Done => "done",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown job status: {0}")]
pub struct UnknownJobStatus(pub String);

/// Denormalized lookup/dedup keys carried alongside a job's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobKeys {
    pub repo: Option<String>,
    pub issue_number: Option<i64>,
    pub pr_number: Option<i64>,
    pub head_sha: Option<String>,
}

impl JobKeys {
    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn issue_number(mut self, n: i64) -> Self {
        self.issue_number = Some(n);
        self
    }

    pub fn pr_number(mut self, n: i64) -> Self {
        self.pr_number = Some(n);
        self
    }

    pub fn head_sha(mut self, sha: impl Into<String>) -> Self {
        self.head_sha = Some(sha.into());
        self
    }
}

/// One row of the `jobs` table, fully materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub created_at: String,
    pub updated_at: String,
    pub status: JobStatus,
    pub kind: JobKind,
    /// The originating event, stored verbatim (may carry the private
    /// `agent_force_retry` marker for label-driven retry).
    pub payload: Value,
    pub repo: Option<String>,
    pub issue_number: Option<i64>,
    pub pr_number: Option<i64>,
    pub head_sha: Option<String>,
    pub iter: i64,
    pub delivery_id: Option<String>,
    pub error: Option<String>,
}

impl Job {
    /// `true` when the payload carries the label-driven force-retry marker.
    pub fn force_retry(&self) -> bool {
        self.payload
            .get("agent_force_retry")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct JobBuilder => Job {
        into {
            created_at: String = "2026-01-01T00:00:00Z",
            updated_at: String = "2026-01-01T00:00:00Z",
        }
        set {
            id: JobId = JobId(1),
            status: JobStatus = JobStatus::Queued,
            kind: JobKind = JobKind::Issue,
            payload: Value = Value::Null,
            iter: i64 = 0,
        }
        option {
            repo: String = None,
            issue_number: i64 = None,
            pr_number: i64 = None,
            head_sha: String = None,
            delivery_id: String = None,
            error: String = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
