// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared result shapes for the external-collaborator traits (§4.J).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub head_sha: String,
    pub head_branch: String,
    pub base_branch: String,
}

/// Outcome of the combined CI status for a commit. Kept as a string-backed
/// enum (rather than a bool) because the review handler's promotion rule
/// and the UI both need to render the finer-grained states, not just
/// pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiStatus {
    Success,
    Passed,
    Ok,
    Pending,
    Failed,
    Error,
    Unknown,
}

impl CiStatus {
    pub fn from_str_lenient(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "success" => CiStatus::Success,
            "passed" => CiStatus::Passed,
            "ok" => CiStatus::Ok,
            "pending" | "in_progress" | "queued" => CiStatus::Pending,
            "failed" | "failure" => CiStatus::Failed,
            "error" => CiStatus::Error,
            _ => CiStatus::Unknown,
        }
    }

    /// CI states that count as "green" for the review-approval rule.
    pub fn is_green(self) -> bool {
        matches!(self, CiStatus::Success | CiStatus::Passed | CiStatus::Ok)
    }

    /// CI states that force a `fix` decision regardless of the reviewer's
    /// own verdict.
    pub fn is_broken(self) -> bool {
        matches!(self, CiStatus::Failed | CiStatus::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Ok,
    Fix,
}

/// Result of the coding-agent runner (§4.J `CodeAgentRunner`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAgentResult {
    pub summary: String,
    pub tests: String,
}

/// Result of the review-agent runner (§4.J `ReviewAgentRunner`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewResult {
    pub decision: ReviewDecision,
    pub summary: String,
    pub findings: Vec<String>,
    pub ci: CiStatus,
}
