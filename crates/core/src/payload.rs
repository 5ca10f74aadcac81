// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed accessors over the opaque webhook payload.
//!
//! The core never schematizes the payload as a Rust struct — hosting
//! providers add fields over time and we only ever read a handful of key
//! paths. Centralizing those paths here means the lookup order used by the
//! translator and by job handlers can't drift apart.

use serde_json::Value;

/// Borrowing wrapper around a decoded webhook payload.
pub struct Payload<'a>(pub &'a Value);

impl<'a> Payload<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn action(&self) -> Option<&str> {
        self.0.get("action").and_then(Value::as_str)
    }

    /// `repository.full_name`, or the `repository` field itself when it is
    /// already a bare string.
    pub fn repo_full_name(&self) -> Option<String> {
        let repo = self.0.get("repository")?;
        if let Some(s) = repo.as_str() {
            return Some(s.to_string());
        }
        repo.get("full_name")?.as_str().map(str::to_string)
    }

    pub fn default_branch(&self) -> Option<String> {
        self.0
            .get("repository")?
            .get("default_branch")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn issue_number(&self) -> Option<i64> {
        self.0.get("issue")?.get("number").and_then(Value::as_i64)
    }

    /// `pull_request.number`, falling back to a bare `pr_number`/`pr` field
    /// (internal event shapes).
    pub fn pr_number(&self) -> Option<i64> {
        if let Some(n) = self.0.get("pull_request").and_then(|pr| pr.get("number")) {
            if let Some(n) = n.as_i64() {
                return Some(n);
            }
        }
        let n = self.0.get("pr_number").or_else(|| self.0.get("pr"))?;
        if let Some(n) = n.as_i64() {
            return Some(n);
        }
        n.get("number")?.as_i64()
    }

    /// Head-sha resolution order (§4.C): top-level `head_sha`/`sha`,
    /// top-level `head.sha`, `pull_request.head.sha`, `workflow_run.head_sha`,
    /// `check_suite.head_sha`, first element of `pull_requests[].head.sha`.
    pub fn head_sha(&self) -> Option<String> {
        if let Some(s) = self.0.get("head_sha").or_else(|| self.0.get("sha")).and_then(Value::as_str) {
            return Some(s.to_string());
        }
        if let Some(s) = self.0.get("head").and_then(|h| h.get("sha")).and_then(Value::as_str) {
            return Some(s.to_string());
        }
        if let Some(s) = self
            .0
            .get("pull_request")
            .and_then(|pr| pr.get("head"))
            .and_then(|h| h.get("sha"))
            .and_then(Value::as_str)
        {
            return Some(s.to_string());
        }
        if let Some(s) = self.0.get("workflow_run").and_then(|w| w.get("head_sha")).and_then(Value::as_str) {
            return Some(s.to_string());
        }
        if let Some(s) = self.0.get("check_suite").and_then(|c| c.get("head_sha")).and_then(Value::as_str) {
            return Some(s.to_string());
        }
        self.0
            .get("pull_requests")
            .and_then(Value::as_array)
            .and_then(|prs| prs.first())
            .and_then(|pr| pr.get("head"))
            .and_then(|h| h.get("sha"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn label_name(&self) -> Option<String> {
        self.0.get("label")?.get("name").and_then(Value::as_str).map(str::to_string)
    }

    /// First PR number from `pull_requests[]`, else from
    /// `workflow_run.pull_requests[]`.
    pub fn associated_pr_number(&self) -> Option<i64> {
        self.0
            .get("pull_requests")
            .and_then(Value::as_array)
            .and_then(|prs| prs.first())
            .and_then(|pr| pr.get("number"))
            .and_then(Value::as_i64)
            .or_else(|| {
                self.0
                    .get("workflow_run")
                    .and_then(|w| w.get("pull_requests"))
                    .and_then(Value::as_array)
                    .and_then(|prs| prs.first())
                    .and_then(|pr| pr.get("number"))
                    .and_then(Value::as_i64)
            })
    }

    pub fn has_associated_pr(&self) -> bool {
        self.associated_pr_number().is_some()
    }
}

/// Scan a PR/issue body for a `Closes #<n>` token, case-insensitive.
/// Returns the first match, or `None` if the body references no issue.
pub fn closes_issue_number(body: &str) -> Option<i64> {
    let lower = body.to_ascii_lowercase();
    for keyword in ["closes #", "close #", "fixes #", "fix #", "resolves #", "resolve #"] {
        if let Some(pos) = lower.find(keyword) {
            let rest = &body[pos + keyword.len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if let Ok(n) = digits.parse::<i64>() {
                return Some(n);
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
