// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-to-Job Translator (§4.C).
//!
//! A pure classification table over `(event_name, payload)`, with the one
//! piece of state it touches — dedup and the iteration ledger — mediated
//! through the job store so the decision and its side effects commit
//! together.

use devloop_core::{CoreResult, Job, JobId, JobKeys, JobKind, Payload};
use devloop_storage::SqliteStore;
use serde_json::Value;

/// Classifies inbound webhook events into store operations.
pub struct Translator<'a> {
    store: &'a SqliteStore,
    retry_labels: &'a [String],
}

impl<'a> Translator<'a> {
    pub fn new(store: &'a SqliteStore, retry_labels: &'a [String]) -> Self {
        Self { store, retry_labels }
    }

    /// Runs the classification table for one event. Returns the job it
    /// enqueued, if any.
    pub fn translate(&self, event_name: &str, payload: &Value) -> CoreResult<Option<JobId>> {
        let p = Payload::new(payload);
        match event_name {
            "issues" => self.translate_issue(&p, payload),
            "pull_request" => self.translate_labeled_pr(&p, payload),
            "check_suite" | "workflow_run" => self.translate_review_event(&p, payload),
            "ci_completed" => self.translate_ci_completed(&p, payload),
            _ => Ok(None),
        }
    }

    fn translate_issue(&self, p: &Payload<'_>, payload: &Value) -> CoreResult<Option<JobId>> {
        let Some(action) = p.action() else { return Ok(None) };
        if !matches!(action, "opened" | "labeled") {
            return Ok(None);
        }
        let (Some(repo), Some(issue_number)) = (p.repo_full_name(), p.issue_number()) else {
            return Ok(None);
        };
        let keys = JobKeys::default().repo(repo).issue_number(issue_number);
        let id = self.store.enqueue(JobKind::Issue, payload, &keys, 0, None)?;
        Ok(Some(id))
    }

    fn translate_labeled_pr(&self, p: &Payload<'_>, payload: &Value) -> CoreResult<Option<JobId>> {
        if p.action() != Some("labeled") {
            return Ok(None);
        }
        let Some(label) = p.label_name() else { return Ok(None) };
        if !self.retry_labels.iter().any(|l| l == &label) {
            return Ok(None);
        }
        let (Some(repo), Some(pr_number), Some(head_sha)) = (p.repo_full_name(), p.pr_number(), p.head_sha())
        else {
            return Ok(None);
        };

        if self.store.has_active_job(JobKind::Fix, &repo, Some(pr_number), None)? {
            return Ok(None);
        }

        let iter = self.store.iteration_count(&repo, None, Some(pr_number))? + 1;
        self.store.set_iteration_status(
            &repo,
            None,
            Some(pr_number),
            iter,
            devloop_core::IterationStatus::Queued,
        )?;

        let mut stamped = payload.clone();
        if let Some(obj) = stamped.as_object_mut() {
            obj.insert("agent_force_retry".into(), Value::Bool(true));
        }

        let keys = JobKeys::default().repo(repo).pr_number(pr_number).head_sha(head_sha);
        let id = self.store.enqueue(JobKind::Fix, &stamped, &keys, iter, None)?;
        Ok(Some(id))
    }

    fn translate_review_event(&self, p: &Payload<'_>, payload: &Value) -> CoreResult<Option<JobId>> {
        if p.action() != Some("completed") {
            return Ok(None);
        }
        if !p.has_associated_pr() {
            return Ok(None);
        }
        self.enqueue_review(p, payload)
    }

    fn translate_ci_completed(&self, p: &Payload<'_>, payload: &Value) -> CoreResult<Option<JobId>> {
        self.enqueue_review(p, payload)
    }

    /// Shared by `check_suite`/`workflow_run`/`ci_completed`: enqueue a
    /// `review` job unless this `(repo, pr, sha)` was already reviewed.
    fn enqueue_review(&self, p: &Payload<'_>, payload: &Value) -> CoreResult<Option<JobId>> {
        let repo = p.repo_full_name();
        let pr_number = p.pr_number().or_else(|| p.associated_pr_number());
        let head_sha = p.head_sha();
        let (Some(repo), Some(pr_number), Some(head_sha)) = (repo, pr_number, head_sha) else {
            return Ok(None);
        };

        if self.store.review_seen(&repo, pr_number, &head_sha)? {
            return Ok(None);
        }

        let keys = JobKeys::default().repo(repo.clone()).pr_number(pr_number).head_sha(head_sha.clone());
        let id = self.store.enqueue(JobKind::Review, payload, &keys, 0, None)?;
        self.store.mark_review(&repo, pr_number, &head_sha)?;
        Ok(Some(id))
    }
}

/// Fetches the job the translator just enqueued, for callers (ingress,
/// tests) that want the full record rather than just the id.
pub fn fetch(store: &SqliteStore, id: JobId) -> CoreResult<Option<Job>> {
    Ok(store.get_job(id)?)
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
