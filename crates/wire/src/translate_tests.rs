// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use devloop_core::JobStatus;
use serde_json::json;

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

#[test]
fn issue_opened_enqueues_issue_job() {
    let s = store();
    let retry = vec![];
    let t = Translator::new(&s, &retry);
    let payload = json!({
        "action": "opened",
        "repository": {"full_name": "o/r"},
        "issue": {"number": 5},
    });
    let id = t.translate("issues", &payload).unwrap().expect("enqueued");
    let job = s.get_job(id).unwrap().unwrap();
    assert_eq!(job.kind, JobKind::Issue);
    assert_eq!(job.repo.as_deref(), Some("o/r"));
    assert_eq!(job.issue_number, Some(5));
}

#[test]
fn issue_closed_is_ignored() {
    let s = store();
    let retry = vec![];
    let t = Translator::new(&s, &retry);
    let payload = json!({"action": "closed", "repository": {"full_name": "o/r"}, "issue": {"number": 5}});
    assert!(t.translate("issues", &payload).unwrap().is_none());
}

#[test]
fn labeled_pr_with_retry_label_enqueues_fix_and_records_iteration() {
    let s = store();
    let retry = vec!["agent-retry".to_string()];
    let t = Translator::new(&s, &retry);
    let payload = json!({
        "action": "labeled",
        "label": {"name": "agent-retry"},
        "repository": {"full_name": "o/r"},
        "pull_request": {"number": 3, "head": {"sha": "abc123"}},
    });
    let id = t.translate("pull_request", &payload).unwrap().expect("enqueued");
    let job = s.get_job(id).unwrap().unwrap();
    assert_eq!(job.kind, JobKind::Fix);
    assert_eq!(job.iter, 1);
    assert_eq!(job.payload.get("agent_force_retry").and_then(Value::as_bool), Some(true));
    assert_eq!(s.iteration_count("o/r", None, Some(3)).unwrap(), 1);
}

#[test]
fn labeled_pr_with_non_retry_label_is_ignored() {
    let s = store();
    let retry = vec!["agent-retry".to_string()];
    let t = Translator::new(&s, &retry);
    let payload = json!({
        "action": "labeled",
        "label": {"name": "bug"},
        "repository": {"full_name": "o/r"},
        "pull_request": {"number": 3, "head": {"sha": "abc123"}},
    });
    assert!(t.translate("pull_request", &payload).unwrap().is_none());
}

#[test]
fn labeled_pr_suppressed_while_fix_already_active() {
    let s = store();
    let keys = JobKeys::default().repo("o/r").pr_number(3);
    s.enqueue(JobKind::Fix, &json!({}), &keys, 1, None).unwrap();

    let retry = vec!["agent-retry".to_string()];
    let t = Translator::new(&s, &retry);
    let payload = json!({
        "action": "labeled",
        "label": {"name": "agent-retry"},
        "repository": {"full_name": "o/r"},
        "pull_request": {"number": 3, "head": {"sha": "abc123"}},
    });
    assert!(t.translate("pull_request", &payload).unwrap().is_none());
}

#[test]
fn check_suite_completed_with_pr_enqueues_review_once() {
    let s = store();
    let retry = vec![];
    let t = Translator::new(&s, &retry);
    let payload = json!({
        "action": "completed",
        "repository": {"full_name": "o/r"},
        "pull_requests": [{"number": 4, "head": {"sha": "sha1"}}],
        "check_suite": {"head_sha": "sha1"},
    });
    let id = t.translate("check_suite", &payload).unwrap().expect("enqueued");
    let job = s.get_job(id).unwrap().unwrap();
    assert_eq!(job.kind, JobKind::Review);
    assert!(s.review_seen("o/r", 4, "sha1").unwrap());

    // same (repo, pr, sha) again: deduped
    assert!(t.translate("check_suite", &payload).unwrap().is_none());
}

#[test]
fn check_suite_completed_without_associated_pr_is_ignored() {
    let s = store();
    let retry = vec![];
    let t = Translator::new(&s, &retry);
    let payload = json!({"action": "completed", "repository": {"full_name": "o/r"}, "pull_requests": []});
    assert!(t.translate("check_suite", &payload).unwrap().is_none());
}

#[test]
fn ci_completed_internal_shape_enqueues_review() {
    let s = store();
    let retry = vec![];
    let t = Translator::new(&s, &retry);
    let payload = json!({"repository": {"full_name": "o/r"}, "pr_number": 8, "head_sha": "deadbeef"});
    let id = t.translate("ci_completed", &payload).unwrap().expect("enqueued");
    let job = s.get_job(id).unwrap().unwrap();
    assert_eq!(job.kind, JobKind::Review);
    assert_eq!(job.status, JobStatus::Queued);
    assert!(s.review_seen("o/r", 8, "deadbeef").unwrap());
}

#[test]
fn unknown_event_is_ignored() {
    let s = store();
    let retry = vec![];
    let t = Translator::new(&s, &retry);
    assert!(t.translate("star", &json!({})).unwrap().is_none());
}
