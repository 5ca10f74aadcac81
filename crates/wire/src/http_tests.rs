// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use devloop_core::JobId;

#[test]
fn accepted_response_serializes_job_id() {
    let resp = WebhookResponse::accepted(Some(JobId(7)));
    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["status"], "accepted");
    assert_eq!(v["job_id"], 7);
}

#[test]
fn accepted_response_omits_null_job_id() {
    let resp = WebhookResponse::accepted(None);
    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["status"], "accepted");
    assert!(v.get("job_id").is_none());
}

#[test]
fn skipped_response_has_no_job_id() {
    let resp = WebhookResponse::skipped();
    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["status"], "skipped");
    assert!(v.get("job_id").is_none());
}

#[test]
fn health_response_defaults_to_ok() {
    assert_eq!(HealthResponse::default().status, "ok");
}

#[test]
fn job_row_from_job_copies_fields() {
    let job = devloop_core::Job::builder()
        .id(JobId(1))
        .kind(devloop_core::JobKind::Fix)
        .status(devloop_core::JobStatus::Running)
        .repo("o/r")
        .pr_number(4)
        .iter(2)
        .build();
    let row = JobRow::from(&job);
    assert_eq!(row.id, 1);
    assert_eq!(row.kind, "fix");
    assert_eq!(row.status, "running");
    assert_eq!(row.pr_number, Some(4));
    assert_eq!(row.iter, 2);
}
