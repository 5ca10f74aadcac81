// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use devloop_adapters::{
    CodeAgentResult, FakeChatClient, FakeCodeAgentRunner, FakeGitOps, FakeHostingClient, FakeInstallationAuth,
    FakeReviewAgentRunner, Issue, ReviewResult,
};
use devloop_core::{JobBuilder, JobKind, JobStatus};
use devloop_storage::SqliteStore;

use super::*;

fn fake_collaborators(hosting: Arc<FakeHostingClient>) -> Collaborators {
    Collaborators {
        hosting,
        auth: Arc::new(FakeInstallationAuth::new("tok")),
        chat: Arc::new(FakeChatClient::default()),
        code_agent: Arc::new(FakeCodeAgentRunner::new(CodeAgentResult {
            summary: "done".to_string(),
            tests: String::new(),
        })),
        review_agent: Arc::new(FakeReviewAgentRunner::new(ReviewResult {
            decision: devloop_adapters::ReviewDecision::Ok,
            summary: String::new(),
            findings: Vec::new(),
            ci: devloop_adapters::CiStatus::Unknown,
        })),
        git: Arc::new(FakeGitOps::with_porcelain_status("")),
    }
}

#[test]
fn reconcile_delegates_to_the_store() {
    let store = SqliteStore::open_in_memory().unwrap();
    let job = store
        .enqueue(JobKind::Issue, &serde_json::json!({}), &devloop_core::JobKeys::default(), 0, None)
        .unwrap();
    store.set_status(job, JobStatus::Running, None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let cfg = HandlerConfig { artifacts_dir: dir.path().to_path_buf(), ..HandlerConfig::default() };
    let worker = Worker::new(store.clone(), cfg, fake_collaborators(Arc::new(FakeHostingClient::new())));

    let reconciled = worker.reconcile().unwrap();
    assert_eq!(reconciled, vec![job]);
    assert_eq!(store.get_job(job).unwrap().unwrap().status, JobStatus::Failed);
}

#[tokio::test]
async fn run_one_marks_the_job_done_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    let hosting = Arc::new(FakeHostingClient::new());
    hosting.seed_issue(Issue { number: 5, title: "Bug".to_string(), body: "fix it".to_string() });

    let cfg = HandlerConfig { artifacts_dir: dir.path().to_path_buf(), ..HandlerConfig::default() };
    let worker = Worker::new(store.clone(), cfg, fake_collaborators(hosting));

    let job = JobBuilder::default().kind(JobKind::Issue).repo("acme/widgets").issue_number(5).build();
    worker.run_one(job.clone()).await;

    let stored = store.get_job(job.id).unwrap();
    assert!(stored.is_none(), "job was never enqueued, only dispatched directly");
    assert!(dir.path().join(format!("job-{}", job.id.get())).join("events.jsonl").exists());
}

#[tokio::test]
async fn run_one_marks_the_job_failed_when_the_handler_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    let job_id = store
        .enqueue(JobKind::Issue, &serde_json::json!({}), &devloop_core::JobKeys::default(), 0, None)
        .unwrap();
    let job = store.get_job(job_id).unwrap().unwrap();

    let cfg = HandlerConfig { artifacts_dir: dir.path().to_path_buf(), ..HandlerConfig::default() };
    let worker = Worker::new(store.clone(), cfg, fake_collaborators(Arc::new(FakeHostingClient::new())));

    worker.run_one(job).await;

    let stored = store.get_job(job_id).unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.error.unwrap().contains("repo"));
}
