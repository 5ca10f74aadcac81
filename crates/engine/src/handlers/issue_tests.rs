// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use devloop_adapters::{
    CodeAgentResult, FakeChatClient, FakeCodeAgentRunner, FakeGitOps, FakeHostingClient, FakeInstallationAuth,
    FakeReviewAgentRunner, Issue,
};
use devloop_core::{JobBuilder, JobKind};

use super::run_issue;
use crate::artifact_log::ArtifactLogger;
use crate::collaborators::Collaborators;
use crate::config::HandlerConfig;

fn collab(
    hosting: Arc<FakeHostingClient>,
    code_agent: Arc<FakeCodeAgentRunner>,
    git: Arc<FakeGitOps>,
) -> Collaborators {
    Collaborators {
        hosting,
        auth: Arc::new(FakeInstallationAuth::new("tok")),
        chat: Arc::new(FakeChatClient::default()),
        code_agent,
        review_agent: Arc::new(FakeReviewAgentRunner::new(devloop_adapters::ReviewResult {
            decision: devloop_adapters::ReviewDecision::Ok,
            summary: String::new(),
            findings: Vec::new(),
            ci: devloop_adapters::CiStatus::Unknown,
        })),
        git,
    }
}

fn cfg(artifacts_dir: &std::path::Path) -> HandlerConfig {
    HandlerConfig { artifacts_dir: artifacts_dir.to_path_buf(), ..HandlerConfig::default() }
}

#[tokio::test]
async fn opens_a_pr_when_the_agent_makes_a_meaningful_change() {
    let dir = tempfile::tempdir().unwrap();
    let hosting = Arc::new(FakeHostingClient::new());
    hosting.seed_issue(Issue { number: 7, title: "Flaky test".to_string(), body: "It flakes.".to_string() });
    let code_agent = Arc::new(FakeCodeAgentRunner::new(CodeAgentResult {
        summary: "stabilized the test".to_string(),
        tests: "cargo test".to_string(),
    }));
    let git = Arc::new(FakeGitOps::with_porcelain_status(" M src/lib.rs\n"));
    let collaborators = collab(hosting.clone(), code_agent, git.clone());

    let job = JobBuilder::default().kind(JobKind::Issue).issue_number(7).repo("acme/widgets").build();
    let logger = ArtifactLogger::new(dir.path(), job.id.get());

    run_issue(&cfg(dir.path()), &job, &logger, &collaborators).await.unwrap();

    assert_eq!(hosting.created_prs.lock().len(), 1);
    assert!(hosting.comments.lock().is_empty());
    assert!(git.calls.lock().iter().any(|c| c.starts_with("push")));
}

#[tokio::test]
async fn posts_a_comment_instead_of_a_pr_when_nothing_changed() {
    let dir = tempfile::tempdir().unwrap();
    let hosting = Arc::new(FakeHostingClient::new());
    hosting.seed_issue(Issue { number: 9, title: "Docs typo".to_string(), body: "fix it".to_string() });
    let code_agent =
        Arc::new(FakeCodeAgentRunner::new(CodeAgentResult { summary: "nothing to do".to_string(), tests: String::new() }));
    let git = Arc::new(FakeGitOps::with_porcelain_status(" M agent_notes/issue-9.md\n"));
    let collaborators = collab(hosting.clone(), code_agent, git.clone());

    let job = JobBuilder::default().kind(JobKind::Issue).issue_number(9).repo("acme/widgets").build();
    let logger = ArtifactLogger::new(dir.path(), job.id.get());

    run_issue(&cfg(dir.path()), &job, &logger, &collaborators).await.unwrap();

    assert!(hosting.created_prs.lock().is_empty());
    assert_eq!(hosting.comments.lock().len(), 1);
}

#[tokio::test]
async fn missing_repo_is_rejected_before_any_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let hosting = Arc::new(FakeHostingClient::new());
    let code_agent =
        Arc::new(FakeCodeAgentRunner::new(CodeAgentResult { summary: String::new(), tests: String::new() }));
    let git = Arc::new(FakeGitOps::default());
    let collaborators = collab(hosting, code_agent, git);

    let job = JobBuilder::default().kind(JobKind::Issue).issue_number(1).build();
    let logger = ArtifactLogger::new(dir.path(), job.id.get());

    let err = run_issue(&cfg(dir.path()), &job, &logger, &collaborators).await.unwrap_err();
    assert!(err.to_string().contains("repo"));
}
