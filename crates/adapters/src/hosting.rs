// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `HostingClient` — the REST seam onto the code-hosting provider (§4.J).

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AdapterError, AdapterResult};
use crate::types::{CiStatus, Issue, PullRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    Approve,
    RequestChanges,
}

impl ReviewEvent {
    fn as_api_str(self) -> &'static str {
        match self {
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
        }
    }
}

#[async_trait]
pub trait HostingClient: Send + Sync {
    async fn get_issue(&self, token: &str, repo: &str, number: i64) -> AdapterResult<Issue>;
    async fn get_pull_request(&self, token: &str, repo: &str, number: i64) -> AdapterResult<PullRequest>;
    async fn post_comment(&self, token: &str, repo: &str, number: i64, body: &str) -> AdapterResult<()>;
    async fn create_pr(
        &self,
        token: &str,
        repo: &str,
        head_branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> AdapterResult<i64>;
    async fn submit_review(
        &self,
        token: &str,
        repo: &str,
        pr_number: i64,
        event: ReviewEvent,
        body: &str,
    ) -> AdapterResult<()>;
    async fn combined_status(&self, token: &str, repo: &str, sha: &str) -> AdapterResult<CiStatus>;
    async fn check_runs(&self, token: &str, repo: &str, sha: &str) -> AdapterResult<Vec<String>>;
}

/// Thin REST client over the GitHub API surface.
pub struct GithubHostingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GithubHostingClient {
    pub fn new() -> Self {
        Self::with_options("https://api.github.com", std::time::Duration::from_secs(30))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, std::time::Duration::from_secs(30))
    }

    pub fn with_options(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { client, base_url: base_url.into() }
    }

    fn auth(&self, builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "devloop-agent")
    }
}

impl Default for GithubHostingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct IssueResponse {
    number: i64,
    title: String,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Deserialize)]
struct PullRequestResponse {
    number: i64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    head: RefResponse,
    base: RefResponse,
}

#[derive(Deserialize)]
struct RefResponse {
    sha: String,
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Deserialize)]
struct CombinedStatusResponse {
    state: String,
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    check_runs: Vec<CheckRunResponse>,
}

#[derive(Deserialize)]
struct CheckRunResponse {
    name: String,
    conclusion: Option<String>,
}

#[derive(Deserialize)]
struct CreatePrResponse {
    number: i64,
}

#[async_trait]
impl HostingClient for GithubHostingClient {
    async fn get_issue(&self, token: &str, repo: &str, number: i64) -> AdapterResult<Issue> {
        let url = format!("{}/repos/{repo}/issues/{number}", self.base_url);
        let resp = self.auth(self.client.get(&url), token).send().await?.error_for_status()?;
        let parsed: IssueResponse = resp.json().await?;
        Ok(Issue { number: parsed.number, title: parsed.title, body: parsed.body.unwrap_or_default() })
    }

    async fn get_pull_request(&self, token: &str, repo: &str, number: i64) -> AdapterResult<PullRequest> {
        let url = format!("{}/repos/{repo}/pulls/{number}", self.base_url);
        let resp = self.auth(self.client.get(&url), token).send().await?.error_for_status()?;
        let parsed: PullRequestResponse = resp.json().await?;
        Ok(PullRequest {
            number: parsed.number,
            title: parsed.title,
            body: parsed.body.unwrap_or_default(),
            head_sha: parsed.head.sha,
            head_branch: parsed.head.git_ref,
            base_branch: parsed.base.git_ref,
        })
    }

    async fn post_comment(&self, token: &str, repo: &str, number: i64, body: &str) -> AdapterResult<()> {
        let url = format!("{}/repos/{repo}/issues/{number}/comments", self.base_url);
        self.auth(self.client.post(&url), token)
            .json(&json!({"body": body}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn create_pr(
        &self,
        token: &str,
        repo: &str,
        head_branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> AdapterResult<i64> {
        let url = format!("{}/repos/{repo}/pulls", self.base_url);
        let resp = self
            .auth(self.client.post(&url), token)
            .json(&json!({"title": title, "head": head_branch, "base": base_branch, "body": body}))
            .send()
            .await?
            .error_for_status()?;
        let parsed: CreatePrResponse = resp.json().await?;
        Ok(parsed.number)
    }

    async fn submit_review(
        &self,
        token: &str,
        repo: &str,
        pr_number: i64,
        event: ReviewEvent,
        body: &str,
    ) -> AdapterResult<()> {
        let url = format!("{}/repos/{repo}/pulls/{pr_number}/reviews", self.base_url);
        self.auth(self.client.post(&url), token)
            .json(&json!({"event": event.as_api_str(), "body": body}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn combined_status(&self, token: &str, repo: &str, sha: &str) -> AdapterResult<CiStatus> {
        let url = format!("{}/repos/{repo}/commits/{sha}/status", self.base_url);
        let resp = self.auth(self.client.get(&url), token).send().await?.error_for_status()?;
        let parsed: CombinedStatusResponse = resp.json().await?;
        Ok(CiStatus::from_str_lenient(&parsed.state))
    }

    async fn check_runs(&self, token: &str, repo: &str, sha: &str) -> AdapterResult<Vec<String>> {
        let url = format!("{}/repos/{repo}/commits/{sha}/check-runs", self.base_url);
        let resp = self.auth(self.client.get(&url), token).send().await?.error_for_status()?;
        let parsed: CheckRunsResponse = resp.json().await?;
        Ok(parsed
            .check_runs
            .into_iter()
            .map(|r| format!("{}: {}", r.name, r.conclusion.unwrap_or_else(|| "pending".to_string())))
            .collect())
    }
}

/// In-memory fake for handler tests. Seed issues/PRs with
/// [`FakeHostingClient::seed_issue`]/[`FakeHostingClient::seed_pull_request`]
/// and inspect `comments`/`reviews`/`created_prs` afterward.
#[derive(Default)]
pub struct FakeHostingClient {
    issues: Mutex<HashMap<i64, Issue>>,
    pull_requests: Mutex<HashMap<i64, PullRequest>>,
    statuses: Mutex<HashMap<String, CiStatus>>,
    pub comments: Mutex<Vec<(i64, String)>>,
    pub reviews: Mutex<Vec<(i64, ReviewEvent, String)>>,
    pub created_prs: Mutex<Vec<(String, String, String)>>,
    next_pr_number: Mutex<i64>,
}

impl FakeHostingClient {
    pub fn new() -> Self {
        Self { next_pr_number: Mutex::new(1000), ..Default::default() }
    }

    pub fn seed_issue(&self, issue: Issue) {
        self.issues.lock().insert(issue.number, issue);
    }

    pub fn seed_pull_request(&self, pr: PullRequest) {
        self.pull_requests.lock().insert(pr.number, pr);
    }

    pub fn seed_status(&self, sha: &str, status: CiStatus) {
        self.statuses.lock().insert(sha.to_string(), status);
    }
}

#[async_trait]
impl HostingClient for FakeHostingClient {
    async fn get_issue(&self, _token: &str, _repo: &str, number: i64) -> AdapterResult<Issue> {
        self.issues.lock().get(&number).cloned().ok_or_else(|| AdapterError::Shape(format!("no issue {number}")))
    }

    async fn get_pull_request(&self, _token: &str, _repo: &str, number: i64) -> AdapterResult<PullRequest> {
        self.pull_requests
            .lock()
            .get(&number)
            .cloned()
            .ok_or_else(|| AdapterError::Shape(format!("no pr {number}")))
    }

    async fn post_comment(&self, _token: &str, _repo: &str, number: i64, body: &str) -> AdapterResult<()> {
        self.comments.lock().push((number, body.to_string()));
        Ok(())
    }

    async fn create_pr(
        &self,
        _token: &str,
        _repo: &str,
        head_branch: &str,
        base_branch: &str,
        title: &str,
        _body: &str,
    ) -> AdapterResult<i64> {
        self.created_prs.lock().push((head_branch.to_string(), base_branch.to_string(), title.to_string()));
        let mut n = self.next_pr_number.lock();
        *n += 1;
        Ok(*n)
    }

    async fn submit_review(
        &self,
        _token: &str,
        _repo: &str,
        pr_number: i64,
        event: ReviewEvent,
        body: &str,
    ) -> AdapterResult<()> {
        self.reviews.lock().push((pr_number, event, body.to_string()));
        Ok(())
    }

    async fn combined_status(&self, _token: &str, _repo: &str, sha: &str) -> AdapterResult<CiStatus> {
        Ok(self.statuses.lock().get(sha).copied().unwrap_or(CiStatus::Unknown))
    }

    async fn check_runs(&self, _token: &str, _repo: &str, _sha: &str) -> AdapterResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "hosting_tests.rs"]
mod tests;
