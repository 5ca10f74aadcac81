// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `CodeAgentRunner` / `ReviewAgentRunner` — the multi-step LLM-plus-tools
//! loops handlers drive (§4.J). Internal reasoning is out of scope; the
//! production implementations here are deliberately minimal: one prompt
//! through a [`ChatClient`], tool use elided.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::chat::{ChatClient, ChatMessage};
use crate::error::AdapterResult;
use crate::types::{CiStatus, CodeAgentResult, PullRequest, ReviewDecision, ReviewResult};

#[async_trait]
pub trait CodeAgentRunner: Send + Sync {
    /// `instructions` is the issue/PR text the agent is asked to act on;
    /// `workdir` is the already-checked-out working copy.
    async fn run(&self, instructions: &str, workdir: &Path, max_steps: u32) -> AdapterResult<CodeAgentResult>;
}

#[async_trait]
pub trait ReviewAgentRunner: Send + Sync {
    async fn run(
        &self,
        pr: &PullRequest,
        diff_summary: &str,
        ci: CiStatus,
        workdir: &Path,
        max_steps: u32,
    ) -> AdapterResult<ReviewResult>;
}

#[derive(Deserialize)]
struct CodeAgentResponseShape {
    summary: String,
    #[serde(default)]
    tests: String,
}

#[derive(Deserialize)]
struct ReviewResponseShape {
    decision: ReviewDecisionShape,
    summary: String,
    #[serde(default)]
    findings: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReviewDecisionShape {
    Ok,
    Fix,
}

/// Single-shot production implementation: one prompt, parsed as JSON with
/// a plain-text fallback if the model didn't comply.
pub struct SingleShotCodeAgentRunner<C: ChatClient> {
    chat: C,
}

impl<C: ChatClient> SingleShotCodeAgentRunner<C> {
    pub fn new(chat: C) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl<C: ChatClient> CodeAgentRunner for SingleShotCodeAgentRunner<C> {
    async fn run(&self, instructions: &str, workdir: &Path, max_steps: u32) -> AdapterResult<CodeAgentResult> {
        let prompt = format!(
            "You are working in {}. Make the minimal change to satisfy:\n\n{instructions}\n\n\
             Respond with JSON: {{\"summary\": string, \"tests\": string}}. You have at most {max_steps} steps.",
            workdir.display()
        );
        let messages = [ChatMessage::system("You are a careful coding agent."), ChatMessage::user(prompt)];
        let raw = self.chat.complete(&messages, 2048).await?;
        Ok(match serde_json::from_str::<CodeAgentResponseShape>(&raw) {
            Ok(parsed) => CodeAgentResult { summary: parsed.summary, tests: parsed.tests },
            Err(_) => CodeAgentResult { summary: raw, tests: String::new() },
        })
    }
}

/// Single-shot production implementation of the reviewer. `ci` is supplied
/// by the caller (already resolved via [`crate::hosting::HostingClient`])
/// and carried through to the result untouched — the model is not trusted
/// to re-derive CI state.
pub struct SingleShotReviewAgentRunner<C: ChatClient> {
    chat: C,
}

impl<C: ChatClient> SingleShotReviewAgentRunner<C> {
    pub fn new(chat: C) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl<C: ChatClient> ReviewAgentRunner for SingleShotReviewAgentRunner<C> {
    async fn run(
        &self,
        pr: &PullRequest,
        diff_summary: &str,
        ci: CiStatus,
        _workdir: &Path,
        max_steps: u32,
    ) -> AdapterResult<ReviewResult> {
        let prompt = format!(
            "Review PR #{} \"{}\".\n\nDiff summary:\n{diff_summary}\n\n\
             Respond with JSON: {{\"decision\": \"ok\"|\"fix\", \"summary\": string, \"findings\": [string]}}. \
             You have at most {max_steps} steps.",
            pr.number, pr.title
        );
        let messages = [ChatMessage::system("You are a meticulous code reviewer."), ChatMessage::user(prompt)];
        let raw = self.chat.complete(&messages, 2048).await?;
        let (decision, summary, findings) = match serde_json::from_str::<ReviewResponseShape>(&raw) {
            Ok(parsed) => (
                match parsed.decision {
                    ReviewDecisionShape::Ok => ReviewDecision::Ok,
                    ReviewDecisionShape::Fix => ReviewDecision::Fix,
                },
                parsed.summary,
                parsed.findings,
            ),
            Err(_) => (ReviewDecision::Fix, raw, Vec::new()),
        };
        Ok(ReviewResult { decision, summary, findings, ci })
    }
}

/// Scripted fake for handler tests.
pub struct FakeCodeAgentRunner {
    result: CodeAgentResult,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCodeAgentRunner {
    pub fn new(result: CodeAgentResult) -> Self {
        Self { result, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl CodeAgentRunner for FakeCodeAgentRunner {
    async fn run(&self, instructions: &str, _workdir: &Path, _max_steps: u32) -> AdapterResult<CodeAgentResult> {
        self.calls.lock().push(instructions.to_string());
        Ok(self.result.clone())
    }
}

pub struct FakeReviewAgentRunner {
    result: ReviewResult,
    pub calls: Mutex<Vec<i64>>,
}

impl FakeReviewAgentRunner {
    pub fn new(result: ReviewResult) -> Self {
        Self { result, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ReviewAgentRunner for FakeReviewAgentRunner {
    async fn run(
        &self,
        pr: &PullRequest,
        _diff_summary: &str,
        _ci: CiStatus,
        _workdir: &Path,
        _max_steps: u32,
    ) -> AdapterResult<ReviewResult> {
        self.calls.lock().push(pr.number);
        Ok(self.result.clone())
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
