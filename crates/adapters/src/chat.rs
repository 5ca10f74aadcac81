// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ChatClient` — a single `complete` call against an OpenRouter-compatible
//! chat endpoint, with bounded retries (§4.J).

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AdapterResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> AdapterResult<String>;
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

/// OpenRouter-compatible chat-completions client with bounded retries on
/// transient (5xx/timeout) failures.
pub struct OpenRouterChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl OpenRouterChatClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_options(api_key, model, "https://openrouter.ai/api/v1", std::time::Duration::from_secs(60), 2)
    }

    pub fn with_options(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: std::time::Duration,
        max_retries: u32,
    ) -> Self {
        let client = reqwest::Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { client, base_url: base_url.into(), api_key: api_key.into(), model: model.into(), max_retries }
    }
}

#[async_trait]
impl ChatClient for OpenRouterChatClient {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> AdapterResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({"model": self.model, "messages": messages, "max_tokens": max_tokens});

        let mut attempt = 0;
        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            match result {
                Ok(resp) => {
                    let parsed: ChatCompletionResponse = resp.json().await?;
                    return Ok(parsed
                        .choices
                        .into_iter()
                        .next()
                        .map(|c| c.message.content)
                        .unwrap_or_default());
                }
                Err(e) if attempt < self.max_retries && e.status().map(|s| s.is_server_error()).unwrap_or(true) => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "chat completion failed, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Scripted fake: returns queued responses in order, recording every
/// prompt it was handed.
#[derive(Default)]
pub struct FakeChatClient {
    responses: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeChatClient {
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self { responses: Mutex::new(responses), calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn complete(&self, messages: &[ChatMessage], _max_tokens: u32) -> AdapterResult<String> {
        self.calls.lock().push(messages.to_vec());
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            Ok(String::new())
        } else {
            Ok(responses.remove(0))
        }
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
