// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration (§4.H): one typed `Config`, built once at startup
//! from the environment variables in §6. Required fields that fail to
//! parse are a `ConfigError`; optional numeric fields fall back to
//! documented defaults. One small free function per variable, mirroring
//! the reference daemon's environment-resolution style, so each is
//! independently testable.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub artifacts_dir: PathBuf,
    pub workdir_root: PathBuf,

    pub code_app_id: String,
    pub code_app_private_key_path: PathBuf,
    pub code_webhook_secret: String,

    pub reviewer_app_id: String,
    pub reviewer_app_private_key_path: PathBuf,
    pub reviewer_webhook_secret: String,

    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub openrouter_timeout_sec: u64,
    pub openrouter_max_retries: u32,
    pub openrouter_max_tokens: u32,

    pub github_api_base: String,
    pub github_api_version: String,

    pub git_user_name: String,
    pub git_user_email: String,

    pub agent_max_steps: u32,
    pub agent_max_iters: i64,
    pub agent_retry_labels: Vec<String>,
    pub agent_tool_timeout_sec: u64,
    pub agent_max_tool_output_chars: usize,

    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads every variable once. Required fields missing or unparsable
    /// return a `ConfigError`; the caller (`main`) turns that into exit
    /// code 1 before any listener binds.
    pub fn load() -> ConfigResult<Self> {
        Ok(Self {
            database_path: database_path(),
            artifacts_dir: artifacts_dir(),
            workdir_root: workdir_root(),

            code_app_id: required_string("CODE_APP_ID")?,
            code_app_private_key_path: required_path("CODE_APP_PRIVATE_KEY_PATH")?,
            code_webhook_secret: env_string("CODE_WEBHOOK_SECRET"),

            reviewer_app_id: required_string("REVIEWER_APP_ID")?,
            reviewer_app_private_key_path: required_path("REVIEWER_APP_PRIVATE_KEY_PATH")?,
            reviewer_webhook_secret: env_string("REVIEWER_WEBHOOK_SECRET"),

            openrouter_api_key: required_string("OPENROUTER_API_KEY")?,
            openrouter_model: openrouter_model(),
            openrouter_base_url: openrouter_base_url(),
            openrouter_timeout_sec: openrouter_timeout_sec(),
            openrouter_max_retries: openrouter_max_retries(),
            openrouter_max_tokens: openrouter_max_tokens(),

            github_api_base: github_api_base(),
            github_api_version: github_api_version(),

            git_user_name: git_user_name(),
            git_user_email: git_user_email(),

            agent_max_steps: agent_max_steps(),
            agent_max_iters: agent_max_iters(),
            agent_retry_labels: agent_retry_labels(),
            agent_tool_timeout_sec: agent_tool_timeout_sec(),
            agent_max_tool_output_chars: agent_max_tool_output_chars(),

            bind_addr: bind_addr()?,
        })
    }
}

fn env_string(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn required_string(name: &'static str) -> ConfigResult<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty()).ok_or(ConfigError::Missing(name))
}

fn required_path(name: &'static str) -> ConfigResult<PathBuf> {
    required_string(name).map(PathBuf::from)
}

fn database_path() -> PathBuf {
    std::env::var("DATABASE_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("devloop.sqlite3"))
}

fn artifacts_dir() -> PathBuf {
    std::env::var("ARTIFACTS_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("artifacts"))
}

fn workdir_root() -> PathBuf {
    std::env::var("WORKDIR_ROOT").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("workdir"))
}

fn openrouter_model() -> String {
    std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| "openrouter/auto".to_string())
}

fn openrouter_base_url() -> String {
    std::env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string())
}

fn openrouter_timeout_sec() -> u64 {
    parse_or_default("OPENROUTER_TIMEOUT_SEC", 60)
}

fn openrouter_max_retries() -> u32 {
    parse_or_default("OPENROUTER_MAX_RETRIES", 2)
}

fn openrouter_max_tokens() -> u32 {
    parse_or_default("OPENROUTER_MAX_TOKENS", 2048)
}

fn github_api_base() -> String {
    std::env::var("GITHUB_API_BASE").unwrap_or_else(|_| "https://api.github.com".to_string())
}

fn github_api_version() -> String {
    std::env::var("GITHUB_API_VERSION").unwrap_or_else(|_| "2022-11-28".to_string())
}

fn git_user_name() -> String {
    std::env::var("GIT_USER_NAME").unwrap_or_else(|_| "devloop-agent".to_string())
}

fn git_user_email() -> String {
    std::env::var("GIT_USER_EMAIL").unwrap_or_else(|_| "devloop-agent@users.noreply.github.com".to_string())
}

fn agent_max_steps() -> u32 {
    parse_or_default("AGENT_MAX_STEPS", 20)
}

fn agent_max_iters() -> i64 {
    parse_or_default("AGENT_MAX_ITERS", 3)
}

fn agent_retry_labels() -> Vec<String> {
    std::env::var("AGENT_RETRY_LABELS")
        .ok()
        .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
        .filter(|labels: &Vec<String>| !labels.is_empty())
        .unwrap_or_else(|| vec!["agent-retry".to_string()])
}

fn agent_tool_timeout_sec() -> u64 {
    parse_or_default("AGENT_TOOL_TIMEOUT_SEC", 120)
}

fn agent_max_tool_output_chars() -> usize {
    parse_or_default("AGENT_MAX_TOOL_OUTPUT_CHARS", 20_000)
}

fn bind_addr() -> ConfigResult<SocketAddr> {
    let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    raw.parse().map_err(|_| ConfigError::Invalid { name: "BIND_ADDR", value: raw })
}

fn parse_or_default<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
