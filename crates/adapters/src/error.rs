// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for all external-collaborator adapters.

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("git command failed: {0}")]
    Git(String),

    #[error("git command timed out after {0:?}: {1}")]
    Timeout(std::time::Duration, &'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("installation auth not configured for {0}")]
    NotConfigured(String),
}

pub type AdapterResult<T> = Result<T, AdapterError>;

impl From<AdapterError> for devloop_core::CoreError {
    fn from(e: AdapterError) -> Self {
        devloop_core::CoreError::Upstream(e.to_string())
    }
}
