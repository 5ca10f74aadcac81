// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `InstallationAuth` — exchanges a GitHub App id + private key for a
//! short-lived, repo-scoped installation token (§4.J).
//!
//! JWT signing is the only nontrivial internal here, and it is out of
//! scope beyond the trait seam: this is a minimal, correct implementation,
//! not a hardened one (no key rotation, no clock-skew tuning beyond the
//! fixed slack below).

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, AdapterResult};

#[async_trait]
pub trait InstallationAuth: Send + Sync {
    /// Installation token scoped to `repo`, suitable for a `Bearer` header.
    async fn token_for(&self, repo: &str) -> AdapterResult<String>;
}

#[derive(Serialize)]
struct AppJwtClaims {
    iat: u64,
    exp: u64,
    iss: String,
}

#[derive(Deserialize)]
struct InstallationResponse {
    id: i64,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    token: String,
}

/// Production implementation: mints a short-lived App JWT, resolves the
/// installation id for `repo`, then exchanges it for an installation
/// access token.
pub struct GithubAppAuth {
    app_id: String,
    private_key_pem: Vec<u8>,
    client: reqwest::Client,
    base_url: String,
}

impl GithubAppAuth {
    pub fn new(app_id: impl Into<String>, private_key_pem: Vec<u8>) -> Self {
        Self::with_base_url(app_id, private_key_pem, "https://api.github.com")
    }

    pub fn with_base_url(app_id: impl Into<String>, private_key_pem: Vec<u8>, base_url: impl Into<String>) -> Self {
        Self { app_id: app_id.into(), private_key_pem, client: reqwest::Client::new(), base_url: base_url.into() }
    }

    fn app_jwt(&self) -> AdapterResult<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let claims = AppJwtClaims { iat: now - 60, exp: now + 9 * 60, iss: self.app_id.clone() };
        let key = EncodingKey::from_rsa_pem(&self.private_key_pem)?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}

#[async_trait]
impl InstallationAuth for GithubAppAuth {
    async fn token_for(&self, repo: &str) -> AdapterResult<String> {
        let jwt = self.app_jwt()?;
        let (owner, _) = repo
            .split_once('/')
            .ok_or_else(|| AdapterError::Shape(format!("invalid repo full_name: {repo}")))?;

        let installation: InstallationResponse = self
            .client
            .get(format!("{}/repos/{repo}/installation", self.base_url))
            .bearer_auth(&jwt)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "devloop-agent")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let _ = owner;
        let access: AccessTokenResponse = self
            .client
            .post(format!("{}/app/installations/{}/access_tokens", self.base_url, installation.id))
            .bearer_auth(&jwt)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "devloop-agent")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(access.token)
    }
}

/// Fixed-token fake for tests, optionally keyed per repo.
#[derive(Default)]
pub struct FakeInstallationAuth {
    tokens: Mutex<HashMap<String, String>>,
    default_token: String,
}

impl FakeInstallationAuth {
    pub fn new(default_token: impl Into<String>) -> Self {
        Self { tokens: Mutex::new(HashMap::new()), default_token: default_token.into() }
    }

    pub fn set_token_for(&self, repo: impl Into<String>, token: impl Into<String>) {
        self.tokens.lock().insert(repo.into(), token.into());
    }
}

#[async_trait]
impl InstallationAuth for FakeInstallationAuth {
    async fn token_for(&self, repo: &str) -> AdapterResult<String> {
        Ok(self.tokens.lock().get(repo).cloned().unwrap_or_else(|| self.default_token.clone()))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
