// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded subprocess execution, used by the `git`-backed [`crate::git::ShellGitOps`].

use std::time::Duration;

use tokio::process::Command;

use crate::error::{AdapterError, AdapterResult};

pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);
pub const GIT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);
pub const GIT_SHORT_TIMEOUT: Duration = Duration::from_secs(30);
pub const GIT_PUSH_TIMEOUT: Duration = Duration::from_secs(60);

/// Run `cmd` to completion, capturing stdout/stderr, bounded by `timeout`.
/// `label` is only used in the timeout error message.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &'static str,
) -> AdapterResult<std::process::Output> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AdapterError::Timeout(timeout, label)),
    }
}

/// Run `cmd` and return an error carrying stderr if it did not exit 0.
pub async fn run_checked(cmd: Command, timeout: Duration, label: &'static str) -> AdapterResult<()> {
    let output = run_with_timeout(cmd, timeout, label).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AdapterError::Git(format!("{label} failed: {}", stderr.trim())));
    }
    Ok(())
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
