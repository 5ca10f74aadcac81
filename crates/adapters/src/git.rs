// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GitOps` — the local git plumbing handlers drive jobs through (§4.J).
//!
//! The wrapper is intentionally thin: each method shells out to one `git`
//! invocation and surfaces stderr on failure. Hardening the git interaction
//! itself (retry on transient network errors, partial-clone tuning, etc.)
//! is out of scope.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::process::Command;

use crate::error::AdapterResult;
use crate::subprocess::{run_checked, GIT_CLONE_TIMEOUT, GIT_FETCH_TIMEOUT, GIT_PUSH_TIMEOUT, GIT_SHORT_TIMEOUT};

#[async_trait]
pub trait GitOps: Send + Sync {
    /// Create or refresh a bare mirror of `remote_url` at `mirror_path`.
    async fn ensure_mirror(&self, remote_url: &str, mirror_path: &Path) -> AdapterResult<()>;

    /// Clone a fresh working copy from the local mirror into `workdir`,
    /// clearing any prior contents first.
    async fn clone_from_mirror(&self, mirror_path: &Path, workdir: &Path) -> AdapterResult<()>;

    /// Point `origin` at the authenticated remote URL (installation tokens
    /// are short-lived, so this is re-set per job rather than cached).
    async fn set_origin(&self, workdir: &Path, remote_url: &str) -> AdapterResult<()>;

    async fn create_branch(&self, workdir: &Path, branch: &str, from: &str) -> AdapterResult<()>;

    async fn checkout(&self, workdir: &Path, ref_: &str) -> AdapterResult<()>;

    async fn status_porcelain(&self, workdir: &Path) -> AdapterResult<String>;

    async fn commit_all(&self, workdir: &Path, message: &str) -> AdapterResult<()>;

    async fn push(&self, workdir: &Path, branch: &str) -> AdapterResult<()>;
}

/// `git`-binary backed implementation.
pub struct ShellGitOps {
    author_name: String,
    author_email: String,
}

impl ShellGitOps {
    pub fn new(author_name: impl Into<String>, author_email: impl Into<String>) -> Self {
        Self { author_name: author_name.into(), author_email: author_email.into() }
    }

    fn command(&self, workdir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(workdir).args(args);
        cmd.env("GIT_AUTHOR_NAME", &self.author_name)
            .env("GIT_AUTHOR_EMAIL", &self.author_email)
            .env("GIT_COMMITTER_NAME", &self.author_name)
            .env("GIT_COMMITTER_EMAIL", &self.author_email)
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE");
        cmd
    }
}

#[async_trait]
impl GitOps for ShellGitOps {
    async fn ensure_mirror(&self, remote_url: &str, mirror_path: &Path) -> AdapterResult<()> {
        if mirror_path.join("HEAD").exists() {
            let mut cmd = Command::new("git");
            cmd.arg("-C").arg(mirror_path).args(["remote", "update", "--prune"]);
            return run_checked(cmd, GIT_FETCH_TIMEOUT, "git remote update").await;
        }
        if let Some(parent) = mirror_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut cmd = Command::new("git");
        cmd.args(["clone", "--mirror", remote_url, &mirror_path.display().to_string()]);
        run_checked(cmd, GIT_CLONE_TIMEOUT, "git clone --mirror").await
    }

    async fn clone_from_mirror(&self, mirror_path: &Path, workdir: &Path) -> AdapterResult<()> {
        if workdir.exists() {
            tokio::fs::remove_dir_all(workdir).await?;
        }
        if let Some(parent) = workdir.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut cmd = Command::new("git");
        cmd.args([
            "clone",
            &mirror_path.display().to_string(),
            &workdir.display().to_string(),
        ]);
        run_checked(cmd, GIT_CLONE_TIMEOUT, "git clone").await
    }

    async fn set_origin(&self, workdir: &Path, remote_url: &str) -> AdapterResult<()> {
        let cmd = self.command(workdir, &["remote", "set-url", "origin", remote_url]);
        run_checked(cmd, GIT_SHORT_TIMEOUT, "git remote set-url").await
    }

    async fn create_branch(&self, workdir: &Path, branch: &str, from: &str) -> AdapterResult<()> {
        let cmd = self.command(workdir, &["checkout", "-b", branch, from]);
        run_checked(cmd, GIT_SHORT_TIMEOUT, "git checkout -b").await
    }

    async fn checkout(&self, workdir: &Path, ref_: &str) -> AdapterResult<()> {
        let cmd = self.command(workdir, &["checkout", ref_]);
        run_checked(cmd, GIT_SHORT_TIMEOUT, "git checkout").await
    }

    async fn status_porcelain(&self, workdir: &Path) -> AdapterResult<String> {
        let cmd = self.command(workdir, &["status", "--porcelain"]);
        let output = crate::subprocess::run_with_timeout(cmd, GIT_SHORT_TIMEOUT, "git status").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(crate::error::AdapterError::Git(format!("git status failed: {}", stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn commit_all(&self, workdir: &Path, message: &str) -> AdapterResult<()> {
        let add = self.command(workdir, &["add", "-A"]);
        run_checked(add, GIT_SHORT_TIMEOUT, "git add").await?;
        let commit = self.command(workdir, &["commit", "-m", message]);
        run_checked(commit, GIT_SHORT_TIMEOUT, "git commit").await
    }

    async fn push(&self, workdir: &Path, branch: &str) -> AdapterResult<()> {
        let cmd = self.command(workdir, &["push", "origin", &format!("HEAD:{branch}")]);
        run_checked(cmd, GIT_PUSH_TIMEOUT, "git push").await
    }
}

/// In-memory fake recording every call, for handler tests that don't want
/// to shell out to a real `git`.
#[derive(Default)]
pub struct FakeGitOps {
    pub calls: Mutex<Vec<String>>,
    pub porcelain_status: Mutex<String>,
}

impl FakeGitOps {
    pub fn with_porcelain_status(status: impl Into<String>) -> Self {
        Self { calls: Mutex::new(Vec::new()), porcelain_status: Mutex::new(status.into()) }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl GitOps for FakeGitOps {
    async fn ensure_mirror(&self, remote_url: &str, _mirror_path: &Path) -> AdapterResult<()> {
        self.record(format!("ensure_mirror {remote_url}"));
        Ok(())
    }

    async fn clone_from_mirror(&self, _mirror_path: &Path, workdir: &Path) -> AdapterResult<()> {
        self.record(format!("clone_from_mirror {}", workdir.display()));
        Ok(())
    }

    async fn set_origin(&self, _workdir: &Path, remote_url: &str) -> AdapterResult<()> {
        self.record(format!("set_origin {remote_url}"));
        Ok(())
    }

    async fn create_branch(&self, _workdir: &Path, branch: &str, from: &str) -> AdapterResult<()> {
        self.record(format!("create_branch {branch} from {from}"));
        Ok(())
    }

    async fn checkout(&self, _workdir: &Path, ref_: &str) -> AdapterResult<()> {
        self.record(format!("checkout {ref_}"));
        Ok(())
    }

    async fn status_porcelain(&self, _workdir: &Path) -> AdapterResult<String> {
        self.record("status_porcelain");
        Ok(self.porcelain_status.lock().clone())
    }

    async fn commit_all(&self, _workdir: &Path, message: &str) -> AdapterResult<()> {
        self.record(format!("commit_all {message}"));
        Ok(())
    }

    async fn push(&self, _workdir: &Path, branch: &str) -> AdapterResult<()> {
        self.record(format!("push {branch}"));
        Ok(())
    }
}

/// `<workdir_root>/<repo_safe>/job-<id>/` path construction (§4.F):
/// `repo` slashes become double-underscores so the path stays one segment.
pub fn repo_safe(repo: &str) -> String {
    repo.replace('/', "__")
}

pub fn job_workdir(workdir_root: &Path, repo: &str, job_id: i64) -> PathBuf {
    workdir_root.join(repo_safe(repo)).join(format!("job-{job_id}"))
}

pub fn mirror_path(workdir_root: &Path, repo: &str) -> PathBuf {
    workdir_root.join("cache").join(format!("{}.git", repo_safe(repo)))
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
