// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job artifact logger (§4.D): one JSON-lines event log plus a
//! markdown transcript, both append-only.
//!
//! Each `append*` call opens, writes, and closes the file — acceptable at
//! the write frequency one job produces. Failures are logged via
//! `tracing::warn!` and never propagate: a job must not fail because its
//! own log couldn't be written.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{json, Value};

pub struct ArtifactLogger {
    job_dir: PathBuf,
}

impl ArtifactLogger {
    /// `<artifacts_dir>/job-<id>/`.
    pub fn new(artifacts_dir: &Path, job_id: i64) -> Self {
        Self { job_dir: artifacts_dir.join(format!("job-{job_id}")) }
    }

    pub fn job_dir(&self) -> &Path {
        &self.job_dir
    }

    fn events_path(&self) -> PathBuf {
        self.job_dir.join("events.jsonl")
    }

    fn transcript_path(&self) -> PathBuf {
        self.job_dir.join("transcript.md")
    }

    /// Append one `{ts, kind, message, data?}` line to the event log.
    pub fn event(&self, kind: &str, message: &str, data: Option<Value>) {
        let mut line = json!({"ts": Utc::now().to_rfc3339(), "kind": kind, "message": message});
        if let Some(data) = data {
            line["data"] = data;
        }
        if let Err(e) = self.append_line(&self.events_path(), &line.to_string()) {
            tracing::warn!(job_dir = %self.job_dir.display(), error = %e, "failed to write job event log");
        }
    }

    /// Append a markdown paragraph to the transcript.
    pub fn transcript(&self, heading: &str, body: &str) {
        let entry = format!("## {} — {}\n\n{}\n\n", Utc::now().to_rfc3339(), heading, body);
        if let Err(e) = self.append_raw(&self.transcript_path(), &entry) {
            tracing::warn!(job_dir = %self.job_dir.display(), error = %e, "failed to write job transcript");
        }
    }

    /// Append a fenced block to the transcript, for multi-line tool output.
    pub fn transcript_fenced(&self, heading: &str, label: &str, content: &str) {
        let mut entry = format!("## {} — {}\n\n```{label}\n", Utc::now().to_rfc3339(), heading);
        entry.push_str(content);
        if !content.ends_with('\n') {
            entry.push('\n');
        }
        entry.push_str("```\n\n");
        if let Err(e) = self.append_raw(&self.transcript_path(), &entry) {
            tracing::warn!(job_dir = %self.job_dir.display(), error = %e, "failed to write job transcript");
        }
    }

    fn append_line(&self, path: &Path, line: &str) -> std::io::Result<()> {
        self.append_raw(path, &format!("{line}\n"))
    }

    fn append_raw(&self, path: &Path, content: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.job_dir)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())
    }
}

#[cfg(test)]
#[path = "artifact_log_tests.rs"]
mod tests;
