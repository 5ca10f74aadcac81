// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed implementation of the job store (§4.A, §6 persisted schema).
//!
//! Exactly four tables: `deliveries`, `jobs`, `iterations`, `review_keys`.
//! One writer (the worker loop) plus many short readers (ingress handlers)
//! share a single connection behind a mutex — SQLite's own file locking plus
//! this in-process mutex are enough at the write volume this system sees;
//! there are no multi-statement transactions that cross component
//! boundaries (invariant in §3).

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use devloop_core::{Iteration, IterationStatus, Job, JobId, JobKeys, JobKind, JobStatus};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS deliveries (
    delivery_id TEXT PRIMARY KEY,
    received_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    status TEXT NOT NULL,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL,
    repo TEXT,
    issue_number INTEGER,
    pr_number INTEGER,
    head_sha TEXT,
    iter INTEGER NOT NULL DEFAULT 0,
    delivery_id TEXT,
    error TEXT
);

CREATE TABLE IF NOT EXISTS iterations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    repo TEXT NOT NULL,
    issue_number INTEGER,
    pr_number INTEGER,
    iter INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS review_keys (
    repo TEXT NOT NULL,
    pr_number INTEGER NOT NULL,
    head_sha TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (repo, pr_number, head_sha)
);
"#;

/// A SQLite-backed `JobStore`. Cheap to clone — the connection is shared
/// behind an `Arc<Mutex<_>>`.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if absent) the database at `path` and ensure the
    /// schema exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// In-memory store, for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    fn now() -> String {
        Utc::now().to_rfc3339()
    }

    pub fn delivery_seen(&self, delivery_id: &str) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let seen: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM deliveries WHERE delivery_id = ?1 LIMIT 1",
                params![delivery_id],
                |r| r.get(0),
            )
            .optional()?;
        Ok(seen.is_some())
    }

    pub fn mark_delivery(&self, delivery_id: &str) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO deliveries (delivery_id, received_at) VALUES (?1, ?2)",
            params![delivery_id, Self::now()],
        )?;
        Ok(())
    }

    pub fn review_seen(&self, repo: &str, pr_number: i64, head_sha: &str) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let seen: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM review_keys WHERE repo = ?1 AND pr_number = ?2 AND head_sha = ?3 LIMIT 1",
                params![repo, pr_number, head_sha],
                |r| r.get(0),
            )
            .optional()?;
        Ok(seen.is_some())
    }

    pub fn mark_review(&self, repo: &str, pr_number: i64, head_sha: &str) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO review_keys (repo, pr_number, head_sha, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![repo, pr_number, head_sha, Self::now()],
        )?;
        Ok(())
    }

    /// Enqueue one job. `iter` is 0 for issue/review jobs, and the iteration
    /// number (≥ 1) for fix jobs (invariant 4, §3).
    pub fn enqueue(
        &self,
        kind: JobKind,
        payload: &Value,
        keys: &JobKeys,
        iter: i64,
        delivery_id: Option<&str>,
    ) -> StoreResult<JobId> {
        let conn = self.conn.lock();
        let now = Self::now();
        let payload_text = serde_json::to_string(payload)?;
        conn.execute(
            "INSERT INTO jobs (created_at, updated_at, status, kind, payload, repo, issue_number, pr_number, head_sha, iter, delivery_id)
             VALUES (?1, ?1, 'queued', ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                now,
                kind.as_str(),
                payload_text,
                keys.repo,
                keys.issue_number,
                keys.pr_number,
                keys.head_sha,
                iter,
                delivery_id,
            ],
        )?;
        Ok(JobId(conn.last_insert_rowid()))
    }

    /// Oldest `queued` job ordered by `(kind_priority, id ASC)` —
    /// fix=0, review=1, issue=2 (§4.A).
    pub fn fetch_next(&self) -> StoreResult<Option<Job>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM jobs WHERE status = 'queued'
             ORDER BY CASE kind WHEN 'fix' THEN 0 WHEN 'review' THEN 1 WHEN 'issue' THEN 2 ELSE 3 END, id ASC
             LIMIT 1",
        )?;
        let job = stmt.query_row([], row_to_job).optional()?;
        job.transpose()
    }

    pub fn set_status(&self, job_id: JobId, status: JobStatus, error: Option<&str>) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE jobs SET status = ?1, updated_at = ?2, error = ?3 WHERE id = ?4",
            params![status.as_str(), Self::now(), error, job_id.get()],
        )?;
        Ok(())
    }

    /// NULL-aware active-job check (§4.A): `pr_number`/`issue_number` match
    /// with NULL matching NULL.
    pub fn has_active_job(
        &self,
        kind: JobKind,
        repo: &str,
        pr_number: Option<i64>,
        issue_number: Option<i64>,
    ) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM jobs
                 WHERE kind = ?1 AND repo = ?2 AND status IN ('queued', 'running')
                   AND (pr_number = ?3 OR (pr_number IS NULL AND ?3 IS NULL))
                   AND (issue_number = ?4 OR (issue_number IS NULL AND ?4 IS NULL))
                 LIMIT 1",
                params![kind.as_str(), repo, pr_number, issue_number],
                |r| r.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// `max(iter)` over all rows matching `(repo, issue?, pr?)`, regardless
    /// of status — blocked iterations still count toward the cap (preserved
    /// source behavior, see DESIGN.md).
    pub fn iteration_count(
        &self,
        repo: &str,
        issue_number: Option<i64>,
        pr_number: Option<i64>,
    ) -> StoreResult<i64> {
        let conn = self.conn.lock();
        let max_iter: Option<i64> = conn.query_row(
            "SELECT MAX(iter) FROM iterations
             WHERE repo = ?1
               AND (issue_number = ?2 OR (issue_number IS NULL AND ?2 IS NULL))
               AND (pr_number = ?3 OR (pr_number IS NULL AND ?3 IS NULL))",
            params![repo, issue_number, pr_number],
            |r| r.get(0),
        )?;
        Ok(max_iter.unwrap_or(0))
    }

    pub fn set_iteration_status(
        &self,
        repo: &str,
        issue_number: Option<i64>,
        pr_number: Option<i64>,
        iter: i64,
        status: IterationStatus,
    ) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO iterations (repo, issue_number, pr_number, iter, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![repo, issue_number, pr_number, iter, status.as_str(), Self::now()],
        )?;
        Ok(())
    }

    /// Most recent row for `(repo, issue?, pr?)` at the given `iter`, if any.
    /// Used by tests and the UI; handlers track iteration status purely by
    /// appending, never by reading this back.
    pub fn iteration_row(
        &self,
        repo: &str,
        issue_number: Option<i64>,
        pr_number: Option<i64>,
        iter: i64,
    ) -> StoreResult<Option<Iteration>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT repo, issue_number, pr_number, iter, status, updated_at FROM iterations
             WHERE repo = ?1
               AND (issue_number = ?2 OR (issue_number IS NULL AND ?2 IS NULL))
               AND (pr_number = ?3 OR (pr_number IS NULL AND ?3 IS NULL))
               AND iter = ?4
             ORDER BY id DESC LIMIT 1",
            params![repo, issue_number, pr_number, iter],
            |r| {
                Ok(Iteration {
                    repo: r.get(0)?,
                    issue_number: r.get(1)?,
                    pr_number: r.get(2)?,
                    iter: r.get(3)?,
                    status: r.get::<_, String>(4)?.parse().unwrap_or(IterationStatus::Queued),
                    updated_at: r.get(5)?,
                })
            },
        )
        .optional()
        .map_err(StoreError::from)
    }

    pub fn list_jobs(&self, status: Option<JobStatus>) -> StoreResult<Vec<Job>> {
        let conn = self.conn.lock();
        let jobs = match status {
            Some(status) => {
                let mut stmt = conn.prepare("SELECT * FROM jobs WHERE status = ?1 ORDER BY id ASC")?;
                let rows = stmt.query_map(params![status.as_str()], row_to_job)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM jobs ORDER BY id ASC")?;
                let rows = stmt.query_map([], row_to_job)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        jobs.into_iter().collect()
    }

    pub fn get_job(&self, job_id: JobId) -> StoreResult<Option<Job>> {
        let conn = self.conn.lock();
        let job = conn
            .query_row("SELECT * FROM jobs WHERE id = ?1 LIMIT 1", params![job_id.get()], row_to_job)
            .optional()?;
        job.transpose()
    }

    /// Mark any job left `running` from a prior crash as `failed`. Called
    /// once at worker startup (§4.E open question, resolved in DESIGN.md:
    /// orphaned running jobs are not resumed, they are failed outright so
    /// the store never reports a job stuck in `running` forever).
    pub fn reconcile_orphaned_running(&self) -> StoreResult<Vec<JobId>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id FROM jobs WHERE status = 'running'")?;
        let ids: Vec<i64> = stmt.query_map([], |r| r.get(0))?.collect::<Result<_, _>>()?;
        for id in &ids {
            conn.execute(
                "UPDATE jobs SET status = 'failed', updated_at = ?1, error = ?2 WHERE id = ?3",
                params![Self::now(), "orphaned: worker restarted while job was running", id],
            )?;
            tracing::warn!(job_id = id, "reconciled orphaned running job to failed at startup");
        }
        Ok(ids.into_iter().map(JobId).collect())
    }
}

fn row_to_job(row: &Row<'_>) -> rusqlite::Result<StoreResult<Job>> {
    let id: i64 = row.get("id")?;
    let kind_str: String = row.get("kind")?;
    let status_str: String = row.get("status")?;
    let payload_text: String = row.get("payload")?;

    let kind = match kind_str.parse() {
        Ok(k) => k,
        Err(source) => return Ok(Err(StoreError::UnknownKind { job_id: id, source })),
    };
    let status = match status_str.parse() {
        Ok(s) => s,
        Err(source) => return Ok(Err(StoreError::UnknownStatus { job_id: id, source })),
    };
    let payload = match serde_json::from_str(&payload_text) {
        Ok(p) => p,
        Err(e) => return Ok(Err(StoreError::from(e))),
    };

    Ok(Ok(Job {
        id: JobId(id),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        status,
        kind,
        payload,
        repo: row.get("repo")?,
        issue_number: row.get("issue_number")?,
        pr_number: row.get("pr_number")?,
        head_sha: row.get("head_sha")?,
        iter: row.get("iter")?,
        delivery_id: row.get("delivery_id")?,
        error: row.get("error")?,
    }))
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
