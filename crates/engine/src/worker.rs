// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Loop (§4.E): the single-consumer dispatcher. At most one job
//! runs at a time — there is no internal concurrency here, only sequential
//! `await`s down into whichever handler the job's kind selects.

use std::time::Duration;

use devloop_core::{Job, JobId, JobKind, JobStatus};
use devloop_storage::SqliteStore;

use crate::artifact_log::ArtifactLogger;
use crate::collaborators::Collaborators;
use crate::config::HandlerConfig;
use crate::error::EngineResult;
use crate::handlers;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct Worker {
    store: SqliteStore,
    cfg: HandlerConfig,
    collaborators: Collaborators,
}

impl Worker {
    pub fn new(store: SqliteStore, cfg: HandlerConfig, collaborators: Collaborators) -> Self {
        Self { store, cfg, collaborators }
    }

    /// Fail any job left `running` from a prior crash (§9, resolved open
    /// question). Call once before [`Worker::run`].
    pub fn reconcile(&self) -> EngineResult<Vec<JobId>> {
        Ok(self.store.reconcile_orphaned_running()?)
    }

    /// Run the dispatch loop forever.
    pub async fn run(&self) -> ! {
        loop {
            match self.store.fetch_next() {
                Ok(Some(job)) => self.run_one(job).await,
                Ok(None) => tokio::time::sleep(POLL_INTERVAL).await,
                Err(e) => {
                    tracing::error!(error = %e, "fetch_next failed, retrying after poll interval");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }

    async fn run_one(&self, job: Job) {
        let logger = ArtifactLogger::new(&self.cfg.artifacts_dir, job.id.get());

        if let Err(e) = self.store.set_status(job.id, JobStatus::Running, None) {
            tracing::error!(job_id = %job.id, error = %e, "failed to mark job running, skipping");
            return;
        }
        logger.event("job_start", &format!("dispatching {} job", job.kind.as_str()), None);
        tracing::info!(
            job_id = %job.id,
            kind = %job.kind,
            repo = ?job.repo,
            issue_number = ?job.issue_number,
            pr_number = ?job.pr_number,
            head_sha = ?job.head_sha,
            "job started"
        );

        match self.dispatch(&job, &logger).await {
            Ok(()) => {
                if let Err(e) = self.store.set_status(job.id, JobStatus::Done, None) {
                    tracing::error!(job_id = %job.id, error = %e, "failed to mark job done");
                }
                logger.event("job_done", "job completed", None);
                tracing::info!(job_id = %job.id, "job done");
            }
            Err(e) => {
                let message = e.to_string();
                if let Err(store_err) = self.store.set_status(job.id, JobStatus::Failed, Some(&message)) {
                    tracing::error!(job_id = %job.id, error = %store_err, "failed to mark job failed");
                }
                logger.event("job_failed", &message, None);
                tracing::error!(job_id = %job.id, error = %message, "job failed");
            }
        }
    }

    async fn dispatch(&self, job: &Job, logger: &ArtifactLogger) -> EngineResult<()> {
        match job.kind {
            JobKind::Issue => handlers::run_issue(&self.cfg, job, logger, &self.collaborators).await,
            JobKind::Fix => handlers::run_fix(&self.cfg, &self.store, job, logger, &self.collaborators).await,
            JobKind::Review => handlers::run_review(&self.cfg, &self.store, job, logger, &self.collaborators).await,
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
