// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup and recovery (§4.E, §9). The worker loop is strictly
//! sequential, so a crash leaves at most one job stuck in `running`;
//! `reconcile` runs once before the worker loop starts and fails those
//! jobs so they don't block the queue forever.

use devloop_core::JobId;
use devloop_engine::{EngineResult, Worker};
use tracing::{info, warn};

/// Marks any job left `running` from a prior process as `failed` and logs
/// what it found. Called once at startup, before the worker loop and the
/// HTTP listener come up.
pub fn reconcile(worker: &Worker) -> EngineResult<Vec<JobId>> {
    let orphaned = worker.reconcile()?;
    if orphaned.is_empty() {
        info!("no orphaned running jobs found at startup");
    } else {
        warn!(count = orphaned.len(), ids = ?orphaned, "failed orphaned running jobs left over from a prior run");
    }
    Ok(orphaned)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
