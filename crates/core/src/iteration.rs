// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only fix-iteration ledger.

use serde::{Deserialize, Serialize};

/// Status of one row in the `iterations` ledger.
///
/// The ledger is append-only: the governor never deletes or rewrites a row,
/// it only appends the next status transition for the next `iter` number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationStatus {
    Queued,
    Running,
    Done,
    Blocked,
}

impl IterationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IterationStatus::Queued => "queued",
            IterationStatus::Running => "running",
            IterationStatus::Done => "done",
            IterationStatus::Blocked => "blocked",
        }
    }
}

impl std::str::FromStr for IterationStatus {
    type Err = UnknownIterationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(IterationStatus::Queued),
            "running" => Ok(IterationStatus::Running),
            "done" => Ok(IterationStatus::Done),
            "blocked" => Ok(IterationStatus::Blocked),
            other => Err(UnknownIterationStatus(other.to_string())),
        }
    }
}

crate::simple_display! {
    IterationStatus {
        Queued => "queued",
        Running => "running",
        Done => "done",
        Blocked => "blocked",
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown iteration status: {0}")]
pub struct UnknownIterationStatus(pub String);

/// One row of the `iterations` table.
///
/// The "current iteration count" for a `(repo, issue?, pr?)` tuple is
/// `max(iter)` over matching rows regardless of status — blocked iterations
/// still count toward the cap (preserved source behavior, see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub repo: String,
    pub issue_number: Option<i64>,
    pub pr_number: Option<i64>,
    pub iter: i64,
    pub status: IterationStatus,
    pub updated_at: String,
}
