// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds shared across crate boundaries (§7 of the design doc).

use crate::job::UnknownJobKind;

/// Errors the worker loop can attach to a failed job, or that ingress maps
/// to an HTTP status. Storage-specific and collaborator-specific errors are
/// defined in their own crates and convert into this enum at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("max iterations reached ({iter} > {max})")]
    MaxIterationsReached { iter: i64, max: i64 },

    #[error(transparent)]
    UnknownJobKind(#[from] UnknownJobKind),

    #[error("config error: {0}")]
    Config(String),
}

impl CoreError {
    /// `true` for errors that mean "this job couldn't proceed and is
    /// considered failed, not a system-level fault".
    pub fn is_job_failure(&self) -> bool {
        !matches!(self, CoreError::InvalidSignature | CoreError::Config(_))
    }
}

/// Type alias used for handler return values throughout the engine crate.
pub type CoreResult<T> = Result<T, CoreError>;
