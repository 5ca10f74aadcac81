// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-layer error type.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload serialization error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("job {0} not found")]
    JobNotFound(i64),

    #[error("unknown job kind stored for job {job_id}: {source}")]
    UnknownKind { job_id: i64, #[source] source: devloop_core::UnknownJobKind },

    #[error("unknown job status stored for job {job_id}: {source}")]
    UnknownStatus { job_id: i64, #[source] source: devloop_core::UnknownJobStatus },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for devloop_core::CoreError {
    fn from(e: StoreError) -> Self {
        devloop_core::CoreError::Storage(e.to_string())
    }
}
