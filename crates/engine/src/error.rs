// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the worker loop and job handlers.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] devloop_storage::StoreError),

    #[error("adapter error: {0}")]
    Adapter(#[from] devloop_adapters::AdapterError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("job payload is missing required field: {0}")]
    MissingField(&'static str),

    #[error("iteration cap reached: iter {iter} > max {max}")]
    IterationCapReached { iter: i64, max: i64 },

    #[error("unsupported job kind: {0}")]
    UnsupportedKind(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
