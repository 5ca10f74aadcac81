// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! devloop-storage: the SQLite-backed job store.
//!
//! Everything the rest of the system knows about persisted state — jobs,
//! deliveries, iterations, review keys — goes through [`SqliteStore`].
//! There is deliberately one store type: the system runs a single writer
//! (the worker loop) and a handful of readers (the HTTP ingress handlers
//! and the status UI), so a connection pool or async driver would be
//! ceremony without benefit.

pub mod error;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStore;
