// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! devloop-daemon: process wiring for the event-driven coding-agent job
//! pipeline — configuration (§4.H), startup reconciliation (§9), and the
//! HTTP ingress surface (§4.B). The worker loop and job handlers
//! themselves live in `devloop-engine`; this crate only assembles them.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod ui;

pub use config::{Config, ConfigError};
pub use http::{router, AppState};
