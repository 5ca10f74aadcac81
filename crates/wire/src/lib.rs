// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! devloop-wire: the inbound webhook protocol — signature verification,
//! event classification, and the DTOs the HTTP layer serializes.

pub mod http;
pub mod signature;
pub mod translate;

pub use http::{HealthResponse, JobRow, WebhookResponse, WebhookStatus};
pub use signature::verify_signature;
pub use translate::Translator;
