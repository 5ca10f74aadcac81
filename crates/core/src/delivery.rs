// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record of a consumed inbound webhook delivery.

/// A row in the `deliveries` table. Presence of a `delivery_id` means
/// "already processed, skip" — rows are never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub delivery_id: String,
    pub received_at: String,
}
