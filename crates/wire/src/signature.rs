// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook signature verification (§4.B).
//!
//! Two shared secrets are configured — one for the coding-agent role, one
//! for the reviewer role — and a request is accepted if it matches
//! *either*. Both checks always run to completion: short-circuiting on the
//! first match would let a timing difference leak which secret (if any)
//! the request was signed with.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `sha256=<hex>` header value against `body`, checked against both
/// secrets. An empty secret disables verification for that role: the role
/// always matches, and because the two checks are OR'd the request is
/// accepted even with no signature header.
pub fn verify_signature(body: &[u8], header: Option<&str>, code_secret: &[u8], review_secret: &[u8]) -> bool {
    if code_secret.is_empty() || review_secret.is_empty() {
        return true;
    }

    let Some(header) = header else { return false };
    let Some(hex_digest) = header.strip_prefix("sha256=") else { return false };
    let Ok(provided) = hex::decode(hex_digest) else { return false };

    let code_match = matches_secret(body, &provided, code_secret);
    let review_match = matches_secret(body, &provided, review_secret);
    code_match | review_match
}

fn matches_secret(body: &[u8], provided: &[u8], secret: &[u8]) -> bool {
    if secret.is_empty() {
        return true;
    }
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else { return false };
    mac.update(body);
    mac.verify_slice(provided).is_ok()
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
