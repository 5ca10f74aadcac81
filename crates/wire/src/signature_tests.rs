// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hmac::Mac;

fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[test]
fn accepts_code_secret_match() {
    let body = b"payload";
    let header = sign(b"code-secret", body);
    assert!(verify_signature(body, Some(&header), b"code-secret", b"review-secret"));
}

#[test]
fn accepts_review_secret_match() {
    let body = b"payload";
    let header = sign(b"review-secret", body);
    assert!(verify_signature(body, Some(&header), b"code-secret", b"review-secret"));
}

#[test]
fn rejects_when_neither_secret_matches() {
    let body = b"payload";
    let header = sign(b"someone-elses-secret", body);
    assert!(!verify_signature(body, Some(&header), b"code-secret", b"review-secret"));
}

#[test]
fn rejects_missing_header() {
    assert!(!verify_signature(b"payload", None, b"code-secret", b"review-secret"));
}

#[test]
fn rejects_malformed_header() {
    assert!(!verify_signature(b"payload", Some("not-a-signature"), b"code-secret", b"review-secret"));
}

#[test]
fn empty_code_secret_disables_verification_and_accepts() {
    let body = b"payload";
    assert!(verify_signature(body, None, b"", b"review-secret"));
    assert!(verify_signature(body, Some("not-a-signature"), b"", b"review-secret"));
}

#[test]
fn empty_review_secret_disables_verification_and_accepts() {
    let body = b"payload";
    assert!(verify_signature(body, None, b"code-secret", b""));
}

#[test]
fn rejects_when_body_is_tampered() {
    let header = sign(b"code-secret", b"original");
    assert!(!verify_signature(b"tampered", Some(&header), b"code-secret", b"review-secret"));
}
