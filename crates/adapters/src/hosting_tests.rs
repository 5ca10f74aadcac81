// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::types::CiStatus;

#[tokio::test]
async fn fake_hosting_client_round_trips_seeded_issue() {
    let client = FakeHostingClient::new();
    client.seed_issue(Issue { number: 5, title: "bug".into(), body: "steps".into() });
    let issue = client.get_issue("tok", "o/r", 5).await.unwrap();
    assert_eq!(issue.title, "bug");
}

#[tokio::test]
async fn fake_hosting_client_errors_on_unknown_issue() {
    let client = FakeHostingClient::new();
    assert!(client.get_issue("tok", "o/r", 99).await.is_err());
}

#[tokio::test]
async fn fake_hosting_client_records_comments_and_reviews() {
    let client = FakeHostingClient::new();
    client.post_comment("tok", "o/r", 5, "hello").await.unwrap();
    client.submit_review("tok", "o/r", 5, ReviewEvent::Approve, "lgtm").await.unwrap();

    assert_eq!(client.comments.lock().as_slice(), &[(5, "hello".to_string())]);
    assert_eq!(client.reviews.lock().len(), 1);
    assert_eq!(client.reviews.lock()[0].1, ReviewEvent::Approve);
}

#[tokio::test]
async fn fake_hosting_client_assigns_incrementing_pr_numbers() {
    let client = FakeHostingClient::new();
    let a = client.create_pr("tok", "o/r", "agent/a", "main", "A", "").await.unwrap();
    let b = client.create_pr("tok", "o/r", "agent/b", "main", "B", "").await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn fake_hosting_client_combined_status_defaults_unknown() {
    let client = FakeHostingClient::new();
    assert_eq!(client.combined_status("tok", "o/r", "sha").await.unwrap(), CiStatus::Unknown);
    client.seed_status("sha", CiStatus::Success);
    assert_eq!(client.combined_status("tok", "o/r", "sha").await.unwrap(), CiStatus::Success);
}
