// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_chat_client_returns_queued_responses_in_order() {
    let client = FakeChatClient::with_responses(vec!["first".into(), "second".into()]);
    let messages = [ChatMessage::user("hi")];
    assert_eq!(client.complete(&messages, 100).await.unwrap(), "first");
    assert_eq!(client.complete(&messages, 100).await.unwrap(), "second");
    assert_eq!(client.complete(&messages, 100).await.unwrap(), "");
}

#[tokio::test]
async fn fake_chat_client_records_prompts() {
    let client = FakeChatClient::with_responses(vec!["ok".into()]);
    let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
    client.complete(&messages, 50).await.unwrap();
    assert_eq!(client.calls.lock().len(), 1);
    assert_eq!(client.calls.lock()[0], messages);
}
