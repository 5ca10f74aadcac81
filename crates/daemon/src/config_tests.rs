// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

fn clear_required() {
    for var in [
        "CODE_APP_ID",
        "CODE_APP_PRIVATE_KEY_PATH",
        "REVIEWER_APP_ID",
        "REVIEWER_APP_PRIVATE_KEY_PATH",
        "OPENROUTER_API_KEY",
    ] {
        std::env::remove_var(var);
    }
}

fn set_required() {
    std::env::set_var("CODE_APP_ID", "123");
    std::env::set_var("CODE_APP_PRIVATE_KEY_PATH", "/tmp/code.pem");
    std::env::set_var("REVIEWER_APP_ID", "456");
    std::env::set_var("REVIEWER_APP_PRIVATE_KEY_PATH", "/tmp/reviewer.pem");
    std::env::set_var("OPENROUTER_API_KEY", "sk-test");
}

#[test]
#[serial]
fn load_fails_when_a_required_field_is_missing() {
    clear_required();
    let err = Config::load().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("CODE_APP_ID")));
}

#[test]
#[serial]
fn load_succeeds_with_defaults_once_required_fields_are_set() {
    clear_required();
    set_required();
    std::env::remove_var("BIND_ADDR");
    std::env::remove_var("AGENT_MAX_ITERS");

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.code_app_id, "123");
    assert_eq!(cfg.agent_max_iters, 3);
    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(cfg.agent_retry_labels, vec!["agent-retry".to_string()]);

    clear_required();
}

#[test]
#[serial]
fn load_rejects_an_unparsable_bind_addr() {
    clear_required();
    set_required();
    std::env::set_var("BIND_ADDR", "not-an-addr");

    let err = Config::load().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "BIND_ADDR", .. }));

    std::env::remove_var("BIND_ADDR");
    clear_required();
}

#[test]
#[serial]
fn agent_retry_labels_splits_on_comma_and_trims() {
    std::env::set_var("AGENT_RETRY_LABELS", " retry , agent-retry ,");
    assert_eq!(agent_retry_labels(), vec!["retry".to_string(), "agent-retry".to_string()]);
    std::env::remove_var("AGENT_RETRY_LABELS");
}

#[test]
#[serial]
fn parse_or_default_falls_back_on_garbage() {
    std::env::set_var("OPENROUTER_MAX_RETRIES", "not-a-number");
    assert_eq!(openrouter_max_retries(), 2);
    std::env::remove_var("OPENROUTER_MAX_RETRIES");
}
