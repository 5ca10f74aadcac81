// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn event_appends_one_json_line_per_call() {
    let dir = tempdir().unwrap();
    let logger = ArtifactLogger::new(dir.path(), 7);
    logger.event("job_start", "starting", None);
    logger.event("job_done", "finished", Some(json!({"summary": "ok"})));

    let contents = std::fs::read_to_string(logger.job_dir().join("events.jsonl")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["kind"], "job_start");
    assert_eq!(first["message"], "starting");
    assert!(first.get("data").is_none());

    let second: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["data"]["summary"], "ok");
}

#[test]
fn transcript_appends_in_order() {
    let dir = tempdir().unwrap();
    let logger = ArtifactLogger::new(dir.path(), 1);
    logger.transcript("step one", "did a thing");
    logger.transcript("step two", "did another thing");

    let contents = std::fs::read_to_string(logger.job_dir().join("transcript.md")).unwrap();
    let first_pos = contents.find("step one").unwrap();
    let second_pos = contents.find("step two").unwrap();
    assert!(first_pos < second_pos);
}

#[test]
fn transcript_fenced_wraps_content_in_code_fence() {
    let dir = tempdir().unwrap();
    let logger = ArtifactLogger::new(dir.path(), 2);
    logger.transcript_fenced("git status", "text", "M file.txt");

    let contents = std::fs::read_to_string(logger.job_dir().join("transcript.md")).unwrap();
    assert!(contents.contains("```text"));
    assert!(contents.contains("M file.txt"));
}

#[test]
fn multiple_jobs_log_to_disjoint_paths() {
    let dir = tempdir().unwrap();
    let a = ArtifactLogger::new(dir.path(), 1);
    let b = ArtifactLogger::new(dir.path(), 2);
    a.event("job_start", "a", None);
    b.event("job_start", "b", None);
    assert_ne!(a.job_dir(), b.job_dir());
    assert!(a.job_dir().join("events.jsonl").exists());
    assert!(b.job_dir().join("events.jsonl").exists());
}
