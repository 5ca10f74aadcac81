// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Review handler (§4.F): runs the reviewer agent against a PR's head
//! commit and chains a fix job when the decision is not `ok`.

use devloop_adapters::{ReviewDecision, ReviewEvent};
use devloop_core::{IterationStatus, Job, JobKeys, JobKind, Payload};
use devloop_storage::SqliteStore;

use crate::artifact_log::ArtifactLogger;
use crate::collaborators::Collaborators;
use crate::config::HandlerConfig;
use crate::error::{EngineError, EngineResult};

use super::prepare_workdir;

pub async fn run_review(
    cfg: &HandlerConfig,
    store: &SqliteStore,
    job: &Job,
    logger: &ArtifactLogger,
    collab: &Collaborators,
) -> EngineResult<()> {
    let payload = Payload::new(&job.payload);
    let repo = job.repo.clone().ok_or(EngineError::MissingField("repo"))?;
    let pr_number = payload
        .pr_number()
        .or_else(|| payload.associated_pr_number())
        .or(job.pr_number)
        .ok_or(EngineError::MissingField("pr_number"))?;

    let token = collab.auth.token_for(&repo).await?;
    let pr = collab.hosting.get_pull_request(&token, &repo, pr_number).await?;

    let workdir = prepare_workdir(collab.git.as_ref(), cfg, &repo, job.id.get(), &token).await?;
    collab.git.checkout(&workdir, &pr.head_sha).await?;

    let ci = collab.hosting.combined_status(&token, &repo, &pr.head_sha).await?;
    let diff_summary = format!("{}\n\n{}", pr.title, pr.body);
    let mut result = collab.review_agent.run(&pr, &diff_summary, ci, &workdir, cfg.agent_max_steps).await?;

    // Decision promotion (§4.F): broken CI always forces a fix, regardless
    // of what the reviewer itself concluded.
    if result.decision == ReviewDecision::Ok && ci.is_broken() {
        result.decision = ReviewDecision::Fix;
    }

    let findings_block = if result.findings.is_empty() {
        String::new()
    } else {
        let bullets: Vec<String> = result.findings.iter().map(|f| format!("- {f}")).collect();
        format!("\n\n**Findings:**\n{}", bullets.join("\n"))
    };
    let comment = format!(
        "**Decision:** {:?}\n\n{}\n\n**CI:** {:?}{}",
        result.decision, result.summary, result.ci, findings_block
    );
    collab.hosting.post_comment(&token, &repo, pr_number, &comment).await?;

    let review_event = if result.decision == ReviewDecision::Ok && ci.is_green() {
        Some(ReviewEvent::Approve)
    } else if result.decision != ReviewDecision::Ok {
        Some(ReviewEvent::RequestChanges)
    } else {
        None
    };
    if let Some(event) = review_event {
        if let Err(e) = collab.hosting.submit_review(&token, &repo, pr_number, event, &result.summary).await {
            tracing::warn!(error = %e, "review submission failed, continuing");
        }
    }

    if result.decision != ReviewDecision::Ok
        && !store.has_active_job(JobKind::Fix, &repo, Some(pr_number), None)?
    {
        let iter = store.iteration_count(&repo, None, Some(pr_number))? + 1;
        store.set_iteration_status(&repo, None, Some(pr_number), iter, IterationStatus::Queued)?;
        let keys = JobKeys::default().repo(repo.clone()).pr_number(pr_number).head_sha(pr.head_sha.clone());
        store.enqueue(JobKind::Fix, &job.payload, &keys, iter, None)?;
        logger.event("fix_chained", &format!("chained fix job at iter {iter}"), None);
    }

    logger.transcript("review", &result.summary);
    Ok(())
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
