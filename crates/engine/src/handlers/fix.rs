// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fix handler (§4.F, §4.G): drives one fix iteration on an existing PR,
//! enforcing the iteration cap.

use devloop_core::{closes_issue_number, IterationStatus, Job};
use devloop_storage::SqliteStore;

use crate::artifact_log::ArtifactLogger;
use crate::collaborators::Collaborators;
use crate::config::HandlerConfig;
use crate::error::{EngineError, EngineResult};

use super::{has_meaningful_change, prepare_workdir};

pub async fn run_fix(
    cfg: &HandlerConfig,
    store: &SqliteStore,
    job: &Job,
    logger: &ArtifactLogger,
    collab: &Collaborators,
) -> EngineResult<()> {
    let repo = job.repo.clone().ok_or(EngineError::MissingField("repo"))?;
    let pr_number = job.pr_number.ok_or(EngineError::MissingField("pr_number"))?;

    let iter =
        if job.iter > 0 { job.iter } else { store.iteration_count(&repo, None, Some(pr_number))? + 1 };

    if iter > cfg.max_iters && !job.force_retry() {
        store.set_iteration_status(&repo, None, Some(pr_number), iter, IterationStatus::Blocked)?;
        let token = collab.auth.token_for(&repo).await?;
        collab
            .hosting
            .post_comment(
                &token,
                &repo,
                pr_number,
                "This PR has reached the automatic fix iteration cap. Add a retry label to force another cycle.",
            )
            .await?;
        logger.event("iteration_blocked", &format!("iter {iter} exceeds max {}", cfg.max_iters), None);
        return Err(EngineError::IterationCapReached { iter, max: cfg.max_iters });
    }
    store.set_iteration_status(&repo, None, Some(pr_number), iter, IterationStatus::Running)?;

    let token = collab.auth.token_for(&repo).await?;
    let pr = collab.hosting.get_pull_request(&token, &repo, pr_number).await?;

    let workdir = prepare_workdir(collab.git.as_ref(), cfg, &repo, job.id.get(), &token).await?;
    collab.git.checkout(&workdir, &pr.head_branch).await?;

    let instructions = match closes_issue_number(&pr.body) {
        Some(n) => match collab.hosting.get_issue(&token, &repo, n).await {
            Ok(issue) => format!("{}\n\n{}", issue.title, issue.body),
            Err(_) => format!("{}\n\n{}", pr.title, pr.body),
        },
        None => format!("{}\n\n{}", pr.title, pr.body),
    };

    let result = collab.code_agent.run(&instructions, &workdir, cfg.agent_max_steps).await?;
    logger.transcript("fix iteration", &result.summary);

    let porcelain = collab.git.status_porcelain(&workdir).await?;
    if has_meaningful_change(&porcelain) {
        collab.git.commit_all(&workdir, &format!("Agent: Fix PR #{pr_number}")).await?;
        collab.git.push(&workdir, &pr.head_branch).await?;
    }
    collab
        .hosting
        .post_comment(&token, &repo, pr_number, &format!("Iteration {iter}: {}", result.summary))
        .await?;

    store.set_iteration_status(&repo, None, Some(pr_number), iter, IterationStatus::Done)?;
    Ok(())
}

#[cfg(test)]
#[path = "fix_tests.rs"]
mod tests;
