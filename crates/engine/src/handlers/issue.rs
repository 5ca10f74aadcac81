// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue handler (§4.F): triages a newly opened/labeled issue into a PR.

use devloop_core::{Job, Payload};

use crate::artifact_log::ArtifactLogger;
use crate::collaborators::Collaborators;
use crate::config::HandlerConfig;
use crate::error::{EngineError, EngineResult};

use super::{has_meaningful_change, prepare_workdir};

pub async fn run_issue(
    cfg: &HandlerConfig,
    job: &Job,
    logger: &ArtifactLogger,
    collab: &Collaborators,
) -> EngineResult<()> {
    let payload = Payload::new(&job.payload);
    let repo = job.repo.clone().ok_or(EngineError::MissingField("repo"))?;
    let issue_number = job.issue_number.ok_or(EngineError::MissingField("issue_number"))?;
    let default_branch = payload.default_branch().unwrap_or_else(|| "main".to_string());

    let token = collab.auth.token_for(&repo).await?;
    let issue = collab.hosting.get_issue(&token, &repo, issue_number).await?;
    logger.event("issue_fetched", &format!("fetched issue #{issue_number}"), None);

    let workdir = prepare_workdir(collab.git.as_ref(), cfg, &repo, job.id.get(), &token).await?;
    let branch = format!("agent/issue-{issue_number}-{}", job.id.get());
    collab.git.create_branch(&workdir, &branch, &default_branch).await?;

    let notes_dir = workdir.join("agent_notes");
    tokio::fs::create_dir_all(&notes_dir).await?;
    tokio::fs::write(
        notes_dir.join(format!("issue-{issue_number}.md")),
        format!("# {}\n\n{}\n", issue.title, issue.body),
    )
    .await?;

    let instructions = format!("{}\n\n{}", issue.title, issue.body);
    let result = collab.code_agent.run(&instructions, &workdir, cfg.agent_max_steps).await?;
    logger.transcript("coding agent", &result.summary);

    let porcelain = collab.git.status_porcelain(&workdir).await?;
    if has_meaningful_change(&porcelain) {
        collab.git.commit_all(&workdir, &format!("Agent: {}", issue.title)).await?;
        collab.git.push(&workdir, &branch).await?;

        let body = format!(
            "Closes #{issue_number}\n\n{}\n\n**Tests run:** {}\n",
            result.summary, result.tests
        );
        let pr_number =
            collab.hosting.create_pr(&token, &repo, &branch, &default_branch, &issue.title, &body).await?;
        logger.event("pr_opened", &format!("opened PR #{pr_number}"), None);
    } else {
        collab
            .hosting
            .post_comment(&token, &repo, issue_number, "No changes were produced for this issue.")
            .await?;
        logger.event("no_changes", "agent produced no meaningful change", None);
    }

    Ok(())
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
