// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process entry point: load configuration, assemble collaborators, run
//! startup reconciliation, then run the HTTP listener and the worker
//! loop concurrently until one of them exits.

use std::sync::Arc;
use std::time::Duration;

use devloop_adapters::{
    ChatClient, GithubAppAuth, GithubHostingClient, OpenRouterChatClient, ShellGitOps, SingleShotCodeAgentRunner,
    SingleShotReviewAgentRunner,
};
use devloop_daemon::http::AppState;
use devloop_daemon::{lifecycle, router, Config};
use devloop_engine::{Collaborators, HandlerConfig, Worker};
use devloop_storage::SqliteStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error, exiting");
            std::process::exit(1);
        }
    };

    let store = match SqliteStore::open(&config.database_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to open job store, exiting");
            std::process::exit(1);
        }
    };

    let private_key = match std::fs::read(&config.code_app_private_key_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, path = ?config.code_app_private_key_path, "failed to read GitHub App private key, exiting");
            std::process::exit(1);
        }
    };

    let collaborators = build_collaborators(&config, private_key);

    let handler_config = HandlerConfig {
        workdir_root: config.workdir_root.clone(),
        artifacts_dir: config.artifacts_dir.clone(),
        max_iters: config.agent_max_iters,
        retry_labels: config.agent_retry_labels.clone(),
        agent_max_steps: config.agent_max_steps,
        git_author_name: config.git_user_name.clone(),
        git_author_email: config.git_user_email.clone(),
    };

    let worker = Worker::new(store.clone(), handler_config, collaborators);

    if let Err(e) = lifecycle::reconcile(&worker) {
        tracing::error!(error = %e, "startup reconciliation failed, exiting");
        std::process::exit(1);
    }

    let app_state = Arc::new(AppState {
        store,
        code_webhook_secret: config.code_webhook_secret.clone(),
        reviewer_webhook_secret: config.reviewer_webhook_secret.clone(),
        retry_labels: config.agent_retry_labels.clone(),
    });

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "failed to bind HTTP listener, exiting");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %config.bind_addr, "listening");

    let server = axum::serve(listener, router(app_state));
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server exited with an error");
            }
        }
        () = worker.run() => {}
    }
}

fn build_collaborators(config: &Config, code_private_key: Vec<u8>) -> Collaborators {
    let hosting = Arc::new(GithubHostingClient::with_options(
        config.github_api_base.clone(),
        Duration::from_secs(30),
    ));
    let auth = Arc::new(GithubAppAuth::with_base_url(
        config.code_app_id.clone(),
        code_private_key,
        config.github_api_base.clone(),
    ));

    let code_chat: Arc<dyn ChatClient> = Arc::new(OpenRouterChatClient::with_options(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.openrouter_base_url.clone(),
        Duration::from_secs(config.openrouter_timeout_sec),
        config.openrouter_max_retries,
    ));
    let review_chat = OpenRouterChatClient::with_options(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.openrouter_base_url.clone(),
        Duration::from_secs(config.openrouter_timeout_sec),
        config.openrouter_max_retries,
    );

    Collaborators {
        hosting,
        auth,
        chat: code_chat,
        code_agent: Arc::new(SingleShotCodeAgentRunner::new(OpenRouterChatClient::with_options(
            config.openrouter_api_key.clone(),
            config.openrouter_model.clone(),
            config.openrouter_base_url.clone(),
            Duration::from_secs(config.openrouter_timeout_sec),
            config.openrouter_max_retries,
        ))),
        review_agent: Arc::new(SingleShotReviewAgentRunner::new(review_chat)),
        git: Arc::new(ShellGitOps::new(config.git_user_name.clone(), config.git_user_email.clone())),
    }
}
