// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundle of external-collaborator trait objects handlers are invoked
//! with (§4.F, §4.J). One bundle is constructed at daemon startup and
//! shared by `Arc` across the worker loop's lifetime.

use std::sync::Arc;

use devloop_adapters::{ChatClient, CodeAgentRunner, GitOps, HostingClient, InstallationAuth, ReviewAgentRunner};

#[derive(Clone)]
pub struct Collaborators {
    pub hosting: Arc<dyn HostingClient>,
    pub auth: Arc<dyn InstallationAuth>,
    pub chat: Arc<dyn ChatClient>,
    pub code_agent: Arc<dyn CodeAgentRunner>,
    pub review_agent: Arc<dyn ReviewAgentRunner>,
    pub git: Arc<dyn GitOps>,
}
