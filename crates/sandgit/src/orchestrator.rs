//! clone / push / pull entry points.
//!
//! Each operation builds a fresh [`SandboxFs`], a fresh [`AuthNegotiator`]
//! and a proxied transport, then hands them to the engine. Only clone
//! carries a write ledger.

use std::collections::BTreeMap;

use tracing::Instrument;

use crate::auth::auth_headers;
use crate::context::GitContext;
use crate::engine::{CloneRequest, EngineIo, GitEngine, PullRequest, PushRequest};
use crate::error::{Error, Result};
use crate::fs::{LedgerEntry, SandboxFs};
use crate::notify::Notice;
use crate::proxy::ProxiedTransport;

/// Result of a successful clone.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneOutcome {
    /// Sandbox working directory the repository was cloned into.
    pub workdir: String,
    /// Every file the engine wrote, keyed by path relative to `workdir`.
    pub files: BTreeMap<String, LedgerEntry>,
}

impl CloneOutcome {
    /// Written files outside `.git`.
    pub fn worktree_files(&self) -> impl Iterator<Item = (&str, &LedgerEntry)> {
        self.files
            .iter()
            .filter(|(p, _)| *p != ".git" && !p.starts_with(".git/"))
            .map(|(p, e)| (p.as_str(), e))
    }
}

/// Drives the protocol engine for one application.
///
/// Operations against one sandbox must not overlap.
pub struct Orchestrator {
    ctx: GitContext,
}

impl Orchestrator {
    pub fn new(ctx: GitContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &GitContext {
        &self.ctx
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.ctx.sandbox.is_ready() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Clone `url` into the sandbox workdir.
    ///
    /// Returns the ledger of written files so the caller can load the
    /// tree into its own project state. A failed clone returns nothing.
    pub async fn clone(&self, url: &str) -> Result<CloneOutcome> {
        self.ensure_ready()?;
        self.ctx.config.check_remote(url)?;

        let log = self.ctx.config.log();
        let span = tracing::info_span!("git_clone", url = %log.redact_url(url));
        async {
            let config = &self.ctx.config;
            let fs = SandboxFs::with_ledger(self.ctx.sandbox.clone());
            let http = ProxiedTransport::new(
                self.ctx.transport.as_ref(),
                config.cors_proxy_endpoint(),
                config.log(),
            );
            let negotiator = self.ctx.negotiator();
            let cached = self.ctx.credentials.lookup(url);

            let request = CloneRequest {
                dir: fs.workdir().to_string(),
                url: url.to_string(),
                depth: config.depth(),
                single_branch: config.is_single_branch(),
                headers: auth_headers(cached.as_ref(), config.user_agent_value()),
            };

            tracing::info!(depth = ?request.depth, "clone started");
            let io = EngineIo {
                fs: &fs,
                http: &http,
                auth: &negotiator,
            };
            if let Err(e) = GitEngine::clone(self.ctx.engine.as_ref(), io, request).await {
                log_failure("clone", &e);
                return Err(e);
            }

            let workdir = fs.workdir().to_string();
            let files = fs.into_ledger().into_entries();
            tracing::info!(files = files.len(), "clone finished");
            Ok(CloneOutcome { workdir, files })
        }
        .instrument(span)
        .await
    }

    /// Push `branch` to `remote` through the push proxy.
    pub async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.ensure_ready()?;

        let log = self.ctx.config.log();
        let span = tracing::info_span!(
            "git_push",
            remote = %log.field(remote),
            branch = %log.field(branch)
        );
        async {
            let config = &self.ctx.config;
            let fs = SandboxFs::new(self.ctx.sandbox.clone());
            let dir = fs.workdir().to_string();

            // Unreadable config is left for the engine to report
            match self
                .ctx
                .engine
                .get_config(&fs, &dir, &format!("remote.{}.url", remote))
                .await
            {
                Ok(Some(url)) => {
                    if let Err(e) = config.check_remote(&url) {
                        self.report_failure("Push", &e);
                        return Err(e);
                    }
                    tracing::debug!(url = %log.redact_url(&url), "resolved push remote");
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "could not read remote url"),
            }

            let http = ProxiedTransport::new(
                self.ctx.transport.as_ref(),
                config.push_proxy_endpoint(),
                config.log(),
            );
            let negotiator = self.ctx.negotiator();
            let request = PushRequest {
                dir,
                remote: remote.to_string(),
                branch: branch.to_string(),
                headers: auth_headers(None, config.user_agent_value()),
            };

            tracing::info!("push started");
            let io = EngineIo {
                fs: &fs,
                http: &http,
                auth: &negotiator,
            };
            match self.ctx.engine.push(io, request).await {
                Ok(()) => {
                    tracing::info!("push finished");
                    self.ctx
                        .notifier
                        .notify(Notice::success(format!("Pushed {} to {}", branch, remote)));
                    Ok(())
                }
                Err(e) => {
                    log_failure("push", &e);
                    self.report_failure("Push", &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Pull the configured remote into the current branch.
    pub async fn pull(&self) -> Result<()> {
        self.ensure_ready()?;

        let config = &self.ctx.config;
        let span = tracing::info_span!("git_pull", remote = %config.log().field(config.remote()));
        async {
            let fs = SandboxFs::new(self.ctx.sandbox.clone());
            let dir = fs.workdir().to_string();
            let key = format!("remote.{}.url", config.remote());

            let url = match self.ctx.engine.get_config(&fs, &dir, &key).await {
                Ok(Some(url)) if !url.trim().is_empty() => url,
                Ok(_) => {
                    let e = Error::NoRemote;
                    tracing::warn!("pull without a configured remote");
                    self.report_failure("Pull", &e);
                    return Err(e);
                }
                Err(e) => {
                    log_failure("pull", &e);
                    self.report_failure("Pull", &e);
                    return Err(e);
                }
            };
            if let Err(e) = config.check_remote(&url) {
                self.report_failure("Pull", &e);
                return Err(e);
            }

            let http = ProxiedTransport::new(
                self.ctx.transport.as_ref(),
                config.cors_proxy_endpoint(),
                config.log(),
            );
            let negotiator = self.ctx.negotiator();
            let cached = self.ctx.credentials.lookup(&url);
            let request = PullRequest {
                dir,
                url: url.clone(),
                remote: config.remote().to_string(),
                single_branch: config.is_single_branch(),
                headers: auth_headers(cached.as_ref(), config.user_agent_value()),
                author: config.commit_author(),
            };

            tracing::info!(url = %config.log().redact_url(&url), "pull started");
            let io = EngineIo {
                fs: &fs,
                http: &http,
                auth: &negotiator,
            };
            match self.ctx.engine.pull(io, request).await {
                Ok(()) => {
                    tracing::info!("pull finished");
                    self.ctx
                        .notifier
                        .notify(Notice::success("Pulled latest changes"));
                    Ok(())
                }
                Err(e) => {
                    log_failure("pull", &e);
                    self.report_failure("Pull", &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    fn report_failure(&self, operation: &str, error: &Error) {
        let notice = if error.is_cancelled() {
            Notice::info(format!("{} cancelled", operation))
        } else {
            Notice::error(format!("{} failed: {}", operation, error))
        };
        self.ctx.notifier.notify(notice);
    }
}

fn log_failure(operation: &str, error: &Error) {
    if error.is_cancelled() {
        tracing::info!(operation, "cancelled by user");
    } else {
        tracing::error!(operation, error = %error, "operation failed");
    }
}
