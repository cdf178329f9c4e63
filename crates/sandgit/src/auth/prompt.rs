//! Interactive credential prompts as a suspension point.
//!
//! There is no blocking prompt primitive in a browser sandbox. Instead the
//! negotiator raises a [`CredentialRequest`] and waits; the host resolves it
//! with credentials or a cancellation whenever the user answers.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::AuthOutcome;
use crate::credentials::Credential;

/// Source of credentials when none are cached.
#[async_trait]
pub trait CredentialPrompter: Send + Sync {
    /// Ask the user for credentials for `host`. May wait indefinitely.
    async fn prompt(&self, host: &str) -> AuthOutcome;
}

/// Prompter for headless hosts: every prompt is declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

#[async_trait]
impl CredentialPrompter for NoPrompt {
    async fn prompt(&self, _host: &str) -> AuthOutcome {
        AuthOutcome::Cancelled
    }
}

/// A pending "need credentials for host H" effect.
///
/// Resolve it with [`respond`](Self::respond) or [`cancel`](Self::cancel).
/// Dropping it unresolved cancels.
#[derive(Debug)]
pub struct CredentialRequest {
    host: String,
    responder: oneshot::Sender<AuthOutcome>,
}

impl CredentialRequest {
    /// Host the credentials are for. Safe to display.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn respond(self, credential: Credential) {
        // The waiting operation may have gone away; nothing to do then
        let _ = self
            .responder
            .send(AuthOutcome::Credentials(credential));
    }

    pub fn respond_with(self, username: impl Into<String>, password: impl Into<String>) {
        self.respond(Credential::new(username, password));
    }

    pub fn cancel(self) {
        let _ = self.responder.send(AuthOutcome::Cancelled);
    }
}

/// Prompter that hands each prompt to the host as a [`CredentialRequest`]
/// on a channel.
#[derive(Debug, Clone)]
pub struct ChannelPrompter {
    requests: mpsc::Sender<CredentialRequest>,
}

impl ChannelPrompter {
    /// Create a prompter and the receiver the host UI listens on.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<CredentialRequest>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { requests: tx }, rx)
    }
}

#[async_trait]
impl CredentialPrompter for ChannelPrompter {
    async fn prompt(&self, host: &str) -> AuthOutcome {
        let (responder, answer) = oneshot::channel();
        let request = CredentialRequest {
            host: host.to_string(),
            responder,
        };
        if self.requests.send(request).await.is_err() {
            tracing::warn!(host = %host, "no prompt listener; cancelling authentication");
            return AuthOutcome::Cancelled;
        }
        answer.await.unwrap_or(AuthOutcome::Cancelled)
    }
}
