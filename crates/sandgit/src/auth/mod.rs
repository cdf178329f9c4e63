//! Authentication negotiation for remote operations
//!
//! The engine calls three hooks during any authenticated request:
//! - `on_auth`: supply credentials (cache first, then prompt)
//! - `on_auth_failure`: tell the user, do not retry
//! - `on_auth_success`: cache the credential for the host
//!
//! For clone and pull, [`auth_headers`] also attaches any cached credential
//! up front so the first request is already authenticated.

mod negotiator;
mod prompt;

pub use negotiator::AuthNegotiator;
pub use prompt::{ChannelPrompter, CredentialPrompter, CredentialRequest, NoPrompt};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::credentials::Credential;

/// Answer to an authentication request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Credentials(Credential),
    /// The user declined; the engine aborts instead of retrying.
    Cancelled,
}

impl AuthOutcome {
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            AuthOutcome::Credentials(c) => Some(c),
            AuthOutcome::Cancelled => None,
        }
    }
}

/// `Basic base64(username:password)`.
pub fn basic_auth_value(credential: &Credential) -> String {
    let raw = format!("{}:{}", credential.username, credential.password);
    format!("Basic {}", BASE64.encode(raw))
}

/// Headers for the first request: client identifier, plus `Authorization`
/// when a credential is cached.
pub fn auth_headers(cached: Option<&Credential>, user_agent: &str) -> Vec<(String, String)> {
    let mut headers = vec![("User-Agent".to_string(), user_agent.to_string())];
    if let Some(credential) = cached {
        headers.push(("Authorization".to_string(), basic_auth_value(credential)));
    }
    headers
}
