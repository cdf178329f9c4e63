//! Boundary to the git protocol engine.
//!
//! The engine (a pure-language implementation of the smart-HTTP protocol)
//! is consumed through [`GitEngine`]. Every call receives the three
//! collaborators it drives, bundled in [`EngineIo`]:
//!
//! ```text
//! Orchestrator ──► GitEngine ──► GitFs          (SandboxFs → sandbox)
//!                            ├─► HttpTransport  (ProxiedTransport → proxy)
//!                            └─► AuthCallbacks  (AuthNegotiator → cache/prompt)
//! ```

mod transport;

pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

use async_trait::async_trait;

use crate::auth::AuthOutcome;
use crate::credentials::Credential;
use crate::error::Result;
use crate::fs::GitFs;

/// Authentication hooks the engine invokes around authenticated requests.
#[async_trait]
pub trait AuthCallbacks: Send + Sync {
    /// Credentials are needed for `url`.
    async fn on_auth(&self, url: &str) -> AuthOutcome;

    /// The remote rejected `attempted`. Returning
    /// [`AuthOutcome::Credentials`] asks the engine to retry with them.
    async fn on_auth_failure(&self, url: &str, attempted: &Credential) -> AuthOutcome;

    /// The remote accepted `credential`.
    async fn on_auth_success(&self, url: &str, credential: &Credential);
}

/// Collaborators handed to the engine for one call.
#[derive(Clone, Copy)]
pub struct EngineIo<'a> {
    pub fs: &'a dyn GitFs,
    pub http: &'a dyn HttpTransport,
    pub auth: &'a dyn AuthCallbacks,
}

/// Commit author for operations that may create merge commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Engine clone call.
#[derive(Debug, Clone)]
pub struct CloneRequest {
    /// Absolute directory to clone into.
    pub dir: String,
    pub url: String,
    /// Shallow clone depth; full history when `None`.
    pub depth: Option<u32>,
    pub single_branch: bool,
    /// Headers attached to every request.
    pub headers: Vec<(String, String)>,
}

/// Engine push call.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub dir: String,
    /// Remote name, e.g. `origin`.
    pub remote: String,
    /// Branch to push.
    pub branch: String,
    pub headers: Vec<(String, String)>,
}

/// Engine pull call.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub dir: String,
    pub url: String,
    pub remote: String,
    pub single_branch: bool,
    pub headers: Vec<(String, String)>,
    pub author: Author,
}

/// A git protocol engine operating on an injected filesystem and transport.
///
/// Engines report a declined credential prompt as
/// [`Error::Cancelled`](crate::Error::Cancelled) and a rejected credential
/// as [`Error::AuthFailed`](crate::Error::AuthFailed).
#[async_trait]
pub trait GitEngine: Send + Sync {
    async fn clone(&self, io: EngineIo<'_>, request: CloneRequest) -> Result<()>;

    async fn push(&self, io: EngineIo<'_>, request: PushRequest) -> Result<()>;

    async fn pull(&self, io: EngineIo<'_>, request: PullRequest) -> Result<()>;

    /// Read a value such as `remote.origin.url` from the repository config.
    async fn get_config(&self, fs: &dyn GitFs, dir: &str, path: &str) -> Result<Option<String>>;
}
