//! Sandgit - git clone, push and pull for browser-sandboxed projects
//!
//! A pure-language git protocol engine expects a POSIX filesystem, an HTTP
//! client and a credential callback protocol. Sandgit supplies all three on
//! top of a sandbox that offers only a handful of relative-path file
//! operations:
//!
//! - [`SandboxFs`]: POSIX-style filesystem over a [`Sandbox`], with
//!   synthesized `stat`, Node-shaped errors and a write ledger
//! - [`AuthNegotiator`]: credential cache first, interactive prompt second
//! - [`Orchestrator`]: clone / push / pull through a CORS proxy
//! - [`path`]: `dirname` / `basename` / `relative` on plain strings
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sandgit::{BridgeConfig, ChannelPrompter, GitContext, InMemorySandbox, Orchestrator};
//!
//! # async fn run(engine: Arc<dyn sandgit::GitEngine>, http: Arc<dyn sandgit::HttpTransport>) -> sandgit::Result<()> {
//! let sandbox = Arc::new(InMemorySandbox::new("/home/project"));
//! let (prompter, mut requests) = ChannelPrompter::new(1);
//!
//! // The UI answers credential prompts
//! tokio::spawn(async move {
//!     while let Some(request) = requests.recv().await {
//!         request.respond_with("alice", "secret");
//!     }
//! });
//!
//! let ctx = GitContext::builder(sandbox, engine, http)
//!     .prompter(Arc::new(prompter))
//!     .config(BridgeConfig::new().author("Alice", "alice@example.com"))
//!     .build();
//!
//! let git = Orchestrator::new(ctx);
//! let outcome = git.clone("https://example.com/org/repo.git").await?;
//! for (path, entry) in outcome.worktree_files() {
//!     println!("{} ({} bytes)", path, entry.data.len());
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod context;
mod credentials;
pub mod engine;
mod error;
pub mod fs;
pub mod logging_impl;
pub mod network;
mod notify;
mod orchestrator;
pub mod path;
pub mod proxy;
pub mod sandbox;

pub use auth::{
    AuthNegotiator, AuthOutcome, ChannelPrompter, CredentialPrompter, CredentialRequest,
    NoPrompt, auth_headers, basic_auth_value,
};
pub use config::{
    BridgeConfig, DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_CLONE_DEPTH, DEFAULT_REMOTE,
};
pub use context::{GitContext, GitContextBuilder};
pub use credentials::{
    Credential, CredentialCache, CredentialStore, JsonFileStore, KEY_PREFIX, MemoryStore,
    cache_key, host_of,
};
pub use engine::{
    AuthCallbacks, Author, CloneRequest, EngineIo, GitEngine, HttpMethod, HttpRequest,
    HttpResponse, HttpTransport, PullRequest, PushRequest,
};
pub use error::{Error, Result};
pub use fs::{FsError, GitFs, LedgerEntry, SandboxFs, WriteLedger};
pub use notify::{CollectingNotifier, LogNotifier, Notice, NoticeLevel, Notifier};
pub use orchestrator::{CloneOutcome, Orchestrator};
pub use proxy::{CorsProxy, ProxiedTransport};
pub use sandbox::{InMemorySandbox, Sandbox, SandboxHandle};

#[cfg(feature = "http_client")]
pub use network::ProxyHttpClient;

/// Re-exported so engine and sandbox implementations can use the same
/// attribute without a direct dependency.
pub use async_trait::async_trait;
