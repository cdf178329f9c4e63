//! Application-wide collaborators, wired once at startup.

use std::sync::Arc;

use crate::auth::{AuthNegotiator, CredentialPrompter, NoPrompt};
use crate::config::BridgeConfig;
use crate::credentials::{CredentialCache, CredentialStore, MemoryStore};
use crate::engine::{GitEngine, HttpTransport};
use crate::notify::{LogNotifier, Notifier};
use crate::sandbox::SandboxHandle;

/// Everything an operation needs: the sandbox, the protocol engine, the
/// HTTP transport, the credential cache, the user-facing prompt and notice
/// sinks, and configuration.
///
/// Cheap to clone; every collaborator is shared.
#[derive(Clone)]
pub struct GitContext {
    pub(crate) sandbox: SandboxHandle,
    pub(crate) engine: Arc<dyn GitEngine>,
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) credentials: CredentialCache,
    pub(crate) prompter: Arc<dyn CredentialPrompter>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) config: BridgeConfig,
}

impl GitContext {
    /// Start building a context around the three required collaborators.
    pub fn builder(
        sandbox: SandboxHandle,
        engine: Arc<dyn GitEngine>,
        transport: Arc<dyn HttpTransport>,
    ) -> GitContextBuilder {
        GitContextBuilder {
            sandbox,
            engine,
            transport,
            store: None,
            prompter: None,
            notifier: None,
            config: BridgeConfig::default(),
        }
    }

    pub fn sandbox(&self) -> &SandboxHandle {
        &self.sandbox
    }

    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Fresh negotiator for one operation.
    pub(crate) fn negotiator(&self) -> AuthNegotiator {
        AuthNegotiator::new(
            self.credentials.clone(),
            Arc::clone(&self.prompter),
            Arc::clone(&self.notifier),
        )
    }
}

/// Builder for [`GitContext`].
///
/// Defaults: in-memory credential store, a prompter that always declines,
/// notices sent to the log, [`BridgeConfig::default`].
pub struct GitContextBuilder {
    sandbox: SandboxHandle,
    engine: Arc<dyn GitEngine>,
    transport: Arc<dyn HttpTransport>,
    store: Option<Arc<dyn CredentialStore>>,
    prompter: Option<Arc<dyn CredentialPrompter>>,
    notifier: Option<Arc<dyn Notifier>>,
    config: BridgeConfig,
}

impl GitContextBuilder {
    /// Set the persisted credential store.
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the interactive credential prompt.
    pub fn prompter(mut self, prompter: Arc<dyn CredentialPrompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the context.
    pub fn build(self) -> GitContext {
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        GitContext {
            sandbox: self.sandbox,
            engine: self.engine,
            transport: self.transport,
            credentials: CredentialCache::new(store),
            prompter: self.prompter.unwrap_or_else(|| Arc::new(NoPrompt)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            config: self.config,
        }
    }
}
