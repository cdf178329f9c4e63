//! Credential cache for remote hosts
//!
//! Credentials are persisted under `git:<host>` as JSON
//! `{"username": .., "password": ..}` in a [`CredentialStore`].

mod cache;
mod store;

pub use cache::{Credential, CredentialCache, KEY_PREFIX, cache_key, host_of};
pub use store::{CredentialStore, JsonFileStore, MemoryStore};
