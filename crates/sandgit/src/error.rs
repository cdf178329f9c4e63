//! Error types for Sandgit
//!
//! This module provides error types for the bridge with the following design goals:
//! - Human-readable error messages for users
//! - No leakage of credentials (URL userinfo, passwords, auth headers)
//! - Clear categorization for programmatic handling

use thiserror::Error;

use crate::fs::FsError;

/// Result type alias using Sandgit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Sandgit error types.
///
/// Messages are safe to show to end users. Anything derived from a remote URL
/// names the host only.
#[derive(Error, Debug)]
pub enum Error {
    /// The sandbox handle has not finished booting.
    #[error("sandbox not initialized")]
    NotInitialized,

    /// POSIX-shaped error synthesized by the filesystem adapter.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Error reported by the sandbox filesystem, passed through unchanged.
    #[error("sandbox error: {0}")]
    Sandbox(String),

    /// An options bag carried a key or value the adapter does not recognize.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The remote rejected the supplied credentials.
    #[error("authentication failed for {host}")]
    AuthFailed { host: String },

    /// The user declined to supply credentials.
    #[error("operation cancelled by user")]
    Cancelled,

    /// The local repository has no configured remote.
    #[error("no remote repository found")]
    NoRemote,

    /// The remote URL is not reachable through the proxy or is not allowed.
    #[error("invalid remote: {0}")]
    InvalidRemote(String),

    /// Failure reported by the protocol engine.
    #[error("git error: {0}")]
    Engine(String),

    /// Network error from the HTTP transport.
    #[error("network error: {0}")]
    Network(String),

    /// The credential store could not be read or written.
    #[error("credential store error: {0}")]
    Storage(String),

    /// I/O error from host-side storage.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a sandbox error from any displayable failure.
    pub fn sandbox(message: impl std::fmt::Display) -> Self {
        Self::Sandbox(message.to_string())
    }

    /// True when the error is a clean user-initiated abort.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// The POSIX error code, if this error came from the adapter.
    pub fn fs_code(&self) -> Option<&'static str> {
        match self {
            Error::Fs(e) => Some(e.code),
            _ => None,
        }
    }
}
