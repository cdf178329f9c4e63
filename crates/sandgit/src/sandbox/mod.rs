//! Sandbox filesystem boundary.
//!
//! The sandboxed execution environment is consumed as a black box through a
//! fixed operation set. Every path crossing this boundary is relative to the
//! sandbox working directory; absolute paths never pass through.
//!
//! - [`Sandbox`]: the operation set a host environment implements
//! - [`InMemorySandbox`]: in-process implementation for tests and embedding

mod memory;

pub use memory::InMemorySandbox;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::fs::{Encoding, FileData, MkdirOptions, ReadDirOptions, ReadDirOutput, RmOptions, WriteOptions};

/// Shared handle to a sandbox. Owned by the host application; operations
/// borrow a clone for their duration.
pub type SandboxHandle = Arc<dyn Sandbox>;

/// Operation set exposed by a sandboxed execution environment.
///
/// `path` arguments are relative to [`Sandbox::workdir`] and never start
/// with `/`.
#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Absolute path of the working directory inside the sandbox.
    fn workdir(&self) -> &str;

    /// Whether the sandbox has booted and accepts filesystem calls.
    fn is_ready(&self) -> bool {
        true
    }

    /// Read a file; decode to text when `encoding` is given.
    async fn read(&self, path: &str, encoding: Option<Encoding>) -> Result<FileData>;

    /// Create or replace a file.
    async fn write(&self, path: &str, data: &FileData, opts: WriteOptions) -> Result<()>;

    /// Create a directory.
    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> Result<()>;

    /// List a directory.
    async fn read_dir(&self, path: &str, opts: ReadDirOptions) -> Result<ReadDirOutput>;

    /// Remove a file or directory.
    async fn remove(&self, path: &str, opts: RmOptions) -> Result<()>;
}
