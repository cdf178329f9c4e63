//! Sandbox-backed implementation of the engine filesystem contract.
//!
//! [`SandboxFs`] translates every engine call into a sandbox call on a path
//! relative to the sandbox workdir, and emulates what the sandbox lacks:
//!
//! | Call | Emulation |
//! |------|-----------|
//! | `stat` / `lstat` | Parent listing lookup, synthesized metadata |
//! | `readlink` | Always `EINVAL` |
//! | `symlink` | Always `EPERM` |
//! | `chmod` | Accepted and ignored |
//! | `mkdir` | Always recursive |
//!
//! When built with [`SandboxFs::with_ledger`], every successful
//! `write_file` is recorded so the caller can import the written tree.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use super::error::FsError;
use super::ledger::WriteLedger;
use super::options::{FileData, MkdirOptions, ReadDirOptions, ReadOptions, RmOptions, WriteOptions};
use super::traits::{FileKind, GitFs, ReadDirOutput, Stat};
use crate::error::Result;
use crate::path;
use crate::sandbox::SandboxHandle;

/// Mode reported for every entry; the sandbox has no permission bits.
pub const SYNTHETIC_MODE: u32 = 0o666;
/// Owner reported for every entry.
pub const SYNTHETIC_UID: u32 = 1000;
/// Group reported for every entry.
pub const SYNTHETIC_GID: u32 = 1000;

/// Filesystem adapter over a sandbox handle.
pub struct SandboxFs {
    sandbox: SandboxHandle,
    ledger: Option<Mutex<WriteLedger>>,
}

impl SandboxFs {
    /// Adapter that does not record writes.
    pub fn new(sandbox: SandboxHandle) -> Self {
        Self {
            sandbox,
            ledger: None,
        }
    }

    /// Adapter that records every write into a fresh ledger.
    pub fn with_ledger(sandbox: SandboxHandle) -> Self {
        Self {
            sandbox,
            ledger: Some(Mutex::new(WriteLedger::new())),
        }
    }

    /// Working directory of the underlying sandbox.
    pub fn workdir(&self) -> &str {
        self.sandbox.workdir()
    }

    /// Translate an engine path into a sandbox path.
    pub fn relative_path(&self, path: &str) -> String {
        path::to_relative(self.sandbox.workdir(), path)
    }

    /// Copy of the ledger recorded so far, if this adapter records writes.
    pub fn ledger_snapshot(&self) -> Option<WriteLedger> {
        self.ledger
            .as_ref()
            .map(|l| l.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    /// Consume the adapter, returning the ledger (empty when not recording).
    pub fn into_ledger(self) -> WriteLedger {
        self.ledger
            .map(|l| l.into_inner().unwrap_or_else(PoisonError::into_inner))
            .unwrap_or_default()
    }

    async fn synthesize_stat(&self, path: &str) -> Result<Stat> {
        let rel = self.relative_path(path);

        let kind = if rel == "." {
            FileKind::Directory
        } else {
            let parent = path::dirname(&rel);
            let name = path::basename(&rel, None);
            let listing = self
                .sandbox
                .read_dir(&parent, ReadDirOptions::with_file_types())
                .await
                .map_err(|_| FsError::enoent("stat", path))?;
            listing
                .find(&name)
                .ok_or_else(|| FsError::enoent("stat", path))?
                .kind
        };

        // Listings carry no sizes. Reading the file is the only way to learn
        // it; a failed read reports zero rather than failing the stat.
        let size = if kind.is_file() {
            match self.sandbox.read(&rel, None).await {
                Ok(data) => data.len() as u64,
                Err(_) => 0,
            }
        } else {
            0
        };

        let now = chrono::Utc::now();
        Ok(Stat {
            kind,
            size,
            mode: SYNTHETIC_MODE,
            mtime: now,
            ctime: now,
            uid: SYNTHETIC_UID,
            gid: SYNTHETIC_GID,
            ino: 0,
            dev: 0,
        })
    }
}

#[async_trait]
impl GitFs for SandboxFs {
    async fn read_file(&self, path: &str, opts: ReadOptions) -> Result<FileData> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, encoding = ?opts.encoding, "read_file");
        self.sandbox.read(&rel, opts.encoding).await
    }

    async fn write_file(&self, path: &str, data: FileData, opts: WriteOptions) -> Result<()> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, bytes = data.len(), "write_file");
        self.sandbox.write(&rel, &data, opts).await?;

        if let Some(ledger) = &self.ledger {
            ledger
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(rel, data, opts.encoding);
        }
        Ok(())
    }

    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> Result<()> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, "mkdir");
        // Engines create nested directories without ensuring parents exist
        let opts = MkdirOptions {
            recursive: true,
            ..opts
        };
        self.sandbox.mkdir(&rel, opts).await
    }

    async fn readdir(&self, path: &str, opts: ReadDirOptions) -> Result<ReadDirOutput> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, with_file_types = opts.with_file_types, "readdir");
        self.sandbox.read_dir(&rel, opts).await
    }

    async fn rm(&self, path: &str, opts: RmOptions) -> Result<()> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, recursive = opts.recursive, "rm");
        self.sandbox.remove(&rel, opts).await
    }

    async fn rmdir(&self, path: &str, opts: RmOptions) -> Result<()> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, "rmdir");
        let opts = RmOptions {
            recursive: true,
            ..opts
        };
        self.sandbox.remove(&rel, opts).await
    }

    async fn unlink(&self, path: &str) -> Result<()> {
        let rel = self.relative_path(path);
        tracing::debug!(path = %rel, "unlink");
        self.sandbox.remove(&rel, RmOptions::default()).await
    }

    async fn stat(&self, path: &str) -> Result<Stat> {
        self.synthesize_stat(path).await
    }

    async fn lstat(&self, path: &str) -> Result<Stat> {
        // No links in the sandbox, so lstat and stat agree
        self.stat(path).await
    }

    async fn readlink(&self, path: &str) -> Result<String> {
        Err(FsError::einval("readlink", path).into())
    }

    async fn symlink(&self, _target: &str, path: &str) -> Result<()> {
        Err(FsError::eperm("symlink", path).into())
    }

    async fn chmod(&self, _path: &str, _mode: u32) -> Result<()> {
        Ok(())
    }
}
