//! Filesystem trait definitions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::options::{FileData, MkdirOptions, ReadDirOptions, ReadOptions, RmOptions, WriteOptions};
use crate::error::Result;

/// The POSIX-style filesystem contract a git protocol engine drives.
///
/// Paths are `/`-separated strings. Implementations decide how they map onto
/// storage; [`SandboxFs`](super::SandboxFs) maps them onto a sandbox with
/// no symlinks and no permission bits.
#[async_trait]
pub trait GitFs: Send + Sync {
    /// Read a file, decoded with `opts.encoding` when given.
    async fn read_file(&self, path: &str, opts: ReadOptions) -> Result<FileData>;

    /// Create or replace a file.
    async fn write_file(&self, path: &str, data: FileData, opts: WriteOptions) -> Result<()>;

    /// Create a directory.
    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> Result<()>;

    /// List a directory.
    async fn readdir(&self, path: &str, opts: ReadDirOptions) -> Result<ReadDirOutput>;

    /// Remove a file or directory.
    async fn rm(&self, path: &str, opts: RmOptions) -> Result<()>;

    /// Remove a directory.
    async fn rmdir(&self, path: &str, opts: RmOptions) -> Result<()>;

    /// Remove a file.
    async fn unlink(&self, path: &str) -> Result<()>;

    /// Get metadata, following links.
    async fn stat(&self, path: &str) -> Result<Stat>;

    /// Get metadata without following links.
    async fn lstat(&self, path: &str) -> Result<Stat>;

    /// Read a symbolic link's target.
    async fn readlink(&self, path: &str) -> Result<String>;

    /// Create a symbolic link at `path` pointing to `target`.
    async fn symlink(&self, target: &str, path: &str) -> Result<()>;

    /// Change permission bits.
    async fn chmod(&self, path: &str, mode: u32) -> Result<()>;
}

/// Entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
    Symlink,
}

impl FileKind {
    pub fn is_file(&self) -> bool {
        matches!(self, FileKind::File)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FileKind::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, FileKind::Symlink)
    }
}

/// Typed directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dirent {
    /// Entry name (not full path)
    pub name: String,
    pub kind: FileKind,
}

impl Dirent {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Directory,
        }
    }
}

/// Result of `readdir`: bare names, or typed entries when
/// `with_file_types` was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReadDirOutput {
    Names(Vec<String>),
    Entries(Vec<Dirent>),
}

impl ReadDirOutput {
    /// Entry names regardless of shape.
    pub fn names(&self) -> Vec<&str> {
        match self {
            ReadDirOutput::Names(names) => names.iter().map(String::as_str).collect(),
            ReadDirOutput::Entries(entries) => entries.iter().map(|e| e.name.as_str()).collect(),
        }
    }

    /// Find an entry by name. Bare-name listings carry no type, so a hit
    /// there is reported as a regular file.
    pub fn find(&self, name: &str) -> Option<Dirent> {
        match self {
            ReadDirOutput::Names(names) => names.iter().find(|n| *n == name).map(Dirent::file),
            ReadDirOutput::Entries(entries) => entries.iter().find(|e| e.name == name).cloned(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReadDirOutput::Names(names) => names.len(),
            ReadDirOutput::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// File metadata as returned by `stat`/`lstat`.
#[derive(Debug, Clone)]
pub struct Stat {
    pub kind: FileKind,
    /// File size in bytes
    pub size: u64,
    /// Unix mode bits
    pub mode: u32,
    pub mtime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
    pub uid: u32,
    pub gid: u32,
    pub ino: u64,
    pub dev: u64,
}

impl Stat {
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn is_symbolic_link(&self) -> bool {
        self.kind.is_symlink()
    }

    /// Modification time in milliseconds since the Unix epoch.
    pub fn mtime_ms(&self) -> i64 {
        self.mtime.timestamp_millis()
    }

    /// Change time in milliseconds since the Unix epoch.
    pub fn ctime_ms(&self) -> i64 {
        self.ctime.timestamp_millis()
    }
}
