//! Filesystem contract for the git protocol engine
//!
//! Provides the engine-facing filesystem trait and its sandbox adapter:
//! - `GitFs`: POSIX-style operations the engine calls
//! - `SandboxFs`: `GitFs` over a sandbox handle, with a write ledger
//! - `FsError`: Node-shaped error codes for emulated failures
//!
//! ```
//! use std::sync::Arc;
//! use sandgit::fs::{FileData, GitFs, MkdirOptions, SandboxFs, WriteOptions};
//! use sandgit::InMemorySandbox;
//!
//! # tokio_test::block_on(async {
//! let fs = SandboxFs::with_ledger(Arc::new(InMemorySandbox::new("/home/project")));
//!
//! fs.mkdir("/home/project/src", MkdirOptions::default()).await.unwrap();
//! fs.write_file("/home/project/src/main.rs", FileData::from("fn main() {}"), WriteOptions::default())
//!     .await
//!     .unwrap();
//!
//! let stat = fs.stat("/home/project/src/main.rs").await.unwrap();
//! assert!(stat.is_file());
//! assert_eq!(stat.size, 12);
//!
//! // Emulated failures carry Node-style codes
//! let err = fs.readlink("/home/project/src/main.rs").await.unwrap_err();
//! assert_eq!(err.fs_code(), Some("EINVAL"));
//!
//! let ledger = fs.into_ledger();
//! assert!(ledger.get("src/main.rs").is_some());
//! # });
//! ```

mod adapter;
mod error;
mod ledger;
mod options;
mod traits;

pub use adapter::{SYNTHETIC_GID, SYNTHETIC_MODE, SYNTHETIC_UID, SandboxFs};
pub use error::FsError;
pub use ledger::{LedgerEntry, WriteLedger};
pub use options::{
    Encoding, FileData, MkdirOptions, ReadDirOptions, ReadOptions, RmOptions, WriteOptions,
    parse_options,
};
pub use traits::{Dirent, FileKind, GitFs, ReadDirOutput, Stat};
