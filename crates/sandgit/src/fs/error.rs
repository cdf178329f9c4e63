//! POSIX-shaped filesystem errors.
//!
//! Git engines branch on `code` (and sometimes `errno`) to tell a missing
//! file from a real failure, so every error the adapter synthesizes carries
//! the same fields Node's `fs` errors do.

use thiserror::Error;

/// Filesystem error with Node-compatible fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FsError {
    /// Symbolic code, e.g. `ENOENT`.
    pub code: &'static str,
    /// Negative errno as libuv reports it.
    pub errno: i32,
    /// Name of the failing call.
    pub syscall: &'static str,
    /// Path as the caller passed it.
    pub path: String,
    /// `"<CODE>: <description>, <syscall> '<path>'"`.
    pub message: String,
}

impl FsError {
    fn new(
        code: &'static str,
        errno: i32,
        description: &str,
        syscall: &'static str,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let message = format!("{}: {}, {} '{}'", code, description, syscall, path);
        Self {
            code,
            errno,
            syscall,
            path,
            message,
        }
    }

    pub fn enoent(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("ENOENT", -2, "no such file or directory", syscall, path)
    }

    pub fn eperm(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("EPERM", -1, "operation not permitted", syscall, path)
    }

    pub fn einval(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("EINVAL", -22, "invalid argument", syscall, path)
    }

    pub fn eexist(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("EEXIST", -17, "file already exists", syscall, path)
    }

    pub fn enotdir(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("ENOTDIR", -20, "not a directory", syscall, path)
    }

    pub fn eisdir(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("EISDIR", -21, "illegal operation on a directory", syscall, path)
    }

    pub fn enotempty(syscall: &'static str, path: impl Into<String>) -> Self {
        Self::new("ENOTEMPTY", -39, "directory not empty", syscall, path)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == "ENOENT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enoent_shape() {
        let err = FsError::enoent("stat", "/repo/.git/HEAD");
        assert_eq!(err.code, "ENOENT");
        assert_eq!(err.errno, -2);
        assert_eq!(err.syscall, "stat");
        assert_eq!(err.path, "/repo/.git/HEAD");
        assert_eq!(
            err.to_string(),
            "ENOENT: no such file or directory, stat '/repo/.git/HEAD'"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_link_errors() {
        let err = FsError::einval("readlink", "a");
        assert_eq!((err.code, err.errno), ("EINVAL", -22));
        assert_eq!(err.to_string(), "EINVAL: invalid argument, readlink 'a'");

        let err = FsError::eperm("symlink", "b");
        assert_eq!((err.code, err.errno), ("EPERM", -1));
        assert!(!err.is_not_found());
    }
}
