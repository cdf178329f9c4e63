//! Write ledger: which files a clone wrote, and with what content.
//!
//! The host imports the cloned tree from the ledger rather than walking the
//! sandbox afterwards. Only the latest write per path is kept.

use serde::Serialize;
use std::collections::BTreeMap;

use super::options::{Encoding, FileData};

/// Content recorded for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub data: FileData,
    pub encoding: Option<Encoding>,
}

/// Record of writes keyed by path relative to the sandbox workdir.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WriteLedger {
    entries: BTreeMap<String, LedgerEntry>,
}

impl WriteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write, replacing any earlier entry for `path`.
    pub fn record(&mut self, path: impl Into<String>, data: FileData, encoding: Option<Encoding>) {
        self.entries
            .insert(path.into(), LedgerEntry { data, encoding });
    }

    pub fn get(&self, path: &str) -> Option<&LedgerEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Paths outside `.git/`, i.e. the checked-out working tree.
    pub fn worktree(&self) -> impl Iterator<Item = (&str, &LedgerEntry)> {
        self.entries
            .iter()
            .filter(|(path, _)| *path != ".git" && !path.starts_with(".git/"))
            .map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn into_entries(self) -> BTreeMap<String, LedgerEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_later_write_replaces_earlier() {
        let mut ledger = WriteLedger::new();
        ledger.record("src/main.rs", FileData::from("v1"), None);
        ledger.record("src/main.rs", FileData::from("v2"), Some(Encoding::Utf8));

        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.get("src/main.rs"),
            Some(&LedgerEntry {
                data: FileData::from("v2"),
                encoding: Some(Encoding::Utf8),
            })
        );
    }

    #[test]
    fn test_worktree_skips_git_dir() {
        let mut ledger = WriteLedger::new();
        ledger.record(".git/HEAD", FileData::from("ref: refs/heads/main\n"), None);
        ledger.record(".gitignore", FileData::from("target\n"), None);
        ledger.record("README.md", FileData::from("# hi\n"), None);

        let paths: Vec<&str> = ledger.worktree().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![".gitignore", "README.md"]);
        assert_eq!(ledger.paths().count(), 3);
    }

    #[test]
    fn test_serializes_as_path_map() {
        let mut ledger = WriteLedger::new();
        ledger.record("a.txt", FileData::from("hello"), Some(Encoding::Utf8));
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "a.txt": { "data": "hello", "encoding": "utf8" } })
        );
    }
}
