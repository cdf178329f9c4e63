//! In-memory sandbox implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use super::Sandbox;
use crate::error::Result;
use crate::fs::{
    Dirent, Encoding, FileData, FsError, MkdirOptions, ReadDirOptions, ReadDirOutput, RmOptions,
    WriteOptions,
};
use crate::path;

const ROOT: &str = ".";

/// In-memory sandbox.
///
/// Stores files and directories in a HashMap keyed by normalized relative
/// path, with `.` as the working directory. Like the browser sandboxes it
/// stands in for, it has no symlinks and no permission bits.
pub struct InMemorySandbox {
    workdir: String,
    ready: AtomicBool,
    entries: RwLock<HashMap<String, Entry>>,
}

#[derive(Debug, Clone)]
enum Entry {
    File { content: Vec<u8> },
    Directory,
}

impl InMemorySandbox {
    /// Create a ready sandbox rooted at `workdir`.
    pub fn new(workdir: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(ROOT.to_string(), Entry::Directory);
        Self {
            workdir: workdir.into(),
            ready: AtomicBool::new(true),
            entries: RwLock::new(entries),
        }
    }

    /// Mark the sandbox as booted or not.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Seed a file, creating parent directories.
    pub fn with_file(self, path: &str, content: impl AsRef<[u8]>) -> Self {
        if let Some(key) = normalize(path) {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            create_dirs(&mut entries, &path::dirname(&key));
            entries.insert(
                key,
                Entry::File {
                    content: content.as_ref().to_vec(),
                },
            );
        }
        self
    }

    /// Raw contents of a file, if present.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        let key = normalize(path)?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&key) {
            Some(Entry::File { content }) => Some(content.clone()),
            _ => None,
        }
    }

    /// Whether anything exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        normalize(path).is_some_and(|key| {
            self.entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&key)
        })
    }
}

/// Normalize a relative path to a map key. Paths that climb above the
/// working directory have no key.
fn normalize(path: &str) -> Option<String> {
    let mut stack: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }
    if stack.is_empty() {
        Some(ROOT.to_string())
    } else {
        Some(stack.join("/"))
    }
}

fn create_dirs(entries: &mut HashMap<String, Entry>, dir: &str) {
    if dir == ROOT || entries.contains_key(dir) {
        return;
    }
    create_dirs(entries, &path::dirname(dir));
    entries.insert(dir.to_string(), Entry::Directory);
}

fn is_child_of(key: &str, dir: &str) -> bool {
    key != ROOT && path::dirname(key) == dir
}

fn is_descendant_of(key: &str, dir: &str) -> bool {
    if dir == ROOT {
        key != ROOT
    } else {
        key.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
    }
}

#[async_trait]
impl Sandbox for InMemorySandbox {
    fn workdir(&self) -> &str {
        &self.workdir
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn read(&self, path: &str, encoding: Option<Encoding>) -> Result<FileData> {
        let key = normalize(path).ok_or_else(|| FsError::enoent("open", path))?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(Entry::File { content }) => match encoding {
                Some(encoding) => Ok(FileData::Text(encoding.decode(content)?)),
                None => Ok(FileData::Bytes(content.clone())),
            },
            Some(Entry::Directory) => Err(FsError::eisdir("read", path).into()),
            None => Err(FsError::enoent("open", path).into()),
        }
    }

    async fn write(&self, path: &str, data: &FileData, opts: WriteOptions) -> Result<()> {
        let key = normalize(path).ok_or_else(|| FsError::enoent("open", path))?;
        let content = data.to_bytes(opts.encoding)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&path::dirname(&key)) {
            Some(Entry::Directory) => {}
            Some(Entry::File { .. }) => return Err(FsError::enotdir("open", path).into()),
            None => return Err(FsError::enoent("open", path).into()),
        }
        if let Some(Entry::Directory) = entries.get(&key) {
            return Err(FsError::eisdir("open", path).into());
        }

        entries.insert(key, Entry::File { content });
        Ok(())
    }

    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> Result<()> {
        let key = normalize(path).ok_or_else(|| FsError::enoent("mkdir", path))?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(Entry::Directory) if opts.recursive => return Ok(()),
            Some(_) => return Err(FsError::eexist("mkdir", path).into()),
            None => {}
        }

        if opts.recursive {
            // Any file along the way blocks creation
            let mut current = String::new();
            for seg in key.split('/') {
                if !current.is_empty() {
                    current.push('/');
                }
                current.push_str(seg);
                if let Some(Entry::File { .. }) = entries.get(&current) {
                    return Err(FsError::enotdir("mkdir", path).into());
                }
            }
            create_dirs(&mut entries, &key);
        } else {
            match entries.get(&path::dirname(&key)) {
                Some(Entry::Directory) => {}
                Some(Entry::File { .. }) => return Err(FsError::enotdir("mkdir", path).into()),
                None => return Err(FsError::enoent("mkdir", path).into()),
            }
            entries.insert(key, Entry::Directory);
        }
        Ok(())
    }

    async fn read_dir(&self, path: &str, opts: ReadDirOptions) -> Result<ReadDirOutput> {
        let key = normalize(path).ok_or_else(|| FsError::enoent("scandir", path))?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(Entry::Directory) => {}
            Some(Entry::File { .. }) => return Err(FsError::enotdir("scandir", path).into()),
            None => return Err(FsError::enoent("scandir", path).into()),
        }

        let mut children: Vec<Dirent> = entries
            .iter()
            .filter(|(k, _)| is_child_of(k, &key))
            .map(|(k, entry)| {
                let name = path::basename(k, None);
                match entry {
                    Entry::File { .. } => Dirent::file(name),
                    Entry::Directory => Dirent::dir(name),
                }
            })
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        if opts.with_file_types {
            Ok(ReadDirOutput::Entries(children))
        } else {
            Ok(ReadDirOutput::Names(
                children.into_iter().map(|d| d.name).collect(),
            ))
        }
    }

    async fn remove(&self, path: &str, opts: RmOptions) -> Result<()> {
        let key = normalize(path).ok_or_else(|| FsError::enoent("rm", path))?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            None if opts.force => return Ok(()),
            None => return Err(FsError::enoent("rm", path).into()),
            Some(Entry::File { .. }) => {
                entries.remove(&key);
                return Ok(());
            }
            Some(Entry::Directory) => {}
        }

        let has_children = entries.keys().any(|k| is_descendant_of(k, &key));
        if has_children && !opts.recursive {
            return Err(FsError::enotempty("rm", path).into());
        }
        entries.retain(|k, _| !is_descendant_of(k, &key));
        // The working directory itself survives a recursive wipe
        if key != ROOT {
            entries.remove(&key);
        }
        Ok(())
    }
}
