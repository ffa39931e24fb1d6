//! In-memory volume fake.
//!
//! Deterministic `Volume` implementation backed by a path-keyed node table.
//! Tests and benchmarks use it to run the full harness without touching the
//! host filesystem. Supports injected per-path failures and tracks how many
//! directory cursors are alive at once, so traversal tests can pin the
//! open-handle bound.

use super::{normalize, DirCursor, EntryKind, FileWrite, Volume, VolumeEntry};
use crate::error::VolumeError;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Directory,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct Shared {
    nodes: BTreeMap<String, Node>,
    mounted: bool,
    fail_mount: bool,
    fail_format: bool,
    fail_mkdir: BTreeSet<String>,
    fail_open: BTreeSet<String>,
    fail_read_dir: BTreeSet<String>,
    live_cursors: usize,
    max_live_cursors: usize,
}

impl Shared {
    fn ensure_mounted(&self) -> Result<(), VolumeError> {
        if self.mounted {
            Ok(())
        } else {
            Err(VolumeError::NotMounted)
        }
    }

    fn require_parent(&self, path: &str) -> Result<(), String> {
        let parent = match path.rfind('/') {
            Some(0) => "/",
            Some(split) => &path[..split],
            None => "/",
        };
        match self.nodes.get(parent) {
            Some(Node::Directory) => Ok(()),
            Some(Node::File(_)) => Err(format!("parent {} is not a directory", parent)),
            None => Err(format!("parent {} does not exist", parent)),
        }
    }

    fn children(&self, dir: &str) -> Vec<VolumeEntry> {
        let prefix = if dir == "/" {
            "/".to_string()
        } else {
            format!("{}/", dir)
        };
        self.nodes
            .iter()
            .filter(|(path, _)| {
                path.as_str() != dir
                    && path.starts_with(&prefix)
                    && !path[prefix.len()..].contains('/')
            })
            .map(|(path, node)| VolumeEntry {
                path: path.clone(),
                kind: match node {
                    Node::Directory => EntryKind::Directory,
                    Node::File(_) => EntryKind::File,
                },
            })
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryVolume {
    shared: Arc<RwLock<Shared>>,
}

impl MemoryVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ready-to-use volume: mounted with an empty root. Equivalent to
    /// `new` followed by `mount(true)`.
    pub fn mounted() -> Self {
        let volume = Self::new();
        {
            let mut shared = volume.shared.write();
            shared.mounted = true;
            shared.nodes.insert("/".to_string(), Node::Directory);
        }
        volume
    }

    /// Make the next `mount` call fail.
    pub fn fail_mount(&self) {
        self.shared.write().fail_mount = true;
    }

    /// Make the next `format` call fail.
    pub fn fail_format(&self) {
        self.shared.write().fail_format = true;
    }

    /// Make `mkdir` fail for `path`.
    pub fn fail_mkdir_on(&self, path: &str) {
        self.shared.write().fail_mkdir.insert(normalize(path));
    }

    /// Make `open_write` fail for `path`.
    pub fn fail_open_write_on(&self, path: &str) {
        self.shared.write().fail_open.insert(normalize(path));
    }

    /// Make `read_dir` fail for `path`.
    pub fn fail_read_dir_on(&self, path: &str) {
        self.shared.write().fail_read_dir.insert(normalize(path));
    }

    /// Number of files currently stored.
    pub fn count_files(&self) -> usize {
        self.shared
            .read()
            .nodes
            .values()
            .filter(|node| matches!(node, Node::File(_)))
            .count()
    }

    /// Number of directories currently stored, the root excluded.
    pub fn count_dirs(&self) -> usize {
        let shared = self.shared.read();
        shared
            .nodes
            .iter()
            .filter(|(path, node)| path.as_str() != "/" && matches!(node, Node::Directory))
            .count()
    }

    /// Whether `path` names an existing node.
    pub fn contains(&self, path: &str) -> bool {
        self.shared.read().nodes.contains_key(&normalize(path))
    }

    /// Every stored path in sorted order, the root excluded.
    pub fn paths(&self) -> Vec<String> {
        self.shared
            .read()
            .nodes
            .keys()
            .filter(|path| path.as_str() != "/")
            .cloned()
            .collect()
    }

    /// Highest number of directory cursors that were ever alive at once.
    pub fn max_live_cursors(&self) -> usize {
        self.shared.read().max_live_cursors
    }

    /// Directory cursors alive right now.
    pub fn live_cursors(&self) -> usize {
        self.shared.read().live_cursors
    }
}

impl Volume for MemoryVolume {
    fn mount(&mut self, _format_on_fail: bool) -> Result<(), VolumeError> {
        let mut shared = self.shared.write();
        if shared.fail_mount {
            return Err(VolumeError::Mount {
                reason: "injected failure".to_string(),
            });
        }
        shared.mounted = true;
        shared
            .nodes
            .entry("/".to_string())
            .or_insert(Node::Directory);
        Ok(())
    }

    fn format(&mut self) -> Result<(), VolumeError> {
        let mut shared = self.shared.write();
        shared.ensure_mounted().map_err(|_| VolumeError::Format {
            reason: "volume is not mounted".to_string(),
        })?;
        if shared.fail_format {
            return Err(VolumeError::Format {
                reason: "injected failure".to_string(),
            });
        }
        shared.nodes.clear();
        shared.nodes.insert("/".to_string(), Node::Directory);
        Ok(())
    }

    fn mkdir(&self, path: &str) -> Result<(), VolumeError> {
        let mut shared = self.shared.write();
        shared.ensure_mounted()?;
        let path = normalize(path);
        let fail = |reason: String| VolumeError::CreateDir {
            path: path.clone(),
            reason,
        };
        if shared.fail_mkdir.contains(&path) {
            return Err(fail("injected failure".to_string()));
        }
        if shared.nodes.contains_key(&path) {
            return Err(fail("already exists".to_string()));
        }
        shared.require_parent(&path).map_err(fail)?;
        shared.nodes.insert(path, Node::Directory);
        Ok(())
    }

    fn open_write(&self, path: &str) -> Result<Box<dyn FileWrite>, VolumeError> {
        let mut shared = self.shared.write();
        shared.ensure_mounted()?;
        let path = normalize(path);
        let fail = |reason: String| VolumeError::OpenFile {
            path: path.clone(),
            reason,
        };
        if shared.fail_open.contains(&path) {
            return Err(fail("injected failure".to_string()));
        }
        if matches!(shared.nodes.get(&path), Some(Node::Directory)) {
            return Err(fail("is a directory".to_string()));
        }
        shared.require_parent(&path).map_err(fail)?;
        shared.nodes.insert(path.clone(), Node::File(Vec::new()));
        Ok(Box::new(MemoryFile {
            shared: Arc::clone(&self.shared),
            path,
        }))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, VolumeError> {
        let shared = self.shared.read();
        shared.ensure_mounted()?;
        let path = normalize(path);
        match shared.nodes.get(&path) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Directory) => Err(VolumeError::Read {
                path,
                reason: "is a directory".to_string(),
            }),
            None => Err(VolumeError::NotFound { path }),
        }
    }

    fn read_dir(&self, path: &str) -> Result<Box<dyn DirCursor>, VolumeError> {
        let mut shared = self.shared.write();
        shared.ensure_mounted()?;
        let path = normalize(path);
        if shared.fail_read_dir.contains(&path) {
            return Err(VolumeError::ReadDir {
                path,
                reason: "injected failure".to_string(),
            });
        }
        let entries = match shared.nodes.get(&path) {
            Some(Node::Directory) => shared.children(&path),
            Some(Node::File(_)) => return Err(VolumeError::NotADirectory { path }),
            None => return Err(VolumeError::NotFound { path }),
        };
        shared.live_cursors += 1;
        shared.max_live_cursors = shared.max_live_cursors.max(shared.live_cursors);
        Ok(Box::new(MemoryCursor {
            shared: Arc::clone(&self.shared),
            entries,
            next: 0,
        }))
    }
}

struct MemoryFile {
    shared: Arc<RwLock<Shared>>,
    path: String,
}

impl FileWrite for MemoryFile {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), VolumeError> {
        let mut shared = self.shared.write();
        match shared.nodes.get_mut(&self.path) {
            Some(Node::File(content)) => {
                content.extend_from_slice(bytes);
                Ok(())
            }
            _ => Err(VolumeError::Write {
                path: self.path.clone(),
                reason: "file no longer exists".to_string(),
            }),
        }
    }
}

/// Snapshot cursor over one directory's entries, taken at open time.
struct MemoryCursor {
    shared: Arc<RwLock<Shared>>,
    entries: Vec<VolumeEntry>,
    next: usize,
}

impl DirCursor for MemoryCursor {
    fn next_entry(&mut self) -> Result<Option<VolumeEntry>, VolumeError> {
        let entry = self.entries.get(self.next).cloned();
        if entry.is_some() {
            self.next += 1;
        }
        Ok(entry)
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        let mut shared = self.shared.write();
        shared.live_cursors = shared.live_cursors.saturating_sub(1);
    }
}
