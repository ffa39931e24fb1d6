//! Mounted-Volume Abstraction
//!
//! Capability interface over a hierarchical storage volume. The harness and
//! tree routines only ever see this contract; `DiskVolume` adapts a host
//! directory behind it and `MemoryVolume` provides a deterministic in-memory
//! fake for tests and benchmarks.
//!
//! Volume paths are forward-slash separated and rooted at `/`, regardless of
//! the host platform.

pub mod disk;
pub mod memory;

pub use disk::DiskVolume;
pub use memory::MemoryVolume;

use crate::error::VolumeError;

/// Kind of a directory entry yielded by a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One directory entry. `path` is the entry's full volume path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl VolumeEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(self.path.as_str())
    }
}

/// Writable file handle with truncate-on-open semantics. Dropping the handle
/// closes the file.
pub trait FileWrite {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), VolumeError>;
}

/// Directory-entry cursor. `Ok(None)` marks the end of the directory.
///
/// Entry order is whatever the underlying volume yields; callers must not
/// rely on it. Dropping the cursor releases the directory handle.
pub trait DirCursor {
    fn next_entry(&mut self) -> Result<Option<VolumeEntry>, VolumeError>;
}

/// Capability interface over a mounted volume.
pub trait Volume {
    /// Attach the backing store. With `format_on_fail` set, a backing store
    /// that does not exist yet is created instead of failing the mount.
    fn mount(&mut self, format_on_fail: bool) -> Result<(), VolumeError>;

    /// Reset the mounted volume to an empty root.
    fn format(&mut self) -> Result<(), VolumeError>;

    /// Create a single directory. The parent must already exist.
    fn mkdir(&self, path: &str) -> Result<(), VolumeError>;

    /// Open a file for writing, creating it or truncating existing content.
    fn open_write(&self, path: &str) -> Result<Box<dyn FileWrite>, VolumeError>;

    /// Read a file's entire content.
    fn read(&self, path: &str) -> Result<Vec<u8>, VolumeError>;

    /// Open a cursor over a directory's entries.
    fn read_dir(&self, path: &str) -> Result<Box<dyn DirCursor>, VolumeError>;
}

/// Join a child name onto a volume path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Non-empty components of a volume path.
pub(crate) fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Canonical form of a volume path: `/` for the root, otherwise
/// slash-joined components with a single leading slash.
pub(crate) fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for component in components(path) {
        normalized.push('/');
        normalized.push_str(component);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_path_handles_root_and_nested_parents() {
        assert_eq!(join_path("/", "directory_0_4"), "/directory_0_4");
        assert_eq!(join_path("/directory_0_4", "file_0"), "/directory_0_4/file_0");
    }

    #[test]
    fn normalize_collapses_slashes_and_anchors_at_root() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("directory_0"), "/directory_0");
        assert_eq!(normalize("/a//b/"), "/a/b");
    }

    #[test]
    fn entry_name_is_final_segment() {
        let entry = VolumeEntry {
            path: "/directory_0_4/file_2".to_string(),
            kind: EntryKind::File,
        };
        assert_eq!(entry.name(), "file_2");
        assert!(!entry.is_directory());
    }
}
