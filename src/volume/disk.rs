//! Host-directory volume adapter.
//!
//! Maps volume paths onto a directory on the host filesystem. The root
//! carries a marker file so `format` only ever wipes a tree this tool owns;
//! a populated directory without the marker refuses to mount.

use super::{components, join_path, DirCursor, EntryKind, FileWrite, Volume, VolumeEntry};
use crate::error::VolumeError;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DiskVolume {
    root: PathBuf,
    mounted: bool,
}

impl DiskVolume {
    /// Marker file identifying a directory as a benchmark volume root.
    pub const MARKER_FILE: &'static str = ".fsbench-volume";

    /// Create an adapter for `root`. No filesystem access happens until
    /// `mount`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskVolume {
            root: root.into(),
            mounted: false,
        }
    }

    /// Host directory backing the volume root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for component in components(path) {
            full.push(component);
        }
        full
    }

    fn ensure_mounted(&self) -> Result<(), VolumeError> {
        if self.mounted {
            Ok(())
        } else {
            Err(VolumeError::NotMounted)
        }
    }

    fn claim_root(&self, format_on_fail: bool) -> Result<(), VolumeError> {
        let marker = self.root.join(Self::MARKER_FILE);

        if !self.root.exists() {
            if !format_on_fail {
                return Err(VolumeError::Mount {
                    reason: format!("volume root {} does not exist", self.root.display()),
                });
            }
            fs::create_dir_all(&self.root).map_err(|e| VolumeError::Mount {
                reason: format!("failed to create volume root: {}", e),
            })?;
            return write_marker(&marker);
        }

        if !self.root.is_dir() {
            return Err(VolumeError::Mount {
                reason: format!("{} is not a directory", self.root.display()),
            });
        }
        if marker.exists() {
            return Ok(());
        }

        // Adopt an empty directory, refuse one holding foreign content.
        let occupied = fs::read_dir(&self.root)
            .map_err(|e| VolumeError::Mount {
                reason: format!("failed to inspect volume root: {}", e),
            })?
            .next()
            .is_some();
        if occupied {
            return Err(VolumeError::Mount {
                reason: format!(
                    "{} exists but is not a benchmark volume (missing {})",
                    self.root.display(),
                    Self::MARKER_FILE
                ),
            });
        }
        write_marker(&marker)
    }
}

fn write_marker(marker: &Path) -> Result<(), VolumeError> {
    fs::write(marker, b"").map_err(|e| VolumeError::Mount {
        reason: format!("failed to write volume marker: {}", e),
    })
}

impl Volume for DiskVolume {
    fn mount(&mut self, format_on_fail: bool) -> Result<(), VolumeError> {
        self.claim_root(format_on_fail)?;
        self.root = dunce::canonicalize(&self.root).map_err(|e| VolumeError::Mount {
            reason: format!("failed to canonicalize volume root: {}", e),
        })?;
        self.mounted = true;
        debug!(root = %self.root.display(), "Mounted disk volume");
        Ok(())
    }

    fn format(&mut self) -> Result<(), VolumeError> {
        self.ensure_mounted().map_err(|_| VolumeError::Format {
            reason: "volume is not mounted".to_string(),
        })?;
        if !self.root.join(Self::MARKER_FILE).exists() {
            return Err(VolumeError::Format {
                reason: format!(
                    "{} lost its {} marker, refusing to wipe",
                    self.root.display(),
                    Self::MARKER_FILE
                ),
            });
        }

        let entries = fs::read_dir(&self.root).map_err(|e| VolumeError::Format {
            reason: format!("failed to list volume root: {}", e),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| VolumeError::Format {
                reason: format!("failed to read volume root entry: {}", e),
            })?;
            if entry.file_name() == Self::MARKER_FILE {
                continue;
            }
            let target = entry.path();
            let result = if target.is_dir() {
                fs::remove_dir_all(&target)
            } else {
                fs::remove_file(&target)
            };
            result.map_err(|e| VolumeError::Format {
                reason: format!("failed to remove {}: {}", target.display(), e),
            })?;
        }
        debug!(root = %self.root.display(), "Formatted disk volume");
        Ok(())
    }

    fn mkdir(&self, path: &str) -> Result<(), VolumeError> {
        self.ensure_mounted()?;
        fs::create_dir(self.host_path(path)).map_err(|e| VolumeError::CreateDir {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn open_write(&self, path: &str) -> Result<Box<dyn FileWrite>, VolumeError> {
        self.ensure_mounted()?;
        let file = fs::File::create(self.host_path(path)).map_err(|e| VolumeError::OpenFile {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(DiskFile {
            file,
            path: path.to_string(),
        }))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, VolumeError> {
        self.ensure_mounted()?;
        fs::read(self.host_path(path)).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VolumeError::NotFound {
                path: path.to_string(),
            },
            _ => VolumeError::Read {
                path: path.to_string(),
                reason: e.to_string(),
            },
        })
    }

    fn read_dir(&self, path: &str) -> Result<Box<dyn DirCursor>, VolumeError> {
        self.ensure_mounted()?;
        let host = self.host_path(path);
        if host.is_file() {
            return Err(VolumeError::NotADirectory {
                path: path.to_string(),
            });
        }
        let inner = fs::read_dir(&host).map_err(|e| VolumeError::ReadDir {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(DiskCursor {
            dir_path: super::normalize(path),
            skip_marker: components(path).next().is_none(),
            inner,
        }))
    }
}

struct DiskFile {
    file: fs::File,
    path: String,
}

impl FileWrite for DiskFile {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), VolumeError> {
        self.file.write_all(bytes).map_err(|e| VolumeError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

/// Live handle on a host directory; entries stream from the OS iterator.
struct DiskCursor {
    dir_path: String,
    skip_marker: bool,
    inner: fs::ReadDir,
}

impl DirCursor for DiskCursor {
    fn next_entry(&mut self) -> Result<Option<VolumeEntry>, VolumeError> {
        loop {
            let Some(entry) = self.inner.next() else {
                return Ok(None);
            };
            let entry = entry.map_err(|e| VolumeError::ReadDir {
                path: self.dir_path.clone(),
                reason: e.to_string(),
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.skip_marker && name == DiskVolume::MARKER_FILE {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| VolumeError::ReadDir {
                path: self.dir_path.clone(),
                reason: e.to_string(),
            })?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            return Ok(Some(VolumeEntry {
                path: join_path(&self.dir_path, &name),
                kind,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::conformance;
    use tempfile::TempDir;

    #[test]
    fn satisfies_volume_contract() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path().join("volume"));
        conformance::run_all(&mut volume);
    }

    #[test]
    fn mount_creates_missing_root_when_formatting_is_allowed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("fresh");
        let mut volume = DiskVolume::new(&root);

        volume.mount(true).unwrap();

        assert!(root.join(DiskVolume::MARKER_FILE).exists());
    }

    #[test]
    fn mount_without_format_fails_on_missing_root() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path().join("absent"));

        let err = volume.mount(false).unwrap_err();

        assert!(matches!(err, VolumeError::Mount { .. }));
    }

    #[test]
    fn mount_refuses_directory_with_foreign_content() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("precious.txt"), b"keep me").unwrap();
        let mut volume = DiskVolume::new(temp.path());

        let err = volume.mount(true).unwrap_err();

        assert!(matches!(err, VolumeError::Mount { .. }));
        assert!(temp.path().join("precious.txt").exists());
    }

    #[test]
    fn mount_adopts_empty_directory() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path());

        volume.mount(false).unwrap();

        assert!(temp.path().join(DiskVolume::MARKER_FILE).exists());
    }

    #[test]
    fn remount_sees_content_written_by_a_previous_handle() {
        let temp = TempDir::new().unwrap();
        {
            let mut volume = DiskVolume::new(temp.path());
            volume.mount(true).unwrap();
            volume.mkdir("/kept").unwrap();
        }

        let mut volume = DiskVolume::new(temp.path());
        volume.mount(false).unwrap();

        let mut cursor = volume.read_dir("/kept").unwrap();
        assert!(cursor.next_entry().unwrap().is_none());
    }

    #[test]
    fn format_refuses_root_that_lost_its_marker() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path());
        volume.mount(true).unwrap();
        std::fs::remove_file(temp.path().join(DiskVolume::MARKER_FILE)).unwrap();

        let err = volume.format().unwrap_err();

        assert!(matches!(err, VolumeError::Format { .. }));
    }

    #[test]
    fn format_wipes_everything_but_the_marker() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path());
        volume.mount(true).unwrap();
        volume.mkdir("/d").unwrap();
        volume.open_write("/d/f").unwrap().write_all(b"x").unwrap();

        volume.format().unwrap();

        let mut cursor = volume.read_dir("/").unwrap();
        assert!(cursor.next_entry().unwrap().is_none());
        assert!(temp.path().join(DiskVolume::MARKER_FILE).exists());
    }

    #[test]
    fn cursor_entries_carry_volume_paths() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path());
        volume.mount(true).unwrap();
        volume.mkdir("/outer").unwrap();
        volume.mkdir("/outer/inner").unwrap();

        let mut cursor = volume.read_dir("/outer").unwrap();
        let entry = cursor.next_entry().unwrap().unwrap();

        assert_eq!(entry.path, "/outer/inner");
        assert_eq!(entry.kind, EntryKind::Directory);
    }

    #[test]
    fn marker_is_hidden_from_root_listing_only() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path());
        volume.mount(true).unwrap();
        volume.mkdir("/d").unwrap();

        let mut root_names = Vec::new();
        let mut cursor = volume.read_dir("/").unwrap();
        while let Some(entry) = cursor.next_entry().unwrap() {
            root_names.push(entry.name().to_string());
        }

        assert_eq!(root_names, vec!["d".to_string()]);
    }

    #[test]
    fn mkdir_without_parent_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut volume = DiskVolume::new(temp.path());
        volume.mount(true).unwrap();

        let err = volume.mkdir("/missing/child").unwrap_err();

        assert_eq!(err.path(), Some("/missing/child"));
    }
}
