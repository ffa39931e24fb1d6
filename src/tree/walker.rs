//! Depth-first tree traversal.
//!
//! Walks a mounted volume from the root using one directory cursor per
//! recursion level. A directory that cannot be opened costs its subtree,
//! not the walk; a root that cannot be opened costs the whole pass.

use crate::volume::{DirCursor, Volume};
use tracing::{error, info};

/// Counts accumulated during one traversal pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitStats {
    /// Files visited.
    pub files: u64,
    /// Directories entered. The root itself is not counted.
    pub dirs_entered: u64,
}

impl VisitStats {
    pub fn total(&self) -> u64 {
        self.files + self.dirs_entered
    }
}

impl std::ops::AddAssign for VisitStats {
    fn add_assign(&mut self, other: VisitStats) {
        self.files += other.files;
        self.dirs_entered += other.dirs_entered;
    }
}

/// Walk the whole volume from `/`.
///
/// A root that cannot be opened is logged and yields zero visits; the
/// traversal is skipped rather than failed.
pub fn walk_root(volume: &dyn Volume, log_visits: bool) -> VisitStats {
    match volume.read_dir("/") {
        Ok(mut cursor) => walk(volume, cursor.as_mut(), log_visits),
        Err(err) => {
            error!(%err, "Failed to open root directory");
            VisitStats::default()
        }
    }
}

/// Drain one directory cursor, recursing into subdirectories.
///
/// The child cursor for a subdirectory is dropped before the next sibling
/// is fetched, so at most one cursor per depth level is alive.
pub fn walk(volume: &dyn Volume, cursor: &mut dyn DirCursor, log_visits: bool) -> VisitStats {
    let mut stats = VisitStats::default();
    loop {
        let entry = match cursor.next_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => return stats,
            Err(err) => {
                error!(%err, "Reading directory entry failed");
                return stats;
            }
        };

        if entry.is_directory() {
            stats.dirs_entered += 1;
            if log_visits {
                info!(path = %entry.path, "Enter directory");
            }
            match volume.read_dir(&entry.path) {
                Ok(mut child) => stats += walk(volume, child.as_mut(), log_visits),
                Err(err) => error!(path = %entry.path, %err, "Opening directory failed"),
            }
            if log_visits {
                info!(path = %entry.path, "Leave directory");
            }
        } else {
            stats.files += 1;
            if log_visits {
                info!(path = %entry.path, "File");
            }
        }
    }
}
