//! Recursive directory and file generation.
//!
//! Builds one branch of the benchmark tree: every level holds `file_count`
//! files plus one nested subdirectory, down to the requested depth. Failures
//! shrink the affected scope and are logged with the offending path; they
//! never abort the run.

use crate::volume::{join_path, Volume};
use tracing::error;

/// Create one tree branch under `parent_path`.
///
/// The level's directory is named `base_dir_name` suffixed with the
/// remaining depth after entering it, so a branch rooted at `directory_0`
/// with depth 3 becomes `/directory_0_2/directory_0_1/directory_0_0`. Each
/// file's content is its own full volume path. `depth_remaining == 0`
/// creates nothing.
///
/// A directory that cannot be created ends its branch: no files, no deeper
/// levels. A file that cannot be opened is skipped; its siblings and the
/// next level still proceed.
pub fn generate(
    volume: &dyn Volume,
    parent_path: &str,
    base_dir_name: &str,
    base_file_name: &str,
    depth_remaining: u32,
    file_count: u32,
) {
    if depth_remaining == 0 {
        return;
    }
    let depth_remaining = depth_remaining - 1;
    let dir_path = join_path(
        parent_path,
        &format!("{}_{}", base_dir_name, depth_remaining),
    );

    if let Err(err) = volume.mkdir(&dir_path) {
        error!(path = %dir_path, %err, "Creating directory failed");
        return;
    }

    for index in 0..file_count {
        let file_path = join_path(&dir_path, &format!("{}_{}", base_file_name, index));
        let mut handle = match volume.open_write(&file_path) {
            Ok(handle) => handle,
            Err(err) => {
                error!(path = %file_path, %err, "Creating file failed");
                continue;
            }
        };
        if let Err(err) = handle.write_all(file_path.as_bytes()) {
            error!(path = %file_path, %err, "Writing file failed");
        }
        // handle drops here, closing the file before the next sibling opens
    }

    if depth_remaining > 0 {
        generate(
            volume,
            &dir_path,
            base_dir_name,
            base_file_name,
            depth_remaining,
            file_count,
        );
    }
}
