//! Deferred directory permissions.
//!
//! Directories are created with a provisional mode so that later entries can
//! always be written into them. Declared modes are applied once, after the
//! last entry.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use tracing::trace;

use crate::Result;
use crate::formats::common::set_dir_mode;

/// Declared directory modes waiting to be applied.
///
/// A later declaration for the same path overwrites the earlier mode but
/// keeps its original position. [`PendingDirModes::flush`] consumes the
/// collection, so each mode is applied at most once.
#[derive(Debug, Default)]
pub struct PendingDirModes {
    order: Vec<PathBuf>,
    modes: HashMap<PathBuf, u32>,
}

impl PendingDirModes {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the declared `mode` for the directory at `path`.
    pub fn record(&mut self, path: &Path, mode: u32) {
        if self.modes.insert(path.to_path_buf(), mode).is_none() {
            self.order.push(path.to_path_buf());
        }
    }

    /// Applies every recorded mode in first-seen order.
    ///
    /// Every path must lie below `root`. A path that is no longer reachable
    /// through real directories from `root` is skipped. Returns the number
    /// of directories whose mode was applied.
    ///
    /// # Errors
    ///
    /// Stops at the first directory whose permissions cannot be set.
    pub fn flush(mut self, root: &Path) -> Result<usize> {
        let mut applied = 0;

        for path in self.order {
            let Some(mode) = self.modes.remove(&path) else {
                continue;
            };
            if set_dir_mode(root, &path, mode)? {
                trace!(
                    path = %path.display(),
                    mode = format_args!("{mode:o}"),
                    "applied directory mode"
                );
                applied += 1;
            } else {
                trace!(path = %path.display(), "skipped mode for replaced directory");
            }
        }

        Ok(applied)
    }
}
