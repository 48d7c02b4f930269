//! Hardlink source validation and deferred resolution.

use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::types::DestDir;
use crate::types::SafePath;

/// A hardlink whose source did not exist when its entry was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingHardlink {
    /// Where the link is created.
    pub link: SafePath,
    /// The existing file the link points at.
    pub source: SafePath,
}

/// Tracks hardlink entries for one extraction run.
///
/// In deferred mode, links that precede their source in the archive are
/// queued here and retried after the last entry. Queue order is archive
/// order.
#[derive(Debug, Default)]
pub struct HardlinkTracker {
    pending: Vec<PendingHardlink>,
}

impl HardlinkTracker {
    /// Creates a new empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a hardlink's source name inside `dest`.
    ///
    /// The source name is archive-relative, like every other entry name, and
    /// gets the same containment check.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InsecureLink` carrying the link's own entry
    /// name if the source escapes `dest`.
    pub fn validate_source(link: &SafePath, source: &Path, dest: &DestDir) -> Result<SafePath> {
        SafePath::validate(source, dest).map_err(|err| match err {
            ExtractionError::InsecureLink { .. } => ExtractionError::InsecureLink {
                path: link.name().to_path_buf(),
            },
            other => other,
        })
    }

    /// Queues a link for a later retry.
    pub fn defer(&mut self, link: SafePath, source: SafePath) {
        self.pending.push(PendingHardlink { link, source });
    }

    /// Drops queued links whose destination is exactly `path`.
    ///
    /// Called when a later entry takes over `path`, so the later entry wins.
    /// Returns the number of links dropped.
    pub fn cancel(&mut self, path: &Path) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.link.as_path() != path);
        before - self.pending.len()
    }

    /// Drops queued links whose destination is `path` or anywhere below it.
    ///
    /// Used when `path` becomes a symlink: links queued below it would
    /// otherwise be created through that symlink.
    pub fn cancel_below(&mut self, path: &Path) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !p.link.as_path().starts_with(path));
        before - self.pending.len()
    }

    /// Removes and returns every queued link in archive order.
    pub fn drain(&mut self) -> impl Iterator<Item = PendingHardlink> + '_ {
        self.pending.drain(..)
    }
}
