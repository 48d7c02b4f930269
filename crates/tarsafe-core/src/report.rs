//! Extraction operation reporting.

use std::time::Duration;

/// Report of a successful extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries processed.
    pub directories_created: usize,

    /// Number of symlinks created.
    pub symlinks_created: usize,

    /// Number of hardlinks created.
    pub hardlinks_created: usize,

    /// Number of entries excluded by the whitelist.
    pub entries_filtered: usize,

    /// Number of device, FIFO and other unsupported entries skipped.
    pub entries_unsupported: usize,

    /// Total bytes of file content written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction run.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of items materialized on disk.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted
            + self.directories_created
            + self.symlinks_created
            + self.hardlinks_created
    }

    /// Returns total number of entries that were not materialized.
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.entries_filtered + self.entries_unsupported
    }
}
