//! Core extraction engine.
//!
//! The engine consumes entries strictly in archive order. Each entry is
//! filtered, validated and dispatched by type before the next one is read;
//! the first error ends the run and leaves whatever was written in place.

use std::io;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::trace;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::HardlinkResolution;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::formats::ArchiveEntry;
use crate::formats::common::DirCache;
use crate::formats::common::create_hardlink;
use crate::formats::common::create_symlink;
use crate::formats::common::link_source_exists;
use crate::formats::common::write_file;
use crate::security::HardlinkTracker;
use crate::security::PathWhitelist;
use crate::security::is_whitelisted;
use crate::security::validate_path;
use crate::types::DestDir;
use crate::types::EntryHeader;
use crate::types::EntryType;
use crate::types::SafePath;

use super::modes::PendingDirModes;

/// Extracts a stream of archive entries into a destination directory.
///
/// # Examples
///
/// ```no_run
/// use tarsafe_core::ExtractConfig;
/// use tarsafe_core::extraction::ExtractionEngine;
/// use tarsafe_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/out")?;
/// let config = ExtractConfig::default();
///
/// let file = std::fs::File::open("archive.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let report = ExtractionEngine::new(&dest, &config).extract(archive.entries()?)?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractionEngine<'a> {
    dest: &'a DestDir,
    config: &'a ExtractConfig,
    whitelist: Option<&'a PathWhitelist>,
    dirs: DirCache,
    dir_modes: PendingDirModes,
    hardlinks: HardlinkTracker,
    buffer: CopyBuffer,
    report: ExtractionReport,
}

impl<'a> ExtractionEngine<'a> {
    /// Creates an engine that extracts every entry into `dest`.
    #[must_use]
    pub fn new(dest: &'a DestDir, config: &'a ExtractConfig) -> Self {
        Self {
            dest,
            config,
            whitelist: None,
            dirs: DirCache::new(),
            dir_modes: PendingDirModes::new(),
            hardlinks: HardlinkTracker::new(),
            buffer: CopyBuffer::new(),
            report: ExtractionReport::new(),
        }
    }

    /// Restricts extraction to the names in `whitelist`.
    ///
    /// `None` or an empty whitelist extracts everything.
    #[must_use]
    pub fn with_whitelist(mut self, whitelist: Option<&'a PathWhitelist>) -> Self {
        self.whitelist = whitelist;
        self
    }

    /// Extracts every entry, then applies the declared directory modes.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered:
    /// - `InsecureLink` if an entry name or hardlink source escapes the
    ///   destination
    /// - `Filesystem` if a filesystem operation fails, including a hardlink
    ///   whose source has not been extracted (kind `NotFound`)
    /// - `Io` if the entry stream itself fails
    ///
    /// Nothing written before the error is removed.
    pub fn extract<I, E>(mut self, entries: I) -> Result<ExtractionReport>
    where
        I: IntoIterator<Item = io::Result<E>>,
        E: ArchiveEntry,
    {
        let start = Instant::now();

        for entry in entries {
            let mut entry = entry?;
            self.process_entry(&mut entry)?;
        }

        self.finish(start)
    }

    fn process_entry<E: ArchiveEntry + ?Sized>(&mut self, entry: &mut E) -> Result<()> {
        let header = entry.entry_header()?;

        if !is_whitelisted(self.whitelist, &header.path) {
            trace!(entry = %header.path.display(), "not in whitelist");
            self.report.entries_filtered += 1;
            return Ok(());
        }

        let target = validate_path(&header.path, self.dest)?;

        match &header.entry_type {
            EntryType::Directory => self.extract_directory(&target, header.mode),
            EntryType::File => self.extract_file(entry, &target, &header),
            EntryType::Symlink { target: link_name } => self.extract_symlink(&target, link_name),
            EntryType::Hardlink { target: source } => self.extract_hardlink(target, source),
            EntryType::Other(flag) => {
                debug!(entry = %header.path.display(), flag = *flag, "skipping unsupported entry");
                self.report.entries_unsupported += 1;
                Ok(())
            }
        }
    }

    fn extract_directory(&mut self, target: &SafePath, declared_mode: u32) -> Result<()> {
        debug!(
            entry = %target.name().display(),
            mode = format_args!("{declared_mode:o}"),
            "directory"
        );

        self.supersede_deferred_link(target);
        self.dirs
            .ensure_dir(target.as_path(), self.config.provisional_dir_mode)?;
        // The destination root belongs to the caller.
        if !target.is_root() {
            self.dir_modes
                .record(target.as_path(), self.config.effective_mode(declared_mode));
        }

        self.report.directories_created += 1;
        Ok(())
    }

    fn extract_file<R: io::Read + ?Sized>(
        &mut self,
        reader: &mut R,
        target: &SafePath,
        header: &EntryHeader,
    ) -> Result<()> {
        debug!(
            entry = %header.path.display(),
            size = header.size,
            mode = format_args!("{:o}", header.mode),
            "file"
        );

        self.supersede_deferred_link(target);
        self.dirs
            .ensure_parent_dir(target.as_path(), self.config.provisional_dir_mode)?;
        let written = write_file(
            reader,
            target.as_path(),
            header.size,
            self.config.effective_mode(header.mode),
            &mut self.buffer,
        )?;

        self.report.files_extracted += 1;
        self.report.bytes_written += written;
        Ok(())
    }

    fn extract_symlink(&mut self, target: &SafePath, link_name: &Path) -> Result<()> {
        debug!(entry = %target.name().display(), link = %link_name.display(), "symlink");

        reject_root(target)?;
        let dropped = self.hardlinks.cancel_below(target.as_path());
        if dropped > 0 {
            trace!(
                entry = %target.name().display(),
                dropped,
                "symlink replaces deferred hardlinks"
            );
        }
        self.dirs
            .ensure_parent_dir(target.as_path(), self.config.provisional_dir_mode)?;
        if create_symlink(link_name, target.as_path())? {
            self.dirs.invalidate(target.as_path());
        }

        self.report.symlinks_created += 1;
        Ok(())
    }

    fn extract_hardlink(&mut self, target: SafePath, source_name: &Path) -> Result<()> {
        debug!(entry = %target.name().display(), source = %source_name.display(), "hardlink");

        reject_root(&target)?;
        let source = HardlinkTracker::validate_source(&target, source_name, self.dest)?;
        self.supersede_deferred_link(&target);
        self.dirs
            .ensure_parent_dir(target.as_path(), self.config.provisional_dir_mode)?;

        if self.config.hardlink_resolution == HardlinkResolution::Deferred
            && !link_source_exists(source.as_path())
        {
            trace!(entry = %target.name().display(), "deferring hardlink until source exists");
            self.hardlinks.defer(target, source);
            return Ok(());
        }

        create_hardlink(source.as_path(), target.as_path())?;
        self.report.hardlinks_created += 1;
        Ok(())
    }

    /// A later entry at the same path wins over a link still waiting for
    /// its source.
    fn supersede_deferred_link(&mut self, target: &SafePath) {
        if self.hardlinks.cancel(target.as_path()) > 0 {
            trace!(entry = %target.name().display(), "dropping superseded deferred hardlink");
        }
    }

    fn finish(mut self, start: Instant) -> Result<ExtractionReport> {
        let mut hardlinks = std::mem::take(&mut self.hardlinks);
        for pending in hardlinks.drain() {
            debug!(entry = %pending.link.name().display(), "resolving deferred hardlink");
            create_hardlink(pending.source.as_path(), pending.link.as_path())?;
            self.report.hardlinks_created += 1;
        }

        let applied = self.dir_modes.flush(self.dest.as_path())?;
        trace!(directories = applied, "applied directory modes");

        self.report.duration = start.elapsed();
        Ok(self.report)
    }
}

/// Link entries never replace the destination root.
fn reject_root(target: &SafePath) -> Result<()> {
    if target.is_root() {
        return Err(ExtractionError::fs(
            target.as_path(),
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "link entry {} resolves to the destination root",
                    target.name().display()
                ),
            ),
        ));
    }
    Ok(())
}
