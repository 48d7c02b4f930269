//! High-level public API for tar extraction.

use std::io;
use std::io::Read;
use std::path::Path;

use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::ExtractionEngine;
use crate::formats::ArchiveEntry;
use crate::security::PathWhitelist;
use crate::types::DestDir;

/// Extracts a stream of tar entries into `dest` with the default
/// configuration.
///
/// `dest` must already exist. When `whitelist` is `Some` and non-empty, only
/// entries whose name is listed are extracted; parent directories are still
/// created as needed.
///
/// # Errors
///
/// Returns an error if:
/// - `dest` does not exist or is not a directory
/// - An entry name or hardlink source escapes `dest` (`InsecureLink`)
/// - A hardlink's source has not been extracted yet
/// - Any I/O operation fails
///
/// # Examples
///
/// ```no_run
/// use tarsafe_core::extract_tar;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("layer.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let report = extract_tar(archive.entries()?, "/tmp/rootfs", None)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_tar<I, E, P>(
    entries: I,
    dest: P,
    whitelist: Option<&PathWhitelist>,
) -> Result<ExtractionReport>
where
    I: IntoIterator<Item = io::Result<E>>,
    E: ArchiveEntry,
    P: AsRef<Path>,
{
    extract_tar_with_config(entries, dest, whitelist, &ExtractConfig::default())
}

/// Extracts a stream of tar entries into `dest` with a custom configuration.
///
/// # Errors
///
/// See [`extract_tar`].
///
/// # Examples
///
/// ```no_run
/// use tarsafe_core::ExtractConfig;
/// use tarsafe_core::HardlinkResolution;
/// use tarsafe_core::extract_tar_with_config;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractConfig {
///     hardlink_resolution: HardlinkResolution::Deferred,
///     ..ExtractConfig::strict()
/// };
/// let mut archive = tar::Archive::new(std::fs::File::open("layer.tar")?);
/// extract_tar_with_config(archive.entries()?, "/tmp/rootfs", None, &config)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_tar_with_config<I, E, P>(
    entries: I,
    dest: P,
    whitelist: Option<&PathWhitelist>,
    config: &ExtractConfig,
) -> Result<ExtractionReport>
where
    I: IntoIterator<Item = io::Result<E>>,
    E: ArchiveEntry,
    P: AsRef<Path>,
{
    let dest = DestDir::new(dest.as_ref())?;
    ExtractionEngine::new(&dest, config)
        .with_whitelist(whitelist)
        .extract(entries)
}

/// Extracts an uncompressed tar stream into `dest`.
///
/// Decompression is the caller's concern: wrap the reader in a decoder such
/// as `flate2::read::GzDecoder` first.
///
/// # Errors
///
/// See [`extract_tar`]. Also fails if the stream is not a tar archive.
pub fn extract_tar_reader<R: Read, P: AsRef<Path>>(
    reader: R,
    dest: P,
    whitelist: Option<&PathWhitelist>,
) -> Result<ExtractionReport> {
    let mut archive = tar::Archive::new(reader);
    extract_tar(archive.entries()?, dest, whitelist)
}

/// Reads one regular file out of an uncompressed tar stream.
///
/// # Errors
///
/// See [`extract_file_from_tar`](crate::extract_file_from_tar).
pub fn extract_file_from_tar_reader<R: Read>(
    reader: R,
    target: impl AsRef<Path>,
) -> Result<Vec<u8>> {
    let mut archive = tar::Archive::new(reader);
    crate::extraction::extract_file_from_tar(archive.entries()?, target)
}
