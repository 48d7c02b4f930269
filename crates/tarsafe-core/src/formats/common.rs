//! Filesystem operations shared by the extraction engine.
//!
//! All paths passed here have already been resolved through
//! [`SafePath`](crate::types::SafePath). Errors carry the path that failed.

use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_exact;

/// Buffer size for the file writer (64KB).
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Cache of directories known to exist, to skip repeated `mkdir` calls for
/// archives that list many files under the same parent.
#[derive(Debug, Default)]
pub struct DirCache {
    known: HashSet<PathBuf>,
}

impl DirCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `path` and all its ancestors exist as directories.
    ///
    /// Missing directories are created with `mode`. Existing ones are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Filesystem` if a component exists and is not
    /// a directory, or if creation fails.
    pub fn ensure_dir(&mut self, path: &Path, mode: u32) -> Result<()> {
        if self.known.contains(path) {
            return Ok(());
        }
        create_dir_all_with_mode(path, mode)?;
        self.known.insert(path.to_path_buf());
        Ok(())
    }

    /// Ensures the parent directory of `path` exists.
    ///
    /// # Errors
    ///
    /// See [`DirCache::ensure_dir`].
    pub fn ensure_parent_dir(&mut self, path: &Path, mode: u32) -> Result<()> {
        match path.parent() {
            Some(parent) => self.ensure_dir(parent, mode),
            None => Ok(()),
        }
    }

    /// Forgets `path` and everything below it.
    pub fn invalidate(&mut self, path: &Path) {
        self.known.retain(|p| !p.starts_with(path));
    }
}

#[cfg(unix)]
fn create_dir_all_with_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(mode)
        .create(path)
        .map_err(|e| ExtractionError::fs(path, e))
}

#[cfg(not(unix))]
fn create_dir_all_with_mode(path: &Path, _mode: u32) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ExtractionError::fs(path, e))
}

/// Removes whatever non-directory object exists at `path`.
///
/// Symlinks are removed without following them. A directory is left alone.
fn remove_non_dir(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if !meta.is_dir() => {
            fs::remove_file(path).map_err(|e| ExtractionError::fs(path, e))
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ExtractionError::fs(path, e)),
    }
}

/// Removes any existing object at `path`, including a directory tree.
///
/// Returns `true` if a directory was removed.
///
/// # Errors
///
/// Returns `ExtractionError::Filesystem` if the object cannot be removed.
pub fn remove_existing(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(|e| ExtractionError::fs(path, e))?;
            Ok(true)
        }
        Ok(_) => {
            fs::remove_file(path).map_err(|e| ExtractionError::fs(path, e))?;
            Ok(false)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ExtractionError::fs(path, e)),
    }
}

/// Writes exactly `len` bytes from `reader` to a new file at `path`.
///
/// An existing file or symlink at `path` is unlinked first, so writes never
/// follow a symlink and never modify another name of a hardlinked file.
/// Permissions are set to `mode` on the open handle.
///
/// # Errors
///
/// Returns `ExtractionError::Filesystem` if the file cannot be created, the
/// content is shorter than `len`, or the write fails.
pub fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    path: &Path,
    len: u64,
    mode: u32,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    remove_non_dir(path)?;

    let file = File::create(path).map_err(|e| ExtractionError::fs(path, e))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let written = copy_exact(reader, &mut writer, len, buffer)
        .map_err(|e| ExtractionError::fs(path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| ExtractionError::fs(path, e.into_error()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| ExtractionError::fs(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = (file, mode);

    Ok(written)
}

/// Creates a symlink at `link` pointing to `target`.
///
/// Any existing object at `link` is removed first. `target` is stored
/// verbatim. Returns `true` if a directory was removed to make room.
///
/// # Errors
///
/// Returns `ExtractionError::Filesystem` if the existing object cannot be
/// removed or the link cannot be created. Always fails on non-Unix
/// platforms.
pub fn create_symlink(target: &Path, link: &Path) -> Result<bool> {
    let removed_dir = remove_existing(link)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).map_err(|e| ExtractionError::fs(link, e))?;
        Ok(removed_dir)
    }

    #[cfg(not(unix))]
    {
        let _ = (target, removed_dir);
        Err(ExtractionError::fs(
            link,
            std::io::Error::new(
                ErrorKind::Unsupported,
                "symlinks are not supported on this platform",
            ),
        ))
    }
}

/// Creates a hardlink at `link` to the existing file `source`.
///
/// If `link` already exists it is unlinked and the operation retried once.
/// Linking a path to itself is a no-op.
///
/// # Errors
///
/// Returns `ExtractionError::Filesystem` with kind `NotFound` if `source`
/// does not exist, or any error from the link call.
pub fn create_hardlink(source: &Path, link: &Path) -> Result<()> {
    if source == link {
        return match fs::symlink_metadata(source) {
            Ok(_) => Ok(()),
            Err(e) => Err(ExtractionError::fs(source, e)),
        };
    }

    match fs::hard_link(source, link) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            remove_non_dir(link)?;
            fs::hard_link(source, link).map_err(|e| ExtractionError::fs(link, e))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ExtractionError::fs(source, e)),
        Err(e) => Err(ExtractionError::fs(link, e)),
    }
}

/// Returns `true` if `source` exists, without following a final symlink.
#[must_use]
pub fn link_source_exists(source: &Path) -> bool {
    fs::symlink_metadata(source).is_ok()
}

/// Applies `mode` to the directory at `path`, which must lie below `root`.
///
/// Every component from `root` down to `path` is checked with `lstat`.
/// Returns `false` without touching anything if any of them is no longer a
/// real directory, for example because a later entry replaced `path` or one
/// of its parents with a symlink.
///
/// # Errors
///
/// Returns `ExtractionError::Filesystem` if a component cannot be inspected
/// or the permissions cannot be set.
pub fn set_dir_mode(root: &Path, path: &Path, mode: u32) -> Result<bool> {
    let Ok(relative) = path.strip_prefix(root) else {
        return Ok(false);
    };

    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(false),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Ok(false);
            }
            Err(e) => return Err(ExtractionError::fs(&current, e)),
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| ExtractionError::fs(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(true)
}
