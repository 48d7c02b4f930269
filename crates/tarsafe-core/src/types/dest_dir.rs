//! Validated destination directory type.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// The directory an archive is extracted into.
///
/// A `DestDir` always refers to an existing directory and holds its
/// canonical absolute path, so lexical containment checks against it are
/// not fooled by `..` segments or symlinks in the root path itself.
///
/// The extraction engine never creates or removes this directory.
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use tarsafe_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new(PathBuf::from("/tmp/extraction"))?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir` after validating the path.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Filesystem` if:
    /// - The path does not exist (`NotFound`)
    /// - The path exists but is not a directory (`InvalidInput`)
    /// - The path cannot be canonicalized
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let metadata = std::fs::metadata(&path).map_err(|e| ExtractionError::fs(&path, e))?;
        if !metadata.is_dir() {
            return Err(ExtractionError::fs(
                &path,
                std::io::Error::new(ErrorKind::InvalidInput, "destination is not a directory"),
            ));
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| ExtractionError::fs(&path, e))?;

        Ok(Self(canonical))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
