//! Validated destination path for a single archive entry.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

use super::DestDir;

/// An entry name resolved to a destination path inside a [`DestDir`].
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`SafePath::validate`]
/// - NO `From<PathBuf>` implementation
/// - The resolved path equals the destination root or is a strict
///   descendant of it
///
/// The check is purely lexical. Symlinks that already exist on disk are not
/// resolved, so a symlink planted by an earlier entry and then used as the
/// parent directory of a later entry is not detected.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarsafe_core::types::DestDir;
/// use tarsafe_core::types::SafePath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/out")?;
///
/// let safe = SafePath::validate(Path::new("foo/./bar.txt"), &dest)?;
/// assert_eq!(safe.as_path(), Path::new("/tmp/out/foo/bar.txt"));
///
/// assert!(SafePath::validate(Path::new("../etc/passwd"), &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath {
    name: PathBuf,
    resolved: PathBuf,
    is_root: bool,
}

impl SafePath {
    /// Joins `name` onto `dest` and lexically normalizes the result.
    ///
    /// `.` segments are dropped and `..` segments remove the previous
    /// segment. A leading `/` (or a Windows prefix) is treated as relative
    /// to `dest`. The normalized path must be `dest` itself or lie below it.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InsecureLink` carrying `name` if the
    /// normalized path escapes `dest`.
    pub fn validate(name: &Path, dest: &DestDir) -> Result<Self> {
        let root = dest.as_path();
        let mut resolved = root.to_path_buf();

        for component in name.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }

        // Component-wise comparison: "/out-evil" does not start with "/out".
        if !resolved.starts_with(root) {
            return Err(ExtractionError::InsecureLink {
                path: name.to_path_buf(),
            });
        }

        let is_root = resolved.as_path() == root;
        Ok(Self {
            name: name.to_path_buf(),
            resolved,
            is_root,
        })
    }

    /// Returns the resolved absolute destination path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.resolved
    }

    /// Returns the archive-relative name this path was resolved from.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Returns `true` if the name resolved to the destination root itself.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }
}
