//! Path containment validation.

use std::path::Path;

use crate::Result;
use crate::types::DestDir;
use crate::types::SafePath;

/// Resolves an archive-relative name to a destination path inside `dest`.
///
/// This function delegates to `SafePath::validate()`, which joins the name
/// onto the destination root and lexically normalizes it. The same check is
/// applied to every entry type and to hardlink sources.
///
/// # Errors
///
/// Returns `ExtractionError::InsecureLink` if the normalized path is neither
/// `dest` nor a descendant of it.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarsafe_core::security::validate_path;
/// use tarsafe_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/out")?;
///
/// let safe_path = validate_path(Path::new("foo/bar.txt"), &dest)?;
/// assert!(safe_path.as_path().starts_with(dest.as_path()));
///
/// assert!(validate_path(Path::new("../etc/passwd"), &dest).is_err());
/// # Ok(())
/// # }
/// ```
pub fn validate_path(name: &Path, dest: &DestDir) -> Result<SafePath> {
    SafePath::validate(name, dest)
}
