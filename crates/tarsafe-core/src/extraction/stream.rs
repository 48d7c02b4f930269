//! In-memory extraction of a single archive member.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::ExtractionError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_exact;
use crate::formats::ArchiveEntry;

/// Upper bound on the up-front allocation for a member's content, so a
/// header declaring a huge size cannot force a large allocation before any
/// content has been read.
const MAX_PREALLOC: u64 = 1024 * 1024;

/// Reads the content of the first entry named exactly `target`.
///
/// Entries are scanned in a single forward pass. Nothing is written to the
/// filesystem, and names are compared verbatim without normalization.
///
/// # Errors
///
/// - `WrongType` if the first matching entry is not a regular file (symlinks
///   are never followed)
/// - `NotFound` if no entry matches
/// - `Io` if the stream fails or the content is shorter than declared
///
/// # Examples
///
/// ```no_run
/// use tarsafe_core::extract_file_from_tar;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("image.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let manifest = extract_file_from_tar(archive.entries()?, "manifest.json")?;
/// # Ok(())
/// # }
/// ```
pub fn extract_file_from_tar<I, E>(entries: I, target: impl AsRef<Path>) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = io::Result<E>>,
    E: ArchiveEntry,
{
    let target = target.as_ref();

    for entry in entries {
        let mut entry = entry?;
        let header = entry.entry_header()?;
        if header.path.as_os_str() != target.as_os_str() {
            continue;
        }

        if !header.entry_type.is_file() {
            return Err(ExtractionError::WrongType {
                path: target.to_path_buf(),
                entry_type: header.entry_type,
            });
        }

        debug!(entry = %target.display(), size = header.size, "reading member into memory");
        let capacity = usize::try_from(header.size.min(MAX_PREALLOC)).unwrap_or(0);
        let mut content = Vec::with_capacity(capacity);
        let mut buffer = CopyBuffer::new();
        copy_exact(&mut entry, &mut content, header.size, &mut buffer)?;
        return Ok(content);
    }

    Err(ExtractionError::NotFound {
        path: target.to_path_buf(),
    })
}
