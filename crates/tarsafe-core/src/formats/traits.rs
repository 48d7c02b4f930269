//! Common traits for archive entry sources.

use std::io::Read;

use crate::Result;
use crate::types::EntryHeader;

/// One entry yielded by a forward-only archive decoder.
///
/// The entry's content is read through the `Read` implementation and is
/// consumed at most once. Sources are plugged into the engine as any
/// `IntoIterator<Item = std::io::Result<E>>` where `E: ArchiveEntry`.
pub trait ArchiveEntry: Read {
    /// Decodes the header fields of this entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be decoded.
    fn entry_header(&self) -> Result<EntryHeader>;
}

impl<E: ArchiveEntry + ?Sized> ArchiveEntry for Box<E> {
    fn entry_header(&self) -> Result<EntryHeader> {
        (**self).entry_header()
    }
}
