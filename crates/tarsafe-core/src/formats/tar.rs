//! Adapter from the `tar` crate's entries to [`ArchiveEntry`].

use std::io::Read;
use std::path::PathBuf;

use crate::Result;
use crate::types::EntryHeader;
use crate::types::EntryType;

use super::traits::ArchiveEntry;

/// Permission bits kept from the header mode field.
const MODE_BITS: u32 = 0o7777;

impl<R: Read> ArchiveEntry for tar::Entry<'_, R> {
    fn entry_header(&self) -> Result<EntryHeader> {
        let path = self.path()?.into_owned();
        let header = tar::Entry::header(self);

        let entry_type = match header.entry_type() {
            // Pre-POSIX archives mark directories with a trailing slash only.
            tar::EntryType::Regular | tar::EntryType::Continuous
                if self.path_bytes().ends_with(b"/") =>
            {
                EntryType::Directory
            }
            tar::EntryType::Regular | tar::EntryType::Continuous => EntryType::File,
            tar::EntryType::Directory => EntryType::Directory,
            tar::EntryType::Symlink => EntryType::Symlink {
                target: link_target(self)?,
            },
            tar::EntryType::Link => EntryType::Hardlink {
                target: link_target(self)?,
            },
            other => EntryType::Other(other.as_byte()),
        };

        Ok(EntryHeader {
            path,
            entry_type,
            mode: header.mode()? & MODE_BITS,
            size: self.size(),
        })
    }
}

fn link_target<R: Read>(entry: &tar::Entry<'_, R>) -> Result<PathBuf> {
    entry.link_name()?.map(|p| p.into_owned()).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "link entry without link name: {}",
                String::from_utf8_lossy(&entry.path_bytes())
            ),
        )
        .into()
    })
}
