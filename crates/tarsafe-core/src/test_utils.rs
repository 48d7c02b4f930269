//! Test utilities for building tar archives in memory.
//!
//! Names and link names are written into the header verbatim, bypassing the
//! `tar` crate's own path sanitizing, so tests can build the malicious
//! archives the engine has to reject.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors or on names longer
//! than the 100-byte header field, since they are designed for test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Read;

use crate::types::EntryHeader;
use crate::types::EntryType;

/// Builder for creating tar test archives with various entry types.
///
/// # Examples
///
/// ```
/// use tarsafe_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .add_symlink("link", "file.txt")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new tar test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode `0o644`.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with custom mode.
    #[must_use]
    pub fn add_file_with_mode(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.append(path, None, tar::EntryType::Regular, mode, data)
    }

    /// Adds a directory with mode `0o755`.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_directory_with_mode(path, 0o755)
    }

    /// Adds a directory with custom mode.
    #[must_use]
    pub fn add_directory_with_mode(self, path: &str, mode: u32) -> Self {
        self.append(path, None, tar::EntryType::Directory, mode, &[])
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.append(path, Some(target), tar::EntryType::Symlink, 0o777, &[])
    }

    /// Adds a hardlink to the archive.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.append(path, Some(target), tar::EntryType::Link, 0o644, &[])
    }

    /// Adds a FIFO entry to the archive.
    #[must_use]
    pub fn add_fifo(self, path: &str) -> Self {
        self.append(path, None, tar::EntryType::Fifo, 0o644, &[])
    }

    fn append(
        mut self,
        path: &str,
        link_name: Option<&str>,
        entry_type: tar::EntryType,
        mode: u32,
        data: &[u8],
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        write_field(&mut header.as_old_mut().name, path);
        if let Some(link_name) = link_name {
            write_field(&mut header.as_old_mut().linkname, link_name);
        }
        header.set_entry_type(entry_type);
        header.set_mode(mode);
        header.set_size(data.len() as u64);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Builds and returns the tar archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_field(field: &mut [u8; 100], value: &str) {
    let bytes = value.as_bytes();
    assert!(bytes.len() <= field.len(), "name too long for header: {value}");
    field.fill(0);
    field[..bytes.len()].copy_from_slice(bytes);
}

/// In-memory archive entry for driving the engine without a tar decoder.
#[derive(Debug)]
pub struct MemoryEntry {
    header: EntryHeader,
    content: Cursor<Vec<u8>>,
}

impl MemoryEntry {
    /// Creates an entry from a header and its content.
    #[must_use]
    pub fn new(header: EntryHeader, content: impl Into<Vec<u8>>) -> Self {
        Self {
            header,
            content: Cursor::new(content.into()),
        }
    }

    /// Creates a regular file entry whose size matches `content`.
    #[must_use]
    pub fn file(path: &str, mode: u32, content: &[u8]) -> Self {
        Self::new(
            EntryHeader::file(path, mode, content.len() as u64),
            content,
        )
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn directory(path: &str, mode: u32) -> Self {
        Self::new(EntryHeader::directory(path, mode), Vec::new())
    }

    /// Creates an entry of an unsupported type.
    #[must_use]
    pub fn other(path: &str, flag: u8) -> Self {
        Self::new(
            EntryHeader {
                path: path.into(),
                entry_type: EntryType::Other(flag),
                mode: 0o644,
                size: 0,
            },
            Vec::new(),
        )
    }
}

impl Read for MemoryEntry {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.content.read(buf)
    }
}

impl crate::formats::ArchiveEntry for MemoryEntry {
    fn entry_header(&self) -> crate::Result<EntryHeader> {
        Ok(self.header.clone())
    }
}

/// Wraps entries as the `io::Result` stream the engine consumes.
pub fn memory_entries(
    entries: Vec<MemoryEntry>,
) -> impl Iterator<Item = std::io::Result<MemoryEntry>> {
    entries.into_iter().map(Ok)
}
