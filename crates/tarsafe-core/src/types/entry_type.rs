//! Archive entry metadata.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Type of entry in a tar archive.
///
/// Link variants carry the link name from the header verbatim. It has NOT
/// been validated.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use tarsafe_core::types::EntryType;
///
/// let file = EntryType::File;
/// let directory = EntryType::Directory;
/// let symlink = EntryType::Symlink {
///     target: PathBuf::from("../target"),
/// };
/// assert!(symlink.is_link());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    Symlink {
        /// The symlink target, stored as written in the archive.
        target: PathBuf,
    },

    /// Hard link entry.
    Hardlink {
        /// Archive-relative path of the file to link to.
        target: PathBuf,
    },

    /// Any other entry (character/block device, FIFO, vendor extensions).
    ///
    /// Holds the raw type flag byte from the header.
    Other(u8),
}

impl EntryType {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }

    /// Returns `true` if this is a hardlink.
    #[must_use]
    pub const fn is_hardlink(&self) -> bool {
        matches!(self, Self::Hardlink { .. })
    }

    /// Returns `true` for symlinks and hardlinks.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        self.is_symlink() || self.is_hardlink()
    }

    /// Returns the link name for link entries.
    #[must_use]
    pub fn link_name(&self) -> Option<&Path> {
        match self {
            Self::Symlink { target } | Self::Hardlink { target } => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("regular file"),
            Self::Directory => f.write_str("directory"),
            Self::Symlink { target } => write!(f, "symlink to {}", target.display()),
            Self::Hardlink { target } => write!(f, "hardlink to {}", target.display()),
            Self::Other(flag) if flag.is_ascii_graphic() => {
                write!(f, "unsupported entry type '{}'", char::from(*flag))
            }
            Self::Other(flag) => write!(f, "unsupported entry type {flag:#04x}"),
        }
    }
}

/// Header fields of one archive entry.
///
/// Produced by an [`ArchiveEntry`](crate::formats::ArchiveEntry) source and
/// never modified by the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Archive-relative path of the entry, exactly as stored.
    pub path: PathBuf,

    /// Entry type, including the link name for link entries.
    pub entry_type: EntryType,

    /// Permission bits (`0o7777` range).
    pub mode: u32,

    /// Content size in bytes. Only meaningful for regular files.
    pub size: u64,
}

impl EntryHeader {
    /// Creates a header for a regular file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, mode: u32, size: u64) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::File,
            mode,
            size,
        }
    }

    /// Creates a header for a directory.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Directory,
            mode,
            size: 0,
        }
    }

    /// Creates a header for a symlink.
    #[must_use]
    pub fn symlink(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Symlink {
                target: target.into(),
            },
            mode: 0o777,
            size: 0,
        }
    }

    /// Creates a header for a hardlink.
    #[must_use]
    pub fn hardlink(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Hardlink {
                target: target.into(),
            },
            mode: 0o644,
            size: 0,
        }
    }
}
