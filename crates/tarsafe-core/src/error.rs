//! Error types for tar extraction operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::EntryType;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur during tar extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Reading the archive stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A filesystem operation failed at a known path.
    #[error("I/O error at {path}: {source}")]
    Filesystem {
        /// The path the operation was applied to.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entry resolves outside the destination directory.
    #[error("insecure link: {path} resolves outside the destination directory")]
    InsecureLink {
        /// The archive-relative name of the offending entry.
        path: PathBuf,
    },

    /// No entry with the requested name exists in the archive.
    #[error("file not found in archive: {path}")]
    NotFound {
        /// The requested archive-relative name.
        path: PathBuf,
    },

    /// The requested entry exists but is not a regular file.
    #[error("{path} is not a regular file (found {entry_type})")]
    WrongType {
        /// The requested archive-relative name.
        path: PathBuf,
        /// The type of the matching entry.
        entry_type: EntryType,
    },
}

impl ExtractionError {
    /// Wraps an I/O error with the path it occurred at.
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error represents an attempted escape from the
    /// destination directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use tarsafe_core::ExtractionError;
    ///
    /// let err = ExtractionError::InsecureLink {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::NotFound {
    ///     path: PathBuf::from("missing.txt"),
    /// };
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::InsecureLink { .. })
    }

    /// Returns the path associated with this error, if any.
    ///
    /// For `InsecureLink`, `NotFound` and `WrongType` this is the
    /// archive-relative name; for `Filesystem` it is the destination path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use std::path::PathBuf;
    /// use tarsafe_core::ExtractionError;
    ///
    /// let err = ExtractionError::NotFound {
    ///     path: PathBuf::from("folder/foo.txt"),
    /// };
    /// assert_eq!(err.path(), Some(Path::new("folder/foo.txt")));
    /// ```
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io(_) => None,
            Self::Filesystem { path, .. }
            | Self::InsecureLink { path }
            | Self::NotFound { path }
            | Self::WrongType { path, .. } => Some(path),
        }
    }

    /// Returns the kind of the underlying I/O error, if this is an I/O
    /// failure.
    #[must_use]
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(e) | Self::Filesystem { source: e, .. } => Some(e.kind()),
            _ => None,
        }
    }
}
