//! Path whitelist for restricting which entries are extracted.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;

/// An exact-match allow-list of archive-relative paths.
///
/// Matching compares the raw entry name: `folder/foo.txt` does not match
/// `./folder/foo.txt`, `folder//foo.txt` or `folder/`. Ancestor directories
/// of a listed file are not implied.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarsafe_core::security::PathWhitelist;
///
/// let whitelist: PathWhitelist = ["folder/foo.txt"].into_iter().collect();
/// assert!(whitelist.contains(Path::new("folder/foo.txt")));
/// assert!(!whitelist.contains(Path::new("folder/")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathWhitelist {
    paths: HashSet<OsString>,
}

impl PathWhitelist {
    /// Creates an empty whitelist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path. Returns `false` if it was already present.
    pub fn insert(&mut self, path: impl AsRef<OsStr>) -> bool {
        self.paths.insert(path.as_ref().to_os_string())
    }

    /// Returns `true` if `path` is listed, compared byte for byte.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path.as_os_str())
    }

    /// Returns the number of listed paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if no paths are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: AsRef<OsStr>> FromIterator<S> for PathWhitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter
                .into_iter()
                .map(|p| p.as_ref().to_os_string())
                .collect(),
        }
    }
}

impl<S: AsRef<OsStr>> Extend<S> for PathWhitelist {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.paths
            .extend(iter.into_iter().map(|p| p.as_ref().to_os_string()));
    }
}

/// Decides whether an entry is eligible for extraction.
///
/// `None` extracts everything. An empty whitelist also extracts everything;
/// a non-empty one admits exactly the listed names.
#[must_use]
pub fn is_whitelisted(whitelist: Option<&PathWhitelist>, name: &Path) -> bool {
    match whitelist {
        None => true,
        Some(list) if list.is_empty() => true,
        Some(list) => list.contains(name),
    }
}
