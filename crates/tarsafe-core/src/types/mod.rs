//! Type-safe wrappers for tar extraction.
//!
//! Destination paths only come into existence through validation: a
//! [`SafePath`] can only be produced by checking an entry name against a
//! [`DestDir`].

pub mod dest_dir;
pub mod entry_type;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_type::EntryHeader;
pub use entry_type::EntryType;
pub use safe_path::SafePath;
