//! Archive entry sources and the filesystem operations that materialize them.

pub mod common;
pub mod tar;
pub mod traits;

pub use traits::ArchiveEntry;
