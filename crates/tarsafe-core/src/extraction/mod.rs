//! Extraction of entry streams onto disk and into memory.

pub mod engine;
pub mod modes;
pub mod stream;

pub use engine::ExtractionEngine;
pub use modes::PendingDirModes;
pub use stream::extract_file_from_tar;
