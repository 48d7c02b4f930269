//! Secure tar extraction with path containment guarantees.
//!
//! `tarsafe-core` materializes a stream of tar entries onto a destination
//! directory. Every entry name, and every hardlink source, is checked
//! lexically against the destination root before anything is written, so no
//! entry can land outside it. Directory permissions are applied after the
//! last entry, making the last declaration for a directory authoritative
//! regardless of archive order.
//!
//! Decoding the tar format is delegated to the [`tar`] crate and
//! decompression is left to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use flate2::read::GzDecoder;
//! use tarsafe_core::PathWhitelist;
//! use tarsafe_core::extract_tar_reader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("layer.tar.gz")?;
//! let report = extract_tar_reader(GzDecoder::new(file), "/tmp/rootfs", None)?;
//! println!("Extracted {} files", report.files_extracted);
//!
//! // Only pull specific members.
//! let whitelist: PathWhitelist = ["etc/os-release"].into_iter().collect();
//! let file = std::fs::File::open("layer.tar.gz")?;
//! extract_tar_reader(GzDecoder::new(file), "/tmp/meta", Some(&whitelist))?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod security;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract_file_from_tar_reader;
pub use api::extract_tar;
pub use api::extract_tar_reader;
pub use api::extract_tar_with_config;
pub use config::ExtractConfig;
pub use config::HardlinkResolution;
pub use error::ExtractionError;
pub use error::Result;
pub use extraction::ExtractionEngine;
pub use extraction::extract_file_from_tar;
pub use formats::ArchiveEntry;
pub use report::ExtractionReport;
pub use security::PathWhitelist;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryHeader;
pub use types::EntryType;
pub use types::SafePath;
