//! Security validation for archive entries.
//!
//! Every entry name, and every hardlink source, is resolved lexically
//! against the destination root before anything touches the filesystem.

pub mod hardlink;
pub mod path;
pub mod whitelist;

pub use hardlink::HardlinkTracker;
pub use hardlink::PendingHardlink;
pub use path::validate_path;
pub use whitelist::PathWhitelist;
pub use whitelist::is_whitelisted;
