//! Extraction configuration.

/// How hardlink entries whose source has not been extracted yet are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HardlinkResolution {
    /// Fail immediately with an I/O `NotFound` error.
    #[default]
    FailFast,

    /// Queue the link and retry it once every entry has been processed.
    ///
    /// Links whose source is still missing at that point fail with an I/O
    /// `NotFound` error.
    Deferred,
}

/// Configuration for an extraction run.
///
/// # Examples
///
/// ```
/// use tarsafe_core::ExtractConfig;
/// use tarsafe_core::HardlinkResolution;
///
/// // Use defaults
/// let config = ExtractConfig::default();
///
/// // Customize for specific needs
/// let custom = ExtractConfig {
///     hardlink_resolution: HardlinkResolution::Deferred,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Mode given to directories the engine creates before their final mode
    /// is known, including parents implied only by nested entry names.
    pub provisional_dir_mode: u32,

    /// Mask applied to every mode declared in the archive.
    pub mode_mask: u32,

    /// Handling of hardlinks that precede their source in the archive.
    pub hardlink_resolution: HardlinkResolution,
}

impl Default for ExtractConfig {
    /// Creates an `ExtractConfig` that applies modes as declared.
    ///
    /// Default values:
    /// - `provisional_dir_mode`: `0o755`
    /// - `mode_mask`: `0o7777` (keep setuid/setgid/sticky bits)
    /// - `hardlink_resolution`: `FailFast`
    fn default() -> Self {
        Self {
            provisional_dir_mode: 0o755,
            mode_mask: 0o7777,
            hardlink_resolution: HardlinkResolution::FailFast,
        }
    }
}

impl ExtractConfig {
    /// Creates a configuration that strips setuid, setgid and sticky bits.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode_mask: 0o777,
            ..Default::default()
        }
    }

    /// Applies `mode_mask` to a declared mode.
    #[inline]
    #[must_use]
    pub const fn effective_mode(&self, declared: u32) -> u32 {
        declared & self.mode_mask
    }
}
