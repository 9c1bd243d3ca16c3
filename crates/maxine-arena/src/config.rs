//! Arena configuration parameters.

use crate::error::ArenaError;
use crate::ELEMENT_WIDTH;

/// Configuration for the arena allocator.
///
/// Validated by [`Arena::init`](crate::Arena::init); immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Total size of the backing region in bytes.
    ///
    /// Default: 10MB. Must be non-zero and a multiple of the element width.
    pub capacity_bytes: usize,

    /// Alignment of every returned allocation, relative to the region base.
    ///
    /// Default: 8. Must be a power of two no smaller than the element width.
    pub alignment: usize,
}

impl ArenaConfig {
    /// Default capacity: 10MB.
    pub const DEFAULT_CAPACITY_BYTES: usize = 10 * 1024 * 1024;

    /// Default allocation alignment in bytes.
    pub const DEFAULT_ALIGNMENT: usize = 8;

    /// Create a config with the given capacity and the default alignment.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            alignment: Self::DEFAULT_ALIGNMENT,
        }
    }

    /// Create a config sized in whole megabytes.
    pub fn with_megabytes(megabytes: usize) -> Self {
        Self::new(megabytes.saturating_mul(1024 * 1024))
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity_bytes == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "capacity must be at least one element".into(),
            });
        }
        if self.capacity_bytes % ELEMENT_WIDTH != 0 {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "capacity {} is not a multiple of {ELEMENT_WIDTH} bytes",
                    self.capacity_bytes
                ),
            });
        }
        if !self.alignment.is_power_of_two() || self.alignment < ELEMENT_WIDTH {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "alignment {} must be a power of two >= {ELEMENT_WIDTH}",
                    self.alignment
                ),
            });
        }
        Ok(())
    }

    /// Capacity expressed in whole megabytes (rounded down).
    pub fn megabytes(&self) -> usize {
        self.capacity_bytes / 1024 / 1024
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_10mb() {
        let config = ArenaConfig::default();
        assert_eq!(config.megabytes(), 10);
        assert_eq!(config.alignment, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = ArenaConfig::new(0);
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn unaligned_capacity_rejected() {
        assert!(ArenaConfig::new(1023).validate().is_err());
        assert!(ArenaConfig::new(1024).validate().is_ok());
    }

    #[test]
    fn alignment_must_be_power_of_two() {
        let mut config = ArenaConfig::new(1024);
        config.alignment = 12;
        assert!(config.validate().is_err());
        config.alignment = 2;
        assert!(config.validate().is_err());
        config.alignment = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn megabyte_constructor() {
        assert_eq!(ArenaConfig::with_megabytes(3).capacity_bytes, 3 * 1024 * 1024);
    }
}
