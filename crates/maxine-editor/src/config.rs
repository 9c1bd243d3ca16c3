//! Editor configuration.

use std::error::Error;
use std::fmt;

use maxine_arena::{ArenaConfig, ArenaError};

use crate::diagnostics::HealthThresholds;

// ── EditorConfig ───────────────────────────────────────────────────

/// Settings for a [`Session`](crate::Session).
///
/// Constructed with [`EditorConfig::default`] and adjusted field by field;
/// [`validate`](EditorConfig::validate) is called when a session starts.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Backing arena settings.
    pub arena: ArenaConfig,
    /// Rows visible in the grid at once. Default: 20.
    pub view_height: usize,
    /// Columns visible in the grid at once. Default: 10.
    pub view_width: usize,
    /// Histogram bucket count. Default: 10.
    pub histogram_bins: usize,
    /// Length in characters of the longest histogram bar. Default: 30.
    pub histogram_bar_width: usize,
    /// `|v|` above this flags the layer as exploding. Default: 100.0.
    pub exploding_threshold: f32,
    /// Non-zero `|v|` below this counts as vanishing. Default: 1e-7.
    pub vanishing_threshold: f32,
    /// Zero fraction above this flags the layer as sparse. Default: 0.9.
    pub sparsity_threshold: f64,
    /// Diff deltas within `±diff_epsilon` render as unchanged. Default: 0.001.
    pub diff_epsilon: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            view_height: 20,
            view_width: 10,
            histogram_bins: 10,
            histogram_bar_width: 30,
            exploding_threshold: 100.0,
            vanishing_threshold: 1e-7,
            sparsity_threshold: 0.9,
            diff_epsilon: 0.001,
        }
    }
}

impl EditorConfig {
    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        if self.view_height == 0 || self.view_width == 0 {
            return Err(ConfigError::EmptyViewport {
                height: self.view_height,
                width: self.view_width,
            });
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::NoHistogramBins);
        }
        check_positive("exploding_threshold", self.exploding_threshold as f64)?;
        check_positive("vanishing_threshold", self.vanishing_threshold as f64)?;
        check_positive("diff_epsilon", self.diff_epsilon as f64)?;
        if !(0.0..=1.0).contains(&self.sparsity_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "sparsity_threshold",
                value: self.sparsity_threshold,
            });
        }
        Ok(())
    }

    /// Thresholds used by the `health` scan.
    pub fn health_thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            exploding: self.exploding_threshold,
            vanishing: self.vanishing_threshold,
            sparsity: self.sparsity_threshold,
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EditorConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Arena configuration is invalid.
    Arena(ArenaError),
    /// The grid viewport has no rows or no columns.
    EmptyViewport {
        /// Configured row count.
        height: usize,
        /// Configured column count.
        width: usize,
    },
    /// `histogram_bins` is zero.
    NoHistogramBins,
    /// A threshold is NaN, infinite, or outside its allowed range.
    InvalidThreshold {
        /// Field name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::EmptyViewport { height, width } => {
                write!(f, "viewport must be at least 1x1, got {height}x{width}")
            }
            Self::NoHistogramBins => write!(f, "histogram_bins must be at least 1"),
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} is out of range: {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for ConfigError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(EditorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_viewport_rejected() {
        let cfg = EditorConfig {
            view_width: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyViewport { width: 0, .. })
        ));
    }

    #[test]
    fn nan_threshold_rejected() {
        let cfg = EditorConfig {
            vanishing_threshold: f32::NAN,
            ..EditorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "vanishing_threshold",
                ..
            })
        ));
    }

    #[test]
    fn sparsity_must_be_a_fraction() {
        let cfg = EditorConfig {
            sparsity_threshold: 90.0,
            ..EditorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn arena_errors_propagate() {
        let cfg = EditorConfig {
            arena: ArenaConfig::new(0),
            ..EditorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Arena(_))));
    }
}
