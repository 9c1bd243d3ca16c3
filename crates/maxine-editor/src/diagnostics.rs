//! Read-only layer scans: summary statistics, health checks, histograms.
//!
//! All scans take a plain `&[f32]` (one layer) so they are independent of
//! the arena. NaN never participates in min/max; the histogram buckets
//! finite values only.

use std::fmt;

/// Min/max over the non-NaN values of `values`, or `None` if there are none.
fn min_max(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    values.filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ── Stats ───────────────────────────────────────────────────────────

/// Min, max, and mean of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStats {
    /// Number of values scanned.
    pub count: usize,
    /// Smallest non-NaN value, if any.
    pub min: Option<f32>,
    /// Largest non-NaN value, if any.
    pub max: Option<f32>,
    /// Arithmetic mean accumulated in `f64`. NaN if any input is NaN.
    pub mean: f64,
}

impl LayerStats {
    /// Scan `values`.
    pub fn compute(values: &[f32]) -> Self {
        let range = min_max(values.iter().copied());
        let sum: f64 = values.iter().map(|&v| v as f64).sum();
        let mean = if values.is_empty() {
            0.0
        } else {
            sum / values.len() as f64
        };
        Self {
            count: values.len(),
            min: range.map(|r| r.0),
            max: range.map(|r| r.1),
            mean,
        }
    }
}

impl fmt::Display for LayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "Min={min} Max={max}")?,
            _ => write!(f, "Min=n/a Max=n/a")?,
        }
        write!(f, " Mean={} ({} values)", self.mean, self.count)
    }
}

// ── Health ──────────────────────────────────────────────────────────

/// Limits applied by [`HealthReport::scan`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthThresholds {
    /// `|v|` above this is exploding.
    pub exploding: f32,
    /// Non-zero `|v|` below this is vanishing.
    pub vanishing: f32,
    /// Zero fraction above this is high sparsity.
    pub sparsity: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            exploding: 100.0,
            vanishing: 1e-7,
            sparsity: 0.9,
        }
    }
}

/// Numerical health of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthReport {
    /// Values scanned.
    pub total: usize,
    /// NaN count.
    pub nan: usize,
    /// Infinity count (either sign).
    pub inf: usize,
    /// Exact zero count (`-0.0` included).
    pub zero: usize,
    /// Count of values with `0 < |v| < vanishing`.
    pub vanishing: usize,
    /// Largest `|v|` over non-NaN values; 0 when there are none.
    pub max_abs: f32,
    /// Whether `max_abs` exceeds the exploding threshold.
    pub exploding: bool,
    /// `zero / total`, in `[0, 1]`.
    pub zero_fraction: f64,
    /// Whether `zero_fraction` exceeds the sparsity threshold.
    pub sparse: bool,
    /// Thresholds the scan was run with.
    pub thresholds: HealthThresholds,
}

impl HealthReport {
    /// Scan `values` against `thresholds`.
    pub fn scan(values: &[f32], thresholds: HealthThresholds) -> Self {
        let mut report = Self {
            total: values.len(),
            nan: 0,
            inf: 0,
            zero: 0,
            vanishing: 0,
            max_abs: 0.0,
            exploding: false,
            zero_fraction: 0.0,
            sparse: false,
            thresholds,
        };
        for &v in values {
            if v.is_nan() {
                report.nan += 1;
                continue;
            }
            if v.is_infinite() {
                report.inf += 1;
            }
            let abs = v.abs();
            if v == 0.0 {
                report.zero += 1;
            } else if abs < thresholds.vanishing {
                report.vanishing += 1;
            }
            report.max_abs = report.max_abs.max(abs);
        }
        report.exploding = report.max_abs > thresholds.exploding;
        if report.total > 0 {
            report.zero_fraction = report.zero as f64 / report.total as f64;
        }
        report.sparse = report.zero_fraction > thresholds.sparsity;
        report
    }

    /// No NaN, no Inf, nothing exploding, vanishing, or overly sparse.
    pub fn is_healthy(&self) -> bool {
        self.nan == 0 && self.inf == 0 && !self.exploding && !self.sparse && self.vanishing == 0
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nan > 0 {
            writeln!(f, "[FAIL] Found {} NaN!", self.nan)?;
        } else {
            writeln!(f, "[PASS] No NaN values.")?;
        }
        if self.inf > 0 {
            writeln!(f, "[FAIL] Found {} Inf!", self.inf)?;
        } else {
            writeln!(f, "[PASS] No Inf values.")?;
        }
        if self.exploding {
            writeln!(f, "[WARN] Large value detected! (max |v| = {})", self.max_abs)?;
        } else {
            writeln!(f, "[PASS] Values within normal range (max |v| = {}).", self.max_abs)?;
        }
        let pct = self.zero_fraction * 100.0;
        if self.sparse {
            writeln!(f, "[WARN] High sparsity: {pct:.1}% zeros (dead layer?)")?;
        } else {
            writeln!(f, "[INFO] Sparsity: {pct:.1}%")?;
        }
        if self.vanishing > 0 {
            writeln!(
                f,
                "[WARN] Vanishing gradients: {} values are extremely small (< {:e})",
                self.vanishing, self.thresholds.vanishing
            )?;
        }
        if self.is_healthy() {
            writeln!(f, "Verdict: healthy")
        } else {
            writeln!(f, "Verdict: needs attention")
        }
    }
}

// ── Histogram ───────────────────────────────────────────────────────

/// Equal-width bucket counts between a layer's finite min and max.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bucket.
    pub min: f32,
    /// Upper edge of the last bucket (inclusive).
    pub max: f32,
    /// One count per bucket.
    pub counts: Vec<usize>,
    /// Characters in the longest bar when displayed.
    pub bar_width: usize,
}

impl Histogram {
    /// Width of each bucket.
    pub fn step(&self) -> f64 {
        (self.max as f64 - self.min as f64) / self.counts.len() as f64
    }

    /// `[start, end)` of bucket `i` (the last bucket includes `end`).
    pub fn bucket_range(&self, i: usize) -> (f64, f64) {
        let step = self.step();
        let start = self.min as f64 + i as f64 * step;
        (start, start + step)
    }

    /// Bar length for bucket `i`, scaled so the fullest bucket gets
    /// `bar_width` characters.
    pub fn bar_len(&self, i: usize) -> usize {
        let peak = self.counts.iter().copied().max().unwrap_or(0);
        if peak == 0 {
            return 0;
        }
        self.counts[i] * self.bar_width / peak
    }

    /// Sum of all buckets.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, count) in self.counts.iter().enumerate() {
            let (start, end) = self.bucket_range(i);
            writeln!(
                f,
                "{start:6.2} .. {end:6.2} | {} ({count})",
                "#".repeat(self.bar_len(i))
            )?;
        }
        Ok(())
    }
}

/// Shape of a layer's value distribution.
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    /// No finite values to bucket.
    Empty,
    /// Every finite value is the same.
    Flat {
        /// The single value.
        value: f32,
    },
    /// At least two distinct finite values.
    Spread(Histogram),
}

impl Distribution {
    /// Bucket the finite values of `values` into `bins` equal-width buckets.
    ///
    /// `bins` must be at least 1.
    pub fn compute(values: &[f32], bins: usize, bar_width: usize) -> Self {
        let bins = bins.max(1);
        let Some((min, max)) = min_max(values.iter().copied().filter(|v| v.is_finite())) else {
            return Self::Empty;
        };
        if min >= max {
            return Self::Flat { value: min };
        }

        let lo = min as f64;
        let step = (max as f64 - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in values.iter().filter(|v| v.is_finite()) {
            let bucket = ((*v as f64 - lo) / step) as usize;
            counts[bucket.min(bins - 1)] += 1;
        }
        Self::Spread(Histogram {
            min,
            max,
            counts,
            bar_width,
        })
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => writeln!(f, "Histogram: no finite values"),
            Self::Flat { value } => writeln!(f, "Histogram: flat value ({value})"),
            Self::Spread(h) => write!(f, "{h}"),
        }
    }
}
