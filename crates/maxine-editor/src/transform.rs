//! In-place elementwise transforms.
//!
//! Each function works on a plain slice; the session decides whether that
//! slice is the current layer or the whole tensor.

/// Largest `f32` strictly below 1.
const SIGMOID_CEIL: f32 = 1.0 - f32::EPSILON / 2.0;

/// Clamp every value to `[min, max]`. NaN values are left as they are.
///
/// Callers must ensure `min <= max`.
pub fn clip(values: &mut [f32], min: f32, max: f32) {
    for v in values {
        if *v < min {
            *v = min;
        } else if *v > max {
            *v = max;
        }
    }
}

/// Linearly rescale `values` so the smallest becomes 0 and the largest 1.
///
/// The range comes from the finite values only and is computed in `f64`,
/// so extreme finite inputs cannot overflow it. If every finite value is
/// equal the range is treated as 1, so those values all become 0. `+inf`
/// maps to 1, `-inf` to 0, and NaN stays NaN. Returns the `(min, max)`
/// used, or `None` (and leaves `values` untouched) when there is no
/// finite value.
pub fn normalize(values: &mut [f32]) -> Option<(f32, f32)> {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let lo = f64::from(min);
    let mut range = f64::from(max) - lo;
    if range == 0.0 {
        range = 1.0;
    }
    for v in values.iter_mut() {
        if v.is_nan() {
            continue;
        }
        *v = if *v == f32::INFINITY {
            1.0
        } else if *v == f32::NEG_INFINITY {
            0.0
        } else {
            ((f64::from(*v) - lo) / range) as f32
        };
    }
    Some((min, max))
}

/// Set every value to `value`.
pub fn fill(values: &mut [f32], value: f32) {
    values.fill(value);
}

/// `v = max(0, v)`. Non-negative values (and NaN) are unchanged.
pub fn relu(values: &mut [f32]) {
    for v in values {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
}

/// `v = 1 / (1 + e^-v)`, kept strictly inside `(0, 1)`.
///
/// In `f32` the logistic function saturates to exactly 0 or 1 for large
/// `|v|`; results are clamped to the nearest representable values inside
/// the open interval instead.
pub fn sigmoid(values: &mut [f32]) {
    for v in values {
        let s = 1.0 / (1.0 + (-(*v as f64)).exp());
        *v = (s as f32).clamp(f32::MIN_POSITIVE, SIGMOID_CEIL);
    }
}
