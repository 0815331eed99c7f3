//! Interpolation helpers for lattice noise.

/// Smoothstep function using quintic interpolation.
/// Formula: x³(6x² - 15x + 10)
#[inline]
#[must_use]
pub fn smoothstep(x: f64) -> f64 {
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation between two values.
#[inline]
#[must_use]
pub fn lerp(delta: f64, start: f64, end: f64) -> f64 {
    start + delta * (end - start)
}

/// Bilinear interpolation.
#[inline]
#[must_use]
pub fn lerp2(delta1: f64, delta2: f64, v00: f64, v10: f64, v01: f64, v11: f64) -> f64 {
    lerp(delta2, lerp(delta1, v00, v10), lerp(delta1, v01, v11))
}

/// Trilinear interpolation.
#[allow(clippy::too_many_arguments)] // 3 deltas + 8 corner values
#[inline]
#[must_use]
pub fn lerp3(
    delta1: f64,
    delta2: f64,
    delta3: f64,
    v000: f64,
    v100: f64,
    v010: f64,
    v110: f64,
    v001: f64,
    v101: f64,
    v011: f64,
    v111: f64,
) -> f64 {
    lerp(
        delta3,
        lerp2(delta1, delta2, v000, v100, v010, v110),
        lerp2(delta1, delta2, v001, v101, v011, v111),
    )
}

/// Floor function returning i32.
#[inline]
#[must_use]
pub fn floor(value: f64) -> i32 {
    let i = value as i32;
    if value < f64::from(i) { i - 1 } else { i }
}

/// Clamp a value between min and max.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
