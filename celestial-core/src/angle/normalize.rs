//! Angle normalization.
//!
//! | Quantity | Range | Function |
//! |----------|-------|----------|
//! | Longitude (HEALPix input) | [0, 2pi) | [`wrap_0_2pi`] |
//! | Position angle, signed longitude | [-pi, +pi) | [`wrap_pm_pi`] |
//!
//! The wrapping functions use `libm::fmod` (via [`crate::math::fmod`]) and
//! then shift the remainder into the target range.

use crate::constants::{PI, TWOPI};
use crate::math::fmod;

/// Wraps an angle to [-pi, +pi) radians.
#[inline]
pub fn wrap_pm_pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w.abs() >= PI {
        return w - TWOPI.copysign(x);
    }

    w
}

/// Wraps an angle to [0, 2pi) radians.
///
/// A value that rounds to exactly 2pi after the shift is mapped to 0 so the
/// result is always strictly below 2pi.
///
/// ```
/// use celestial_core::angle::wrap_0_2pi;
/// use std::f64::consts::PI;
///
/// assert!((wrap_0_2pi(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-10);
/// assert!((wrap_0_2pi(5.0 * PI) - PI).abs() < 1e-10);
/// assert!(wrap_0_2pi(-1e-300) < 2.0 * PI);
/// ```
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w < 0.0 {
        let shifted = w + TWOPI;
        if shifted >= TWOPI {
            0.0
        } else {
            shifted
        }
    } else {
        w
    }
}
