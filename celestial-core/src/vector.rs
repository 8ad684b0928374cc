//! 3D Cartesian vectors on the unit sphere.
//!
//! Sky-region tests (cone membership, great-circle arc intersection, polygon
//! containment) are cleanest in Cartesian form. The convention is the usual
//! equatorial one: `x` toward (lon 0, lat 0), `y` toward (lon 90°, lat 0),
//! `z` toward the north pole.
//!
//! ```
//! use celestial_core::Vector3;
//! use std::f64::consts::FRAC_PI_2;
//!
//! let a = Vector3::from_spherical(0.0, 0.0);
//! let b = Vector3::from_spherical(FRAC_PI_2, 0.0);
//! assert!((a.angle_to(&b) - FRAC_PI_2).abs() < 1e-15);
//! assert_eq!(a.cross(&b), Vector3::z_axis());
//! ```

use crate::angle::wrap_0_2pi;
use std::ops::{Add, Mul, Neg, Sub};

/// A 3D Cartesian vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn x_axis() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn y_axis() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    #[inline]
    pub fn z_axis() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.magnitude_squared())
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Unit vector with the same direction; the zero vector is returned unchanged.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            Self::new(self.x / mag, self.y / mag, self.z / mag)
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Angle between two directions, in radians.
    ///
    /// Uses `atan2(|a x b|, a . b)`, which keeps full precision for both tiny
    /// and near-antipodal separations where `acos(a . b)` does not.
    #[inline]
    pub fn angle_to(&self, other: &Self) -> f64 {
        libm::atan2(self.cross(other).magnitude(), self.dot(other))
    }

    /// Unit vector of the (lon, lat) position, radians.
    pub fn from_spherical(lon: f64, lat: f64) -> Self {
        let (sin_lon, cos_lon) = libm::sincos(lon);
        let (sin_lat, cos_lat) = libm::sincos(lat);
        Self::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Returns `(lon, lat)` with `lon` in [0, 2pi) and `lat` in [-pi/2, pi/2].
    ///
    /// The vector does not need to be normalized. For the zero vector, returns `(0.0, 0.0)`.
    pub fn to_spherical(&self) -> (f64, f64) {
        let d2 = self.x * self.x + self.y * self.y;

        let lon = if d2 == 0.0 {
            0.0
        } else {
            wrap_0_2pi(libm::atan2(self.y, self.x))
        };
        let lat = if self.z == 0.0 {
            0.0
        } else {
            libm::atan2(self.z, libm::sqrt(d2))
        };

        (lon, lat)
    }

    /// Unit vectors pointing east and north at this position.
    ///
    /// Well defined at the poles, where "east" follows the longitude carried
    /// by `lon`.
    pub fn local_frame(lon: f64, lat: f64) -> (Self, Self) {
        let (sin_lon, cos_lon) = libm::sincos(lon);
        let (sin_lat, cos_lat) = libm::sincos(lat);
        let east = Self::new(-sin_lon, cos_lon, 0.0);
        let north = Self::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        (east, north)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HALF_PI, PI};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_spherical_round_trip() {
        for &(lon, lat) in &[(0.0, 0.0), (1.0, 0.5), (5.5, -1.2), (3.0, HALF_PI - 1e-9)] {
            let (l, b) = Vector3::from_spherical(lon, lat).to_spherical();
            assert_abs_diff_eq!(l, lon, epsilon = 1e-12);
            assert_abs_diff_eq!(b, lat, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_to_spherical_wraps_longitude() {
        let (lon, _) = Vector3::new(1.0, -1.0, 0.0).to_spherical();
        assert_abs_diff_eq!(lon, 7.0 * PI / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn test_angle_to_small_and_antipodal() {
        let a = Vector3::from_spherical(0.0, 0.0);
        let b = Vector3::from_spherical(1e-10, 0.0);
        assert_abs_diff_eq!(a.angle_to(&b), 1e-10, epsilon = 1e-20);
        assert_abs_diff_eq!(a.angle_to(&(-a)), PI, epsilon = 1e-15);
    }

    #[test]
    fn test_local_frame_is_orthonormal() {
        for &(lon, lat) in &[(0.3, 0.2), (2.0, HALF_PI), (4.0, -HALF_PI)] {
            let p = Vector3::from_spherical(lon, lat);
            let (east, north) = Vector3::local_frame(lon, lat);
            assert_abs_diff_eq!(east.magnitude(), 1.0, epsilon = 1e-15);
            assert_abs_diff_eq!(north.magnitude(), 1.0, epsilon = 1e-15);
            assert_abs_diff_eq!(east.dot(&north), 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(east.dot(&p), 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(north.dot(&p), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3::zeros().normalize(), Vector3::zeros());
        let v = Vector3::new(3.0, 4.0, 0.0).normalize();
        assert_eq!(v, Vector3::new(0.6, 0.8, 0.0));
    }
}
