//! The HEALPix projection.
//!
//! Maps the sphere onto the plane `x in [0, 8)`, `y in [-2, 2]` such that every
//! base cell becomes a square diamond of half-diagonal 1:
//!
//! ```text
//!  y
//!  2        /\      /\      /\      /\
//!  1       / 0\    / 1\    / 2\    / 3\
//!  0  \ 4 /    \ 5 /    \ 6 /    \ 7 /
//! -1   \/ 8     \/ 9     \/10     \/11
//! -2        \/      \/      \/      \/
//!     0   1   2   3   4   5   6   7   8  x
//! ```
//!
//! In the equatorial belt (`|sin lat| <= 2/3`) the projection is the
//! cylindrical equal-area `x = 4 lon / pi`, `y = 3/2 sin lat`. In the polar
//! caps the meridians converge toward the quadrant center `xc` with
//! `sigma = sqrt(3 (1 - |sin lat|))`, computed as
//! `sqrt(6) sin(colatitude / 2)` to keep precision next to the poles.
//!
//! Inside a base cell, positions use the frame `(u, v) in [0, 1]^2`: `u` runs
//! from the South vertex to the East vertex, `v` from the South vertex to the
//! West vertex. The nested `(i, j)` cell coordinates and the `(dx, dy)` offsets
//! are `u * nside` and `v * nside` split into integer and fractional parts.

use celestial_core::angle::wrap_0_2pi;
use celestial_core::constants::{FOUR_OVER_PI, HALF_PI, QUARTER_PI, SQRT6, TRANSITION_Z};
use celestial_core::math::asin_safe;

/// Projects (lon, lat), radians, to the HEALPix plane.
///
/// The longitude may be any finite value, the latitude must be in [-pi/2, pi/2].
pub fn proj(lon: f64, lat: f64) -> (f64, f64) {
    let x_eq = wrap_0_2pi(lon) * FOUR_OVER_PI;
    let z = libm::sin(lat);
    if z.abs() <= TRANSITION_Z {
        (x_eq, 1.5 * z)
    } else {
        let sigma = SQRT6 * libm::sin(0.5 * (HALF_PI - lat.abs()));
        let xc = quadrant_center(x_eq);
        (xc + (x_eq - xc) * sigma, (2.0 - sigma).copysign(lat))
    }
}

/// Inverse of [`proj`]: returns (lon, lat) with lon in [0, 2pi).
pub fn unproj(x: f64, y: f64) -> (f64, f64) {
    let x = wrap_x(x);
    let y_abs = y.abs();
    if y_abs <= 1.0 {
        (x * QUARTER_PI, asin_safe(y * TRANSITION_Z))
    } else {
        let sigma = (2.0 - y_abs).max(0.0);
        let xc = quadrant_center(x);
        let x_eq = if sigma > 1e-15 {
            xc + (x - xc) / sigma
        } else {
            xc
        };
        let lat = HALF_PI - 2.0 * asin_safe(sigma / SQRT6);
        (wrap_0_2pi(x_eq * QUARTER_PI), lat.copysign(y))
    }
}

/// Center of the quadrant (1, 3, 5 or 7) containing `x`.
#[inline]
fn quadrant_center(x: f64) -> f64 {
    2.0 * (0.5 * x).floor().clamp(0.0, 3.0) + 1.0
}

/// Wraps a projected abscissa to [0, 8).
#[inline]
fn wrap_x(x: f64) -> f64 {
    if x < 0.0 {
        x + 8.0
    } else if x >= 8.0 {
        x - 8.0
    } else {
        x
    }
}

/// Projected coordinates of the center of base cell `d0h` (0..12).
///
/// Base cell 4 is centered on `x = 0`, not 8.
#[inline]
pub fn base_cell_center(d0h: u8) -> (f64, f64) {
    let q = (d0h & 3) as f64;
    match d0h >> 2 {
        0 => (2.0 * q + 1.0, 1.0),
        1 => (2.0 * q, 0.0),
        _ => (2.0 * q + 1.0, -1.0),
    }
}

/// Finds the base cell containing the projected point and the point's
/// `(u, v)` position in that cell, both clamped to [0, 1].
pub fn locate(x: f64, y: f64) -> (u8, f64, f64) {
    let q = (0.5 * x).floor().clamp(0.0, 3.0);
    let x_local = x - 2.0 * q;
    let dist_to_axis = (x_local - 1.0).abs();
    let qi = q as u8;
    let (d0h, xc, yc) = if y > 0.0 && dist_to_axis <= y {
        (qi, 2.0 * q + 1.0, 1.0)
    } else if y < 0.0 && dist_to_axis <= -y {
        (8 + qi, 2.0 * q + 1.0, -1.0)
    } else if x_local < 1.0 {
        (4 + qi, 2.0 * q, 0.0)
    } else {
        (4 + ((qi + 1) & 3), 2.0 * q + 2.0, 0.0)
    };
    let ddx = x - xc;
    let ddy = y - yc;
    let u = 0.5 * (1.0 + ddx + ddy);
    let v = 0.5 * (1.0 + ddy - ddx);
    (d0h, u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

/// Projected coordinates of the point at `(u, v)` in base cell `d0h`.
#[inline]
pub fn face_to_plane(d0h: u8, u: f64, v: f64) -> (f64, f64) {
    let (xc, yc) = base_cell_center(d0h);
    (wrap_x(xc + u - v), yc + u + v - 1.0)
}

/// Position of a point inside the cell grid of one base cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePosition {
    /// Base cell, in 0..12.
    pub d0h: u8,
    /// Cell coordinate along the South -> East axis, in `[0, nside[`.
    pub i: u32,
    /// Cell coordinate along the South -> West axis, in `[0, nside[`.
    pub j: u32,
    /// Offset inside the cell along `i`, in [0, 1].
    pub dx: f64,
    /// Offset inside the cell along `j`, in [0, 1].
    pub dy: f64,
}

impl FacePosition {
    /// Locates (lon, lat) in the grid of `nside x nside` cells per base cell.
    ///
    /// `nside` does not have to be a power of two.
    pub fn from_lonlat(lon: f64, lat: f64, nside: u32) -> Self {
        let (x, y) = proj(lon, lat);
        let (d0h, u, v) = locate(x, y);
        let (i, dx) = discretize(u, nside);
        let (j, dy) = discretize(v, nside);
        Self { d0h, i, j, dx, dy }
    }

    /// Projected coordinates of this position.
    pub fn to_plane(&self, nside: u32) -> (f64, f64) {
        let one_over_nside = 1.0 / nside as f64;
        face_to_plane(
            self.d0h,
            (self.i as f64 + self.dx) * one_over_nside,
            (self.j as f64 + self.dy) * one_over_nside,
        )
    }

    /// (lon, lat) of this position.
    pub fn to_lonlat(&self, nside: u32) -> (f64, f64) {
        let (x, y) = self.to_plane(nside);
        unproj(x, y)
    }
}

#[inline]
fn discretize(u: f64, nside: u32) -> (u32, f64) {
    let scaled = u * nside as f64;
    let cell = scaled.floor().clamp(0.0, (nside - 1) as f64);
    let offset = (scaled - cell).clamp(0.0, 1.0);
    (cell as u32, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use celestial_core::constants::{PI, TRANSITION_LATITUDE};

    #[test]
    fn test_proj_equator_and_poles() {
        let (x, y) = proj(0.0, 0.0);
        assert_eq!((x, y), (0.0, 0.0));

        let (x, y) = proj(PI, TRANSITION_LATITUDE);
        assert_abs_diff_eq!(x, 4.0, epsilon = 1e-14);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-14);

        let (x, y) = proj(0.3, HALF_PI);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(y, 2.0, epsilon = 1e-14);

        let (x, y) = proj(4.0, -HALF_PI);
        assert_abs_diff_eq!(x, 5.0, epsilon = 1e-14);
        assert_abs_diff_eq!(y, -2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_proj_is_continuous_at_transition() {
        let eps = 1e-12;
        let (_, y_below) = proj(1.0, TRANSITION_LATITUDE - eps);
        let (_, y_above) = proj(1.0, TRANSITION_LATITUDE + eps);
        assert_abs_diff_eq!(y_below, y_above, epsilon = 1e-10);
    }

    #[test]
    fn test_unproj_inverts_proj() {
        let lats = [-1.5, -1.0, -0.7, -0.2, 0.0, 0.4, 0.75, 1.2, 1.57];
        let lons = [0.0, 0.5, 1.7, 3.1, 4.0, 5.9, 6.28];
        for &lat in &lats {
            for &lon in &lons {
                let (x, y) = proj(lon, lat);
                assert!((0.0..8.0).contains(&x));
                assert!((-2.0..=2.0).contains(&y));
                let (l, b) = unproj(x, y);
                assert_abs_diff_eq!(b, lat, epsilon = 1e-12);
                let dlon = (l - wrap_0_2pi(lon)).abs();
                assert!(dlon < 1e-10 || (dlon - 2.0 * PI).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_base_cell_centers_locate_to_themselves() {
        for d0h in 0..12u8 {
            let (x, y) = base_cell_center(d0h);
            let (found, u, v) = locate(x, y);
            assert_eq!(found, d0h);
            assert_abs_diff_eq!(u, 0.5, epsilon = 1e-15);
            assert_abs_diff_eq!(v, 0.5, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_face_to_plane_vertices() {
        // South, East, North, West vertices of base cell 5.
        assert_eq!(face_to_plane(5, 0.0, 0.0), (2.0, -1.0));
        assert_eq!(face_to_plane(5, 1.0, 0.0), (3.0, 0.0));
        assert_eq!(face_to_plane(5, 1.0, 1.0), (2.0, 1.0));
        assert_eq!(face_to_plane(5, 0.0, 1.0), (1.0, 0.0));
        // The West vertex of base cell 4 wraps to x = 7.
        assert_eq!(face_to_plane(4, 0.0, 1.0), (7.0, 0.0));
    }

    #[test]
    fn test_face_position_round_trip() {
        for nside in [1u32, 3, 16, 1000] {
            for &(lon, lat) in &[(0.1, 0.2), (2.0, -0.9), (5.0, 1.3), (3.3, -1.55)] {
                let pos = FacePosition::from_lonlat(lon, lat, nside);
                assert!(pos.i < nside && pos.j < nside);
                let (l, b) = pos.to_lonlat(nside);
                assert_abs_diff_eq!(l, lon, epsilon = 1e-10);
                assert_abs_diff_eq!(b, lat, epsilon = 1e-10);
            }
        }
    }
}
