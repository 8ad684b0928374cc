use celestial_core::constants::HALF_PI;
use celestial_core::Vector3;

use super::{descend, Overlap};
use crate::bmoc::BMOC;
use crate::constants::{DEFAULT_DELTA_DEPTH, DEPTH_MAX};
use crate::error::{HealpixError, HealpixResult};
use crate::validate::{check_depth, check_lonlat};

/// Safety factor applied to the cell radius around the ellipse boundary.
const CELL_MARGIN: f64 = 1.2;

/// Bisection steps of the point-to-ellipse distance; each halves the bracket.
const MAX_BISECTIONS: usize = 96;

/// Ellipse on the sphere, defined in the orthographic projection tangent at
/// its center.
///
/// The orthographic projection never increases distances, so a cell whose
/// center projects further than its radius from the ellipse boundary lies
/// entirely on one side of it.
struct Ellipse {
    center: Vector3,
    east: Vector3,
    north: Vector3,
    a: f64,
    /// Semi-axes in the tangent plane: `sin(a) >= sin(b)`.
    sin_a: f64,
    sin_b: f64,
    sin_pa: f64,
    cos_pa: f64,
}

impl Ellipse {
    fn new(lon: f64, lat: f64, a: f64, b: f64, pa: f64) -> Self {
        let (east, north) = Vector3::local_frame(lon, lat);
        let (sin_pa, cos_pa) = libm::sincos(pa);
        Self {
            center: Vector3::from_spherical(lon, lat),
            east,
            north,
            a,
            sin_a: libm::sin(a),
            sin_b: libm::sin(b),
            sin_pa,
            cos_pa,
        }
    }

    /// Coordinates of the projection of `p` along the major and minor axes.
    fn tangent_coords(&self, p: &Vector3) -> (f64, f64) {
        let x = p.dot(&self.east);
        let y = p.dot(&self.north);
        (
            y * self.cos_pa + x * self.sin_pa,
            x * self.cos_pa - y * self.sin_pa,
        )
    }

    fn contains(&self, p: &Vector3) -> bool {
        if p.dot(&self.center) <= 0.0 {
            return false;
        }
        let (major, minor) = self.tangent_coords(p);
        (major / self.sin_a).powi(2) + (minor / self.sin_b).powi(2) <= 1.0
    }

    fn classify(&self, p: &Vector3, r_cell: f64) -> Overlap {
        // Every point of the ellipse is within `a` of its center.
        if self.center.angle_to(p) > self.a + r_cell {
            return Overlap::Out;
        }
        if p.dot(&self.center) <= 0.0 {
            return Overlap::Partial;
        }
        let (major, minor) = self.tangent_coords(p);
        let inside = (major / self.sin_a).powi(2) + (minor / self.sin_b).powi(2) <= 1.0;
        let distance = distance_to_ellipse(self.sin_a, self.sin_b, major.abs(), minor.abs());
        if distance <= CELL_MARGIN * r_cell {
            Overlap::Partial
        } else if inside {
            Overlap::Full
        } else {
            Overlap::Out
        }
    }
}

/// Euclidean distance from `(u, v)`, first quadrant, to the boundary of the
/// plane ellipse of semi-axes `e0 >= e1 > 0`.
///
/// The closest boundary point is `(e0^2 u / (t + e0^2), e1^2 v / (t + e1^2))`
/// for the unique root `t` of the boundary equation; the root is bracketed
/// and found by bisection on `s = t / e1^2`.
fn distance_to_ellipse(e0: f64, e1: f64, u: f64, v: f64) -> f64 {
    if v > 0.0 {
        if u > 0.0 {
            let z0 = u / e0;
            let z1 = v / e1;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                return 0.0;
            }
            let r0 = (e0 / e1).powi(2);
            let s = boundary_root(r0, z0, z1, g);
            let x0 = r0 * u / (s + r0);
            let x1 = v / (s + 1.0);
            (x0 - u).hypot(x1 - v)
        } else {
            (v - e1).abs()
        }
    } else {
        let numer = e0 * u;
        let denom = e0 * e0 - e1 * e1;
        if numer < denom {
            let xde0 = numer / denom;
            let x0 = e0 * xde0;
            let x1 = e1 * (1.0 - xde0 * xde0).max(0.0).sqrt();
            (x0 - u).hypot(x1)
        } else {
            (u - e0).abs()
        }
    }
}

fn boundary_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z1) - 1.0 };
    let mut s = 0.0;
    for _ in 0..MAX_BISECTIONS {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let g = (n0 / (s + r0)).powi(2) + (z1 / (s + 1.0)).powi(2) - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

/// Cells of depth `depth` overlapping the elliptical cone of center
/// (lon, lat), semi-major axis `a`, semi-minor axis `b` and position angle
/// `pa` (east of north), all radians.
pub fn elliptical_cone_coverage(
    depth: u8,
    lon: f64,
    lat: f64,
    a: f64,
    b: f64,
    pa: f64,
) -> HealpixResult<BMOC> {
    elliptical_cone_coverage_custom(depth, DEFAULT_DELTA_DEPTH, lon, lat, a, b, pa)
}

/// Same as [`elliptical_cone_coverage`] with an explicit refinement depth.
pub fn elliptical_cone_coverage_custom(
    depth: u8,
    delta_depth: u8,
    lon: f64,
    lat: f64,
    a: f64,
    b: f64,
    pa: f64,
) -> HealpixResult<BMOC> {
    check_depth(depth)?;
    let (lon, lat) = check_lonlat(lon, lat)?;
    if !(a.is_finite() && b.is_finite() && pa.is_finite()) {
        return Err(HealpixError::invalid_ellipse("a, b and pa must be finite"));
    }
    if a >= HALF_PI {
        return Err(HealpixError::invalid_ellipse(format!(
            "semi-major axis {} must be lower than pi/2",
            a
        )));
    }
    if b <= 0.0 || b > a {
        return Err(HealpixError::invalid_ellipse(format!(
            "semi-minor axis {} must be in ]0, a = {}]",
            b, a
        )));
    }

    let depth_max = depth.saturating_add(delta_depth).min(DEPTH_MAX);
    let ellipse = Ellipse::new(lon, lat, a, b, pa);
    let bmoc = descend(depth, depth_max, |layer, hash| {
        let (cell_lon, cell_lat) = layer.center(hash);
        let p = Vector3::from_spherical(cell_lon, cell_lat);
        ellipse.classify(&p, layer.cell_radius_upper_bound(hash))
    });
    tracing::debug!(depth, depth_max, lon, lat, a, b, pa, n_cells = bmoc.size(), "elliptical cone coverage");
    Ok(bmoc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nested;
    use approx::assert_abs_diff_eq;
    use celestial_core::constants::DEG_TO_RAD;

    #[test]
    fn test_contains_axes() {
        let e = Ellipse::new(0.0, 0.0, 10.0 * DEG_TO_RAD, 2.0 * DEG_TO_RAD, 0.0);
        // pa = 0: major axis along north.
        let north = Vector3::from_spherical(0.0, 9.0 * DEG_TO_RAD);
        let east = Vector3::from_spherical(9.0 * DEG_TO_RAD, 0.0);
        assert!(e.contains(&north));
        assert!(!e.contains(&east));

        let rotated = Ellipse::new(0.0, 0.0, 10.0 * DEG_TO_RAD, 2.0 * DEG_TO_RAD, 90.0 * DEG_TO_RAD);
        assert!(!rotated.contains(&north));
        assert!(rotated.contains(&east));
    }

    #[test]
    fn test_back_hemisphere_is_outside() {
        let e = Ellipse::new(0.0, 0.0, 80.0 * DEG_TO_RAD, 80.0 * DEG_TO_RAD, 0.0);
        let opposite = Vector3::from_spherical(celestial_core::constants::PI, 0.0);
        assert!(!e.contains(&opposite));
        assert_eq!(e.classify(&opposite, 0.01), Overlap::Out);
    }

    #[test]
    fn test_distance_to_ellipse() {
        let (e0, e1) = (2.0, 0.5);
        // On the axes.
        assert_abs_diff_eq!(distance_to_ellipse(e0, e1, 3.0, 0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance_to_ellipse(e0, e1, 0.0, 1.5), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance_to_ellipse(e0, e1, 0.0, 0.0), 0.5, epsilon = 1e-12);
        // Circle: distance is the radial gap.
        assert_abs_diff_eq!(distance_to_ellipse(1.0, 1.0, 0.9, 1.2), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(distance_to_ellipse(1.0, 1.0, 0.3, 0.4), 0.5, epsilon = 1e-12);

        // Brute force over the boundary of a thin ellipse, inside and outside.
        let (e0, e1) = (0.3, 0.004);
        for &(u, v) in &[(0.2995, 0.0001), (0.301, 0.0002), (0.25, 0.003), (0.1, 0.01), (0.31, 0.0)] {
            let brute = (0..200_000)
                .map(|k| {
                    let t = k as f64 * std::f64::consts::FRAC_PI_2 / 200_000.0;
                    (e0 * t.cos() - u).hypot(e1 * t.sin() - v)
                })
                .fold(f64::INFINITY, f64::min);
            assert_abs_diff_eq!(distance_to_ellipse(e0, e1, u, v), brute, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cell_near_major_axis_end_is_kept() {
        // Thin ellipse: this cell center is outside the ellipse inflated by
        // 1.2 r_cell on both axes, yet within 1.2 r_cell of the tip.
        let d = DEG_TO_RAD;
        let e = Ellipse::new(0.0, 0.0, 5.0 * d, 0.05 * d, 0.0);
        let r_cell = 0.1 * d;
        let near_tip = Vector3::from_spherical(0.1 * d, 5.05 * d);
        assert_eq!(e.classify(&near_tip, r_cell), Overlap::Partial);
        let beyond = Vector3::from_spherical(0.0, 5.3 * d);
        assert_eq!(e.classify(&beyond, r_cell), Overlap::Out);
        let on_axis = Vector3::from_spherical(0.0, 1.0 * d);
        assert_eq!(e.classify(&on_axis, 0.01 * d), Overlap::Full);
    }

    #[test]
    fn test_contains_center_cell() {
        let (lon, lat) = (200.0 * DEG_TO_RAD, -40.0 * DEG_TO_RAD);
        let bmoc = elliptical_cone_coverage(
            5,
            lon,
            lat,
            6.0 * DEG_TO_RAD,
            2.0 * DEG_TO_RAD,
            30.0 * DEG_TO_RAD,
        )
        .unwrap();
        let h = nested::get(5).hash(lon, lat);
        assert!(bmoc.contains_cell(5, h).is_some());
    }

    #[test]
    fn test_validation() {
        let d = DEG_TO_RAD;
        assert!(elliptical_cone_coverage(3, 0.0, 0.0, 90.0 * d, 10.0 * d, 0.0).is_err());
        assert!(elliptical_cone_coverage(3, 0.0, 0.0, 10.0 * d, 20.0 * d, 0.0).is_err());
        assert!(elliptical_cone_coverage(3, 0.0, 0.0, 10.0 * d, 0.0, 0.0).is_err());
        assert!(elliptical_cone_coverage(3, 0.0, 0.0, 10.0 * d, 10.0 * d, f64::NAN).is_err());
        assert!(elliptical_cone_coverage(3, 0.0, 0.0, 10.0 * d, 10.0 * d, 0.0).is_ok());
    }
}
