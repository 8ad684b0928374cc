use celestial_core::angle::validate_radius;
use celestial_core::constants::PI;
use celestial_core::{Angle, Vector3};

use super::{descend, Overlap};
use crate::bmoc::BMOC;
use crate::constants::{DEFAULT_DELTA_DEPTH, DEPTH_MAX};
use crate::error::HealpixResult;
use crate::validate::{check_depth, check_lonlat};

/// Cells of depth `depth` overlapping the cone of center (lon, lat) and
/// given radius, all radians. Refines [`DEFAULT_DELTA_DEPTH`] levels deeper
/// before degrading.
pub fn cone_coverage_approx(depth: u8, lon: f64, lat: f64, radius: f64) -> HealpixResult<BMOC> {
    cone_coverage_approx_custom(depth, DEFAULT_DELTA_DEPTH, lon, lat, radius)
}

/// Same as [`cone_coverage_approx`] with an explicit refinement depth.
///
/// A larger `delta_depth` reduces the number of false positives at the cost
/// of more cells to visit. A radius of pi or more returns the whole sky.
pub fn cone_coverage_approx_custom(
    depth: u8,
    delta_depth: u8,
    lon: f64,
    lat: f64,
    radius: f64,
) -> HealpixResult<BMOC> {
    check_depth(depth)?;
    let (lon, lat) = check_lonlat(lon, lat)?;
    if radius.is_finite() && radius >= PI {
        return Ok(BMOC::new_allsky(depth));
    }
    let radius = validate_radius(Angle::from_radians(radius))?.radians();

    let depth_max = depth.saturating_add(delta_depth).min(DEPTH_MAX);
    let center = Vector3::from_spherical(lon, lat);
    let bmoc = descend(depth, depth_max, |layer, hash| {
        let (l, b) = layer.center(hash);
        let dist = center.angle_to(&Vector3::from_spherical(l, b));
        let r_cell = layer.cell_radius_upper_bound(hash);
        if dist > radius + r_cell {
            Overlap::Out
        } else if dist + r_cell <= radius {
            Overlap::Full
        } else {
            Overlap::Partial
        }
    });
    tracing::debug!(depth, depth_max, lon, lat, radius, n_cells = bmoc.size(), "cone coverage");
    Ok(bmoc)
}
