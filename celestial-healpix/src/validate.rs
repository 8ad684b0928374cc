//! Input checks shared by the coverage queries and the batch API.

use celestial_core::angle::{validate_latitude, validate_longitude};
use celestial_core::Angle;

use crate::constants::{DEPTH_MAX, NSIDE_MAX};
use crate::error::{HealpixError, HealpixResult};

pub fn check_depth(depth: u8) -> HealpixResult<()> {
    if depth > DEPTH_MAX {
        return Err(HealpixError::invalid_depth(depth));
    }
    Ok(())
}

pub fn check_nside(nside: u32) -> HealpixResult<()> {
    if nside == 0 || nside > NSIDE_MAX {
        return Err(HealpixError::invalid_nside(nside));
    }
    Ok(())
}

/// Validates a (lon, lat) position, radians; the returned longitude is in
/// [0, 2pi).
pub fn check_lonlat(lon: f64, lat: f64) -> HealpixResult<(f64, f64)> {
    let lon = validate_longitude(Angle::from_radians(lon))?;
    let lat = validate_latitude(Angle::from_radians(lat))?;
    Ok((lon.radians(), lat.radians()))
}

pub fn check_lengths(lon: &[f64], lat: &[f64]) -> HealpixResult<()> {
    if lon.len() != lat.len() {
        return Err(HealpixError::length_mismatch(lon.len(), lat.len()));
    }
    Ok(())
}

/// Every cell index must be in `[0, npix[`.
pub fn check_cells(ipix: &[u64], npix: u64) -> HealpixResult<()> {
    match ipix.iter().find(|&&h| h >= npix) {
        Some(&h) => Err(HealpixError::cell_out_of_range(h, npix)),
        None => Ok(()),
    }
}

/// In-cell offsets must be in [0, 1].
pub fn check_offset(name: &'static str, value: f64) -> HealpixResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(HealpixError::invalid_offset(name, value));
    }
    Ok(())
}

pub fn check_step(step: u32) -> HealpixResult<()> {
    if step < 1 {
        return Err(HealpixError::InvalidStep { step });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_lonlat() {
        let (lon, lat) = check_lonlat(-0.5, 0.3).unwrap();
        assert!((0.0..std::f64::consts::TAU).contains(&lon));
        assert_eq!(lat, 0.3);
        assert!(check_lonlat(0.0, 2.0).is_err());
        assert!(check_lonlat(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_check_cells() {
        assert!(check_cells(&[0, 47], 48).is_ok());
        assert_eq!(
            check_cells(&[0, 48, 100], 48),
            Err(HealpixError::cell_out_of_range(48, 48))
        );
    }

    #[test]
    fn test_scalar_checks() {
        assert!(check_depth(29).is_ok());
        assert!(check_depth(30).is_err());
        assert!(check_nside(0).is_err());
        assert!(check_nside(3).is_ok());
        assert!(check_offset("dx", 1.0).is_ok());
        assert!(check_offset("dy", -0.1).is_err());
        assert!(check_offset("dy", f64::NAN).is_err());
        assert!(check_step(0).is_err());
        assert!(check_lengths(&[0.0], &[]).is_err());
    }
}
