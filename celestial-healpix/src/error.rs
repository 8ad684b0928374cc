use celestial_core::AstroError;
use thiserror::Error;

pub type HealpixResult<T> = Result<T, HealpixError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HealpixError {
    #[error("Invalid depth {depth}: must be in [0, {max}]")]
    InvalidDepth { depth: u8, max: u8 },

    #[error("Invalid nside {nside}: must be in [1, {max}]")]
    InvalidNside { nside: u32, max: u32 },

    #[error("The input HEALPix cells contains value {ipix} out of [0, {npix}[")]
    CellOutOfRange { ipix: u64, npix: u64 },

    #[error("The number of longitudes ({n_lon}) does not match with the number of latitudes ({n_lat}) given")]
    LengthMismatch { n_lon: usize, n_lat: usize },

    #[error("{name} must be between [0, 1], got {value}")]
    InvalidOffset { name: &'static str, value: f64 },

    #[error("The number of step must be >= 1, got {step}")]
    InvalidStep { step: u32 },

    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    #[error("Invalid polygon: {message}")]
    InvalidPolygon { message: String },

    #[error("Invalid elliptical cone: {message}")]
    InvalidEllipse { message: String },

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

impl HealpixError {
    pub fn invalid_depth(depth: u8) -> Self {
        Self::InvalidDepth {
            depth,
            max: crate::constants::DEPTH_MAX,
        }
    }

    pub fn invalid_nside(nside: u32) -> Self {
        Self::InvalidNside {
            nside,
            max: crate::constants::NSIDE_MAX,
        }
    }

    pub fn cell_out_of_range(ipix: u64, npix: u64) -> Self {
        Self::CellOutOfRange { ipix, npix }
    }

    pub fn length_mismatch(n_lon: usize, n_lat: usize) -> Self {
        Self::LengthMismatch { n_lon, n_lat }
    }

    pub fn invalid_offset(name: &'static str, value: f64) -> Self {
        Self::InvalidOffset { name, value }
    }

    pub fn invalid_coordinate(message: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            message: message.into(),
        }
    }

    pub fn invalid_polygon(message: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            message: message.into(),
        }
    }

    pub fn invalid_ellipse(message: impl Into<String>) -> Self {
        Self::InvalidEllipse {
            message: message.into(),
        }
    }

    pub fn thread_pool(message: impl Into<String>) -> Self {
        Self::ThreadPool {
            message: message.into(),
        }
    }
}

impl From<AstroError> for HealpixError {
    fn from(error: AstroError) -> Self {
        Self::invalid_coordinate(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial_core::MathErrorKind;

    #[test]
    fn test_cell_out_of_range() {
        let err = HealpixError::cell_out_of_range(48, 48);
        assert_eq!(
            err.to_string(),
            "The input HEALPix cells contains value 48 out of [0, 48["
        );
    }

    #[test]
    fn test_invalid_depth() {
        let err = HealpixError::invalid_depth(30);
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("[0, 29]"));
    }

    #[test]
    fn test_length_mismatch() {
        let err = HealpixError::length_mismatch(3, 2);
        assert!(err.to_string().contains("(3)"));
        assert!(err.to_string().contains("(2)"));
    }

    #[test]
    fn test_from_astro_error() {
        let core = AstroError::math_error("validate_latitude", MathErrorKind::OutOfRange, "lat 95°");
        let err: HealpixError = core.into();
        assert!(matches!(err, HealpixError::InvalidCoordinate { .. }));
        assert!(err.to_string().contains("lat 95°"));
    }
}
