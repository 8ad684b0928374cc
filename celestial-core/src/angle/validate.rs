use super::core::Angle;
use crate::constants::{HALF_PI, PI};
use crate::{AstroError, MathErrorKind};

/// Validates a longitude and wraps it to [0, 2pi).
///
/// Any finite value is accepted: longitudes are cyclic.
pub fn validate_longitude(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_longitude",
            MathErrorKind::NotFinite,
            "Lon not finite",
        ));
    }
    Ok(angle.normalized())
}

/// Validates a latitude against [-90°, +90°].
pub fn validate_latitude(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_latitude",
            MathErrorKind::NotFinite,
            "Lat not finite",
        ));
    }

    if (-HALF_PI..=HALF_PI).contains(&rad) {
        return Ok(angle);
    }

    Err(AstroError::math_error(
        "validate_latitude",
        MathErrorKind::OutOfRange,
        &format!("Lat {:.6}° out of range [-90°, +90°]", angle.degrees()),
    ))
}

/// Validates a cone radius: finite and in ]0, pi].
pub fn validate_radius(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_radius",
            MathErrorKind::NotFinite,
            "Radius not finite",
        ));
    }
    if rad <= 0.0 || rad > PI {
        return Err(AstroError::math_error(
            "validate_radius",
            MathErrorKind::OutOfRange,
            &format!("Radius {:.6}° out of range ]0°, 180°]", angle.degrees()),
        ));
    }
    Ok(angle)
}
