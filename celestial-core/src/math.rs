#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

#[inline]
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Angular distance between two (lon, lat) positions, in radians.
#[inline]
pub fn angular_separation(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (sin_lat1, cos_lat1) = libm::sincos(lat1);
    let (sin_lat2, cos_lat2) = libm::sincos(lat2);
    vincenty_angular_separation(sin_lat1, cos_lat1, sin_lat2, cos_lat2, lon2 - lon1)
}

/// `asin` with the argument clamped to [-1, 1].
#[inline]
pub fn asin_safe(x: f64) -> f64 {
    libm::asin(x.clamp(-1.0, 1.0))
}
