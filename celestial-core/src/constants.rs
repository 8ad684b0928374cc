#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const QUARTER_PI: f64 = 0.7853981633974483096156608;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

/// 4 / pi, scale from longitude to the HEALPix projection plane.
#[allow(clippy::excessive_precision)]
pub const FOUR_OVER_PI: f64 = 1.2732395447351626861510701;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

#[allow(clippy::excessive_precision)]
pub const ARCMIN_TO_RAD: f64 = 2.908882086657215961539535e-4;

#[allow(clippy::excessive_precision)]
pub const ARCSEC_TO_RAD: f64 = 4.848136811095359935899141e-6;

#[allow(clippy::excessive_precision)]
pub const SQRT6: f64 = 2.4494897427831780981972840;

/// Limit |sin(lat)| between the equatorial belt and the polar caps.
pub const TRANSITION_Z: f64 = 2.0 / 3.0;

/// Latitude of the equatorial belt / polar cap boundary: asin(2/3).
#[allow(clippy::excessive_precision)]
pub const TRANSITION_LATITUDE: f64 = 0.7297276562269663634547966;
