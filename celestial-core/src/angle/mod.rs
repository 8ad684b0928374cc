mod core;
mod normalize;
#[cfg(feature = "serde")]
mod serde_;
mod validate;

pub use core::{arcmin, arcsec, deg, rad, Angle};
pub use normalize::{wrap_0_2pi, wrap_pm_pi};
pub use validate::{validate_latitude, validate_longitude, validate_radius};
