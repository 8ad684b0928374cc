//! Core angle type.
//!
//! [`Angle`] stores radians and converts from/to the units sky positions are
//! usually written in (degrees, arcminutes, arcseconds). HEALPix routines work
//! on raw radians; `Angle` is the typed entry point used by validation and by
//! the command line tools.
//!
//! ```
//! use celestial_core::Angle;
//!
//! let radius = Angle::from_arcminutes(30.0);
//! assert!((radius.degrees() - 0.5).abs() < 1e-12);
//!
//! let lon = Angle::from_degrees(-90.0).normalized();
//! assert!((lon.degrees() - 270.0).abs() < 1e-12);
//! ```

use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::constants::{ARCMIN_TO_RAD, ARCSEC_TO_RAD, HALF_PI, PI};

/// An angular measurement stored as radians.
///
/// `Eq` and `Ord` are not implemented because f64 can be NaN.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Angle {
    rad: f64,
}

impl Angle {
    /// Zero angle (0 radians).
    pub const ZERO: Self = Self { rad: 0.0 };

    /// Pi radians (180 degrees).
    pub const PI: Self = Self { rad: PI };

    /// Pi/2 radians (90 degrees), the latitude of the north pole.
    pub const HALF_PI: Self = Self { rad: HALF_PI };

    #[inline]
    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Self {
            rad: deg.to_radians(),
        }
    }

    #[inline]
    pub fn from_arcminutes(arcmin: f64) -> Self {
        Self {
            rad: arcmin * ARCMIN_TO_RAD,
        }
    }

    #[inline]
    pub fn from_arcseconds(arcsec: f64) -> Self {
        Self {
            rad: arcsec * ARCSEC_TO_RAD,
        }
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.rad
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.rad.to_degrees()
    }

    #[inline]
    pub fn arcminutes(self) -> f64 {
        self.rad / ARCMIN_TO_RAD
    }

    #[inline]
    pub fn arcseconds(self) -> f64 {
        self.rad / ARCSEC_TO_RAD
    }

    #[inline]
    pub fn sin(self) -> f64 {
        libm::sin(self.rad)
    }

    #[inline]
    pub fn cos(self) -> f64 {
        libm::cos(self.rad)
    }

    #[inline]
    pub fn sin_cos(self) -> (f64, f64) {
        libm::sincos(self.rad)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self {
            rad: self.rad.abs(),
        }
    }

    /// Wraps to [0, 2pi), the longitude convention of the HEALPix routines.
    #[inline]
    pub fn normalized(self) -> Self {
        Self {
            rad: super::normalize::wrap_0_2pi(self.rad),
        }
    }

    /// Wraps to [-pi, +pi).
    #[inline]
    pub fn wrapped(self) -> Self {
        Self {
            rad: super::normalize::wrap_pm_pi(self.rad),
        }
    }

    #[inline]
    pub fn validate_longitude(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_longitude(self)
    }

    #[inline]
    pub fn validate_latitude(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_latitude(self)
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Angle::from_radians(self.rad + rhs.rad)
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Angle::from_radians(self.rad - rhs.rad)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    #[inline]
    fn mul(self, k: f64) -> Self {
        Angle::from_radians(self.rad * k)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;
    #[inline]
    fn div(self, k: f64) -> Self {
        Angle::from_radians(self.rad / k)
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Self {
        Angle::from_radians(-self.rad)
    }
}

#[inline]
pub fn rad(v: f64) -> Angle {
    Angle::from_radians(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    Angle::from_degrees(v)
}

#[inline]
pub fn arcmin(v: f64) -> Angle {
    Angle::from_arcminutes(v)
}

#[inline]
pub fn arcsec(v: f64) -> Angle {
    Angle::from_arcseconds(v)
}
