//! Shared building blocks for the celestial HEALPix crates.
//!
//! `celestial-core` holds the small amount of spherical math that every
//! sky-indexing routine needs: a typed [`Angle`], longitude/latitude
//! normalisation and validation, unit vectors on the celestial sphere and the
//! numeric constants used by the HEALPix projection.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | [`Angle`] type, wrapping/clamping, longitude/latitude/radius validation |
//! | [`vector`] | [`Vector3`] unit vectors, great-circle distance, cross/dot products |
//! | [`math`] | `libm` wrappers, Vincenty separation, domain-safe inverse trig |
//! | [`constants`] | Angular constants and HEALPix projection constants |
//! | [`errors`] | [`AstroError`] and [`AstroResult`] |
//!
//! # Re-exports
//!
//! ```
//! use celestial_core::{Angle, Vector3};
//! use celestial_core::{AstroError, AstroResult, MathErrorKind};
//! ```
//!
//! # Design Notes
//!
//! - **Radians internally**: every function takes and returns radians; the
//!   [`Angle`] type is the only place where degrees appear.
//! - **No implicit state**: all functions are pure.

pub mod angle;
pub mod constants;
pub mod errors;
pub mod math;
pub mod vector;

pub use angle::Angle;
pub use errors::{AstroError, AstroResult, MathErrorKind};
pub use vector::Vector3;
