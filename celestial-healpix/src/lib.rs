//! HEALPix indexing of the celestial sphere.
//!
//! HEALPix splits the sphere into 12 base cells, each recursively divided
//! into 4 equal-area children. This crate provides both numbering schemes and
//! the queries built on them.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`proj`] | The HEALPix projection and the base cell frame |
//! | [`nested`] | NESTED scheme: [`nested::Layer`] per depth, NUNIQ conversion |
//! | [`ring`] | RING scheme for any nside: [`ring::RingLayer`] |
//! | [`compass`] | [`MainWind`] and [`Cardinal`] directions, [`Neighbours`] |
//! | [`bmoc`] | [`BMOC`] coverage maps with per-cell "full" flag |
//! | [`coverage`] | Cone, elliptical cone and polygon coverage |
//! | [`batch`] | Validated slice API, optionally parallel |
//!
//! # Example
//!
//! ```
//! use celestial_healpix::{coverage, nested};
//! use celestial_core::constants::DEG_TO_RAD;
//!
//! let (lon, lat) = (120.0 * DEG_TO_RAD, -30.0 * DEG_TO_RAD);
//! let layer = nested::get(8);
//! let hash = layer.hash(lon, lat);
//!
//! let bmoc = coverage::cone_coverage_approx(8, lon, lat, 0.5 * DEG_TO_RAD).unwrap();
//! assert!(bmoc.contains_cell(8, hash).is_some());
//! ```
//!
//! # Features
//!
//! - `parallel` (default): rayon-based [`batch::par_hash_lonlat`].
//! - `serde`: `Serialize`/`Deserialize` on the public data types.
//! - `cli`: the `hpx` binary.

pub mod batch;
pub mod bmoc;
pub mod compass;
pub mod constants;
pub mod coverage;
pub mod error;
pub mod nested;
pub mod proj;
pub mod ring;
pub mod validate;
mod zorder;

pub use bmoc::{BmocCell, Cell, BMOC, BMOCBuilder};
pub use compass::{Cardinal, MainWind, Neighbours};
pub use constants::{DEPTH_MAX, NSIDE_MAX};
pub use error::{HealpixError, HealpixResult};
pub use nested::Layer;
pub use ring::RingLayer;
