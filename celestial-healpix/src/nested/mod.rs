//! NESTED scheme: hierarchical numbering for depths 0 to 29.
//!
//! At depth `d` a cell hash is `d0h << 2d | zorder(i, j)` with `d0h` the base
//! cell and `(i, j)` the cell coordinates inside it, so the 4 children of `h`
//! are `4h..4h + 4`.
//!
//! ```
//! use celestial_healpix::nested;
//!
//! let layer = nested::get(3);
//! let h = layer.hash(0.5, 0.2);
//! let (lon, lat) = layer.center(h);
//! assert_eq!(layer.hash(lon, lat), h);
//! ```

mod layer;

pub use layer::Layer;

use once_cell::sync::Lazy;

use crate::constants::DEPTH_MAX;
use crate::error::{HealpixError, HealpixResult};

static LAYERS: Lazy<[Layer; DEPTH_MAX as usize + 1]> =
    Lazy::new(|| core::array::from_fn(|depth| Layer::new(depth as u8)));

/// Layer of the given depth.
///
/// # Panics
///
/// If `depth > 29`. Use [`try_get`] for untrusted depths.
pub fn get(depth: u8) -> &'static Layer {
    assert!(depth <= DEPTH_MAX, "Expected depth in [0, {}], got {}", DEPTH_MAX, depth);
    &LAYERS[depth as usize]
}

pub fn try_get(depth: u8) -> HealpixResult<&'static Layer> {
    if depth > DEPTH_MAX {
        return Err(HealpixError::invalid_depth(depth));
    }
    Ok(&LAYERS[depth as usize])
}

/// NUNIQ index: `4 * 4^depth + hash`.
pub fn to_uniq(depth: u8, hash: u64) -> u64 {
    (4u64 << (depth << 1)) + hash
}

/// Inverse of [`to_uniq`]: returns `(depth, hash)`.
pub fn from_uniq(uniq: u64) -> HealpixResult<(u8, u64)> {
    if uniq < 4 {
        return Err(HealpixError::invalid_coordinate(format!(
            "{} is not a valid NUNIQ index",
            uniq
        )));
    }
    let depth = ((63 - uniq.leading_zeros()) >> 1) as u8 - 1;
    if depth > DEPTH_MAX {
        return Err(HealpixError::invalid_depth(depth));
    }
    Ok((depth, uniq - (4u64 << (depth << 1))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_matching_depth() {
        for depth in 0..=DEPTH_MAX {
            assert_eq!(get(depth).depth(), depth);
        }
        assert!(try_get(30).is_err());
    }

    #[test]
    #[should_panic(expected = "Expected depth")]
    fn test_get_panics_on_bad_depth() {
        get(30);
    }

    #[test]
    fn test_uniq() {
        assert_eq!(to_uniq(0, 0), 4);
        assert_eq!(to_uniq(0, 11), 15);
        assert_eq!(to_uniq(1, 0), 16);
        for depth in [0u8, 1, 5, 17, DEPTH_MAX] {
            let n = get(depth).n_hash();
            for hash in [0, 1, n / 2, n - 1] {
                assert_eq!(from_uniq(to_uniq(depth, hash)), Ok((depth, hash)));
            }
        }
        assert!(from_uniq(3).is_err());
    }
}
