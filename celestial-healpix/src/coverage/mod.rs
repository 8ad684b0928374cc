//! Sky-region coverage queries returning a [`BMOC`].
//!
//! All queries walk the nested hierarchy from the 12 base cells, classifying
//! each visited cell as out, fully covered or partially covered; only partial
//! cells are refined. Results may hold false positives (partial cells that
//! do not actually overlap the region) but never miss an overlapping cell.
//!
//! | Query | Region |
//! |-------|--------|
//! | [`cone_coverage_approx`] | Small circle of given radius |
//! | [`elliptical_cone_coverage`] | Ellipse in the tangent plane at its center |
//! | [`polygon_coverage`] | Polygon with great-circle edges |

mod cone;
mod elliptical;
mod polygon;

pub use cone::{cone_coverage_approx, cone_coverage_approx_custom};
pub use elliptical::{elliptical_cone_coverage, elliptical_cone_coverage_custom};
pub use polygon::polygon_coverage;

use crate::bmoc::{BMOCBuilder, BMOC};
use crate::constants::N_BASE_CELLS;
use crate::nested::{self, Layer};

/// Classification of a cell against a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overlap {
    Out,
    Partial,
    Full,
}

/// Refines cells from depth 0 down to `depth_max` and degrades the result to
/// `depth`.
pub(crate) fn descend<F>(depth: u8, depth_max: u8, classify: F) -> BMOC
where
    F: Fn(&Layer, u64) -> Overlap,
{
    let mut builder = BMOCBuilder::new(depth_max, 128);
    for d0h in 0..N_BASE_CELLS {
        visit(0, d0h, depth_max, &classify, &mut builder);
    }
    tracing::trace!(depth_max, n_raw = builder.len(), "coverage descent done");
    builder.to_bmoc().degrade(depth)
}

fn visit<F>(depth: u8, hash: u64, depth_max: u8, classify: &F, builder: &mut BMOCBuilder)
where
    F: Fn(&Layer, u64) -> Overlap,
{
    let layer = nested::get(depth);
    match classify(layer, hash) {
        Overlap::Out => {}
        Overlap::Full => {
            builder.push(depth, hash, true);
        }
        Overlap::Partial if depth == depth_max => {
            builder.push(depth, hash, false);
        }
        Overlap::Partial => {
            for child in Layer::children(hash) {
                visit(depth + 1, child, depth_max, classify, builder);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descend_everything_full() {
        let bmoc = descend(3, 5, |_, _| Overlap::Full);
        assert_eq!(bmoc.depth_max(), 3);
        assert_eq!(bmoc.size(), 12);
        assert_eq!(bmoc.deep_size(), 12 * 64);
    }

    #[test]
    fn test_descend_partial_reaches_depth_max() {
        let bmoc = descend(2, 2, |layer, hash| {
            if layer.depth() < 2 && hash < 4 {
                Overlap::Partial
            } else if layer.depth() == 2 {
                Overlap::Partial
            } else {
                Overlap::Out
            }
        });
        // Only base cell 0 is refined: its 16 depth-2 cells.
        assert_eq!(bmoc.size(), 16);
        assert!(bmoc.iter().all(|c| c.depth == 2 && !c.is_full && c.hash < 16));
    }
}
