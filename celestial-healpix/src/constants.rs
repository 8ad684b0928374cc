/// Deepest supported nested depth: `4 + 2 * 29` hash bits plus the BMOC
/// sentinel and flag bits fill exactly 64 bits.
pub const DEPTH_MAX: u8 = 29;

/// `nside` at [`DEPTH_MAX`], also the largest nside accepted by the ring scheme.
pub const NSIDE_MAX: u32 = 1 << DEPTH_MAX;

/// Number of base cells.
pub const N_BASE_CELLS: u64 = 12;

/// Number of cells at the given depth: `12 * 4^depth`.
#[inline]
pub const fn n_hash(depth: u8) -> u64 {
    N_BASE_CELLS << (depth << 1)
}

/// Number of cells for the given nside: `12 * nside^2`.
#[inline]
pub const fn n_isolatitude_cells(nside: u32) -> u64 {
    N_BASE_CELLS * (nside as u64) * (nside as u64)
}

/// Default extra depth used by the approximated cone and ellipse coverages.
pub const DEFAULT_DELTA_DEPTH: u8 = 2;
