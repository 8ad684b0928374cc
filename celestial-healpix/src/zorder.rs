//! Z-order (Morton) curve used by the nested numbering inside a base cell.
//!
//! The bits of `i` go to the even positions of the hash, the bits of `j` to
//! the odd positions, so the four children of cell `h` are `4h + {0, 1, 2, 3}`
//! = South, East, West, North.

#[inline]
fn spread(v: u32) -> u64 {
    let mut x = v as u64;
    x = (x | (x << 16)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x << 8)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555;
    x
}

#[inline]
fn compact(h: u64) -> u32 {
    let mut x = h & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x >> 4)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x >> 8)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x >> 16)) & 0x0000_0000_FFFF_FFFF;
    x as u32
}

/// Interleaves `(i, j)` into a z-order index.
#[inline]
pub fn ij2h(i: u32, j: u32) -> u64 {
    spread(i) | (spread(j) << 1)
}

/// Splits a z-order index into `(i, j)`.
#[inline]
pub fn h2ij(h: u64) -> (u32, u32) {
    (compact(h), compact(h >> 1))
}
