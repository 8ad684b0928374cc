//! RING scheme: cells numbered along iso-latitude rings from the North pole.
//!
//! Unlike the nested scheme, the ring scheme is defined for any `nside`, not
//! only powers of two. Positions are computed in the base cell frame shared
//! with [`crate::nested`] (`FacePosition`) and converted to a ring index with
//! the usual ring/face tables.

use crate::compass::Cardinal;
use crate::constants::n_isolatitude_cells;
use crate::error::HealpixResult;
use crate::proj::FacePosition;
use crate::validate::check_nside;

/// Ring number of the South vertex of each base cell, in units of nside.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// Longitude index of each base cell center, in units of `nside / 2`.
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// Ring scheme for one nside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLayer {
    nside: u32,
    ncap: u64,
    npix: u64,
}

impl RingLayer {
    pub fn new(nside: u32) -> HealpixResult<Self> {
        check_nside(nside)?;
        let n = nside as u64;
        Ok(Self {
            nside,
            ncap: 2 * n * (n - 1),
            npix: n_isolatitude_cells(nside),
        })
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// Number of cells in the polar cap (`2 nside (nside - 1)`).
    pub fn ncap(&self) -> u64 {
        self.ncap
    }

    pub fn npix(&self) -> u64 {
        self.npix
    }

    pub fn hash(&self, lon: f64, lat: f64) -> u64 {
        self.hash_with_dxdy(lon, lat).0
    }

    /// Ring index of the cell containing (lon, lat) and the offsets of the
    /// point inside that cell.
    pub fn hash_with_dxdy(&self, lon: f64, lat: f64) -> (u64, f64, f64) {
        let pos = FacePosition::from_lonlat(lon, lat, self.nside);
        let ipix = xyf_to_ring(self.nside, pos.d0h, pos.i, pos.j);
        (ipix, pos.dx, pos.dy)
    }

    pub fn center(&self, ipix: u64) -> (f64, f64) {
        self.sph_coo(ipix, 0.5, 0.5)
    }

    /// (lon, lat) of the point at offset `(dx, dy)` inside cell `ipix`.
    pub fn sph_coo(&self, ipix: u64, dx: f64, dy: f64) -> (f64, f64) {
        self.position(ipix, dx, dy).to_lonlat(self.nside)
    }

    /// Projected (x, y) of the center of cell `ipix`.
    pub fn center_of_projected_cell(&self, ipix: u64) -> (f64, f64) {
        self.projected_point(ipix, 0.5, 0.5)
    }

    /// Projected (x, y) of the point at offset `(dx, dy)` inside cell `ipix`.
    pub fn projected_point(&self, ipix: u64, dx: f64, dy: f64) -> (f64, f64) {
        self.position(ipix, dx, dy).to_plane(self.nside)
    }

    /// Vertices in the order S, E, N, W.
    pub fn vertices(&self, ipix: u64) -> [(f64, f64); 4] {
        Cardinal::ALL.map(|c| {
            let (dx, dy) = c.offset();
            self.sph_coo(ipix, dx, dy)
        })
    }

    /// `4 * step` points along the cell boundary, starting at the South vertex
    /// and going through the E, N and W vertices.
    pub fn path_along_cell_edge(&self, ipix: u64, step: u32) -> Vec<(f64, f64)> {
        edge_offsets(step)
            .map(|(dx, dy)| self.sph_coo(ipix, dx, dy))
            .collect()
    }

    /// Base cell and `(i, j)` coordinates of cell `ipix`.
    pub fn to_xyf(&self, ipix: u64) -> (u8, u32, u32) {
        ring_to_xyf(self.nside, ipix)
    }

    pub fn from_xyf(&self, d0h: u8, i: u32, j: u32) -> u64 {
        xyf_to_ring(self.nside, d0h, i, j)
    }

    fn position(&self, ipix: u64, dx: f64, dy: f64) -> FacePosition {
        let (d0h, i, j) = ring_to_xyf(self.nside, ipix);
        FacePosition { d0h, i, j, dx, dy }
    }
}

/// `(dx, dy)` offsets of `4 * step` points walking the cell edge
/// counter-clockwise from the South vertex.
pub(crate) fn edge_offsets(step: u32) -> impl Iterator<Item = (f64, f64)> {
    let step = step.max(1);
    let one_over_step = 1.0 / step as f64;
    Cardinal::ALL.into_iter().flat_map(move |from| {
        let (x0, y0) = from.offset();
        let (x1, y1) = from.next().offset();
        (0..step).map(move |k| {
            let t = k as f64 * one_over_step;
            (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
        })
    })
}

/// Returns (first index, number of cells, shifted) of ring `ring` (1-based,
/// counted from the North pole).
fn ring_info(nside: i64, ncap: i64, npix: i64, ring: i64) -> (i64, i64, bool) {
    if ring < nside {
        (2 * ring * (ring - 1), 4 * ring, true)
    } else if ring < 3 * nside {
        (ncap + (ring - nside) * 4 * nside, 4 * nside, ((ring - nside) & 1) == 0)
    } else {
        let nr = 4 * nside - ring;
        (npix - 2 * nr * (nr + 1), 4 * nr, true)
    }
}

/// Ring index of cell `(i, j)` of base cell `d0h`.
pub(crate) fn xyf_to_ring(nside: u32, d0h: u8, i: u32, j: u32) -> u64 {
    let nside = nside as i64;
    let ncap = 2 * nside * (nside - 1);
    let npix = 12 * nside * nside;
    let face = d0h as usize;
    let (ix, iy) = (i as i64, j as i64);

    let jr = JRLL[face] * nside - ix - iy - 1;
    let (n_before, ring_len, shifted) = ring_info(nside, ncap, npix, jr);
    let nr = ring_len >> 2;
    let kshift = if shifted { 0 } else { 1 };
    let mut jp = (JPLL[face] * nr + ix - iy + 1 + kshift) / 2;
    if jp < 1 {
        jp += 4 * nside;
    }
    (n_before + jp - 1) as u64
}

/// Base cell and `(i, j)` coordinates of ring cell `ipix`.
pub(crate) fn ring_to_xyf(nside: u32, ipix: u64) -> (u8, u32, u32) {
    let nside = nside as i64;
    let ncap = 2 * nside * (nside - 1);
    let npix = 12 * nside * nside;
    let nl2 = 2 * nside;
    let pix = ipix as i64;

    let (iring, iphi, kshift, nr, face) = if pix < ncap {
        let iring = (1 + isqrt(1 + 2 * pix)) >> 1;
        let iphi = (pix + 1) - 2 * iring * (iring - 1);
        (iring, iphi, 0, iring, (iphi - 1) / iring)
    } else if pix < npix - ncap {
        let ip = pix - ncap;
        let tmp = ip / (4 * nside);
        let iring = tmp + nside;
        let iphi = ip - tmp * 4 * nside + 1;
        let kshift = (iring + nside) & 1;
        let ire = tmp + 1;
        let irm = nl2 + 1 - tmp;
        let ifm = (iphi - (ire >> 1) + nside - 1) / nside;
        let ifp = (iphi - (irm >> 1) + nside - 1) / nside;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        (iring, iphi, kshift, nside, face)
    } else {
        let ip = npix - pix;
        let iring = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        (2 * nl2 - iring, iphi, 0, iring, (iphi - 1) / iring + 8)
    };

    let f = face as usize;
    let irt = iring - JRLL[f] * nside + 1;
    let mut ipt = 2 * iphi - JPLL[f] * nr - kshift - 1;
    if ipt >= nl2 {
        ipt -= 8 * nside;
    }
    let ix = (ipt - irt) >> 1;
    let iy = (-ipt - irt) >> 1;
    (face as u8, ix as u32, iy as u32)
}

/// Integer square root.
fn isqrt(v: i64) -> i64 {
    let mut r = (v as f64).sqrt() as i64;
    while r * r > v {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= v {
        r += 1;
    }
    r
}
