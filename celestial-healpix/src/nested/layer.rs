use std::ops::Range;

use celestial_core::Vector3;

use crate::compass::{Cardinal, MainWind, Neighbours};
use crate::constants::n_hash;
use crate::proj::FacePosition;
use crate::ring::{edge_offsets, ring_to_xyf, xyf_to_ring};
use crate::zorder::{h2ij, ij2h};

/// Base cell reached when stepping out of base cell `face` through `MainWind`
/// index `nbnum`, `-1` where no base cell exists.
const FACE_ARRAY: [[i8; 12]; 9] = [
    [8, 9, 10, 11, -1, -1, -1, -1, 10, 11, 8, 9],
    [5, 6, 7, 4, 8, 9, 10, 11, 9, 10, 11, 8],
    [-1, -1, -1, -1, 5, 6, 7, 4, -1, -1, -1, -1],
    [4, 5, 6, 7, 11, 8, 9, 10, 11, 8, 9, 10],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
    [1, 2, 3, 0, 0, 1, 2, 3, 5, 6, 7, 4],
    [-1, -1, -1, -1, 7, 4, 5, 6, -1, -1, -1, -1],
    [3, 0, 1, 2, 3, 0, 1, 2, 4, 5, 6, 7],
    [2, 3, 0, 1, -1, -1, -1, -1, 0, 1, 2, 3],
];

/// Coordinate transform applied after crossing into the neighbouring base
/// cell, indexed by `[nbnum][face >> 2]`: bit 1 flips `i`, bit 2 flips `j`,
/// bit 4 swaps them.
const SWAP_ARRAY: [[u8; 3]; 9] = [
    [0, 0, 3],
    [0, 0, 6],
    [0, 0, 0],
    [0, 0, 5],
    [0, 0, 0],
    [5, 0, 0],
    [0, 0, 0],
    [6, 0, 0],
    [3, 0, 0],
];

/// Margin applied to the sampled cell radius.
const CELL_RADIUS_MARGIN: f64 = 1.05;

/// One depth of the nested scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    depth: u8,
    nside: u32,
    twice_depth: u8,
    n_hash: u64,
    xy_mask: u64,
}

impl Layer {
    pub(super) fn new(depth: u8) -> Self {
        let twice_depth = depth << 1;
        Self {
            depth,
            nside: 1u32 << depth,
            twice_depth,
            n_hash: n_hash(depth),
            xy_mask: (1u64 << twice_depth) - 1,
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// Number of cells at this depth: `12 * 4^depth`.
    pub fn n_hash(&self) -> u64 {
        self.n_hash
    }

    /// Hash of the cell containing (lon, lat), in radians.
    pub fn hash(&self, lon: f64, lat: f64) -> u64 {
        self.hash_with_dxdy(lon, lat).0
    }

    /// Hash of the cell containing (lon, lat) and the position of the point
    /// inside the cell, `dx` along the South->East edge and `dy` along the
    /// South->West edge, both in [0, 1].
    pub fn hash_with_dxdy(&self, lon: f64, lat: f64) -> (u64, f64, f64) {
        let pos = FacePosition::from_lonlat(lon, lat, self.nside);
        (self.encode(pos.d0h, pos.i, pos.j), pos.dx, pos.dy)
    }

    /// Builds the hash of cell `(i, j)` of base cell `d0h`.
    #[inline]
    pub fn encode(&self, d0h: u8, i: u32, j: u32) -> u64 {
        ((d0h as u64) << self.twice_depth) | ij2h(i, j)
    }

    /// Splits a hash into its base cell and `(i, j)` coordinates.
    #[inline]
    pub fn decode(&self, hash: u64) -> (u8, u32, u32) {
        let (i, j) = h2ij(hash & self.xy_mask);
        ((hash >> self.twice_depth) as u8, i, j)
    }

    pub fn center(&self, hash: u64) -> (f64, f64) {
        self.sph_coo(hash, 0.5, 0.5)
    }

    /// (lon, lat) of the point at offset `(dx, dy)` inside the cell.
    pub fn sph_coo(&self, hash: u64, dx: f64, dy: f64) -> (f64, f64) {
        self.position(hash, dx, dy).to_lonlat(self.nside)
    }

    /// Center of the cell in the projection plane.
    pub fn center_of_projected_cell(&self, hash: u64) -> (f64, f64) {
        self.projected_point(hash, 0.5, 0.5)
    }

    pub fn projected_point(&self, hash: u64, dx: f64, dy: f64) -> (f64, f64) {
        self.position(hash, dx, dy).to_plane(self.nside)
    }

    pub fn vertex(&self, hash: u64, vertex: Cardinal) -> (f64, f64) {
        let (dx, dy) = vertex.offset();
        self.sph_coo(hash, dx, dy)
    }

    /// Vertices in the order S, E, N, W.
    pub fn vertices(&self, hash: u64) -> [(f64, f64); 4] {
        Cardinal::ALL.map(|c| self.vertex(hash, c))
    }

    /// `4 * step` points along the cell boundary, starting at the South
    /// vertex and going through the E, N and W vertices.
    pub fn path_along_cell_edge(&self, hash: u64, step: u32) -> Vec<(f64, f64)> {
        edge_offsets(step)
            .map(|(dx, dy)| self.sph_coo(hash, dx, dy))
            .collect()
    }

    /// Neighbours of the cell. Cells touching a base cell corner where only
    /// 3 base cells meet have 7 neighbours, the missing one is `None`.
    pub fn neighbours(&self, hash: u64, include_center: bool) -> Neighbours {
        let (d0h, i, j) = self.decode(hash);
        let mut result = Neighbours::default();
        if include_center {
            result.set(MainWind::C, hash);
        }
        for direction in MainWind::ALL {
            if direction == MainWind::C {
                continue;
            }
            let (di, dj) = direction.offset();
            if let Some((f, x, y)) = self.step(d0h, i as i64 + di as i64, j as i64 + dj as i64) {
                result.set(direction, self.encode(f, x, y));
            }
        }
        result
    }

    /// Resolves a possibly out-of-face position into a cell of a neighbouring
    /// base cell.
    fn step(&self, face: u8, mut x: i64, mut y: i64) -> Option<(u8, u32, u32)> {
        let nside = self.nside as i64;
        if (0..nside).contains(&x) && (0..nside).contains(&y) {
            return Some((face, x as u32, y as u32));
        }
        let mut nbnum = 4usize;
        if x < 0 {
            x += nside;
            nbnum -= 1;
        } else if x >= nside {
            x -= nside;
            nbnum += 1;
        }
        if y < 0 {
            y += nside;
            nbnum -= 3;
        } else if y >= nside {
            y -= nside;
            nbnum += 3;
        }
        let target = FACE_ARRAY[nbnum][face as usize];
        if target < 0 {
            return None;
        }
        let bits = SWAP_ARRAY[nbnum][(face >> 2) as usize];
        if bits & 1 != 0 {
            x = nside - x - 1;
        }
        if bits & 2 != 0 {
            y = nside - y - 1;
        }
        if bits & 4 != 0 {
            std::mem::swap(&mut x, &mut y);
        }
        Some((target as u8, x as u32, y as u32))
    }

    /// Ring index of the same cell.
    pub fn to_ring(&self, hash: u64) -> u64 {
        let (d0h, i, j) = self.decode(hash);
        xyf_to_ring(self.nside, d0h, i, j)
    }

    /// Nested hash of ring cell `ipix`.
    pub fn from_ring(&self, ipix: u64) -> u64 {
        let (d0h, i, j) = ring_to_xyf(self.nside, ipix);
        self.encode(d0h, i, j)
    }

    /// Angular distance, radians, from the cell center beyond which no point
    /// of the cell lies.
    pub fn cell_radius_upper_bound(&self, hash: u64) -> f64 {
        let (lon, lat) = self.center(hash);
        let center = Vector3::from_spherical(lon, lat);
        edge_offsets(3)
            .map(|(dx, dy)| {
                let (l, b) = self.sph_coo(hash, dx, dy);
                center.angle_to(&Vector3::from_spherical(l, b))
            })
            .fold(0.0, f64::max)
            * CELL_RADIUS_MARGIN
    }

    /// Range of the 4 children hashes at `depth + 1`.
    #[inline]
    pub fn children(hash: u64) -> Range<u64> {
        let first = hash << 2;
        first..first + 4
    }

    /// Hash of the ancestor `delta_depth` levels up.
    #[inline]
    pub fn parent(hash: u64, delta_depth: u8) -> u64 {
        hash >> (delta_depth << 1)
    }

    fn position(&self, hash: u64, dx: f64, dy: f64) -> FacePosition {
        let (d0h, i, j) = self.decode(hash);
        FacePosition { d0h, i, j, dx, dy }
    }
}
