//! Validated slice API over the nested and ring layers.
//!
//! Each function checks its whole input before computing anything, so an
//! error never comes with a partial result. Angles are radians.
//!
//! | Function | Input | Output |
//! |----------|-------|--------|
//! | [`hash_lonlat`] / [`par_hash_lonlat`] | lon, lat | nested hashes |
//! | [`center_lonlat`] | hashes | (lon, lat) of centers |
//! | [`vertices_lonlat`] | hashes | S, E, N, W vertices |
//! | [`path_lonlat`] | hashes, step | `4 * step` edge points |
//! | [`neighbours`] | hashes | `[i64; 9]` rows in `MainWind` order |
//! | [`cone_search`] / [`elliptical_cone_search`] / [`polygon_search`] | region | [`BmocCell`]s |
//! | [`to_ring`] / [`from_ring`] | hashes | converted hashes |
//! | [`ring_hash_lonlat`] | lon, lat | ring index and offsets |
//! | [`ring_center_lonlat`] | ring indices, dx, dy | (lon, lat) |
//! | [`ring_to_xy`] / [`nested_to_xy`] | hashes | projected centers |
//! | [`ring_vertices_lonlat`] | ring indices, step | edge points |

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bmoc::BmocCell;
use crate::coverage;
use crate::error::HealpixResult;
use crate::nested;
use crate::ring::RingLayer;
use crate::validate::{check_cells, check_lengths, check_lonlat, check_offset, check_step};

/// Thread settings of the parallel batch functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParallelOptions {
    /// Number of worker threads, 0 for the global rayon pool (all cores).
    pub threads: usize,
}

impl ParallelOptions {
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    /// Effective number of threads.
    pub fn resolved_threads(&self) -> usize {
        if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.threads
        }
    }

    /// Runs `op` on a dedicated pool when a thread count is set, on the
    /// global pool otherwise.
    #[cfg(feature = "parallel")]
    fn install<T, F>(&self, op: F) -> HealpixResult<T>
    where
        F: FnOnce() -> HealpixResult<T> + Send,
        T: Send,
    {
        if self.threads == 0 {
            return op();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| crate::HealpixError::thread_pool(e.to_string()))?;
        pool.install(op)
    }
}

/// Ring index of a position together with its offsets inside the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HashWithOffsets {
    pub ipix: u64,
    pub dx: f64,
    pub dy: f64,
}

fn check_positions(lon: &[f64], lat: &[f64]) -> HealpixResult<Vec<(f64, f64)>> {
    check_lengths(lon, lat)?;
    lon.iter()
        .zip(lat)
        .map(|(&l, &b)| check_lonlat(l, b))
        .collect()
}

/// Nested hashes of the cells containing the given positions.
pub fn hash_lonlat(depth: u8, lon: &[f64], lat: &[f64]) -> HealpixResult<Vec<u64>> {
    let layer = nested::try_get(depth)?;
    let positions = check_positions(lon, lat)?;
    tracing::trace!(depth, n = positions.len(), "hash_lonlat");
    Ok(positions.iter().map(|&(l, b)| layer.hash(l, b)).collect())
}

/// Parallel version of [`hash_lonlat`].
#[cfg(feature = "parallel")]
pub fn par_hash_lonlat(
    depth: u8,
    lon: &[f64],
    lat: &[f64],
    options: &ParallelOptions,
) -> HealpixResult<Vec<u64>> {
    let layer = nested::try_get(depth)?;
    check_lengths(lon, lat)?;
    tracing::trace!(depth, n = lon.len(), threads = options.resolved_threads(), "par_hash_lonlat");
    options.install(|| {
        lon.par_iter()
            .zip(lat.par_iter())
            .map(|(&l, &b)| check_lonlat(l, b).map(|(l, b)| layer.hash(l, b)))
            .collect()
    })
}

/// (lon, lat) of the cell centers.
pub fn center_lonlat(depth: u8, ipix: &[u64]) -> HealpixResult<Vec<(f64, f64)>> {
    let layer = nested::try_get(depth)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix.iter().map(|&h| layer.center(h)).collect())
}

/// S, E, N, W vertices of each cell.
pub fn vertices_lonlat(depth: u8, ipix: &[u64]) -> HealpixResult<Vec<[(f64, f64); 4]>> {
    let layer = nested::try_get(depth)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix.iter().map(|&h| layer.vertices(h)).collect())
}

/// `4 * step` points along the edge of each cell.
pub fn path_lonlat(depth: u8, ipix: &[u64], step: u32) -> HealpixResult<Vec<Vec<(f64, f64)>>> {
    let layer = nested::try_get(depth)?;
    check_step(step)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix
        .iter()
        .map(|&h| layer.path_along_cell_edge(h, step))
        .collect())
}

/// Neighbour rows `[S, SE, E, SW, C, NE, W, NW, N]`, `-1` for a missing
/// neighbour; the cell itself is at index 4.
pub fn neighbours(depth: u8, ipix: &[u64]) -> HealpixResult<Vec<[i64; 9]>> {
    let layer = nested::try_get(depth)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix
        .iter()
        .map(|&h| layer.neighbours(h, true).to_i64_row())
        .collect())
}

pub fn cone_search(
    depth: u8,
    delta_depth: u8,
    lon: f64,
    lat: f64,
    radius: f64,
    flat: bool,
) -> HealpixResult<Vec<BmocCell>> {
    let bmoc = coverage::cone_coverage_approx_custom(depth, delta_depth, lon, lat, radius)?;
    Ok(bmoc.to_cells(flat))
}

#[allow(clippy::too_many_arguments)]
pub fn elliptical_cone_search(
    depth: u8,
    delta_depth: u8,
    lon: f64,
    lat: f64,
    a: f64,
    b: f64,
    pa: f64,
    flat: bool,
) -> HealpixResult<Vec<BmocCell>> {
    let bmoc = coverage::elliptical_cone_coverage_custom(depth, delta_depth, lon, lat, a, b, pa)?;
    Ok(bmoc.to_cells(flat))
}

pub fn polygon_search(depth: u8, lon: &[f64], lat: &[f64], flat: bool) -> HealpixResult<Vec<BmocCell>> {
    check_lengths(lon, lat)?;
    let vertices: Vec<(f64, f64)> = lon.iter().copied().zip(lat.iter().copied()).collect();
    let bmoc = coverage::polygon_coverage(depth, &vertices)?;
    Ok(bmoc.to_cells(flat))
}

/// Nested hashes to ring indices at the same depth.
pub fn to_ring(depth: u8, ipix: &[u64]) -> HealpixResult<Vec<u64>> {
    let layer = nested::try_get(depth)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix.iter().map(|&h| layer.to_ring(h)).collect())
}

/// Ring indices to nested hashes at the same depth.
pub fn from_ring(depth: u8, ipix: &[u64]) -> HealpixResult<Vec<u64>> {
    let layer = nested::try_get(depth)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix.iter().map(|&h| layer.from_ring(h)).collect())
}

/// Projected centers of nested cells.
pub fn nested_to_xy(depth: u8, ipix: &[u64]) -> HealpixResult<Vec<(f64, f64)>> {
    let layer = nested::try_get(depth)?;
    check_cells(ipix, layer.n_hash())?;
    Ok(ipix
        .iter()
        .map(|&h| layer.center_of_projected_cell(h))
        .collect())
}

pub fn ring_hash_lonlat(nside: u32, lon: &[f64], lat: &[f64]) -> HealpixResult<Vec<HashWithOffsets>> {
    let layer = RingLayer::new(nside)?;
    let positions = check_positions(lon, lat)?;
    tracing::trace!(nside, n = positions.len(), "ring_hash_lonlat");
    Ok(positions
        .iter()
        .map(|&(l, b)| {
            let (ipix, dx, dy) = layer.hash_with_dxdy(l, b);
            HashWithOffsets { ipix, dx, dy }
        })
        .collect())
}

/// (lon, lat) of the point at offset `(dx, dy)` in each ring cell.
pub fn ring_center_lonlat(nside: u32, ipix: &[u64], dx: f64, dy: f64) -> HealpixResult<Vec<(f64, f64)>> {
    let layer = RingLayer::new(nside)?;
    check_offset("dx", dx)?;
    check_offset("dy", dy)?;
    check_cells(ipix, layer.npix())?;
    Ok(ipix.iter().map(|&h| layer.sph_coo(h, dx, dy)).collect())
}

/// Projected centers of ring cells.
pub fn ring_to_xy(nside: u32, ipix: &[u64]) -> HealpixResult<Vec<(f64, f64)>> {
    let layer = RingLayer::new(nside)?;
    check_cells(ipix, layer.npix())?;
    Ok(ipix
        .iter()
        .map(|&h| layer.center_of_projected_cell(h))
        .collect())
}

/// `4 * step` points along the edge of each ring cell.
pub fn ring_vertices_lonlat(nside: u32, ipix: &[u64], step: u32) -> HealpixResult<Vec<Vec<(f64, f64)>>> {
    let layer = RingLayer::new(nside)?;
    check_step(step)?;
    check_cells(ipix, layer.npix())?;
    Ok(ipix
        .iter()
        .map(|&h| layer.path_along_cell_edge(h, step))
        .collect())
}
