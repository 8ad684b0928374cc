use approx::assert_abs_diff_eq;
use celestial_core::constants::{DEG_TO_RAD, HALF_PI, PI};
use celestial_healpix::{batch, nested, HealpixError, MainWind, DEPTH_MAX};

/// Deterministic grid of (lon, lat) positions, radians, avoiding the poles.
fn grid(n_lon: usize, n_lat: usize) -> (Vec<f64>, Vec<f64>) {
    let mut lon = Vec::with_capacity(n_lon * n_lat);
    let mut lat = Vec::with_capacity(n_lon * n_lat);
    for i in 0..n_lon {
        for j in 0..n_lat {
            lon.push((i as f64 + 0.37) * 2.0 * PI / n_lon as f64);
            lat.push(-HALF_PI + (j as f64 + 0.5) * PI / n_lat as f64);
        }
    }
    (lon, lat)
}

#[test]
fn test_lonlat_to_healpix_in_range_at_every_depth() {
    let (lon, lat) = grid(40, 30);
    for depth in 0..=DEPTH_MAX {
        let hashes = batch::hash_lonlat(depth, &lon, &lat).unwrap();
        let npix = nested::get(depth).n_hash();
        assert!(hashes.iter().all(|&h| h < npix), "depth {}", depth);
    }
}

#[test]
fn test_healpix_to_lonlat_round_trip() {
    for depth in [0u8, 3, 10, 20, DEPTH_MAX] {
        let layer = nested::get(depth);
        let n = layer.n_hash();
        let ipix: Vec<u64> = (0..200u64).map(|k| k * (n / 200) + k % 7).collect();
        let centers = batch::center_lonlat(depth, &ipix).unwrap();
        let (lon, lat): (Vec<f64>, Vec<f64>) = centers.into_iter().unzip();
        assert_eq!(batch::hash_lonlat(depth, &lon, &lat).unwrap(), ipix);
    }
}

#[test]
fn test_offsets_in_unit_square() {
    let (lon, lat) = grid(25, 25);
    let layer = nested::get(11);
    for (&l, &b) in lon.iter().zip(&lat) {
        let (h, dx, dy) = layer.hash_with_dxdy(l, b);
        assert!((0.0..=1.0).contains(&dx) && (0.0..=1.0).contains(&dy));
        let (l2, b2) = layer.sph_coo(h, dx, dy);
        assert_abs_diff_eq!(b2, b, epsilon = 1e-11);
        assert_abs_diff_eq!(l2, l, epsilon = 1e-11);
    }
}

#[test]
fn test_vertices_shape_and_order() {
    let rows = batch::vertices_lonlat(0, &[4]).unwrap();
    let [s, e, n, w] = rows[0];
    // Base cell 4 is centered on (0, 0): S and N on the meridian, E and W on the equator.
    assert_abs_diff_eq!(s.1, -(2.0f64 / 3.0).asin(), epsilon = 1e-12);
    assert_abs_diff_eq!(n.1, (2.0f64 / 3.0).asin(), epsilon = 1e-12);
    assert_abs_diff_eq!(e.0, 45.0 * DEG_TO_RAD, epsilon = 1e-12);
    assert_abs_diff_eq!(w.0, 315.0 * DEG_TO_RAD, epsilon = 1e-12);
    assert_abs_diff_eq!(e.1, 0.0, epsilon = 1e-12);

    let paths = batch::path_lonlat(5, &[10, 11, 12], 4).unwrap();
    assert!(paths.iter().all(|p| p.len() == 16));
}

#[test]
fn test_neighbours_are_symmetric() {
    for depth in 1..=3 {
        let layer = nested::get(depth);
        for h in 0..layer.n_hash() {
            for (_, n) in layer.neighbours(h, false).iter() {
                let back = layer.neighbours(n, false);
                assert!(
                    back.iter().any(|(_, m)| m == h),
                    "depth {} cell {} not a neighbour of its neighbour {}",
                    depth,
                    h,
                    n
                );
            }
        }
    }
}

#[test]
fn test_missing_neighbours_only_at_base_cell_corners() {
    let depth = 3;
    let layer = nested::get(depth);
    let nside = layer.nside();
    let mut n_incomplete = 0;
    for h in 0..layer.n_hash() {
        let neighbours = layer.neighbours(h, false);
        if neighbours.len() == 8 {
            continue;
        }
        n_incomplete += 1;
        assert_eq!(neighbours.len(), 7);
        let (d0h, i, j) = layer.decode(h);
        let missing = MainWind::ALL
            .into_iter()
            .find(|&d| d != MainWind::C && neighbours.get(d).is_none());
        match d0h >> 2 {
            1 => {
                assert!((i, j) == (0, 0) || (i, j) == (nside - 1, nside - 1));
                assert!(matches!(missing, Some(MainWind::S) | Some(MainWind::N)));
            }
            _ => {
                assert!((i, j) == (nside - 1, 0) || (i, j) == (0, nside - 1));
                assert!(matches!(missing, Some(MainWind::E) | Some(MainWind::W)));
            }
        }
    }
    // 4 equatorial base cells x 2 corners + 8 polar base cells x 2 corners.
    assert_eq!(n_incomplete, 24);
}

#[test]
fn test_neighbours_batch_layout() {
    let rows = batch::neighbours(2, &[0, 191]).unwrap();
    for (row, h) in rows.iter().zip([0i64, 191]) {
        assert_eq!(row[MainWind::C.index()], h);
    }
    assert!(matches!(
        batch::neighbours(2, &[192]),
        Err(HealpixError::CellOutOfRange { ipix: 192, npix: 192 })
    ));
}

#[test]
fn test_nested_ring_bijection() {
    for depth in [0u8, 1, 4, 7] {
        let n = nested::get(depth).n_hash();
        let ipix: Vec<u64> = (0..n).collect();
        let ring = batch::to_ring(depth, &ipix).unwrap();
        let mut sorted = ring.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, ipix);
        assert_eq!(batch::from_ring(depth, &ring).unwrap(), ipix);
    }
}

#[test]
fn test_uniq_round_trip() {
    for depth in [0u8, 8, DEPTH_MAX] {
        let n = nested::get(depth).n_hash();
        for h in [0, n / 3, n - 1] {
            let uniq = nested::to_uniq(depth, h);
            assert_eq!(nested::from_uniq(uniq).unwrap(), (depth, h));
        }
    }
}

#[test]
fn test_nested_to_xy_depth_0() {
    let ipix: Vec<u64> = (0..12).collect();
    let xy = batch::nested_to_xy(0, &ipix).unwrap();
    let x: Vec<f64> = xy.iter().map(|p| p.0).collect();
    let y: Vec<f64> = xy.iter().map(|p| p.1).collect();
    assert_eq!(x, vec![1.0, 3.0, 5.0, 7.0, 0.0, 2.0, 4.0, 6.0, 1.0, 3.0, 5.0, 7.0]);
    assert_eq!(y, vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0, -1.0, -1.0, -1.0]);
}
