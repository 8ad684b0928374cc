use celestial_core::Vector3;

use super::{descend, Overlap};
use crate::bmoc::BMOC;
use crate::error::{HealpixError, HealpixResult};
use crate::nested::{self, Layer};
use crate::validate::{check_depth, check_lonlat};

/// Below this squared norm the vertex barycenter is considered undefined.
const DEGENERATE_BARYCENTER: f64 = 1e-20;

/// Spherical polygon with great-circle edges.
///
/// The interior is the side containing the normalized sum of the vertices
/// (the control point), so a polygon larger than a hemisphere must be given
/// with vertices whose barycenter lies inside it.
pub(crate) struct Polygon {
    vertices: Vec<Vector3>,
    control: Vector3,
}

impl Polygon {
    pub(crate) fn new(vertices: Vec<Vector3>) -> HealpixResult<Self> {
        if vertices.len() < 3 {
            return Err(HealpixError::invalid_polygon(format!(
                "a polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        let sum = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + *v);
        if sum.magnitude_squared() < DEGENERATE_BARYCENTER {
            return Err(HealpixError::invalid_polygon(
                "the vertices barycenter is undefined",
            ));
        }
        Ok(Self {
            vertices,
            control: sum.normalize(),
        })
    }

    fn edges(&self) -> impl Iterator<Item = (&Vector3, &Vector3)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (&self.vertices[k], &self.vertices[(k + 1) % n]))
    }

    fn crossings(&self, from: &Vector3, to: &Vector3) -> usize {
        self.edges()
            .filter(|(a, b)| arcs_intersect(from, to, a, b))
            .count()
    }

    /// Whether `p` is on the same side of the boundary as the control point.
    pub(crate) fn contains(&self, p: &Vector3) -> bool {
        let crossings = if p.dot(&self.control) > -0.99 {
            self.crossings(&self.control, p)
        } else {
            // Near antipodal: go around through a point orthogonal to the
            // control point.
            let side = orthogonal(&self.control);
            self.crossings(&self.control, &side) + self.crossings(&side, p)
        };
        crossings % 2 == 0
    }

    /// Whether any edge crosses the arc `a -> b`.
    fn crosses_arc(&self, a: &Vector3, b: &Vector3) -> bool {
        self.edges().any(|(p, q)| arcs_intersect(a, b, p, q))
    }
}

/// A unit vector orthogonal to `v`.
fn orthogonal(v: &Vector3) -> Vector3 {
    let axis = if v.x.abs() < 0.9 {
        Vector3::x_axis()
    } else {
        Vector3::y_axis()
    };
    v.cross(&axis).normalize()
}

/// Whether the minor great-circle arcs `a1 -> a2` and `b1 -> b2` intersect.
pub(crate) fn arcs_intersect(a1: &Vector3, a2: &Vector3, b1: &Vector3, b2: &Vector3) -> bool {
    let na = a1.cross(a2);
    let nb = b1.cross(b2);
    if na.dot(b1) * na.dot(b2) >= 0.0 || nb.dot(a1) * nb.dot(a2) >= 0.0 {
        return false;
    }
    let mut x = na.cross(&nb);
    if x.dot(&(*a1 + *a2)) < 0.0 {
        x = -x;
    }
    x.dot(&(*b1 + *b2)) > 0.0
}

/// Number of points per cell edge used to approximate the cell boundary by
/// great-circle arcs.
fn edge_step(depth: u8) -> u32 {
    (8u32 >> depth.min(3)).max(2)
}

/// Cells of depth `depth` overlapping the polygon of (lon, lat) vertices,
/// radians. Cells crossed by an edge or holding a vertex are flagged
/// partial, the others are classified by their center.
pub fn polygon_coverage(depth: u8, vertices: &[(f64, f64)]) -> HealpixResult<BMOC> {
    check_depth(depth)?;
    let mut points = Vec::with_capacity(vertices.len());
    let mut vertex_hashes = Vec::with_capacity(vertices.len());
    let deepest = nested::get(depth);
    for &(lon, lat) in vertices {
        let (lon, lat) = check_lonlat(lon, lat)?;
        points.push(Vector3::from_spherical(lon, lat));
        vertex_hashes.push(deepest.hash(lon, lat));
    }
    let polygon = Polygon::new(points)?;

    let bmoc = descend(depth, depth, |layer, hash| {
        classify(&polygon, &vertex_hashes, depth, layer, hash)
    });
    tracing::debug!(depth, n_vertices = vertices.len(), n_cells = bmoc.size(), "polygon coverage");
    Ok(bmoc)
}

fn classify(polygon: &Polygon, vertex_hashes: &[u64], depth_max: u8, layer: &Layer, hash: u64) -> Overlap {
    let delta_depth = depth_max - layer.depth();
    if vertex_hashes
        .iter()
        .any(|&h| Layer::parent(h, delta_depth) == hash)
    {
        return Overlap::Partial;
    }
    let boundary: Vec<Vector3> = layer
        .path_along_cell_edge(hash, edge_step(layer.depth()))
        .into_iter()
        .map(|(lon, lat)| Vector3::from_spherical(lon, lat))
        .collect();
    let n = boundary.len();
    let crossed = (0..n).any(|k| polygon.crosses_arc(&boundary[k], &boundary[(k + 1) % n]));
    if crossed {
        return Overlap::Partial;
    }
    let (lon, lat) = layer.center(hash);
    if polygon.contains(&Vector3::from_spherical(lon, lat)) {
        Overlap::Full
    } else {
        Overlap::Out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial_core::constants::DEG_TO_RAD;

    fn v(lon_deg: f64, lat_deg: f64) -> Vector3 {
        Vector3::from_spherical(lon_deg * DEG_TO_RAD, lat_deg * DEG_TO_RAD)
    }

    #[test]
    fn test_arcs_intersect() {
        assert!(arcs_intersect(&v(-5.0, 0.0), &v(5.0, 0.0), &v(0.0, -5.0), &v(0.0, 5.0)));
        assert!(!arcs_intersect(&v(-5.0, 0.0), &v(5.0, 0.0), &v(0.0, 1.0), &v(0.0, 5.0)));
        // Same great circles, antipodal crossing point.
        assert!(!arcs_intersect(&v(175.0, 0.0), &v(185.0, 0.0), &v(0.0, -5.0), &v(0.0, 5.0)));
    }

    #[test]
    fn test_contains() {
        let square = Polygon::new(vec![v(-10.0, -10.0), v(10.0, -10.0), v(10.0, 10.0), v(-10.0, 10.0)]).unwrap();
        assert!(square.contains(&v(0.0, 0.0)));
        assert!(square.contains(&v(9.0, -9.0)));
        assert!(!square.contains(&v(20.0, 0.0)));
        assert!(!square.contains(&v(180.0, 0.0)));
        assert!(!square.contains(&v(0.0, 60.0)));
    }

    #[test]
    fn test_rejects_degenerate_polygons() {
        assert!(Polygon::new(vec![v(0.0, 0.0), v(1.0, 0.0)]).is_err());
        assert!(Polygon::new(vec![v(0.0, 0.0), v(180.0, 0.0), v(0.0, 0.0), v(180.0, 0.0)]).is_err());
        assert!(polygon_coverage(30, &[(0.0, 0.0), (0.1, 0.0), (0.0, 0.1)]).is_err());
        assert!(polygon_coverage(3, &[(0.0, 0.0), (0.1, 0.0), (0.0, 3.0)]).is_err());
    }

    #[test]
    fn test_vertex_cells_are_covered() {
        let vertices = [(0.2, 0.1), (0.6, 0.15), (0.5, 0.6), (0.25, 0.5)];
        let bmoc = polygon_coverage(7, &vertices).unwrap();
        let layer = nested::get(7);
        for &(lon, lat) in &vertices {
            assert_eq!(bmoc.contains_cell(7, layer.hash(lon, lat)), Some(false));
        }
        let inner = layer.hash(0.4, 0.3);
        assert_eq!(bmoc.contains_cell(7, inner), Some(true));
        assert_eq!(bmoc.contains_cell(7, layer.hash(1.5, 0.3)), None);
    }

    #[test]
    fn test_edge_step() {
        assert_eq!(edge_step(0), 8);
        assert_eq!(edge_step(1), 4);
        assert_eq!(edge_step(2), 2);
        assert_eq!(edge_step(9), 2);
    }
}
