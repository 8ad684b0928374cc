use celestial_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use celestial_healpix::{coverage, nested};

fn main() -> anyhow::Result<()> {
    let depth: u8 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(6);

    let (lon, lat, radius) = (83.633 * DEG_TO_RAD, -5.375 * DEG_TO_RAD, 2.0 * DEG_TO_RAD);
    let bmoc = coverage::cone_coverage_approx(depth, lon, lat, radius)?;

    println!(
        "Cone ({:.3}, {:.3}) r={:.1}° at depth {}: {} cells, {} at depth {}\n",
        lon * RAD_TO_DEG,
        lat * RAD_TO_DEG,
        radius * RAD_TO_DEG,
        depth,
        bmoc.size(),
        bmoc.deep_size(),
        bmoc.depth_max(),
    );

    for cell in bmoc.iter() {
        let (clon, clat) = nested::get(cell.depth).center(cell.hash);
        println!(
            "  depth {:2}  ipix {:>10}  {}  center ({:.4}°, {:+.4}°)",
            cell.depth,
            cell.hash,
            if cell.is_full { "full   " } else { "partial" },
            clon * RAD_TO_DEG,
            clat * RAD_TO_DEG,
        );
    }

    Ok(())
}
