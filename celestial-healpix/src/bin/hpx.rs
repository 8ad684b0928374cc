use celestial_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use celestial_healpix::batch::{self, ParallelOptions};
use celestial_healpix::constants::DEFAULT_DELTA_DEPTH;
use celestial_healpix::{BmocCell, MainWind};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "hpx")]
#[command(about = "HEALPix cell indexing and sky coverage queries")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log query details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nested cells containing the given positions
    Hash {
        #[arg(long)]
        depth: u8,
        /// Longitudes in degrees, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        lon: Vec<f64>,
        /// Latitudes in degrees, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        lat: Vec<f64>,
        /// Hash in parallel
        #[arg(long)]
        parallel: bool,
        /// Worker threads for --parallel (0 = all cores)
        #[arg(long, default_value = "0")]
        threads: usize,
    },
    /// Centers of nested cells
    Center {
        #[arg(long)]
        depth: u8,
        ipix: Vec<u64>,
    },
    /// Vertices of nested cells, or points along their edges with --step
    Vertices {
        #[arg(long)]
        depth: u8,
        #[arg(long, default_value = "1")]
        step: u32,
        ipix: Vec<u64>,
    },
    /// The 8 neighbours of nested cells
    Neighbours {
        #[arg(long)]
        depth: u8,
        ipix: Vec<u64>,
    },
    /// Cells overlapping a cone
    Cone {
        #[arg(long)]
        depth: u8,
        #[arg(long, default_value_t = DEFAULT_DELTA_DEPTH)]
        delta_depth: u8,
        /// All cells at --depth instead of a multi-order map
        #[arg(long)]
        flat: bool,
        /// Center longitude in degrees
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        /// Center latitude in degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Radius in degrees
        radius: f64,
    },
    /// Cells overlapping an elliptical cone
    Ellipse {
        #[arg(long)]
        depth: u8,
        #[arg(long, default_value_t = DEFAULT_DELTA_DEPTH)]
        delta_depth: u8,
        #[arg(long)]
        flat: bool,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Semi-major axis in degrees
        a: f64,
        /// Semi-minor axis in degrees
        b: f64,
        /// Position angle in degrees, east of north
        #[arg(allow_hyphen_values = true)]
        pa: f64,
    },
    /// Cells overlapping a polygon
    Polygon {
        #[arg(long)]
        depth: u8,
        #[arg(long)]
        flat: bool,
        /// Vertex longitudes in degrees, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        lon: Vec<f64>,
        /// Vertex latitudes in degrees, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        lat: Vec<f64>,
    },
    /// Nested hashes to ring indices
    ToRing {
        #[arg(long)]
        depth: u8,
        ipix: Vec<u64>,
    },
    /// Ring indices to nested hashes
    FromRing {
        #[arg(long)]
        depth: u8,
        ipix: Vec<u64>,
    },
    /// Ring cells containing the given positions, with in-cell offsets
    RingHash {
        #[arg(long)]
        nside: u32,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        lon: Vec<f64>,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        lat: Vec<f64>,
    },
    /// Position at offset (dx, dy) inside ring cells
    RingCenter {
        #[arg(long)]
        nside: u32,
        #[arg(long, default_value = "0.5")]
        dx: f64,
        #[arg(long, default_value = "0.5")]
        dy: f64,
        ipix: Vec<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Hash {
            depth,
            lon,
            lat,
            parallel,
            threads,
        } => {
            let (lon_rad, lat_rad) = (to_radians(&lon), to_radians(&lat));
            let hashes = if parallel {
                batch::par_hash_lonlat(depth, &lon_rad, &lat_rad, &ParallelOptions::new(threads))?
            } else {
                batch::hash_lonlat(depth, &lon_rad, &lat_rad)?
            };
            let rows: Vec<HashRow> = hashes
                .into_iter()
                .zip(lon.iter().zip(&lat))
                .map(|(ipix, (&lon_deg, &lat_deg))| HashRow {
                    lon_deg,
                    lat_deg,
                    ipix,
                })
                .collect();
            emit(&rows, cli.format)?;
        }
        Commands::Center { depth, ipix } => {
            let centers = batch::center_lonlat(depth, &ipix)?;
            emit(&position_rows(&ipix, &centers), cli.format)?;
        }
        Commands::Vertices { depth, step, ipix } => {
            let paths = batch::path_lonlat(depth, &ipix, step)?;
            emit(&path_rows(&ipix, &paths), cli.format)?;
        }
        Commands::Neighbours { depth, ipix } => {
            let rows: Vec<NeighboursRow> = batch::neighbours(depth, &ipix)?
                .into_iter()
                .map(NeighboursRow::from)
                .collect();
            emit(&rows, cli.format)?;
        }
        Commands::Cone {
            depth,
            delta_depth,
            flat,
            lon,
            lat,
            radius,
        } => {
            let cells = batch::cone_search(
                depth,
                delta_depth,
                lon * DEG_TO_RAD,
                lat * DEG_TO_RAD,
                radius * DEG_TO_RAD,
                flat,
            )?;
            emit(&cell_rows(cells), cli.format)?;
        }
        Commands::Ellipse {
            depth,
            delta_depth,
            flat,
            lon,
            lat,
            a,
            b,
            pa,
        } => {
            let cells = batch::elliptical_cone_search(
                depth,
                delta_depth,
                lon * DEG_TO_RAD,
                lat * DEG_TO_RAD,
                a * DEG_TO_RAD,
                b * DEG_TO_RAD,
                pa * DEG_TO_RAD,
                flat,
            )?;
            emit(&cell_rows(cells), cli.format)?;
        }
        Commands::Polygon {
            depth,
            flat,
            lon,
            lat,
        } => {
            let cells = batch::polygon_search(depth, &to_radians(&lon), &to_radians(&lat), flat)?;
            emit(&cell_rows(cells), cli.format)?;
        }
        Commands::ToRing { depth, ipix } => {
            let converted = batch::to_ring(depth, &ipix)?;
            emit(&conversion_rows(&ipix, &converted), cli.format)?;
        }
        Commands::FromRing { depth, ipix } => {
            let converted = batch::from_ring(depth, &ipix)?;
            emit(&conversion_rows(&ipix, &converted), cli.format)?;
        }
        Commands::RingHash { nside, lon, lat } => {
            let hashes = batch::ring_hash_lonlat(nside, &to_radians(&lon), &to_radians(&lat))?;
            let rows: Vec<RingHashRow> = hashes
                .into_iter()
                .zip(lon.iter().zip(&lat))
                .map(|(h, (&lon_deg, &lat_deg))| RingHashRow {
                    lon_deg,
                    lat_deg,
                    ipix: h.ipix,
                    dx: h.dx,
                    dy: h.dy,
                })
                .collect();
            emit(&rows, cli.format)?;
        }
        Commands::RingCenter { nside, dx, dy, ipix } => {
            let centers = batch::ring_center_lonlat(nside, &ipix, dx, dy)?;
            emit(&position_rows(&ipix, &centers), cli.format)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn to_radians(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v * DEG_TO_RAD).collect()
}

/// A printable output record.
trait Row: Serialize {
    const HEADER: &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

fn emit<R: Row>(rows: &[R], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => {
            println!("{}", R::HEADER.join(","));
            for row in rows {
                println!("{}", row.fields().join(","));
            }
        }
    }
    Ok(())
}

fn print_table<R: Row>(rows: &[R]) {
    let cells: Vec<Vec<String>> = rows.iter().map(Row::fields).collect();
    let widths: Vec<usize> = R::HEADER
        .iter()
        .enumerate()
        .map(|(k, h)| {
            cells
                .iter()
                .map(|c| c[k].len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let line = |fields: Vec<String>| {
        fields
            .iter()
            .zip(&widths)
            .map(|(f, w)| format!("{:>w$}", f, w = w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", line(R::HEADER.iter().map(|h| h.to_string()).collect()));
    for row in cells {
        println!("{}", line(row));
    }
    if rows.is_empty() {
        println!("No cells.");
    } else {
        println!("\nTotal rows: {}", rows.len());
    }
}

#[derive(Serialize)]
struct HashRow {
    lon_deg: f64,
    lat_deg: f64,
    ipix: u64,
}

impl Row for HashRow {
    const HEADER: &'static [&'static str] = &["lon_deg", "lat_deg", "ipix"];
    fn fields(&self) -> Vec<String> {
        vec![
            format!("{:.8}", self.lon_deg),
            format!("{:.8}", self.lat_deg),
            self.ipix.to_string(),
        ]
    }
}

#[derive(Serialize)]
struct PositionRow {
    ipix: u64,
    lon_deg: f64,
    lat_deg: f64,
}

impl Row for PositionRow {
    const HEADER: &'static [&'static str] = &["ipix", "lon_deg", "lat_deg"];
    fn fields(&self) -> Vec<String> {
        vec![
            self.ipix.to_string(),
            format!("{:.8}", self.lon_deg),
            format!("{:.8}", self.lat_deg),
        ]
    }
}

fn position_rows(ipix: &[u64], positions: &[(f64, f64)]) -> Vec<PositionRow> {
    ipix.iter()
        .zip(positions)
        .map(|(&ipix, &(lon, lat))| PositionRow {
            ipix,
            lon_deg: lon * RAD_TO_DEG,
            lat_deg: lat * RAD_TO_DEG,
        })
        .collect()
}

#[derive(Serialize)]
struct PathRow {
    ipix: u64,
    point: usize,
    lon_deg: f64,
    lat_deg: f64,
}

impl Row for PathRow {
    const HEADER: &'static [&'static str] = &["ipix", "point", "lon_deg", "lat_deg"];
    fn fields(&self) -> Vec<String> {
        vec![
            self.ipix.to_string(),
            self.point.to_string(),
            format!("{:.8}", self.lon_deg),
            format!("{:.8}", self.lat_deg),
        ]
    }
}

fn path_rows(ipix: &[u64], paths: &[Vec<(f64, f64)>]) -> Vec<PathRow> {
    ipix.iter()
        .zip(paths)
        .flat_map(|(&ipix, path)| {
            path.iter().enumerate().map(move |(point, &(lon, lat))| PathRow {
                ipix,
                point,
                lon_deg: lon * RAD_TO_DEG,
                lat_deg: lat * RAD_TO_DEG,
            })
        })
        .collect()
}

#[derive(Serialize)]
struct NeighboursRow {
    ipix: i64,
    s: i64,
    se: i64,
    e: i64,
    sw: i64,
    ne: i64,
    w: i64,
    nw: i64,
    n: i64,
}

impl From<[i64; 9]> for NeighboursRow {
    fn from(row: [i64; 9]) -> Self {
        let at = |d: MainWind| row[d.index()];
        Self {
            ipix: at(MainWind::C),
            s: at(MainWind::S),
            se: at(MainWind::SE),
            e: at(MainWind::E),
            sw: at(MainWind::SW),
            ne: at(MainWind::NE),
            w: at(MainWind::W),
            nw: at(MainWind::NW),
            n: at(MainWind::N),
        }
    }
}

impl Row for NeighboursRow {
    const HEADER: &'static [&'static str] = &["ipix", "s", "se", "e", "sw", "ne", "w", "nw", "n"];
    fn fields(&self) -> Vec<String> {
        [
            self.ipix, self.s, self.se, self.e, self.sw, self.ne, self.w, self.nw, self.n,
        ]
        .iter()
        .map(|v| v.to_string())
        .collect()
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct CellRow(BmocCell);

impl Row for CellRow {
    const HEADER: &'static [&'static str] = &["depth", "ipix", "fully_covered"];
    fn fields(&self) -> Vec<String> {
        vec![
            self.0.depth.to_string(),
            self.0.ipix.to_string(),
            self.0.fully_covered.to_string(),
        ]
    }
}

fn cell_rows(cells: Vec<BmocCell>) -> Vec<CellRow> {
    cells.into_iter().map(CellRow).collect()
}

#[derive(Serialize)]
struct ConversionRow {
    input: u64,
    output: u64,
}

impl Row for ConversionRow {
    const HEADER: &'static [&'static str] = &["input", "output"];
    fn fields(&self) -> Vec<String> {
        vec![self.input.to_string(), self.output.to_string()]
    }
}

fn conversion_rows(input: &[u64], output: &[u64]) -> Vec<ConversionRow> {
    input
        .iter()
        .zip(output)
        .map(|(&input, &output)| ConversionRow { input, output })
        .collect()
}

#[derive(Serialize)]
struct RingHashRow {
    lon_deg: f64,
    lat_deg: f64,
    ipix: u64,
    dx: f64,
    dy: f64,
}

impl Row for RingHashRow {
    const HEADER: &'static [&'static str] = &["lon_deg", "lat_deg", "ipix", "dx", "dy"];
    fn fields(&self) -> Vec<String> {
        vec![
            format!("{:.8}", self.lon_deg),
            format!("{:.8}", self.lat_deg),
            self.ipix.to_string(),
            format!("{:.6}", self.dx),
            format!("{:.6}", self.dy),
        ]
    }
}
