//! Marker clustering simulator
//!
//! Reads markers from a CSV file, clusters them for a chart viewport and writes
//! the cluster table. With `--click` it also performs a pointer click and runs
//! frames until the cluster zoom animation settles.

use clap::Parser;
use csv::WriterBuilder;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rust_marker_cluster::cluster::{
    ChartHost, Cluster, ClusterSettings, GeoPoint, Jump, LinearProjection, Marker, MarkerOverlay,
    Picked, ScreenPoint, Viewport, ZoomConfig, centroid,
};
use rust_marker_cluster::input::read_markers;


#[derive(Parser)]
#[command(name = "marker_cluster")]
#[command(about = "Chart marker clustering and cluster zoom simulator", long_about = None)]
struct Args {
    /// Input CSV file with id,latitude,longitude columns
    #[arg(short, long, default_value = "markers.csv")]
    input: PathBuf,

    /// Output CSV file with the cluster table (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Viewport center as LAT,LON (default: mean of all markers)
    #[arg(short, long, value_parser = parse_geo_point, allow_hyphen_values = true)]
    center: Option<GeoPoint>,

    /// View scale in pixels per meter
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// Chart scale denominator, drives the click tolerance
    #[arg(long, default_value_t = 50_000.0)]
    chart_scale: f64,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Clustering radius in pixels
    #[arg(short, long, default_value_t = rust_marker_cluster::cluster::DEFAULT_RADIUS_PX)]
    radius: i32,

    /// Cluster badge size in pixels
    #[arg(long, default_value_t = rust_marker_cluster::cluster::DEFAULT_CLUSTER_ICON_PX)]
    cluster_icon: i32,

    /// Marker icon size in pixels
    #[arg(long, default_value_t = rust_marker_cluster::cluster::DEFAULT_MARKER_ICON_PX)]
    marker_icon: i32,

    /// Scale multiplier of the final cluster zoom
    #[arg(long, default_value_t = rust_marker_cluster::cluster::DEFAULT_ZOOM_FACTOR)]
    zoom_factor: f64,

    /// Fraction of the remaining distance covered per pan step
    #[arg(long, default_value_t = rust_marker_cluster::cluster::DEFAULT_PAN_STEP)]
    pan_step: f64,

    /// Give up the cluster zoom after this many pan steps
    #[arg(long)]
    max_pan_steps: Option<u32>,

    /// Click position as X,Y in canvas pixels
    #[arg(long, value_parser = parse_screen_point, allow_hyphen_values = true)]
    click: Option<ScreenPoint>,

    /// Maximum number of frames to run after a click
    #[arg(long, default_value_t = 100)]
    max_frames: usize,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    let markers = match read_markers(&args.input) {
        Ok(markers) => markers,
        Err(e) => {
            eprintln!("Error reading CSV: {}", e);
            std::process::exit(1);
        }
    };

    if markers.is_empty() {
        eprintln!("No markers found in CSV file");
        std::process::exit(1);
    }
    info!(count = markers.len(), input = ?args.input, "read markers");

    let center = args.center.unwrap_or_else(|| mean_position(&markers));
    let mut chart = SimulatedChart::new(Viewport::centered(
        center,
        args.scale,
        args.chart_scale,
        args.width,
        args.height,
    ));

    let settings = ClusterSettings {
        radius_px: args.radius,
        cluster_icon_px: args.cluster_icon,
        marker_icon_px: args.marker_icon,
    };
    let zoom = ZoomConfig {
        zoom_factor: args.zoom_factor,
        pan_step: args.pan_step,
        max_pan_steps: args.max_pan_steps,
    };
    let mut overlay = MarkerOverlay::new(LinearProjection, settings, zoom);

    let viewport = chart.viewport;
    overlay.render_frame(&viewport, &markers, &mut chart);

    if let Some(click) = args.click {
        let (picked, frames) =
            simulate_click(&mut overlay, &mut chart, &markers, click, args.max_frames);
        println!("{}", describe_pick(&picked));
        for (frame, jump) in &chart.jumps {
            println!(
                "frame {}: jump to {:.6},{:.6} scale {:.3}",
                frame, jump.lat, jump.lon, jump.scale
            );
        }
        if overlay.controller().is_active() {
            println!("animation still running after {} frames", frames);
        }
    }

    let result = match &args.output {
        None => write_clusters(io::stdout().lock(), overlay.clusters()),
        Some(path) => File::create(path)
            .map_err(Into::into)
            .and_then(|file| write_clusters(file, overlay.clusters())),
    };

    if let Err(e) = result {
        eprintln!("Error writing clusters: {}", e);
        std::process::exit(1);
    }
    if let Some(path) = &args.output {
        info!(output = ?path, "clusters written");
    }
}

/// Installs the log subscriber; `RUST_LOG` overrides the default level
fn init_tracing(debug: bool) {
    let level = if debug { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Stand-in for the chart engine: owns the live viewport and applies jumps to it
#[derive(Debug)]
struct SimulatedChart {
    viewport: Viewport,
    /// Frame number and jump, in issue order
    jumps: Vec<(usize, Jump)>,
    frame: usize,
    redraw_requested: bool,
}

impl SimulatedChart {
    fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            jumps: Vec::new(),
            frame: 0,
            redraw_requested: false,
        }
    }
}

impl ChartHost for SimulatedChart {
    fn jump_to_position(&mut self, jump: Jump) {
        self.viewport = self.viewport.jumped(jump.lat, jump.lon, jump.scale);
        self.jumps.push((self.frame, jump));
        self.redraw_requested = true;
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}

/// Clicks at `click` and renders frames while the chart asks for them and the
/// cluster zoom is running
///
/// Returns the pick result and the number of frames rendered after the click.
fn simulate_click(
    overlay: &mut MarkerOverlay,
    chart: &mut SimulatedChart,
    markers: &[Marker],
    click: ScreenPoint,
    max_frames: usize,
) -> (Picked, usize) {
    chart.redraw_requested = false;
    let picked = overlay.on_pointer_down(click, chart);

    let mut frames = 0;
    while chart.redraw_requested && frames < max_frames {
        chart.redraw_requested = false;
        chart.frame = frames + 1;
        let viewport = chart.viewport;
        overlay.render_frame(&viewport, markers, chart);
        frames += 1;
        debug!(frame = frames, active = overlay.controller().is_active(), "frame");
    }

    (picked, frames)
}

fn describe_pick(picked: &Picked) -> String {
    match picked {
        Picked::Nothing => "click: nothing hit".to_string(),
        Picked::Cluster { size, centroid } => format!(
            "click: cluster of {} at {:.6},{:.6}",
            size, centroid.lat, centroid.lon
        ),
        Picked::Marker { id } => format!("click: marker {}", id),
    }
}

/// Mean coordinate of all markers
///
/// # Panics
///
/// Panics if `markers` is empty
fn mean_position(markers: &[Marker]) -> GeoPoint {
    centroid(markers)
}

/// Writes the cluster table as CSV
///
/// Columns: `cluster,size,centroid_lat,centroid_lon,anchor_x,anchor_y,members`
/// where `members` lists marker ids separated by `;`
fn write_clusters<W: io::Write>(
    writer: W,
    clusters: &[Cluster],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record([
        "cluster",
        "size",
        "centroid_lat",
        "centroid_lon",
        "anchor_x",
        "anchor_y",
        "members",
    ])?;

    for (i, cluster) in clusters.iter().enumerate() {
        let ids: Vec<&str> = cluster.ids().collect();
        writer.write_record([
            i.to_string(),
            cluster.len().to_string(),
            cluster.centroid.lat.to_string(),
            cluster.centroid.lon.to_string(),
            format!("{:.1}", cluster.anchor.x),
            format!("{:.1}", cluster.anchor.y),
            ids.join(";"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Parses `A,B` into two floats
fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated numbers, got `{}`", s))?;
    let a = a.trim().parse::<f64>().map_err(|e| format!("`{}`: {}", a.trim(), e))?;
    let b = b.trim().parse::<f64>().map_err(|e| format!("`{}`: {}", b.trim(), e))?;
    Ok((a, b))
}

fn parse_geo_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = parse_pair(s)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinate out of range: {},{}", lat, lon));
    }
    Ok(GeoPoint::new(lat, lon))
}

fn parse_screen_point(s: &str) -> Result<ScreenPoint, String> {
    let (x, y) = parse_pair(s)?;
    Ok(ScreenPoint::new(x, y))
}
