mod options;

use anyhow::{Context, Error as AnyError};
use clap::Parser;
use elevgrid::{Grid, GridError};
use options::{Cli, Command as CliCmd};
use serde::{Deserialize, Serialize};
use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};
use textplots::{Chart, Plot, Shape};
use trailcost::{
    Activity, Analysis, BoundingBox, GeodeticPoint, GridSource, Pace, SizeLimits, TrackSource,
    TrailError, Warnings,
};

const KCAL_PER_JOULE: f64 = 0.000239006;
const METERS_PER_MILE: f64 = 1609.344;
const FEET_PER_METER: f64 = 3.28084;
const MILES_PER_KM: f64 = 0.621371;

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    env_logger::init();

    let raw = read_input(cli.input.as_deref())?;
    let track = TrackReader.decode(&raw)?;

    let mut grid_warnings = Warnings::default();
    let grid: Option<Grid> = match &cli.grid {
        Some(path) => {
            let bounds = BoundingBox::of(&track)?;
            let source = GridFile { path: path.clone() };
            Some(
                source
                    .fetch(&bounds, &mut grid_warnings)
                    .with_context(|| format!("reading elevation grid {}", path.display()))?,
            )
        }
        None => None,
    };

    let unit_m = if cli.metric { 1000.0 } else { METERS_PER_MILE };
    let mut builder = Analysis::builder()
        .activity(if cli.walking {
            Activity::Walking
        } else {
            Activity::Running
        })
        .body_mass_kg(cli.weight)
        .z_filter_m(cli.filter)
        .xy_filter_m(cli.xy_filter)
        .resolution_m(cli.resolution);
    if let Some(origin) = cli.origin {
        builder = builder.origin(origin.0);
    }
    if let Some(grid) = grid.as_ref() {
        builder = builder.grid(grid).force_grid(cli.force_grid);
    }
    if let Some(nominal) = cli.nominal_distance {
        builder = builder.nominal_distance_m(nominal * unit_m);
    }
    if let (Some(distance), Some(time)) = (cli.pace_distance, cli.pace_time) {
        builder = builder.pace(Pace {
            distance_m: distance * unit_m,
            time_s: time.0,
        });
    }
    if cli.limits {
        builder = builder.limits(SizeLimits::default());
    }

    let analysis = builder.build(&track)?;
    let warnings: Vec<String> = grid_warnings
        .into_vec()
        .into_iter()
        .chain(analysis.warnings.iter().cloned())
        .collect();

    match cli.cmd {
        CliCmd::Text => print_text(&cli, &analysis, &warnings),
        CliCmd::Json => print_json(&cli, &analysis, &warnings)?,
        CliCmd::Csv => {
            print_csv(&analysis)?;
            print_warnings(&warnings);
        }
        CliCmd::Plot => {
            plot_ascii(&analysis);
            print_warnings(&warnings);
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String, AnyError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading track {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading track from stdin")?;
            Ok(buffer)
        }
    }
}

/// Decodes the two supported text shapes: a CSV table with
/// Latitude/Longitude columns (the layout track converters emit), or
/// waypoint lines of the form `T lat lon alt`.
struct TrackReader;

impl TrackSource for TrackReader {
    fn decode(&self, raw: &str) -> Result<Vec<GeodeticPoint>, TrailError> {
        let has_table_header = raw
            .lines()
            .find(|line| !line.trim().is_empty())
            .is_some_and(|line| line.contains("Latitude"));
        let has_waypoint_lines = raw
            .lines()
            .any(|line| line.starts_with('T') && line[1..].starts_with(|c: char| c.is_whitespace()));
        let track = if has_waypoint_lines && !has_table_header {
            decode_waypoint_text(raw)
        } else {
            decode_csv(raw)?
        };
        if track.is_empty() {
            return Err(TrailError::Decode(String::from(
                "no points read successfully from the input; this usually means \
                 the format was not recognized",
            )));
        }
        Ok(track)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Altitude", default)]
    altitude: Option<f64>,
}

fn decode_csv(raw: &str) -> Result<Vec<GeodeticPoint>, TrailError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let mut track = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(|e| TrailError::Decode(e.to_string()))?;
        track.push(GeodeticPoint::new(
            row.latitude,
            row.longitude,
            row.altitude.unwrap_or(0.0),
        ));
    }
    Ok(track)
}

fn decode_waypoint_text(raw: &str) -> Vec<GeodeticPoint> {
    let mut track = Vec::new();
    for line in raw.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("T") {
            continue;
        }
        let values: Option<(f64, f64, f64)> = (|| {
            let lat = fields.next()?.parse().ok()?;
            let lon = fields.next()?.parse().ok()?;
            let alt = fields.next()?.parse().ok()?;
            Some((lat, lon, alt))
        })();
        if let Some((lat, lon, alt)) = values {
            track.push(GeodeticPoint::new(lat, lon, alt));
        }
    }
    track
}

/// Reads a prepared ESRI ASCII grid from disk. The file is expected
/// to already cover the route, so the bounding box goes unused here.
struct GridFile {
    path: PathBuf,
}

impl GridSource for GridFile {
    fn fetch(&self, _bounds: &BoundingBox, warnings: &mut Warnings) -> Result<Grid, GridError> {
        let text = std::fs::read_to_string(&self.path)?;
        let (grid, notes) = Grid::parse_ascii(&text)?;
        for note in notes {
            warnings.push(note);
        }
        Ok(grid)
    }
}

fn print_text(cli: &Cli, analysis: &Analysis, warnings: &[String]) {
    let stats = &analysis.stats;
    let (h_unit, v_unit) = if cli.metric { ("km", "m") } else { ("mi", "ft") };
    let horiz = |meters: f64| {
        if cli.metric {
            meters / 1000.0
        } else {
            meters / 1000.0 * MILES_PER_KM
        }
    };
    let vert = |meters: f64| {
        if cli.metric {
            meters
        } else {
            meters * FEET_PER_METER
        }
    };

    println!(
        "units={}, {}, weight={} kg, filtering={} m",
        if cli.metric { "metric" } else { "US" },
        if cli.walking { "walking" } else { "running" },
        cli.weight,
        cli.filter,
    );
    println!("horizontal distance = {:.2} {h_unit}", horiz(stats.horizontal_m));
    println!("slope distance = {:.2} {h_unit}", horiz(stats.slope_m));
    println!("gain = {:.0} {v_unit}", vert(stats.gain_m));
    println!("cost = {:.0} kcals", stats.cost_j * KCAL_PER_JOULE);
    println!(
        "CF (fraction of effort due to climbing) = {:5.1} %",
        stats.climb_fraction * 100.0
    );
    println!("i_rms = {:.4}", stats.i_rms);
    println!("steepness index = {:.0} m", stats.steepness_index_m);
    println!("E_q = {:.0} kcals", stats.quick_cost_j * KCAL_PER_JOULE);
    println!(
        "resolution ~ distance/points = {:.2} m",
        analysis.source_resolution_m
    );

    if let Some(power) = stats.power_w {
        let unit_m = if cli.metric { 1000.0 } else { METERS_PER_MILE };
        println!("power = {power:.1} W");
        println!("predicted split times:");
        for (distance, time) in splits(analysis, unit_m) {
            println!(
                "  distance={distance:4.1} {h_unit}, time={}",
                format_hms(time)
            );
        }
    }

    print_warnings(warnings);
}

/// Split times at whole distance units, read off the back-integrated
/// per-sample time predictions.
fn splits(analysis: &Analysis, unit_m: f64) -> Vec<(f64, f64)> {
    let Some(total_time) = analysis.stats.time_s else {
        return Vec::new();
    };
    let h_total = analysis.stats.horizontal_m;
    let whole_units = (h_total / unit_m + 0.49).floor() as usize;
    let mut out = Vec::with_capacity(whole_units + 1);
    for a in 1..=whole_units {
        let target = a as f64 * unit_m;
        let time = analysis
            .profile
            .iter()
            .find(|sample| sample.h * analysis.rescale > target)
            .and_then(|sample| sample.t)
            .unwrap_or(total_time);
        out.push((a as f64, time));
    }
    out.push((h_total / unit_m, total_time));
    out
}

fn format_hms(seconds: f64) -> String {
    let total = seconds as u64;
    let (h, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else if m > 0 {
        format!("{m:02}:{s:02}")
    } else {
        format!("{s:02}")
    }
}

fn print_json(cli: &Cli, analysis: &Analysis, warnings: &[String]) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        horiz: f64,
        horiz_unit: &'static str,
        slope_distance: f64,
        gain: f64,
        vert_unit: &'static str,
        cost: f64,
        i_rms: f64,
        cf: f64,
        warnings: &'a [String],
    }

    let stats = &analysis.stats;
    let (h_unit, v_unit) = if cli.metric { ("km", "m") } else { ("mi", "ft") };
    let h_scale = if cli.metric {
        1.0 / 1000.0
    } else {
        MILES_PER_KM / 1000.0
    };
    let v_scale = if cli.metric { 1.0 } else { FEET_PER_METER };

    let report = JsonReport {
        horiz: stats.horizontal_m * h_scale,
        horiz_unit: h_unit,
        slope_distance: stats.slope_m * h_scale,
        gain: stats.gain_m * v_scale,
        vert_unit: v_unit,
        cost: stats.cost_j * KCAL_PER_JOULE,
        i_rms: stats.i_rms,
        cf: stats.climb_fraction,
        warnings,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn print_csv(analysis: &Analysis) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "horizontal,vertical,dh,dv,i,x,y,z")?;
    let mut previous: Option<&trailcost::HvSample> = None;
    for (sample, point) in analysis.profile.iter().zip(analysis.cartesian.iter()) {
        let (dh, dv) = match previous {
            Some(last) => ((sample.h - last.h) * analysis.rescale, sample.v - last.v),
            None => (0.0, 0.0),
        };
        let i = if dh > 0.0 { dv / dh } else { 0.0 };
        writeln!(
            stdout,
            "{:9.2},{:9.2},{:7.2},{:7.2},{:7.5},{:9.2},{:9.2},{:9.2}",
            sample.h * analysis.rescale,
            sample.v,
            dh,
            dv,
            i,
            point.x,
            point.y,
            point.z,
        )?;
        previous = Some(sample);
    }
    Ok(())
}

fn plot_ascii(analysis: &Analysis) {
    let plot_data: Vec<(f32, f32)> = analysis
        .profile
        .iter()
        .zip(analysis.cartesian.iter())
        .map(|(sample, point)| (sample.h as f32, point.z as f32))
        .collect();
    let h_max = plot_data.last().map_or(1.0, |(h, _)| *h);
    Chart::new(300, 150, 0.0, h_max)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}
