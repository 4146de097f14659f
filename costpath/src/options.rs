use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};

/// Estimate the metabolic energy cost of a recorded hike or run.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Track file (CSV with Latitude/Longitude/Altitude columns, or
    /// "T lat lon alt" text). Reads standard input when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Report in km and meters instead of miles and feet.
    #[arg(long, default_value_t = false)]
    pub metric: bool,

    /// Use the walking cost model instead of running.
    #[arg(long, default_value_t = false)]
    pub walking: bool,

    /// Body mass, kilograms.
    #[arg(short = 'w', long, default_value_t = 66.0)]
    pub weight: f64,

    /// Filter out elevation variation on horizontal scales shorter
    /// than this, in meters. Calculated gain is very sensitive to it.
    #[arg(long, default_value_t = 60.0)]
    pub filter: f64,

    /// Filter width for horizontal position wander, meters.
    #[arg(long, default_value_t = 30.0)]
    pub xy_filter: f64,

    /// Subdivide the track until no segment is longer than this, in
    /// meters. The default matches common elevation-grid resolution.
    #[arg(long, default_value_t = 30.0)]
    pub resolution: f64,

    /// Reference point "lat,lon" for the local projection. Defaults
    /// to the first track point.
    #[arg(long)]
    pub origin: Option<LatLon>,

    /// Elevation raster file in ESRI ASCII grid format, used when the
    /// track carries no altitudes.
    #[arg(short, long)]
    pub grid: Option<PathBuf>,

    /// Resample altitudes from the grid even when the track carries
    /// its own.
    #[arg(long, default_value_t = false)]
    pub force_grid: bool,

    /// Nominal total distance (miles, or km with --metric); the
    /// integrated distance is rescaled to match.
    #[arg(long)]
    pub nominal_distance: Option<f64>,

    /// Reference distance for pace (miles, or km with --metric).
    /// Requires --pace-time.
    #[arg(long, requires = "pace_time")]
    pub pace_distance: Option<f64>,

    /// Reference time for pace, "h:m:s".
    #[arg(long, requires = "pace_distance")]
    pub pace_time: Option<Hms>,

    /// Enforce the shared-server route-size ceilings.
    #[arg(long, default_value_t = false)]
    pub limits: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

/// A duration in seconds, accepted as "s", "m:s" or "h:m:s".
#[derive(Clone, Debug, Copy)]
pub struct Hms(pub f64);

impl FromStr for Hms {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let fields: Vec<&str> = s.split(':').collect();
        if fields.is_empty() || fields.len() > 3 {
            return Err(anyhow!("not a valid h:m:s duration"));
        }
        let seconds = fields.iter().try_fold(0.0, |acc, field| {
            field
                .parse::<f64>()
                .map(|value| acc * 60.0 + value)
                .map_err(|_| anyhow!("not a valid h:m:s duration"))
        })?;
        Ok(Self(seconds))
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print a human-readable summary.
    Text,

    /// Print a machine-readable summary record.
    Json,

    /// Print per-sample profile values to stdout.
    Csv,

    /// Plot the elevation profile to the terminal.
    Plot,
}
