//! Pipeline orchestration: one immutable configuration in, one
//! analyzed track out.

use crate::{
    energy::{self, Pace, Stats},
    error::TrailError,
    filter::{self, SmoothParams},
    integrate::{self, HvSample},
    minetti::Activity,
    projection::{CartesianPoint, LocalFrame},
    resolution::{self, SizeLimits},
    track::{self, BoundingBox, GeodeticPoint},
    Warnings, C,
};
use elevgrid::Grid;
use log::debug;

/// A fully processed track with its aggregate statistics.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The processed track: densified, elevation-sampled and
    /// smoothed.
    pub track: Vec<GeodeticPoint>,

    /// Frame-local coordinates of `track`, same length and order.
    pub cartesian: Vec<CartesianPoint>,

    /// Cumulative horizontal/vertical profile of `track`, with
    /// per-sample time predictions when a pace was configured.
    pub profile: Vec<HvSample>,

    /// Aggregate results.
    pub stats: Stats,

    /// The uniform factor applied to horizontal increments; 1 unless
    /// a nominal distance was configured.
    pub rescale: C,

    /// Reference coordinate of the local frame.
    pub origin: geo::geometry::Coord<C>,

    /// Extents of the *input* track.
    pub bounds: BoundingBox,

    /// Anomaly notes accumulated along the way, in order.
    pub warnings: Vec<String>,

    /// Number of points in the input track, before densification.
    pub raw_points: usize,

    /// Rough spacing of the input data: total distance over input
    /// point count.
    pub source_resolution_m: C,
}

impl Analysis {
    pub fn builder<'a>() -> AnalysisBuilder<'a> {
        AnalysisBuilder::default()
    }
}

/// Immutable per-run configuration, captured before anything runs.
///
/// Every stage reads from here; nothing global, so independent runs
/// can proceed concurrently.
#[derive(Debug, Clone)]
pub struct AnalysisBuilder<'a> {
    activity: Activity,
    body_mass_kg: C,
    xy_filter_m: C,
    z_filter_m: C,
    resolution_m: C,
    origin: Option<geo::geometry::Coord<C>>,
    grid: Option<&'a Grid>,
    force_grid: bool,
    nominal_distance_m: Option<C>,
    pace: Option<Pace>,
    limits: Option<SizeLimits>,
}

impl Default for AnalysisBuilder<'_> {
    fn default() -> Self {
        Self {
            activity: Activity::Running,
            body_mass_kg: 66.0,
            xy_filter_m: 30.0,
            z_filter_m: 60.0,
            resolution_m: 30.0,
            origin: None,
            grid: None,
            force_grid: false,
            nominal_distance_m: None,
            pace: None,
            limits: None,
        }
    }
}

impl<'a> AnalysisBuilder<'a> {
    pub fn activity(mut self, activity: Activity) -> Self {
        self.activity = activity;
        self
    }

    /// Body mass in kilograms.
    pub fn body_mass_kg(mut self, kg: C) -> Self {
        self.body_mass_kg = kg;
        self
    }

    /// Width of the horizontal-wander filter, meters. Zero disables
    /// that channel.
    pub fn xy_filter_m(mut self, meters: C) -> Self {
        self.xy_filter_m = meters;
        self
    }

    /// Width of the elevation-noise filter, meters. Computed gain is
    /// very sensitive to this. Zero disables that channel.
    pub fn z_filter_m(mut self, meters: C) -> Self {
        self.z_filter_m = meters;
        self
    }

    /// Target maximum segment length for subdivision, meters.
    pub fn resolution_m(mut self, meters: C) -> Self {
        self.resolution_m = meters;
        self
    }

    /// Reference point of the local frame. Defaults to the first
    /// track point.
    pub fn origin(mut self, origin: geo::geometry::Coord<C>) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Elevation raster to take altitudes from when the track has
    /// none (or always, with [`Self::force_grid`]).
    pub fn grid(mut self, grid: &'a Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Resample altitudes from the grid even when the track carries
    /// its own. Recorded altitudes are frequently the least reliable
    /// channel of a consumer GPS track.
    pub fn force_grid(mut self, force: bool) -> Self {
        self.force_grid = force;
        self
    }

    /// Nominal total horizontal distance, meters; increments are
    /// rescaled uniformly so the total matches.
    pub fn nominal_distance_m(mut self, meters: C) -> Self {
        self.nominal_distance_m = Some(meters);
        self
    }

    /// Target pace for power and split-time prediction.
    pub fn pace(mut self, pace: Pace) -> Self {
        self.pace = Some(pace);
        self
    }

    /// Resource ceilings for constrained execution contexts.
    pub fn limits(mut self, limits: SizeLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Runs the whole pipeline over `track`.
    pub fn build(&self, track: &[GeodeticPoint]) -> Result<Analysis, TrailError> {
        track::validate(track)?;
        let mut warnings = Warnings::default();
        let raw_points = track.len();

        let origin = self.origin.unwrap_or(track[0].coord);
        let bounds = BoundingBox::of(track)?;

        let mut path =
            resolution::densify(track, &bounds, self.resolution_m, self.limits.as_ref())?;
        self.apply_grid(&mut path, &bounds, &mut warnings);

        let frame = LocalFrame::new(origin);
        let mut cartesian = frame.project(&path)?;
        let mut hv = integrate::integrate_horiz_vert(&cartesian, &mut warnings);
        debug!(
            "projected; points: {} (raw {raw_points}), h: {:.1} m",
            path.len(),
            hv.last().map_or(0.0, |s| s.h),
        );

        if (self.xy_filter_m > 0.0 || self.z_filter_m > 0.0)
            && hv.last().is_some_and(|s| s.h > 0.0)
        {
            let params = SmoothParams {
                xy_window_m: self.xy_filter_m,
                z_window_m: self.z_filter_m,
            };
            cartesian = filter::smooth_path(&cartesian, &hv, &params);
            path = cartesian.iter().map(|p| frame.to_geodetic(p)).collect();
            hv = integrate::integrate_horiz_vert(&cartesian, &mut warnings);
            debug!("smoothed; samples: {}", cartesian.len());
        }

        let h = hv.last().map_or(0.0, |s| s.h);
        let mut rescale = 1.0;
        if let Some(nominal) = self.nominal_distance_m {
            if h > 0.0 {
                rescale = nominal / h;
                if !(0.8..=1.2).contains(&rescale) {
                    warnings.push(format!(
                        "To make the distance equal to its nominal value, it was \
                         necessary to rescale by {:.1}%, which is greater than 20%.",
                        (rescale - 1.0) * 100.0
                    ));
                }
            } else {
                warnings.push(
                    "A nominal distance was supplied, but the integrated distance \
                     is zero; no rescaling was applied.",
                );
            }
        }

        let (stats, profile) = energy::integrate_energy(
            &hv,
            self.activity,
            self.body_mass_kg,
            rescale,
            self.pace.as_ref(),
        )?;

        if let Some(nominal) = self.nominal_distance_m {
            if stats.horizontal_m > 0.0
                && ((stats.horizontal_m - nominal) / stats.horizontal_m).abs() > 1.0e-6
            {
                warnings.push(format!(
                    "Integrated distance {} m is not within 1 ppm of the nominal {} m.",
                    stats.horizontal_m, nominal
                ));
            }
        }

        let source_resolution_m = stats.horizontal_m / raw_points as C;

        Ok(Analysis {
            track: path,
            cartesian,
            profile,
            stats,
            rescale,
            origin,
            bounds,
            warnings: warnings.into_vec(),
            raw_points,
            source_resolution_m,
        })
    }

    /// Fills or overrides altitudes from the configured grid, and
    /// records the elevation-availability warnings.
    fn apply_grid(
        &self,
        path: &mut [GeodeticPoint],
        bounds: &BoundingBox,
        warnings: &mut Warnings,
    ) {
        let no_altitude = bounds.alt_lo == 0.0 && bounds.alt_hi == 0.0;
        match self.grid {
            None => {
                if no_altitude {
                    warnings.push(
                        "The track does not appear to contain any elevation data; \
                         supply an elevation grid for meaningful gain and cost \
                         figures.",
                    );
                }
            }
            Some(grid) => {
                if self.force_grid || no_altitude {
                    for point in path.iter_mut() {
                        point.alt = grid.sample(point.coord);
                    }
                } else {
                    warnings.push(
                        "The track already contains elevation data, so the supplied \
                         elevation grid was not applied; enable the force option to \
                         resample altitudes from it.",
                    );
                }
            }
        }
    }
}
