//! Metabolic energy cost of traversing a recorded outdoor track.
//!
//! The crate turns a raw, noisy sequence of geodetic points (a hike
//! or run recording) into distance, climb and energy figures through
//! a fixed pipeline: local tangent-plane projection, polyline
//! subdivision, horizontal/vertical integration, detrend-and-window
//! smoothing, and integration of an empirical cost-of-transport
//! model. [`Analysis::builder`] captures the whole per-run
//! configuration up front, so independent runs share no state.
//!
//! Decoding track file formats and acquiring elevation rasters are
//! jobs for the caller; the [`TrackSource`] and [`GridSource`] traits
//! mark those seams.

mod analysis;
mod energy;
mod error;
mod filter;
mod integrate;
mod math;
mod minetti;
mod projection;
mod resolution;
mod source;
mod track;

pub use crate::{
    analysis::{Analysis, AnalysisBuilder},
    energy::{Pace, Stats},
    error::TrailError,
    filter::{box_filter, SmoothParams},
    integrate::HvSample,
    minetti::{cost_per_kg_m, Activity, QuadraticFit},
    projection::{earth_radius, CartesianPoint, LocalFrame},
    resolution::SizeLimits,
    source::{GridSource, TrackSource},
    track::{BoundingBox, GeodeticPoint},
};
pub use geo;

/// Base floating point type used for all coordinates and calculations.
///
/// Tracks top out at a few hundred thousand samples, so the space
/// savings of `f32` never matter while the precision loss in
/// cumulative sums would; a plain alias keeps the crate simpler than
/// a generic parameter would.
pub type C = f64;

/// Ordered, non-fatal anomaly notes accumulated during a run.
///
/// Warnings indicate reduced confidence in the result, never failure;
/// they are surfaced alongside the result and mirrored to the `log`
/// facade as they occur.
#[derive(Debug, Default, Clone)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.0.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
