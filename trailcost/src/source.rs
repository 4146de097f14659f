//! Capability seams for the external collaborators.
//!
//! Track-format decoding and elevation-raster acquisition are jobs
//! for the surrounding application (which may shell out, hit the
//! network, or read files); the pipeline only ever sees the decoded
//! values these traits hand back. Failures surface as ordinary typed
//! errors, never as process-exit side channels.

use crate::{
    error::TrailError,
    track::{BoundingBox, GeodeticPoint},
    Warnings,
};
use elevgrid::{Grid, GridError};

/// Decodes raw track text into point triples.
pub trait TrackSource {
    fn decode(&self, raw: &str) -> Result<Vec<GeodeticPoint>, TrailError>;
}

/// Produces an elevation raster covering a track's bounding box.
///
/// Notes about the product that don't prevent using it (unrecognized
/// header lines and the like) go into `warnings`.
pub trait GridSource {
    fn fetch(&self, bounds: &BoundingBox, warnings: &mut Warnings) -> Result<Grid, GridError>;
}
