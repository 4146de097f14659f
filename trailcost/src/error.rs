use crate::C;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrailError {
    #[error("track contains no points")]
    EmptyTrack,

    #[error("illegal {field} {value} at track point {index}")]
    InvalidCoordinate {
        index: usize,
        field: &'static str,
        value: C,
    },

    #[error(
        "the bounding-box diagonal of this route appears to be {:.1} km, \
         which is unreasonably large",
        .0 / 1000.0
    )]
    SuspectBounds(C),

    #[error("this route covers too large a region for this execution context")]
    RegionTooLarge,

    #[error("this route is too long for this execution context")]
    RouteTooLong,

    #[error("this route has too many points ({0}) for this execution context")]
    TooManyPoints(usize),

    #[error("could not decode track: {0}")]
    Decode(String),

    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}
