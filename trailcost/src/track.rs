use crate::{error::TrailError, C};
use geo::geometry::Coord;

/// One recorded track point: a geodetic coordinate plus altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    /// Longitude (x) and latitude (y), in degrees.
    pub coord: Coord<C>,

    /// Altitude above sea level, meters.
    pub alt: C,
}

impl GeodeticPoint {
    pub fn new(lat: C, lon: C, alt: C) -> Self {
        Self {
            coord: Coord { x: lon, y: lat },
            alt,
        }
    }

    pub fn lat(&self) -> C {
        self.coord.y
    }

    pub fn lon(&self) -> C {
        self.coord.x
    }
}

/// Min/max extents of a track.
///
/// Recompute whenever the track changes; all later size estimates and
/// the elevation-availability checks read from this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_lo: C,
    pub lat_hi: C,
    pub lon_lo: C,
    pub lon_hi: C,
    pub alt_lo: C,
    pub alt_hi: C,
}

impl BoundingBox {
    /// Returns the extents of `track`.
    pub fn of(track: &[GeodeticPoint]) -> Result<Self, TrailError> {
        let first = track.first().ok_or(TrailError::EmptyTrack)?;
        let mut bounds = Self {
            lat_lo: first.lat(),
            lat_hi: first.lat(),
            lon_lo: first.lon(),
            lon_hi: first.lon(),
            alt_lo: first.alt,
            alt_hi: first.alt,
        };
        for point in &track[1..] {
            bounds.lat_lo = bounds.lat_lo.min(point.lat());
            bounds.lat_hi = bounds.lat_hi.max(point.lat());
            bounds.lon_lo = bounds.lon_lo.min(point.lon());
            bounds.lon_hi = bounds.lon_hi.max(point.lon());
            bounds.alt_lo = bounds.alt_lo.min(point.alt);
            bounds.alt_hi = bounds.alt_hi.max(point.alt);
        }
        Ok(bounds)
    }
}

/// Checks every point of `track` against the geodetic sanity bounds.
///
/// |lat| <= 90 degrees, |lon| <= 360 degrees (out-and-back recordings
/// that cross the antimeridian can legitimately exceed 180), and
/// |alt| <= 10 km.
pub(crate) fn validate(track: &[GeodeticPoint]) -> Result<(), TrailError> {
    if track.is_empty() {
        return Err(TrailError::EmptyTrack);
    }
    for (index, point) in track.iter().enumerate() {
        if !(-90.0..=90.0).contains(&point.lat()) {
            return Err(TrailError::InvalidCoordinate {
                index,
                field: "latitude",
                value: point.lat(),
            });
        }
        if !(-360.0..=360.0).contains(&point.lon()) {
            return Err(TrailError::InvalidCoordinate {
                index,
                field: "longitude",
                value: point.lon(),
            });
        }
        if !(-10_000.0..=10_000.0).contains(&point.alt) {
            return Err(TrailError::InvalidCoordinate {
                index,
                field: "altitude",
                value: point.alt,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate, BoundingBox, GeodeticPoint};
    use crate::error::TrailError;

    #[test]
    fn test_bounding_box() {
        let track = vec![
            GeodeticPoint::new(34.2, -117.6, 1800.0),
            GeodeticPoint::new(34.3, -117.7, 1900.0),
            GeodeticPoint::new(34.1, -117.5, 1700.0),
        ];
        let bounds = BoundingBox::of(&track).unwrap();
        assert_eq!(bounds.lat_lo, 34.1);
        assert_eq!(bounds.lat_hi, 34.3);
        assert_eq!(bounds.lon_lo, -117.7);
        assert_eq!(bounds.lon_hi, -117.5);
        assert_eq!(bounds.alt_lo, 1700.0);
        assert_eq!(bounds.alt_hi, 1900.0);
    }

    #[test]
    fn test_empty_track_is_fatal() {
        assert!(matches!(
            BoundingBox::of(&[]),
            Err(TrailError::EmptyTrack)
        ));
        assert!(matches!(validate(&[]), Err(TrailError::EmptyTrack)));
    }

    #[test]
    fn test_validate_bounds() {
        let ok = [GeodeticPoint::new(89.9, 359.9, 8848.0)];
        assert!(validate(&ok).is_ok());

        let bad_lat = [GeodeticPoint::new(91.0, 0.0, 0.0)];
        assert!(matches!(
            validate(&bad_lat),
            Err(TrailError::InvalidCoordinate {
                field: "latitude",
                ..
            })
        ));

        let bad_alt = [
            GeodeticPoint::new(0.0, 0.0, 0.0),
            GeodeticPoint::new(0.0, 0.0, 10_001.0),
        ];
        assert!(matches!(
            validate(&bad_alt),
            Err(TrailError::InvalidCoordinate {
                index: 1,
                field: "altitude",
                ..
            })
        ));
    }
}
