//! Local tangent-plane projection about a reference coordinate.

use crate::{error::TrailError, track::GeodeticPoint, C};
use geo::geometry::Coord;

const EQUATORIAL_RADIUS_M: C = 6_378_137.0;
const POLAR_RADIUS_M: C = 6_356_752.3;

/// Geocentric earth radius at latitude `lat` (degrees), in meters.
///
/// Blends the equatorial and polar radii so degree offsets convert to
/// meters sensibly at any reference latitude.
pub fn earth_radius(lat: C) -> C {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let a2c = EQUATORIAL_RADIUS_M * EQUATORIAL_RADIUS_M * cos_lat;
    let b2s = POLAR_RADIUS_M * POLAR_RADIUS_M * sin_lat;
    let ac = EQUATORIAL_RADIUS_M * cos_lat;
    let bs = POLAR_RADIUS_M * sin_lat;
    ((a2c * a2c + b2s * b2s) / (ac * ac + bs * bs)).sqrt()
}

/// A point in a local tangent frame, meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartesianPoint {
    pub x: C,
    pub y: C,
    pub z: C,
}

/// A flat-earth frame centered on a reference coordinate.
///
/// The x axis points east, y north, and z carries altitude directly
/// (terrain curvature is negligible over the tens of kilometers a
/// track covers). [`LocalFrame::to_geodetic`] is the exact inverse of
/// [`LocalFrame::to_local`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: Coord<C>,

    /// Meters per degree of latitude at the origin.
    m_per_deg_lat: C,

    /// Meters per degree of longitude at the origin.
    m_per_deg_lon: C,
}

impl LocalFrame {
    pub fn new(origin: Coord<C>) -> Self {
        let m_per_deg_lat = earth_radius(origin.y) * std::f64::consts::PI / 180.0;
        Self {
            origin,
            m_per_deg_lat,
            m_per_deg_lon: m_per_deg_lat * origin.y.to_radians().cos(),
        }
    }

    pub fn origin(&self) -> Coord<C> {
        self.origin
    }

    /// Converts one geodetic point into this frame.
    pub fn to_local(&self, point: &GeodeticPoint) -> CartesianPoint {
        CartesianPoint {
            x: (point.lon() - self.origin.x) * self.m_per_deg_lon,
            y: (point.lat() - self.origin.y) * self.m_per_deg_lat,
            z: point.alt,
        }
    }

    /// Recovers the geodetic point for a frame-local one.
    pub fn to_geodetic(&self, point: &CartesianPoint) -> GeodeticPoint {
        GeodeticPoint::new(
            self.origin.y + point.y / self.m_per_deg_lat,
            self.origin.x + point.x / self.m_per_deg_lon,
            point.z,
        )
    }

    /// Projects a whole track, first validating every point against
    /// the geodetic sanity bounds.
    pub fn project(&self, track: &[GeodeticPoint]) -> Result<Vec<CartesianPoint>, TrailError> {
        crate::track::validate(track)?;
        Ok(track.iter().map(|p| self.to_local(p)).collect())
    }
}
