//! Polyline subdivision and route-size guards.
//!
//! A recorded track may contain long segments that look straight on a
//! map but cross real terrain relief; elevation sampled only at their
//! endpoints would miss it. Subdividing to roughly the elevation
//! grid's resolution before sampling fixes that.

use crate::{
    error::TrailError,
    math::lerp,
    projection::earth_radius,
    track::{BoundingBox, GeodeticPoint},
    C,
};

/// Ceiling on the bounding-box diagonal before the input is treated
/// as corrupt, meters.
const MAX_DIAGONAL_M: C = 300_000.0;

/// Resource ceilings for externally exposed execution contexts.
///
/// Inactive unless supplied; the defaults are sized for a shared
/// public server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    /// Maximum route length, meters.
    pub max_distance_m: C,

    /// Maximum number of raw track points.
    pub max_points: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_distance_m: 70_000.0,
            max_points: 2000,
        }
    }
}

/// Splits over-long segments so that no two consecutive points are
/// more than about `max_segment_m` apart, interpolating lat, lon and
/// alt independently.
///
/// Distances here come from flat per-degree scale factors taken at
/// the box's low latitude; this is a subdivision heuristic, not a
/// measurement, and the cheap estimate is plenty.
pub fn densify(
    track: &[GeodeticPoint],
    bounds: &BoundingBox,
    max_segment_m: C,
    limits: Option<&SizeLimits>,
) -> Result<Vec<GeodeticPoint>, TrailError> {
    let m_per_deg_lat = earth_radius(bounds.lat_lo) * std::f64::consts::PI / 180.0;
    let m_per_deg_lon = m_per_deg_lat * bounds.lat_lo.to_radians().cos();

    let diagonal = (m_per_deg_lat * (bounds.lat_hi - bounds.lat_lo))
        .hypot(m_per_deg_lon * (bounds.lon_hi - bounds.lon_lo));
    if let Some(limits) = limits {
        if diagonal > limits.max_distance_m {
            return Err(TrailError::RegionTooLarge);
        }
        if track.len() > limits.max_points {
            return Err(TrailError::TooManyPoints(track.len()));
        }
    }
    if diagonal > MAX_DIAGONAL_M {
        return Err(TrailError::SuspectBounds(diagonal));
    }

    let mut out = Vec::with_capacity(track.len());
    let mut running_m = 0.0;
    for pair in track.windows(2) {
        let (p, q) = (&pair[0], &pair[1]);
        out.push(*p);

        let segment = (m_per_deg_lat * (q.lat() - p.lat()))
            .hypot(m_per_deg_lon * (q.lon() - p.lon()));
        running_m += segment;
        if let Some(limits) = limits {
            if running_m > limits.max_distance_m {
                return Err(TrailError::RouteTooLong);
            }
        }

        if max_segment_m > 0.0 && segment > max_segment_m {
            let pieces = (segment / max_segment_m) as usize + 1;
            for i in 1..pieces {
                let s = i as C / pieces as C;
                out.push(GeodeticPoint::new(
                    lerp(p.lat(), q.lat(), s),
                    lerp(p.lon(), q.lon(), s),
                    lerp(p.alt, q.alt, s),
                ));
            }
        }
    }
    if let Some(last) = track.last() {
        out.push(*last);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{densify, SizeLimits};
    use crate::track::{BoundingBox, GeodeticPoint};
    use crate::error::TrailError;

    fn two_point_track(dlat: f64) -> Vec<GeodeticPoint> {
        vec![
            GeodeticPoint::new(34.0, -117.0, 1000.0),
            GeodeticPoint::new(34.0 + dlat, -117.0, 1400.0),
        ]
    }

    #[test]
    fn test_subdivision_bound() {
        // roughly 1.1 km of latitude
        let track = two_point_track(0.01);
        let bounds = BoundingBox::of(&track).unwrap();
        let out = densify(&track, &bounds, 30.0, None).unwrap();

        assert_eq!(*out.first().unwrap(), track[0]);
        assert_eq!(*out.last().unwrap(), track[1]);
        for pair in out.windows(2) {
            let dlat = (pair[1].lat() - pair[0].lat()).abs();
            // ~110.9 km per degree of latitude at 34 degrees
            assert!(dlat * 110_900.0 <= 30.0 * 1.001);
        }
        // altitude interpolates along with position
        let mid = out[out.len() / 2];
        assert!((1000.0..=1400.0).contains(&mid.alt));
    }

    #[test]
    fn test_dense_track_unchanged() {
        let track = vec![
            GeodeticPoint::new(34.0, -117.0, 1000.0),
            GeodeticPoint::new(34.0001, -117.0, 1001.0),
            GeodeticPoint::new(34.0002, -117.0, 1002.0),
        ];
        let bounds = BoundingBox::of(&track).unwrap();
        let out = densify(&track, &bounds, 30.0, None).unwrap();
        assert_eq!(out, track);
    }

    #[test]
    fn test_too_many_points_guard() {
        let track: Vec<GeodeticPoint> = (0..2001)
            .map(|i| GeodeticPoint::new(34.0 + i as f64 * 1e-5, -117.0, 1000.0))
            .collect();
        let bounds = BoundingBox::of(&track).unwrap();
        let limits = SizeLimits::default();
        assert!(matches!(
            densify(&track, &bounds, 30.0, Some(&limits)),
            Err(TrailError::TooManyPoints(2001))
        ));
        // the same track passes unguarded
        assert!(densify(&track, &bounds, 30.0, None).is_ok());
    }

    #[test]
    fn test_region_and_length_guards() {
        let track = two_point_track(1.0); // ~111 km
        let bounds = BoundingBox::of(&track).unwrap();
        let limits = SizeLimits::default();
        assert!(matches!(
            densify(&track, &bounds, 30.0, Some(&limits)),
            Err(TrailError::RegionTooLarge)
        ));

        // a long thin zig-zag stays inside the region ceiling but
        // accumulates too much length
        let zigzag: Vec<GeodeticPoint> = (0..200)
            .map(|i| {
                let lon = if i % 2 == 0 { -117.0 } else { -116.5 }; // ~46 km per leg
                GeodeticPoint::new(34.0 + i as f64 * 1e-5, lon, 1000.0)
            })
            .collect();
        let bounds = BoundingBox::of(&zigzag).unwrap();
        assert!(matches!(
            densify(&zigzag, &bounds, 3000.0, Some(&limits)),
            Err(TrailError::RouteTooLong)
        ));
    }

    #[test]
    fn test_corrupt_bounds_fatal() {
        let track = two_point_track(4.0); // ~440 km of latitude
        let bounds = BoundingBox::of(&track).unwrap();
        assert!(matches!(
            densify(&track, &bounds, 30.0, None),
            Err(TrailError::SuspectBounds(_))
        ));
    }
}
