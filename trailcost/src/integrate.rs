//! Reduction of a Cartesian sequence to cumulative horizontal and
//! vertical travel.

use crate::{projection::CartesianPoint, Warnings, C};

/// Cumulative travel at one track sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HvSample {
    /// Cumulative horizontal distance, meters. Non-decreasing.
    pub h: C,

    /// Cumulative signed vertical change, meters.
    pub v: C,

    /// Predicted elapsed time at this sample, seconds. Present only
    /// when a target pace was supplied.
    pub t: Option<C>,
}

/// Horizontal step beyond which the input is assumed discontinuous.
const BIG_STEP_M: C = 10_000.0;

/// Walks consecutive Cartesian pairs and accumulates horizontal
/// distance and signed vertical change; the first sample is (0, 0).
///
/// A single step of more than 10 km horizontally smells like corrupt
/// or spliced input and is reported once, non-fatally.
pub fn integrate_horiz_vert(cartesian: &[CartesianPoint], warnings: &mut Warnings) -> Vec<HvSample> {
    let mut hv = Vec::with_capacity(cartesian.len());
    let mut warned_big_step = false;
    let mut h = 0.0;
    let mut v = 0.0;
    let mut prev: Option<&CartesianPoint> = None;
    for point in cartesian {
        if let Some(last) = prev {
            let (dx, dy, dz) = (point.x - last.x, point.y - last.y, point.z - last.z);
            let dl2 = dx * dx + dy * dy + dz * dz;
            // dl2 - dz^2 can come out a hair negative on a
            // near-vertical step
            let dh = (dl2 - dz * dz).max(0.0).sqrt();
            if dh > BIG_STEP_M && !warned_big_step {
                warnings.push(format!(
                    "Two successive points are more than 10 km apart horizontally: \
                     dx={dx}, dy={dy}, dz={dz}."
                ));
                warned_big_step = true;
            }
            h += dh;
            v += dz;
        }
        hv.push(HvSample { h, v, t: None });
        prev = Some(point);
    }
    hv
}

#[cfg(test)]
mod tests {
    use super::{integrate_horiz_vert, CartesianPoint};
    use crate::Warnings;
    use approx::assert_relative_eq;

    fn cart(x: f64, y: f64, z: f64) -> CartesianPoint {
        CartesianPoint { x, y, z }
    }

    #[test]
    fn test_first_sample_is_origin() {
        let mut warnings = Warnings::default();
        let hv = integrate_horiz_vert(&[cart(42.0, -7.0, 1300.0)], &mut warnings);
        assert_eq!(hv.len(), 1);
        assert_eq!((hv[0].h, hv[0].v), (0.0, 0.0));
    }

    #[test]
    fn test_accumulation() {
        let mut warnings = Warnings::default();
        let points = [
            cart(0.0, 0.0, 100.0),
            cart(30.0, 40.0, 110.0), // 3-4-5 triangle in the plane, +10 up
            cart(30.0, 40.0, 90.0),  // straight down 20
        ];
        let hv = integrate_horiz_vert(&points, &mut warnings);
        // dl^2 = 30^2 + 40^2 + 10^2 = 2600, so dh = sqrt(2600 - 100) = 50
        assert_relative_eq!(hv[1].h, 50.0);
        assert_relative_eq!(hv[1].v, 10.0);
        assert_relative_eq!(hv[2].h, 50.0); // vertical step adds no h
        assert_relative_eq!(hv[2].v, -10.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_h_monotone_and_finite_on_vertical_step() {
        let mut warnings = Warnings::default();
        let points = [cart(0.0, 0.0, 0.0), cart(0.0, 0.0, 35.0)];
        let hv = integrate_horiz_vert(&points, &mut warnings);
        // cancellation must clamp to zero rather than NaN
        assert_eq!(hv[1].h, 0.0);
        assert!(hv[1].h.is_finite());
    }

    #[test]
    fn test_big_step_warns_once() {
        let mut warnings = Warnings::default();
        let points = [
            cart(0.0, 0.0, 0.0),
            cart(11_000.0, 0.0, 0.0),
            cart(23_000.0, 0.0, 0.0),
        ];
        integrate_horiz_vert(&points, &mut warnings);
        assert_eq!(warnings.as_slice().len(), 1);
        assert!(warnings.as_slice()[0].contains("10 km"));
    }
}
