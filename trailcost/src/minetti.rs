//! Empirical cost-of-transport model.
//!
//! Fitted polynomials from Minetti et al. (2002), "Energy cost of
//! walking and running at extreme uphill and downhill slopes",
//! J. Appl. Physiol. 93. The coefficients are the published
//! regression constants; the fits cover slope ratios between -0.5
//! and +0.5.

use crate::C;

/// Locomotion mode. Selects which regression applies; unit and label
/// choices elsewhere do not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Walking,
    Running,
}

/// Slope-ratio range the regressions were fitted over.
const SLOPE_LO: C = -0.5;
const SLOPE_HI: C = 0.5;

/// Quintic coefficients, highest power first, J/(kg·m).
const RUNNING: [C; 6] = [155.4, -30.4, -43.3, 46.3, 19.5, 3.6];
const WALKING: [C; 6] = [280.5, -58.7, -76.8, 51.9, 19.6, 2.5];

/// Metabolic cost of moving one kilogram one meter of slope distance
/// at slope ratio `slope`, in joules.
///
/// Slopes outside the fitted range are clamped to it; the quintics
/// diverge quickly past their data, and a steeper reading is almost
/// always a glitch rather than a cliff traverse.
pub fn cost_per_kg_m(activity: Activity, slope: C) -> C {
    let i = slope.clamp(SLOPE_LO, SLOPE_HI);
    let coeffs = match activity {
        Activity::Running => &RUNNING,
        Activity::Walking => &WALKING,
    };
    coeffs.iter().fold(0.0, |acc, &k| acc * i + k)
}

/// Quadratic expansion of the cost curve about its energetic optimum.
///
/// Supports aggregate estimates straight from summary slope
/// statistics, without walking the track again; a cross-check on the
/// full integration, not a replacement for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFit {
    /// Slope ratio of minimum cost.
    pub i0: C,

    /// Cost at the minimum, J/(kg·m).
    pub c0: C,

    /// Curvature (half the second derivative at the minimum).
    pub c2: C,
}

impl QuadraticFit {
    /// Constants fitted offline to the quintics above.
    pub fn for_activity(activity: Activity) -> Self {
        match activity {
            Activity::Running => Self {
                i0: -0.1815,
                c0: 1.781,
                c2: 54.6,
            },
            Activity::Walking => Self {
                i0: -0.1525,
                c0: 0.936,
                c2: 68.9,
            },
        }
    }

    /// Coefficients of the expanded form `b0 + b1*i + b2*i^2`.
    pub fn coeffs(&self) -> (C, C, C) {
        (
            self.c0 + self.c2 * self.i0 * self.i0,
            -2.0 * self.c2 * self.i0,
            self.c2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{cost_per_kg_m, Activity, QuadraticFit};
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_ground_constants() {
        assert_eq!(cost_per_kg_m(Activity::Running, 0.0), 3.6);
        assert_eq!(cost_per_kg_m(Activity::Walking, 0.0), 2.5);
    }

    #[test]
    fn test_uphill_costs_more_than_flat() {
        for activity in [Activity::Walking, Activity::Running] {
            let flat = cost_per_kg_m(activity, 0.0);
            assert!(cost_per_kg_m(activity, 0.2) > flat);
            assert!(cost_per_kg_m(activity, 0.45) > cost_per_kg_m(activity, 0.2));
        }
    }

    #[test]
    fn test_mild_downhill_costs_less_steep_downhill_more() {
        for activity in [Activity::Walking, Activity::Running] {
            let optimum = QuadraticFit::for_activity(activity).i0;
            let at_optimum = cost_per_kg_m(activity, optimum);
            assert!(at_optimum < cost_per_kg_m(activity, 0.0));
            // cost turns back up well below the optimum
            assert!(cost_per_kg_m(activity, -0.45) > at_optimum);
            // the tabulated optimum really is a local minimum
            assert!(at_optimum <= cost_per_kg_m(activity, optimum - 0.02));
            assert!(at_optimum <= cost_per_kg_m(activity, optimum + 0.02));
        }
    }

    #[test]
    fn test_out_of_range_slopes_clamp() {
        for activity in [Activity::Walking, Activity::Running] {
            assert_eq!(
                cost_per_kg_m(activity, 3.0),
                cost_per_kg_m(activity, 0.5)
            );
            assert_eq!(
                cost_per_kg_m(activity, -2.0),
                cost_per_kg_m(activity, -0.5)
            );
        }
    }

    #[test]
    fn test_quadratic_tracks_quintic_near_flat() {
        for activity in [Activity::Walking, Activity::Running] {
            let (b0, b1, b2) = QuadraticFit::for_activity(activity).coeffs();
            for slope in [-0.2, -0.1, 0.0, 0.1] {
                let quad = b0 + b1 * slope + b2 * slope * slope;
                let full = cost_per_kg_m(activity, slope);
                assert_relative_eq!(quad, full, max_relative = 0.10);
            }
        }
    }
}
