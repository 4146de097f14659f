//! Gain and metabolic-energy integration over a horizontal/vertical
//! profile.

use crate::{
    error::TrailError,
    integrate::HvSample,
    minetti::{cost_per_kg_m, Activity, QuadraticFit},
    C,
};

/// A target pace: a reference distance covered in a reference time.
///
/// Fixes the constant power level used to back out predicted elapsed
/// times along the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pace {
    pub distance_m: C,
    pub time_s: C,
}

/// Aggregate results of one run. Everything is SI: meters, joules,
/// watts, seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Total horizontal distance, after any rescaling.
    pub horizontal_m: C,

    /// Total distance along the slope.
    pub slope_m: C,

    /// Sum of positive vertical increments.
    pub gain_m: C,

    /// Integrated metabolic cost.
    pub cost_j: C,

    /// Mean slope ratio: net vertical change over total horizontal.
    pub i_mean: C,

    /// dh-weighted RMS deviation of the slope ratio; a roughness
    /// indicator.
    pub i_rms: C,

    /// Aggregate quick estimate from the quadratic model fit; a
    /// cross-check on `cost_j`.
    pub quick_cost_j: C,

    /// Fraction of the cost attributable to non-flat terrain. Can be
    /// negative on net-downhill routes, because mild downhills cost
    /// less than flat ground; deliberately left unclamped.
    pub climb_fraction: C,

    /// Sum of dv^2/dh over the track, meters; an alternative
    /// steepness measure computed directly as a check.
    pub steepness_index_m: C,

    /// Constant power implied by the pace, when one was supplied.
    pub power_w: Option<C>,

    /// Predicted total time at that power.
    pub time_s: Option<C>,
}

/// Walks consecutive profile samples, accumulating gain, slope
/// distance and energy, and returns the profile with per-sample time
/// predictions attached when a pace fixes the power level.
///
/// `rescale` multiplies every horizontal increment uniformly (the
/// nominal-distance override); the caller is responsible for warning
/// when it strays far from 1.
pub fn integrate_energy(
    hv: &[HvSample],
    activity: Activity,
    body_mass_kg: C,
    rescale: C,
    pace: Option<&Pace>,
) -> Result<(Stats, Vec<HvSample>), TrailError> {
    if hv.is_empty() {
        return Err(TrailError::Internal(
            "energy integration requires at least one profile sample",
        ));
    }

    let flat_cost = cost_per_kg_m(activity, 0.0);
    let power = pace.and_then(|pace| {
        (pace.time_s > 0.0).then(|| pace.distance_m * body_mass_kg * flat_cost / pace.time_s)
    });

    let mut out = hv.to_vec();
    out[0].t = power.map(|_| 0.0);

    let mut h = 0.0;
    let mut d = 0.0;
    let mut gain = 0.0;
    let mut cost = 0.0;
    let mut i_sum = 0.0;
    let mut i_sum_sq = 0.0;
    let mut steepness = 0.0;
    let mut t = 0.0;
    for k in 1..hv.len() {
        let dh = (hv[k].h - hv[k - 1].h) * rescale;
        let dv = hv[k].v - hv[k - 1].v;
        let dd = dh.hypot(dv);
        h += dh;
        d += dd;
        if dv > 0.0 {
            gain += dv;
        }
        let i = if dh > 0.0 { dv / dh } else { 0.0 };
        if dh > 0.0 {
            steepness += dv * dv / dh;
        }
        i_sum += i * dh;
        i_sum_sq += i * i * dh;
        // the regression is per meter of slope distance, hence dd
        // rather than dh
        let dc = dd * body_mass_kg * cost_per_kg_m(activity, i);
        cost += dc;
        if let Some(power) = power {
            t += dc / power;
            out[k].t = Some(t);
        }
    }

    let (i_mean, i_rms) = if h > 0.0 {
        let mean = (hv[hv.len() - 1].v - hv[0].v) / h;
        let rms = (i_sum_sq / h - (i_sum / h) * (i_sum / h)).max(0.0).sqrt();
        (mean, rms)
    } else {
        (0.0, 0.0)
    };

    let (b0, b1, b2) = QuadraticFit::for_activity(activity).coeffs();
    let quick_cost_j = h * body_mass_kg * (b0 + b1 * i_mean + b2 * i_rms);
    let climb_fraction = if cost > 0.0 {
        (cost - h * body_mass_kg * flat_cost) / cost
    } else {
        0.0
    };

    let stats = Stats {
        horizontal_m: h,
        slope_m: d,
        gain_m: gain,
        cost_j: cost,
        i_mean,
        i_rms,
        quick_cost_j,
        climb_fraction,
        steepness_index_m: steepness,
        power_w: power,
        time_s: power.map(|_| t),
    };
    Ok((stats, out))
}
