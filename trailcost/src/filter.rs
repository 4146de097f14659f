//! Detrend-and-window smoothing of the Cartesian track signal.
//!
//! Recorded and grid-derived elevation is noisy at short horizontal
//! scales, and integrating gain over the raw signal wildly overstates
//! total climbing. The track is resampled evenly along the
//! cumulative-horizontal-distance axis and each Cartesian channel is
//! run through a centered box filter. Horizontal wander and elevation
//! noise live at different scales, so the (x, y) channels and the z
//! channel take separate window widths.

use crate::{integrate::HvSample, math::lerp, projection::CartesianPoint, C};

/// Spacing of the uniform resample, meters. Kept well under any
/// sensible window width so the resample itself adds no artifacts.
const RESAMPLE_SPACING_M: C = 10.0;

/// Window widths for [`smooth_path`], in meters of horizontal
/// distance. A width that resolves to one sample or less leaves that
/// channel untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Window applied to the x and y channels.
    pub xy_window_m: C,

    /// Window applied to the z channel. Elevation noise has a longer
    /// characteristic scale than horizontal wander, so this is
    /// usually the larger of the two.
    pub z_window_m: C,
}

/// Resamples the track evenly along the unfiltered cumulative-`h`
/// axis and box-filters each channel.
///
/// The caller re-derives geodetic points and re-integrates h/v from
/// the returned sequence. Degenerate inputs (fewer than two points,
/// or no horizontal extent to resample along) come back unchanged.
pub(crate) fn smooth_path(
    cartesian: &[CartesianPoint],
    hv: &[HvSample],
    params: &SmoothParams,
) -> Vec<CartesianPoint> {
    debug_assert_eq!(cartesian.len(), hv.len());
    let h_total = hv.last().map_or(0.0, |sample| sample.h);
    if cartesian.len() < 2 || h_total <= 0.0 {
        return cartesian.to_vec();
    }

    let resampled = resample_uniform(cartesian, hv, h_total);
    let n = resampled.len();
    let dh = h_total / n as C;

    let xy_width = (params.xy_window_m.max(0.0) / dh) as usize;
    let z_width = (params.z_window_m.max(0.0) / dh) as usize;

    let x: Vec<C> = resampled.iter().map(|p| p.x).collect();
    let y: Vec<C> = resampled.iter().map(|p| p.y).collect();
    let z: Vec<C> = resampled.iter().map(|p| p.z).collect();
    let x = box_filter(&x, xy_width);
    let y = box_filter(&y, xy_width);
    let z = box_filter(&z, z_width);

    (0..n)
        .map(|i| CartesianPoint {
            x: x[i],
            y: y[i],
            z: z[i],
        })
        .collect()
}

/// Resamples at even spacing along the cumulative-horizontal axis,
/// interpolating each channel linearly within the source segments.
///
/// The sample count is rounded up to a power of two. Only an even
/// count is strictly needed by the box filter, but transform-friendly
/// sizes cost nothing and keep the spacing comfortably finer than the
/// window widths.
fn resample_uniform(
    cartesian: &[CartesianPoint],
    hv: &[HvSample],
    h_total: C,
) -> Vec<CartesianPoint> {
    let n = ((h_total / RESAMPLE_SPACING_M) as usize)
        .next_power_of_two()
        .max(2);
    let dh = h_total / n as C;
    let last_segment = hv.len() - 2;

    let mut j = 0;
    (0..n)
        .map(|i| {
            let h = i as C * dh;
            while hv[j + 1].h < h && j < last_segment {
                j += 1;
            }
            let (h1, h2) = (hv[j].h, hv[j + 1].h);
            let s = if h2 == h1 { 0.0 } else { (h - h1) / (h2 - h1) };
            let (p, q) = (&cartesian[j], &cartesian[j + 1]);
            CartesianPoint {
                x: lerp(p.x, q.x, s),
                y: lerp(p.y, q.y, s),
                z: lerp(p.z, q.z, s),
            }
        })
        .collect()
}

/// Centered moving average of `signal` over a window of `width`
/// samples (rounded up to even), using a running sum.
///
/// The straight line through the first and last samples is subtracted
/// first and restored afterwards, which pins both endpoints at zero
/// while the window runs. Within half a window of either boundary a
/// full window would hang past the edge and drag the curve toward the
/// interior, so those stretches instead get an average grown inward
/// from the edge one sample pair at a time. The hand-off between the
/// two regimes leaves a small discontinuity; that is an accepted
/// property of the scheme, not something to smooth over.
///
/// A `width` of one sample or less returns the signal unchanged.
pub fn box_filter(signal: &[C], width: usize) -> Vec<C> {
    if width <= 1 || signal.len() < 2 {
        return signal.to_vec();
    }
    let w = width + width % 2;
    let n = signal.len();

    let slope = (signal[n - 1] - signal[0]) / (n - 1) as C;
    let trend = |i: usize| signal[0] + slope * i as C;
    let v: Vec<C> = signal
        .iter()
        .enumerate()
        .map(|(i, value)| value - trend(i))
        .collect();

    // Detrended values are the default; the passes below only
    // overwrite the stretches they are allowed to touch.
    let mut out = v.clone();

    if w < n {
        let mut sum: C = v[..w].iter().sum();
        for i in w..=n {
            let j = i - w / 2;
            if j > n - w {
                break;
            }
            sum += v[i] - v[i - w];
            if j >= w {
                out[j] = sum / w as C;
            }
        }
    }

    // Expanding averages inward from both edges.
    let mut sum_left = 0.0;
    let mut sum_right = 0.0;
    let mut count = 0;
    for i in 0..=(2 * w + 1) {
        if i + 1 > n / 2 {
            break;
        }
        sum_left += v[i];
        sum_right += v[n - i - 1];
        count += 1;
        if i % 2 == 0 {
            out[i / 2] = sum_left / count as C;
            out[n - i / 2 - 1] = sum_right / count as C;
        }
    }

    for (i, value) in out.iter_mut().enumerate() {
        *value += trend(i);
    }
    // the ends are single-sample averages; rounding in the trend
    // restore must not move them
    out[0] = signal[0];
    out[n - 1] = signal[n - 1];
    out
}
