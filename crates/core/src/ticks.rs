//! Y-axis scaling for the bandwidth chart.
//!
//! Idle links sit close to zero, so ticks use fixed absolute steps picked
//! from the magnitude of the observed maximum instead of a fixed tick count.

use crate::buffer::SampleBuffer;

/// Observed maximum assumed when nothing above zero has been seen.
pub const FLOOR_MBPS: f64 = 0.05;

/// Headroom multiplier applied above the observed maximum.
const HEADROOM: f64 = 1.2;

/// Ticks and label precision for the vertical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScale {
    /// Strictly increasing, always starting at `0.0`.
    pub ticks: Vec<f64>,
    /// Decimal places each tick was rounded to.
    pub decimals: u32,
    /// Upper bound of the axis domain.
    pub upper: f64,
}

impl AxisScale {
    /// Scale for the current contents of `buffer`.
    pub fn for_buffer(buffer: &SampleBuffer) -> Self {
        compute_ticks(buffer.current_max())
    }

    /// Distance between consecutive ticks, `None` for a single-tick axis.
    #[must_use]
    pub fn step(&self) -> Option<f64> {
        match self.ticks.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }
}

impl Default for AxisScale {
    fn default() -> Self {
        compute_ticks(0.0)
    }
}

/// Compute axis ticks for a chart whose largest value is `observed_max`.
///
/// Negative or non-finite input is treated as zero; zero spans the
/// [`FLOOR_MBPS`] range.
pub fn compute_ticks(observed_max: f64) -> AxisScale {
    let max = if observed_max.is_finite() && observed_max > 0.0 {
        observed_max
    } else {
        0.0
    };

    let basis = if max > 0.0 { max } else { FLOOR_MBPS };
    let (step, decimals) = step_for(max);

    // Tick k sits at k * step; the last one may overshoot the headroom by
    // at most half a step.
    let last = (basis / step * HEADROOM + 0.5).floor() as u32;
    let ticks: Vec<f64> = (0..=last)
        .map(|k| round_to(f64::from(k) * step, decimals))
        .take_while(|t| t.is_finite())
        .collect();

    let upper = if max > 0.0 {
        (max * HEADROOM).max(max + 0.005).min(f64::MAX)
    } else {
        FLOOR_MBPS
    };

    AxisScale {
        ticks,
        decimals,
        upper,
    }
}

/// Step size and decimal places for a given maximum.
fn step_for(max: f64) -> (f64, u32) {
    if max <= 0.01 {
        (0.002, 3)
    } else if max <= 0.05 {
        (0.005, 3)
    } else if max <= 0.1 {
        (0.01, 2)
    } else if max <= 0.5 {
        (0.05, 2)
    } else {
        let raw = max * HEADROOM / 5.0;
        let raw = if raw.is_finite() { raw } else { max / 5.0 * HEADROOM };
        let twentieths = (raw * 20.0).ceil();
        let step = if twentieths.is_finite() { twentieths / 20.0 } else { raw };
        (step, 2)
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        value
    }
}
