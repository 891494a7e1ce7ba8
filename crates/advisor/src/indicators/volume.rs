//! Volume expansion/contraction ratio.

use super::moving_average::sma;

const SHORT_WINDOW: usize = 5;
const LONG_WINDOW: usize = 20;

/// Mean of the last 5 volumes over the mean of the last 20.
///
/// With fewer than 20 volumes the short mean doubles as the baseline, so the
/// ratio is exactly 1.0. A baseline that is not positive also yields 1.0.
pub fn volume_ratio(volumes: &[f64]) -> Option<f64> {
    let short = sma(volumes, SHORT_WINDOW)?;
    let long = sma(volumes, LONG_WINDOW).unwrap_or(short);
    if long > 0.0 {
        Some(short / long)
    } else {
        Some(1.0)
    }
}
