//! Short-versus-long price trend.

use super::moving_average::sma;

/// Percent deviation of the 5-day mean from a longer baseline mean.
///
/// The baseline is the 20-day mean when 20 closes exist, otherwise the
/// 10-day mean when 10 exist; below 10 closes there is no trend. A
/// baseline that is not positive reports a flat trend of 0.0.
pub fn price_trend(closes: &[f64]) -> Option<f64> {
    let baseline = sma(closes, 20).or_else(|| sma(closes, 10))?;
    let recent = sma(closes, 5)?;
    if baseline > 0.0 {
        Some((recent - baseline) / baseline * 100.0)
    } else {
        Some(0.0)
    }
}
