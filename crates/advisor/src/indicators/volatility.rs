//! Short-window return volatility.

use tracing::warn;

const WINDOW: usize = 10;

/// Population standard deviation of the 9 period-over-period returns in the
/// last 10 closes, expressed in percent.
///
/// Returns `None` with fewer than 10 closes, or when the window contains a
/// zero close that would make a return undefined.
pub fn volatility(closes: &[f64]) -> Option<f64> {
    if closes.len() < WINDOW {
        return None;
    }
    let window = &closes[closes.len() - WINDOW..];

    let returns: Vec<f64> = window.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    if returns.iter().any(|r| !r.is_finite()) {
        warn!("Volatility skipped: window contains a zero close");
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let value = variance.sqrt() * 100.0;

    if value.is_finite() {
        Some(value)
    } else {
        warn!("Volatility skipped: non-finite result");
        None
    }
}
