/// RSI (Relative Strength Index) indicator.
///
/// Averages the most recent `period` gains and losses with a plain mean
/// (no Wilder smoothing). With exactly `period` closes there are only
/// `period - 1` changes, and the mean is taken over those.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl Default for RsiIndicator {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "RSI period must be >= 2");
        Self { period }
    }

    /// Compute RSI from a slice of close prices (oldest first).
    /// Returns `None` if there are fewer than `period` values.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period {
            return None;
        }

        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let recent = &changes[changes.len().saturating_sub(self.period)..];
        let n = recent.len() as f64;

        let avg_gain = recent.iter().filter(|&&c| c > 0.0).sum::<f64>() / n;
        let avg_loss = recent.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum::<f64>() / n;

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}
