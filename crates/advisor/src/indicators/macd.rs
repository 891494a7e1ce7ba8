use super::moving_average::sma;

/// MACD-style trend indicator built from simple means.
///
/// Computes: MACD line = SMA(fast) − SMA(slow), signal = MACD line × `signal_ratio`.
/// This is a cheap stand-in for the exponential version; scores depend on
/// these exact values, so do not swap in a real EMA.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal_ratio: f64,
}

/// The MACD line and its signal line on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
}

impl Default for MacdIndicator {
    fn default() -> Self {
        Self::new(12, 26, 0.9)
    }
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal_ratio: f64) -> Self {
        assert!(
            fast < slow,
            "MACD fast period must be less than slow period"
        );
        Self { fast, slow, signal_ratio }
    }

    /// Compute from a slice of close prices (oldest first).
    /// Returns `None` if there are fewer than `slow` prices.
    pub fn compute(&self, closes: &[f64]) -> Option<MacdValue> {
        let slow = sma(closes, self.slow)?;
        let fast = sma(closes, self.fast)?;
        let macd = fast - slow;
        Some(MacdValue {
            macd,
            signal: macd * self.signal_ratio,
        })
    }
}
