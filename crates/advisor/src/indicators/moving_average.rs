//! Simple moving averages.

/// Arithmetic mean of `values`, or `None` if empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the last `period` values. `None` if fewer than `period` exist.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_uses_trailing_window() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        assert_eq!(sma(&closes, 5), Some(28.0));
        assert_eq!(sma(&closes, 10), Some(25.5));
        assert_eq!(sma(&closes, 20), Some(20.5));
    }

    #[test]
    fn sma_none_when_window_longer_than_data() {
        assert_eq!(sma(&[1.0, 2.0, 3.0], 5), None);
        assert_eq!(sma(&[1.0, 2.0, 3.0], 0), None);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[4.0]), Some(4.0));
    }
}
