//! Technical indicators derived from a daily close/volume series.

pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use macd::{MacdIndicator, MacdValue};
pub use rsi::RsiIndicator;

use common::RawBar;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::series::{normalize, NormalizedSeries};

/// Indicator values for one instrument. A field is `None` when there was not
/// enough history to compute it; absence is not the same as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
}

impl IndicatorSet {
    /// Names of the indicators that are present, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            ("ma5", self.ma5),
            ("ma10", self.ma10),
            ("ma20", self.ma20),
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
            ("volume_ratio", self.volume_ratio),
            ("price_trend", self.price_trend),
            ("volatility", self.volatility),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|_| name))
        .collect()
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(ma5, ma20)` when both are present.
    pub fn ma_pair(&self) -> Option<(f64, f64)> {
        Some((self.ma5?, self.ma20?))
    }

    /// `(macd, macd_signal)` when both are present.
    pub fn macd_pair(&self) -> Option<(f64, f64)> {
        Some((self.macd?, self.macd_signal?))
    }
}

/// Compute every indicator the history allows.
///
/// Bars may be unsorted and may hold non-numeric fields. Returns `None`
/// when the series is too short or no indicator could be computed.
pub fn compute(bars: &[RawBar]) -> Option<IndicatorSet> {
    let series = normalize(bars)?;
    compute_from(&series)
}

/// Compute indicators from an already normalized series.
pub fn compute_from(series: &NormalizedSeries) -> Option<IndicatorSet> {
    let closes = &series.closes;
    let macd = MacdIndicator::default().compute(closes);

    let set = IndicatorSet {
        ma5: moving_average::sma(closes, 5),
        ma10: moving_average::sma(closes, 10),
        ma20: moving_average::sma(closes, 20),
        rsi: RsiIndicator::default().compute(closes),
        macd: macd.map(|m| m.macd),
        macd_signal: macd.map(|m| m.signal),
        volume_ratio: series.volumes.as_deref().and_then(volume::volume_ratio),
        price_trend: trend::price_trend(closes),
        volatility: volatility::volatility(closes),
    };

    if set.is_empty() {
        debug!(closes = closes.len(), "No indicator could be computed");
        return None;
    }

    debug!(
        closes = closes.len(),
        count = set.len(),
        indicators = ?set.names(),
        "Technical indicators computed"
    );
    Some(set)
}
