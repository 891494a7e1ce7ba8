//! Weighted rule scoring over the quote and indicator set.
//!
//! Positive scores lean towards buying, negative towards selling. Rules are
//! additive; their order only decides the order of [`ScoreResult::used`].

use common::Locale;
use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSet;

/// An indicator family that took part in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorLabel {
    Rsi,
    Ma,
    Macd,
    Volume,
    Trend,
}

impl IndicatorLabel {
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (IndicatorLabel::Rsi, _) => "RSI",
            (IndicatorLabel::Ma, _) => "MA",
            (IndicatorLabel::Macd, _) => "MACD",
            (IndicatorLabel::Volume, Locale::Zh) => "成交量",
            (IndicatorLabel::Volume, Locale::En) => "volume",
            (IndicatorLabel::Trend, Locale::Zh) => "趋势",
            (IndicatorLabel::Trend, Locale::En) => "trend",
        }
    }
}

/// Outcome of scoring: the signed total and which indicators contributed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    /// Unique, in rule order.
    pub used: Vec<IndicatorLabel>,
}

impl ScoreResult {
    fn add(&mut self, label: IndicatorLabel, points: f64) {
        self.score += points;
        if !self.used.contains(&label) {
            self.used.push(label);
        }
    }
}

/// Score the current quote against `indicators`.
///
/// `price` is the latest price and `change_pct` the percent change versus
/// the previous close.
pub fn score(price: f64, change_pct: f64, indicators: &IndicatorSet) -> ScoreResult {
    let mut result = ScoreResult {
        score: change_points(change_pct),
        used: Vec::new(),
    };

    if let Some(rsi) = indicators.rsi {
        result.add(IndicatorLabel::Rsi, rsi_points(rsi));
    }

    if let Some((ma5, ma20)) = indicators.ma_pair() {
        result.add(IndicatorLabel::Ma, ma_points(price, ma5, ma20));
    }

    if let Some((macd, signal)) = indicators.macd_pair() {
        result.add(IndicatorLabel::Macd, macd_points(macd, signal));
    }

    if let Some(ratio) = indicators.volume_ratio {
        result.add(IndicatorLabel::Volume, volume_points(ratio, change_pct));
    }

    if let Some(trend) = indicators.price_trend {
        result.add(IndicatorLabel::Trend, trend_points(trend));
    }

    result
}

/// Large daily moves are faded: a sharp rise counts against buying.
fn change_points(change_pct: f64) -> f64 {
    if change_pct > 5.0 {
        -3.0
    } else if change_pct > 2.0 {
        -1.0
    } else if change_pct < -5.0 {
        3.0
    } else if change_pct < -2.0 {
        1.0
    } else {
        0.0
    }
}

fn rsi_points(rsi: f64) -> f64 {
    if rsi > 70.0 {
        -2.5 // overbought
    } else if rsi > 60.0 {
        -1.0
    } else if rsi < 30.0 {
        2.5 // oversold
    } else if rsi < 40.0 {
        1.0
    } else {
        0.0
    }
}

fn ma_points(price: f64, ma5: f64, ma20: f64) -> f64 {
    if price > ma5 && ma5 > ma20 {
        2.0
    } else if price < ma5 && ma5 < ma20 {
        -2.0
    } else if ma5 > ma20 {
        1.0
    } else {
        -1.0
    }
}

pub(crate) fn macd_points(macd: f64, signal: f64) -> f64 {
    if macd > signal && macd > 0.0 {
        1.5
    } else if macd < signal && macd < 0.0 {
        -1.5
    } else {
        0.0
    }
}

fn volume_points(ratio: f64, change_pct: f64) -> f64 {
    if ratio > 1.5 {
        if change_pct > 0.0 {
            1.0
        } else {
            -0.5
        }
    } else if ratio < 0.7 {
        -0.5
    } else {
        0.0
    }
}

fn trend_points(trend: f64) -> f64 {
    if trend > 5.0 {
        1.0
    } else if trend < -5.0 {
        -1.0
    } else {
        0.0
    }
}
