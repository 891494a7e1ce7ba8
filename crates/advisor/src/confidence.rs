//! Confidence heuristic for a scored recommendation.
//!
//! The value is a deterministic measure of how much evidence backs the
//! advice: how many indicators took part, how strong the score is, and how
//! well the indicators agree on direction. It is not a calibrated
//! probability and has never been backtested.

use crate::indicators::IndicatorSet;
use crate::scorer::{macd_points, ScoreResult};

/// Confidence reported when only the percent change was available.
pub const FLOOR: f64 = 35.0;
pub const CEILING: f64 = 95.0;

const BASE: f64 = 50.0;
const MAX_CONSISTENCY_BONUS: f64 = 10.0;

/// Confidence percentage in `[35.0, 95.0]`, rounded to two decimals.
pub fn confidence(result: &ScoreResult, indicators: &IndicatorSet) -> f64 {
    if result.used.is_empty() {
        return FLOOR;
    }

    let total = BASE
        + coverage_bonus(result.used.len())
        + strength_bonus(result.score.abs())
        + consistency_bonus(indicators);

    round2(total.clamp(FLOOR, CEILING))
}

fn coverage_bonus(count: usize) -> f64 {
    match count {
        n if n >= 5 => 30.0,
        4 => 20.0,
        3 => 12.0,
        2 => 6.0,
        _ => 0.0,
    }
}

fn strength_bonus(magnitude: f64) -> f64 {
    if magnitude >= 4.0 {
        15.0
    } else if magnitude >= 2.0 {
        10.0
    } else if magnitude >= 0.5 {
        5.0
    } else {
        0.0
    }
}

/// Re-derive buy/sell votes from RSI, MA cross, MACD and trend, and reward
/// agreement. Returns 0 when no indicator casts a vote.
fn consistency_bonus(indicators: &IndicatorSet) -> f64 {
    let mut buy = 0u32;
    let mut sell = 0u32;

    if let Some(rsi) = indicators.rsi {
        if rsi < 40.0 {
            buy += 1;
        } else if rsi > 60.0 {
            sell += 1;
        }
    }

    if let Some((ma5, ma20)) = indicators.ma_pair() {
        if ma5 > ma20 {
            buy += 1;
        } else {
            sell += 1;
        }
    }

    if let Some((macd, signal)) = indicators.macd_pair() {
        let points = macd_points(macd, signal);
        if points > 0.0 {
            buy += 1;
        } else if points < 0.0 {
            sell += 1;
        }
    }

    if let Some(trend) = indicators.price_trend {
        if trend > 0.0 {
            buy += 1;
        } else if trend < 0.0 {
            sell += 1;
        }
    }

    let votes = buy + sell;
    if votes == 0 {
        return 0.0;
    }
    f64::from(buy.max(sell)) / f64::from(votes) * MAX_CONSISTENCY_BONUS
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
