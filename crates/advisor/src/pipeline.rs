use common::{Quote, RawBar};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advice::{Advice, AdviceTier};
use crate::confidence::{self, FLOOR};
use crate::indicators::{self, IndicatorSet};
use crate::scorer;

/// Result of one evaluation. Owns all of its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub advice: Advice,
    /// Percent in `[35.0, 95.0]`, or `0.0` for [`Advice::InsufficientData`].
    pub confidence: f64,
    /// Weighted score; present only for indicator-based advice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSet>,
}

impl Evaluation {
    fn insufficient_data() -> Self {
        Self {
            advice: Advice::InsufficientData,
            confidence: 0.0,
            score: None,
            indicators: None,
        }
    }

    fn continue_observing() -> Self {
        Self {
            advice: Advice::ContinueObserving,
            confidence: FLOOR,
            score: None,
            indicators: None,
        }
    }

    fn percent_change_only(change_pct: f64, indicators: Option<IndicatorSet>) -> Self {
        Self {
            advice: Advice::PercentChangeOnly {
                tier: AdviceTier::from_change_pct(change_pct),
            },
            confidence: FLOOR,
            score: None,
            indicators,
        }
    }
}

/// Evaluate an instrument from its history and latest quote.
///
/// Pure: no I/O, no shared state. Every input, however degenerate, yields
/// an [`Evaluation`].
pub fn evaluate(bars: &[RawBar], quote: &Quote) -> Evaluation {
    if quote.known_price().is_none() || quote.known_change_pct().is_none() {
        return advise(quote, None);
    }
    let indicators = indicators::compute(bars);
    advise(quote, indicators.as_ref())
}

/// Produce advice from a quote and precomputed indicators.
pub fn advise(quote: &Quote, indicators: Option<&IndicatorSet>) -> Evaluation {
    let Some(price) = quote.known_price() else {
        return Evaluation::insufficient_data();
    };
    let Some(change_pct) = quote.known_change_pct() else {
        return Evaluation::continue_observing();
    };

    let Some(set) = indicators.filter(|s| !s.is_empty()) else {
        debug!(change_pct, "No indicators, advising on percent change only");
        return Evaluation::percent_change_only(change_pct, None);
    };

    let result = scorer::score(price, change_pct, set);
    if result.used.is_empty() {
        debug!(
            change_pct,
            indicators = ?set.names(),
            "No scoring rule applied, advising on percent change only"
        );
        return Evaluation::percent_change_only(change_pct, Some(*set));
    }

    let confidence = confidence::confidence(&result, set);
    debug!(
        score = result.score,
        used = ?result.used,
        confidence,
        "Indicator advice computed"
    );

    Evaluation {
        advice: Advice::Indicators {
            tier: AdviceTier::from_score(result.score),
            used: result.used,
        },
        confidence,
        score: Some(result.score),
        indicators: Some(*set),
    }
}
