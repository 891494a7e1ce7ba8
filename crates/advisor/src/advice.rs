//! Advice tiers and their labels.

use common::Locale;
use serde::{Deserialize, Serialize};

use crate::scorer::IndicatorLabel;

/// Seven ordered recommendation tiers, most bullish first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceTier {
    StrongBuy,
    Buy,
    ConsiderBuy,
    Hold,
    CautiousHold,
    Sell,
    StrongSell,
}

impl AdviceTier {
    /// Tier for an indicator score, thresholds checked high to low.
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            AdviceTier::StrongBuy
        } else if score >= 2.0 {
            AdviceTier::Buy
        } else if score >= 0.5 {
            AdviceTier::ConsiderBuy
        } else if score >= -0.5 {
            AdviceTier::Hold
        } else if score >= -2.0 {
            AdviceTier::CautiousHold
        } else if score >= -4.0 {
            AdviceTier::Sell
        } else {
            AdviceTier::StrongSell
        }
    }

    /// Tier from the day's percent change alone. Big gains suggest taking
    /// profit, big losses suggest buying the dip.
    pub fn from_change_pct(change_pct: f64) -> Self {
        if change_pct > 5.0 {
            AdviceTier::Sell
        } else if change_pct > 2.0 {
            AdviceTier::CautiousHold
        } else if change_pct > -2.0 {
            AdviceTier::Hold
        } else if change_pct > -5.0 {
            AdviceTier::ConsiderBuy
        } else {
            AdviceTier::Buy
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Zh => match self {
                AdviceTier::StrongBuy => "强烈建议买入",
                AdviceTier::Buy => "建议买入",
                AdviceTier::ConsiderBuy => "可以考虑买入",
                AdviceTier::Hold => "继续持有",
                AdviceTier::CautiousHold => "谨慎持有",
                AdviceTier::Sell => "建议卖出",
                AdviceTier::StrongSell => "强烈建议卖出",
            },
            Locale::En => match self {
                AdviceTier::StrongBuy => "strong buy",
                AdviceTier::Buy => "buy",
                AdviceTier::ConsiderBuy => "consider buying",
                AdviceTier::Hold => "hold",
                AdviceTier::CautiousHold => "hold cautiously",
                AdviceTier::Sell => "sell",
                AdviceTier::StrongSell => "strong sell",
            },
        }
    }
}

/// A recommendation, including the two sentinel outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advice {
    /// No usable price.
    InsufficientData,
    /// Price known, percent change unknown.
    ContinueObserving,
    /// Indicators unavailable or unused; based on percent change only.
    PercentChangeOnly { tier: AdviceTier },
    /// Based on the indicator score.
    Indicators {
        tier: AdviceTier,
        used: Vec<IndicatorLabel>,
    },
}

impl Advice {
    pub fn tier(&self) -> Option<AdviceTier> {
        match self {
            Advice::PercentChangeOnly { tier } | Advice::Indicators { tier, .. } => Some(*tier),
            Advice::InsufficientData | Advice::ContinueObserving => None,
        }
    }

    /// Human-readable label, e.g. `建议买入 (RSI, MA)`.
    pub fn render(&self, locale: Locale) -> String {
        match self {
            Advice::InsufficientData => match locale {
                Locale::Zh => "数据不足".to_string(),
                Locale::En => "insufficient data".to_string(),
            },
            Advice::ContinueObserving => match locale {
                Locale::Zh => "继续观望".to_string(),
                Locale::En => "continue observing".to_string(),
            },
            Advice::PercentChangeOnly { tier } => {
                let suffix = match locale {
                    Locale::Zh => "(仅涨跌幅)",
                    Locale::En => "(percent change only)",
                };
                format!("{} {suffix}", tier.label(locale))
            }
            Advice::Indicators { tier, used } => {
                let names: Vec<&str> = used.iter().map(|l| l.label(locale)).collect();
                format!("{} ({})", tier.label(locale), names.join(", "))
            }
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(Locale::default()))
    }
}
