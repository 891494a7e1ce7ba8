use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A single field as delivered by a data provider.
///
/// Providers are not trusted to hand over clean numbers: a close may arrive
/// as a number, a numeric string, `null`, or something else entirely.
/// Use [`RawField::coerce`] to get a usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Other(serde_json::Value),
}

impl RawField {
    /// Coerce to a finite `f64`. Anything that is not a number or a numeric
    /// string becomes `None`.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            RawField::Number(v) => *v,
            RawField::Text(s) => s.trim().parse::<f64>().ok()?,
            RawField::Missing | RawField::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Deserialize a numeric field through [`RawField::coerce`], so a value like
/// `"--"` becomes `None` instead of failing the whole document.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(RawField::deserialize(deserializer)?.coerce())
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part. Anything else
/// becomes `None`.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let date = match RawField::deserialize(deserializer)? {
        RawField::Text(s) => {
            let s = s.trim();
            s.get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        }
        _ => None,
    };
    Ok(date)
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        RawField::Number(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

/// One daily bar exactly as a provider returned it.
///
/// `date` is `None` when the provider sent something that is not a date;
/// such bars are dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub close: RawField,
    #[serde(default)]
    pub volume: Option<RawField>,
}

impl RawBar {
    pub fn new(date: NaiveDate, close: impl Into<RawField>, volume: Option<f64>) -> Self {
        Self {
            date: Some(date),
            close: close.into(),
            volume: volume.map(RawField::Number),
        }
    }
}

/// Latest quote for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Quote {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// Percent change versus the previous close, e.g. `1.5` for +1.5%.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change_pct: Option<f64>,
}

impl Quote {
    pub fn new(price: f64, change_pct: f64) -> Self {
        Self {
            price: Some(price),
            change_pct: Some(change_pct),
        }
    }

    /// Price, if present, finite and non-zero.
    pub fn known_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p != 0.0)
    }

    pub fn known_change_pct(&self) -> Option<f64> {
        self.change_pct.filter(|c| c.is_finite())
    }
}

/// One row of the bulk quote snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub name: String,
    #[serde(flatten)]
    pub quote: Quote,
}

/// Price adjustment applied by the provider to a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceAdjust {
    /// Forward-adjusted (前复权).
    Forward,
    Unadjusted,
    /// Backward-adjusted (后复权).
    Backward,
}

impl PriceAdjust {
    /// Order in which history variants are tried.
    pub const FALLBACK_ORDER: [PriceAdjust; 3] = [
        PriceAdjust::Forward,
        PriceAdjust::Unadjusted,
        PriceAdjust::Backward,
    ];

    /// Short identifier used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            PriceAdjust::Forward => "qfq",
            PriceAdjust::Unadjusted => "raw",
            PriceAdjust::Backward => "hfq",
        }
    }
}

impl std::fmt::Display for PriceAdjust {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Language used when rendering advice labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Ok(Locale::Zh),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("unknown locale '{other}'")),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Zh => write!(f, "zh"),
            Locale::En => write!(f, "en"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_accepts_numbers_and_numeric_strings() {
        assert_eq!(RawField::Number(12.5).coerce(), Some(12.5));
        assert_eq!(RawField::from(" 7.25 ").coerce(), Some(7.25));
    }

    #[test]
    fn coerce_drops_garbage() {
        assert_eq!(RawField::from("--").coerce(), None);
        assert_eq!(RawField::Missing.coerce(), None);
        assert_eq!(RawField::Number(f64::NAN).coerce(), None);
        assert_eq!(RawField::from("inf").coerce(), None);
        assert_eq!(RawField::Other(serde_json::Value::Bool(true)).coerce(), None);
    }

    #[test]
    fn raw_bar_deserializes_mixed_fields() {
        let json = r#"[
            {"date": "2024-01-02", "close": 10.5, "volume": 1200},
            {"date": "2024-01-03", "close": "10.7", "volume": null},
            {"date": "2024-01-04", "close": null},
            {"date": "2024-01-05", "close": false, "volume": "abc"}
        ]"#;
        let bars: Vec<RawBar> = serde_json::from_str(json).unwrap();
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].close.coerce(), Some(10.5));
        assert_eq!(bars[0].volume.as_ref().and_then(RawField::coerce), Some(1200.0));
        assert_eq!(bars[1].close.coerce(), Some(10.7));
        assert!(bars[1].volume.is_none());
        assert_eq!(bars[2].close.coerce(), None);
        assert_eq!(bars[3].close.coerce(), None);
        assert_eq!(bars[3].volume.as_ref().and_then(RawField::coerce), None);
    }

    #[test]
    fn quote_filters_unusable_values() {
        let q = Quote {
            price: Some(0.0),
            change_pct: Some(f64::NAN),
        };
        assert_eq!(q.known_price(), None);
        assert_eq!(q.known_change_pct(), None);
        assert_eq!(Quote::new(9.8, -1.2).known_price(), Some(9.8));
    }

    #[test]
    fn snapshot_row_flattens_quote() {
        let row: SnapshotRow =
            serde_json::from_str(r#"{"name": "浦发银行", "price": 7.9, "change_pct": null}"#)
                .unwrap();
        assert_eq!(row.name, "浦发银行");
        assert_eq!(row.quote.price, Some(7.9));
        assert_eq!(row.quote.change_pct, None);
    }

    #[test]
    fn snapshot_row_treats_placeholder_values_as_absent() {
        let row: SnapshotRow = serde_json::from_str(
            r#"{"name": "停牌股", "price": "--", "change_pct": "1.25"}"#,
        )
        .unwrap();
        assert_eq!(row.quote.price, None);
        assert_eq!(row.quote.change_pct, Some(1.25));

        let row: SnapshotRow = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(row.quote, Quote::default());
    }

    #[test]
    fn raw_bar_with_bad_date_still_parses() {
        let json = r#"[
            {"date": "", "close": 10.0},
            {"date": "2024-01-03 00:00:00", "close": 10.5},
            {"date": 20240104, "close": 10.7},
            {"close": 10.9}
        ]"#;
        let bars: Vec<RawBar> = serde_json::from_str(json).unwrap();
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].date, None);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(bars[2].date, None);
        assert_eq!(bars[3].date, None);
    }

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("zh-CN".parse::<Locale>().unwrap(), Locale::Zh);
        assert!("fr".parse::<Locale>().is_err());
    }
}
