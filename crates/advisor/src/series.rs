//! Price series normalization.
//!
//! Turns whatever a provider returned into date-ordered numeric arrays.

use common::{Quote, RawBar};
use tracing::debug;

/// Fewest bars (and fewest valid closes) for which any indicator exists.
pub const MIN_BARS: usize = 5;

/// Closing prices and volumes extracted from a raw bar sequence, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub closes: Vec<f64>,
    /// `None` when the provider supplied no usable volume at all.
    pub volumes: Option<Vec<f64>>,
}

/// Sort `bars` by date and coerce their numeric columns.
///
/// Returns `None` if there are fewer than [`MIN_BARS`] bars, or fewer than
/// [`MIN_BARS`] closes survive coercion. Bars without a date are dropped.
/// Closes and volumes are filtered independently, so a bar with a bad volume
/// still contributes its close.
pub fn normalize(bars: &[RawBar]) -> Option<NormalizedSeries> {
    if bars.len() < MIN_BARS {
        debug!(bars = bars.len(), "Series too short to normalize");
        return None;
    }

    let ordered = dated(bars);
    if ordered.len() < bars.len() {
        debug!(dropped = bars.len() - ordered.len(), "Dropped bars without a date");
    }

    let closes: Vec<f64> = ordered.iter().filter_map(|b| b.close.coerce()).collect();
    if closes.len() < MIN_BARS {
        debug!(
            bars = bars.len(),
            valid_closes = closes.len(),
            "Too few numeric closes after coercion"
        );
        return None;
    }

    let volumes: Vec<f64> = ordered
        .iter()
        .filter_map(|b| b.volume.as_ref().and_then(|v| v.coerce()))
        .collect();

    Some(NormalizedSeries {
        closes,
        volumes: (!volumes.is_empty()).then_some(volumes),
    })
}

/// Bars that carry a date, stably sorted oldest first.
fn dated(bars: &[RawBar]) -> Vec<&RawBar> {
    let mut ordered: Vec<&RawBar> = bars.iter().filter(|b| b.date.is_some()).collect();
    ordered.sort_by_key(|b| b.date);
    ordered
}

/// Derive a quote from history alone: the latest valid close, and its
/// percent change versus the previous valid close (0.0 with a single close).
///
/// Used when an instrument is missing from the quote snapshot. Returns
/// `None` if no bar has a numeric close.
pub fn quote_from_history(bars: &[RawBar]) -> Option<Quote> {
    let ordered = dated(bars);
    let mut closes = ordered.iter().rev().filter_map(|b| b.close.coerce());
    let price = closes.next()?;
    let change_pct = match closes.next() {
        Some(prev) if prev != 0.0 => (price - prev) / prev * 100.0,
        _ => 0.0,
    };
    Some(Quote::new(price, change_pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::RawField;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn rejects_fewer_than_five_bars() {
        let bars: Vec<RawBar> = (1..=4).map(|d| RawBar::new(day(d), 10.0, None)).collect();
        assert!(normalize(&bars).is_none());
        assert!(normalize(&[]).is_none());
    }

    #[test]
    fn sorts_by_date_before_extracting() {
        let bars = vec![
            RawBar::new(day(5), 15.0, Some(500.0)),
            RawBar::new(day(1), 11.0, Some(100.0)),
            RawBar::new(day(3), 13.0, Some(300.0)),
            RawBar::new(day(2), 12.0, Some(200.0)),
            RawBar::new(day(4), 14.0, Some(400.0)),
        ];
        let series = normalize(&bars).unwrap();
        assert_eq!(series.closes, vec![11.0, 12.0, 13.0, 14.0, 15.0]);
        assert_eq!(
            series.volumes,
            Some(vec![100.0, 200.0, 300.0, 400.0, 500.0])
        );
    }

    #[test]
    fn drops_non_numeric_closes() {
        let mut bars: Vec<RawBar> = (1..=6).map(|d| RawBar::new(day(d), d as f64, None)).collect();
        bars[2].close = RawField::from("n/a");
        let series = normalize(&bars).unwrap();
        assert_eq!(series.closes, vec![1.0, 2.0, 4.0, 5.0, 6.0]);
        assert!(series.volumes.is_none());
    }

    #[test]
    fn too_few_closes_after_coercion() {
        let mut bars: Vec<RawBar> = (1..=5).map(|d| RawBar::new(day(d), 10.0, None)).collect();
        bars[0].close = RawField::Missing;
        assert!(normalize(&bars).is_none());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let bars: Vec<RawBar> = (1..=5)
            .map(|d| RawBar::new(day(d), RawField::Text(format!("{d}.5")), None))
            .collect();
        let series = normalize(&bars).unwrap();
        assert_eq!(series.closes, vec![1.5, 2.5, 3.5, 4.5, 5.5]);
    }

    #[test]
    fn quote_from_latest_two_closes() {
        let bars = vec![
            RawBar::new(day(3), 11.0, None),
            RawBar::new(day(1), 9.0, None),
            RawBar::new(day(2), 10.0, None),
        ];
        let quote = quote_from_history(&bars).unwrap();
        assert_eq!(quote.price, Some(11.0));
        assert!((quote.change_pct.unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn quote_skips_invalid_trailing_closes() {
        let bars = vec![
            RawBar::new(day(1), 8.0, None),
            RawBar::new(day(2), 10.0, None),
            RawBar::new(day(3), "--", None),
        ];
        let quote = quote_from_history(&bars).unwrap();
        assert_eq!(quote.price, Some(10.0));
        assert!((quote.change_pct.unwrap() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn quote_from_single_close_has_zero_change() {
        let quote = quote_from_history(&[RawBar::new(day(1), 5.0, None)]).unwrap();
        assert_eq!(quote, Quote::new(5.0, 0.0));
        assert!(quote_from_history(&[]).is_none());
    }

    #[test]
    fn undated_bars_are_dropped() {
        let mut bars: Vec<RawBar> = (1..=7).map(|d| RawBar::new(day(d), d as f64, None)).collect();
        bars[6].date = None;
        let series = normalize(&bars).unwrap();
        assert_eq!(series.closes, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        bars[0].date = None;
        bars[1].date = None;
        assert!(normalize(&bars).is_none());

        let quote = quote_from_history(&bars).unwrap();
        assert_eq!(quote.price, Some(6.0));
    }

    #[test]
    fn volumes_filtered_independently_of_closes() {
        let mut bars: Vec<RawBar> =
            (1..=6).map(|d| RawBar::new(day(d), 10.0, Some(d as f64 * 100.0))).collect();
        bars[1].volume = Some(RawField::from("-"));
        bars[4].close = RawField::Missing;
        let series = normalize(&bars).unwrap();
        assert_eq!(series.closes.len(), 5);
        assert_eq!(
            series.volumes,
            Some(vec![100.0, 300.0, 400.0, 500.0, 600.0])
        );
    }
}
