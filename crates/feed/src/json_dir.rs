use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use common::{Error, MarketDataProvider, PriceAdjust, RawBar, Result, SnapshotRow};

/// Provider backed by a directory of JSON exports.
///
/// Layout:
/// ```text
/// <dir>/quotes.json                  {"600000": {"name": "...", "price": 7.9, "change_pct": 0.4}, ...}
/// <dir>/history/<code>.<adjust>.json [{"date": "2024-01-02", "close": 7.8, "volume": 123400}, ...]
/// ```
/// where `<adjust>` is `qfq`, `raw` or `hfq`.
pub struct JsonDirFeed {
    dir: PathBuf,
}

impl JsonDirFeed {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn quotes_path(&self) -> PathBuf {
        self.dir.join("quotes.json")
    }

    pub fn history_path(&self, code: &str, adjust: PriceAdjust) -> PathBuf {
        self.dir
            .join("history")
            .join(format!("{code}.{}.json", adjust.slug()))
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(e),
    })?;
    debug!(path = %path.display(), bytes = content.len(), "Read data file");
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl MarketDataProvider for JsonDirFeed {
    async fn quote_snapshot(&self) -> Result<HashMap<String, SnapshotRow>> {
        read_json(&self.quotes_path()).await
    }

    async fn history(&self, code: &str, adjust: PriceAdjust) -> Result<Vec<RawBar>> {
        read_json(&self.history_path(code, adjust)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn reads_snapshot_and_history() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "quotes.json",
            r#"{"600000": {"name": "浦发银行", "price": 7.9, "change_pct": 0.4}}"#,
        );
        write(
            tmp.path(),
            "history/600000.qfq.json",
            r#"[{"date": "2024-01-03", "close": "7.8"}, {"date": "2024-01-02", "close": 7.7, "volume": 1000}]"#,
        );

        let feed = JsonDirFeed::new(tmp.path());
        let snapshot = feed.quote_snapshot().await.unwrap();
        assert_eq!(snapshot["600000"].name, "浦发银行");
        assert_eq!(snapshot["600000"].quote.change_pct, Some(0.4));

        let bars = feed.history("600000", PriceAdjust::Forward).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close.coerce(), Some(7.8));
    }

    #[tokio::test]
    async fn suspended_row_does_not_spoil_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "quotes.json",
            r#"{
                "600000": {"name": "浦发银行", "price": 7.9, "change_pct": 0.4},
                "600001": {"name": "停牌股", "price": "--", "change_pct": "--"}
            }"#,
        );

        let snapshot = JsonDirFeed::new(tmp.path()).quote_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["600000"].quote.price, Some(7.9));
        assert_eq!(snapshot["600001"].quote.price, None);
        assert_eq!(snapshot["600001"].quote.change_pct, None);
    }

    #[tokio::test]
    async fn undated_bar_does_not_spoil_history() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "history/600000.qfq.json",
            r#"[{"date": "", "close": 7.7}, {"date": "2024-01-03", "close": 7.8}]"#,
        );
        let bars = JsonDirFeed::new(tmp.path())
            .history("600000", PriceAdjust::Forward)
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].date.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let feed = JsonDirFeed::new(tmp.path());
        assert!(matches!(
            feed.quote_snapshot().await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            feed.history("600000", PriceAdjust::Unadjusted).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "history/000001.hfq.json", "[{not json");
        let feed = JsonDirFeed::new(tmp.path());
        let err = feed.history("000001", PriceAdjust::Backward).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn fallback_reads_next_variant_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "history/000001.raw.json",
            r#"[{"date": "2024-01-02", "close": 11.2}]"#,
        );
        let feed = JsonDirFeed::new(tmp.path());
        let (adjust, bars) = feed.history_with_fallback("000001").await.unwrap();
        assert_eq!(adjust, PriceAdjust::Unadjusted);
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn history_path_layout() {
        let feed = JsonDirFeed::new("/data");
        assert_eq!(
            feed.history_path("600000", PriceAdjust::Backward),
            PathBuf::from("/data/history/600000.hfq.json")
        );
    }
}
