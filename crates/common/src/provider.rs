use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{Error, PriceAdjust, RawBar, Result, SnapshotRow};

/// Abstraction over wherever quotes and history come from.
///
/// `MemoryFeed` implements this for tests and embedding.
/// `JsonDirFeed` implements this over a directory of JSON exports.
///
/// The scoring core never sees this trait: callers fetch, then hand the
/// series and quote to `advisor::evaluate`.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest quote for every listed instrument, keyed by instrument code.
    async fn quote_snapshot(&self) -> Result<HashMap<String, SnapshotRow>>;

    /// Daily history for one instrument under the given price adjustment.
    /// Bars may come back in any order.
    async fn history(&self, code: &str, adjust: PriceAdjust) -> Result<Vec<RawBar>>;

    /// History under the first variant in [`PriceAdjust::FALLBACK_ORDER`]
    /// that returns at least one bar.
    async fn history_with_fallback(&self, code: &str) -> Result<(PriceAdjust, Vec<RawBar>)> {
        for adjust in PriceAdjust::FALLBACK_ORDER {
            match self.history(code, adjust).await {
                Ok(bars) if !bars.is_empty() => {
                    debug!(code, %adjust, bars = bars.len(), "History fetched");
                    return Ok((adjust, bars));
                }
                Ok(_) => debug!(code, %adjust, "History empty, trying next variant"),
                Err(e) => warn!(code, %adjust, error = %e, "History fetch failed, trying next variant"),
            }
        }
        Err(Error::NotFound(format!(
            "no history for '{code}' under any price adjustment"
        )))
    }
}
