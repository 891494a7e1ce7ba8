use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use common::{Error, MarketDataProvider, PriceAdjust, RawBar, Result, SnapshotRow};

/// In-memory market data provider.
///
/// Quotes and history are whatever was last stored through `set_quote` /
/// `set_history`. Used by tests and by callers that already hold the data.
#[derive(Default)]
pub struct MemoryFeed {
    /// Snapshot rows, keyed by instrument code.
    quotes: RwLock<HashMap<String, SnapshotRow>>,
    /// History per (code, adjustment).
    history: RwLock<HashMap<(String, PriceAdjust), Vec<RawBar>>>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        info!("MemoryFeed initialized");
        Self::default()
    }

    /// Store or replace the snapshot row for `code`.
    pub async fn set_quote(&self, code: &str, row: SnapshotRow) {
        self.quotes.write().await.insert(code.to_string(), row);
    }

    /// Store or replace the history for `code` under `adjust`.
    pub async fn set_history(&self, code: &str, adjust: PriceAdjust, bars: Vec<RawBar>) {
        debug!(code, %adjust, bars = bars.len(), "History stored");
        self.history
            .write()
            .await
            .insert((code.to_string(), adjust), bars);
    }
}

#[async_trait]
impl MarketDataProvider for MemoryFeed {
    async fn quote_snapshot(&self) -> Result<HashMap<String, SnapshotRow>> {
        Ok(self.quotes.read().await.clone())
    }

    async fn history(&self, code: &str, adjust: PriceAdjust) -> Result<Vec<RawBar>> {
        self.history
            .read()
            .await
            .get(&(code.to_string(), adjust))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no {adjust} history for '{code}'")))
    }
}
