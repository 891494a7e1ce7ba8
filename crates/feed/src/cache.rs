use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use common::{Error, MarketDataProvider, PriceAdjust, RawBar, Result, SnapshotRow};

/// Wraps a provider and caches its bulk quote snapshot.
///
/// A fetched snapshot is reused until `ttl` has elapsed. Failed fetches are
/// retried up to `max_attempts` times with `retry_pause` in between. History
/// requests pass straight through.
pub struct SnapshotCache<P> {
    inner: P,
    ttl: Duration,
    retry_pause: Duration,
    max_attempts: usize,
    cached: Mutex<Option<(Instant, HashMap<String, SnapshotRow>)>>,
}

impl<P: MarketDataProvider> SnapshotCache<P> {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
    pub const DEFAULT_RETRY_PAUSE: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

    pub fn new(inner: P) -> Self {
        Self {
            inner,
            ttl: Self::DEFAULT_TTL,
            retry_pause: Self::DEFAULT_RETRY_PAUSE,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            cached: Mutex::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    async fn fetch_with_retry(&self) -> Result<HashMap<String, SnapshotRow>> {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.inner.quote_snapshot().await {
                Ok(rows) => {
                    debug!(rows = rows.len(), attempt, "Quote snapshot fetched");
                    return Ok(rows);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Quote snapshot fetch failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_pause).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| Error::Feed("quote snapshot unavailable".into())))
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for SnapshotCache<P> {
    async fn quote_snapshot(&self) -> Result<HashMap<String, SnapshotRow>> {
        // Held across the fetch so concurrent callers share one request.
        let mut cached = self.cached.lock().await;
        if let Some((fetched_at, rows)) = cached.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                debug!(age_ms = fetched_at.elapsed().as_millis() as u64, "Quote snapshot cache hit");
                return Ok(rows.clone());
            }
        }

        let rows = self.fetch_with_retry().await?;
        *cached = Some((Instant::now(), rows.clone()));
        Ok(rows)
    }

    async fn history(&self, code: &str, adjust: PriceAdjust) -> Result<Vec<RawBar>> {
        self.inner.history(code, adjust).await
    }
}
