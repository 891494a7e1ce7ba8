use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use common::{Error, MarketDataProvider, Quote, RawBar, Result};

use crate::config::InstrumentConfig;
use crate::pipeline::{evaluate, Evaluation};
use crate::series::quote_from_history;

/// Evaluation outcome for one instrument, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub code: String,
    pub name: String,
    pub price: Option<f64>,
    pub change_pct: Option<f64>,
    pub outcome: Outcome,
    pub updated_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Evaluated(Evaluation),
    /// Every retrieval attempt failed.
    Failed { reason: String },
}

impl Report {
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match &self.outcome {
            Outcome::Evaluated(eval) => Some(eval),
            Outcome::Failed { .. } => None,
        }
    }
}

/// Fetches data for each configured instrument and runs the scoring pipeline.
///
/// Instruments are processed one at a time with a pause in between, so a
/// rate-limited provider is never hit in bursts.
pub struct Desk {
    provider: Arc<dyn MarketDataProvider>,
    instruments: Vec<InstrumentConfig>,
    request_interval: Duration,
    retry_pause: Duration,
    max_attempts: usize,
}

impl Desk {
    const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(500);
    const DEFAULT_RETRY_PAUSE: Duration = Duration::from_millis(500);
    const DEFAULT_MAX_ATTEMPTS: usize = 2;

    pub fn new(provider: Arc<dyn MarketDataProvider>, instruments: Vec<InstrumentConfig>) -> Self {
        for inst in &instruments {
            info!(code = %inst.code, "Registered instrument");
        }
        Self {
            provider,
            instruments,
            request_interval: Self::DEFAULT_REQUEST_INTERVAL,
            retry_pause: Self::DEFAULT_RETRY_PAUSE,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
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

    /// Evaluate every instrument in order.
    pub async fn run(&self) -> Vec<Report> {
        info!(count = self.instruments.len(), "Updating instruments");
        let mut reports = Vec::with_capacity(self.instruments.len());

        for (i, inst) in self.instruments.iter().enumerate() {
            reports.push(self.evaluate(inst).await);
            if i + 1 < self.instruments.len() {
                tokio::time::sleep(self.request_interval).await;
            }
        }

        let succeeded = reports.iter().filter(|r| r.evaluation().is_some()).count();
        info!(succeeded, total = reports.len(), "Update finished");
        reports
    }

    /// Evaluate one instrument, retrying retrieval failures.
    pub async fn evaluate(&self, inst: &InstrumentConfig) -> Report {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.try_evaluate(inst).await {
                Ok(report) => return report,
                Err(e) => {
                    warn!(
                        code = %inst.code,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Instrument update failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_pause).await;
                    }
                }
            }
        }

        Report {
            code: inst.code.clone(),
            name: inst.name.clone().unwrap_or_else(|| inst.code.clone()),
            price: None,
            change_pct: None,
            outcome: Outcome::Failed {
                reason: last_error.map(|e| e.to_string()).unwrap_or_default(),
            },
            updated_at: Local::now(),
        }
    }

    async fn try_evaluate(&self, inst: &InstrumentConfig) -> Result<Report> {
        let row = match self.provider.quote_snapshot().await {
            Ok(mut rows) => rows.remove(&inst.code),
            Err(e) => {
                warn!(error = %e, "Quote snapshot unavailable, falling back to history");
                None
            }
        };

        let (name, quote, bars) = match row {
            Some(row) => {
                let bars = match self.provider.history_with_fallback(&inst.code).await {
                    Ok((_, bars)) => bars,
                    Err(e) => {
                        warn!(code = %inst.code, error = %e, "No history, advising on quote only");
                        Vec::new()
                    }
                };
                (row.name, row.quote, bars)
            }
            None => {
                debug!(code = %inst.code, "Instrument not in snapshot, deriving quote from history");
                let (_, bars) = self.provider.history_with_fallback(&inst.code).await?;
                let quote = quote_from_history(&bars).ok_or_else(|| {
                    Error::Feed(format!("history for '{}' has no numeric close", inst.code))
                })?;
                (inst.code.clone(), quote, bars)
            }
        };

        Ok(self.report(inst, name, quote, &bars))
    }

    fn report(&self, inst: &InstrumentConfig, name: String, quote: Quote, bars: &[RawBar]) -> Report {
        let evaluation = evaluate(bars, &quote);
        debug!(code = %inst.code, advice = ?evaluation.advice, confidence = evaluation.confidence, "Instrument evaluated");
        Report {
            code: inst.code.clone(),
            name: inst.name.clone().unwrap_or(name),
            price: quote.price,
            change_pct: quote.change_pct,
            outcome: Outcome::Evaluated(evaluation),
            updated_at: Local::now(),
        }
    }
}
