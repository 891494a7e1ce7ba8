//! Indicator-and-signal scoring engine.
//!
//! Turns a daily price/volume history and the latest quote into a discrete
//! recommendation with a bounded confidence:
//!
//! ```text
//! normalize → indicators::compute → scorer::score → { confidence, advice }
//! ```
//!
//! Everything reachable from [`evaluate`] is pure and synchronous. The
//! [`Desk`] sits on top and drives evaluation from a `MarketDataProvider`.

pub mod advice;
pub mod confidence;
pub mod config;
pub mod desk;
pub mod indicators;
pub mod pipeline;
pub mod scorer;
pub mod series;

pub use advice::{Advice, AdviceTier};
pub use config::{InstrumentConfig, InstrumentFileConfig};
pub use desk::{Desk, Outcome, Report};
pub use indicators::IndicatorSet;
pub use pipeline::{advise, evaluate, Evaluation};
pub use scorer::{IndicatorLabel, ScoreResult};
