use std::time::Duration;

use crate::Locale;

/// All configuration loaded from environment variables at startup.
/// Every variable has a default; a value that is present but unparsable
/// causes an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// TOML file listing the instruments to evaluate.
    pub instruments_path: String,
    /// Directory holding `quotes.json` and `history/*.json`.
    pub data_dir: String,
    /// Language for advice labels.
    pub locale: Locale,
    /// Pause between two instruments, to respect provider rate limits.
    pub request_interval: Duration,
    /// How long a bulk quote snapshot stays fresh.
    pub snapshot_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instruments_path: "config/instruments.toml".to_string(),
            data_dir: "data".to_string(),
            locale: Locale::Zh,
            request_interval: Duration::from_millis(500),
            snapshot_ttl: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        let defaults = Config::default();

        let locale = match optional_env("ADVISOR_LOCALE") {
            Some(raw) => raw
                .parse()
                .unwrap_or_else(|e| panic!("ERROR: ADVISOR_LOCALE must be 'zh' or 'en': {e}")),
            None => defaults.locale,
        };

        Config {
            instruments_path: optional_env("ADVISOR_INSTRUMENTS_PATH")
                .unwrap_or(defaults.instruments_path),
            data_dir: optional_env("ADVISOR_DATA_DIR").unwrap_or(defaults.data_dir),
            locale,
            request_interval: optional_u64("ADVISOR_REQUEST_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_interval),
            snapshot_ttl: optional_u64("ADVISOR_SNAPSHOT_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.snapshot_ttl),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn optional_u64(key: &str) -> Option<u64> {
    optional_env(key).map(|v| {
        v.trim().parse::<u64>().unwrap_or_else(|_| {
            panic!("Environment variable '{key}' must be a non-negative integer, got: '{v}'")
        })
    })
}
