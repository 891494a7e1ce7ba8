use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::{Error, Result};

/// Instrument list (TOML). Read-only: nothing in this workspace writes it.
///
/// Example `config/instruments.toml`:
/// ```toml
/// [[instrument]]
/// code = "600000"
/// name = "浦发银行"
///
/// [[instrument]]
/// code = "000001"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InstrumentFileConfig {
    #[serde(rename = "instrument", default)]
    pub instruments: Vec<InstrumentConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstrumentConfig {
    /// Six-digit exchange code, e.g. "600000".
    pub code: String,
    /// Display name; the quote snapshot's name is used when absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl InstrumentFileConfig {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read instrument list at '{path}': {e}")))?;
        Self::parse(&content)
    }

    /// Parse TOML, validate codes and drop duplicates.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: InstrumentFileConfig = toml::from_str(content)?;

        let mut seen = HashSet::new();
        let mut instruments = Vec::with_capacity(raw.instruments.len());
        for mut inst in raw.instruments {
            inst.code = inst.code.trim().to_string();
            if !is_valid_code(&inst.code) {
                return Err(Error::Config(format!(
                    "instrument code must be 6 digits (e.g. 000001, 600000), got '{}'",
                    inst.code
                )));
            }
            if !seen.insert(inst.code.clone()) {
                warn!(code = %inst.code, "Duplicate instrument ignored");
                continue;
            }
            instruments.push(inst);
        }

        Ok(Self { instruments })
    }
}

/// Exchange codes are exactly six ASCII digits.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}
