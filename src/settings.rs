//! # Settings Module
//!
//! ## Purpose
//! Holds the few knobs of a report run and persists them as JSON.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "gas_constant": 8314.4621,
//!   "output_file": "get_reaction_info.txt",
//!   "print_summary": true
//! }
//! ```
//! Every field is optional, missing fields take the defaults shown above.
//!
//! ## Usage Pattern
//! ```rust
//! use KiRateReport::settings::ReportSettings;
//!
//! let settings = ReportSettings::load_or_default("report_settings.json");
//! let extractor = settings.extractor();
//! assert_eq!(extractor.gas_constant, settings.gas_constant);
//! ```
use crate::Kinetics::kinetics_error::ReactionInfoError;
use crate::Kinetics::reaction_info::{Extractor, GAS_CONSTANT};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// default name of the report file
pub const DEFAULT_OUTPUT_FILE: &str = "get_reaction_info.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// divisor for activation energies, J/(kmol*K) for kmol based models
    pub gas_constant: f64,
    pub output_file: PathBuf,
    /// print the summary table of extracted reactions to stdout
    pub print_summary: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            print_summary: true,
        }
    }
}

impl ReportSettings {
    /// Loads settings from a JSON file.
    ///
    /// # Returns
    /// * `Ok(ReportSettings)` - parsed settings, missing fields filled with defaults
    /// * `Err(ReactionInfoError)` - if the file cannot be read or is not valid JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReactionInfoError> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: ReportSettings = serde_json::from_str(&content)?;
        info!("settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Loads settings from a JSON file, falls back to defaults when it is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "settings {} not used ({}), defaults taken",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ReactionInfoError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.gas_constant)
    }
}
