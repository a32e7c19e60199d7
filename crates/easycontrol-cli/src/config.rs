//! CLI configuration file
//!
//! Optional TOML file; every value can be overridden on the command line.
//!
//! ```toml
//! [convert]
//! input = "Settings_Data.json"
//! output = "Settings_Data_Converted.json"
//! decode = true
//! fix_booleans = true
//!
//! [heat_curve]
//! heating_type = "underfloor"
//! set_point = 21.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use easycontrol_settings::BuildOptions;
use easycontrol_wdc::{HeatingType, RoomInfluence};
use serde::{Deserialize, Serialize};

/// Default settings dump read by `convert`
pub const DEFAULT_INPUT: &str = "Settings_Data.json";
/// Default converted file written by `convert`
pub const DEFAULT_OUTPUT: &str = "Settings_Data_Converted.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub convert: ConvertConfig,
    pub heat_curve: HeatCurveConfig,
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no path is given
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub decode: bool,
    pub fix_booleans: bool,
}

impl ConvertConfig {
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::new()
            .with_decode(self.decode)
            .with_fix_booleans(self.fix_booleans)
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let options = BuildOptions::default();
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            decode: options.decode,
            fix_booleans: options.fix_booleans,
        }
    }
}

/// Heat-curve overrides; unset values come from the heating type defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatCurveConfig {
    pub heating_type: HeatingType,
    pub start_point: Option<f64>,
    pub end_point: Option<f64>,
    pub min_flow: Option<f64>,
    pub max_flow: Option<f64>,
    pub summer_setback: Option<f64>,
    pub set_point: Option<f64>,
    pub room_temperature: Option<f64>,
    pub room_influence: Option<RoomInfluence>,
}
