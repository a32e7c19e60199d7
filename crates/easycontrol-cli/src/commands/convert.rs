//! `convert`: settings dump → nested, decoded settings tree

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use easycontrol_settings::{BuildOptions, SettingsTreeBuilder};

use crate::config::ConvertConfig;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Settings dump to read (JSON list of settings)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// File to write the converted settings to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave base64 text and device keys encoded
    #[arg(long)]
    pub no_decode: bool,

    /// Leave "true"/"false"/0/1 flag values as they are
    #[arg(long)]
    pub no_fix_booleans: bool,

    /// Do not echo the converted settings to stdout
    #[arg(short, long)]
    pub quiet: bool,
}

impl ConvertArgs {
    /// Apply command-line overrides on top of the config file
    #[must_use]
    pub fn resolve(&self, config: &ConvertConfig) -> ConvertConfig {
        ConvertConfig {
            input: self.input.clone().unwrap_or_else(|| config.input.clone()),
            output: self.output.clone().unwrap_or_else(|| config.output.clone()),
            decode: config.decode && !self.no_decode,
            fix_booleans: config.fix_booleans && !self.no_fix_booleans,
        }
    }
}

pub fn execute(args: &ConvertArgs, config: &ConvertConfig) -> Result<()> {
    let settings = args.resolve(config);
    let formatted = convert_file(&settings.input, &settings.output, settings.build_options())?;
    if !args.quiet {
        println!("{formatted}");
    }
    Ok(())
}

/// Convert `input` and write the sorted, indented result to `output`
///
/// Returns the text written.
pub fn convert_file(input: &Path, output: &Path, options: BuildOptions) -> Result<String> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("reading settings from {}", input.display()))?;

    let tree = SettingsTreeBuilder::new(options)
        .build_from_json(&text)
        .with_context(|| format!("converting settings from {}", input.display()))?;
    let formatted = tree.to_pretty_json()?;

    fs::write(output, &formatted)
        .with_context(|| format!("writing converted settings to {}", output.display()))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        bytes = formatted.len(),
        "wrote converted settings"
    );
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use easycontrol_test_utils::sample_settings_json;
    use serde_json::{json, Value};

    fn args() -> ConvertArgs {
        ConvertArgs {
            input: None,
            output: None,
            no_decode: false,
            no_fix_booleans: false,
            quiet: true,
        }
    }

    #[test]
    fn resolve_prefers_command_line() {
        let resolved = ConvertArgs {
            input: Some(PathBuf::from("dump.json")),
            no_decode: true,
            ..args()
        }
        .resolve(&ConvertConfig::default());

        assert_eq!(resolved.input, PathBuf::from("dump.json"));
        assert_eq!(resolved.output, PathBuf::from("Settings_Data_Converted.json"));
        assert!(!resolved.decode);
        assert!(resolved.fix_booleans);
    }

    #[test]
    fn resolve_keeps_disabled_config_flags() {
        let config = ConvertConfig {
            fix_booleans: false,
            ..ConvertConfig::default()
        };
        assert!(!args().resolve(&config).fix_booleans);
    }

    #[test]
    fn converts_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Settings_Data.json");
        let output = dir.path().join("Settings_Data_Converted.json");
        fs::write(&input, sample_settings_json()).unwrap();

        let returned = convert_file(&input, &output, BuildOptions::default()).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(returned, written);

        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["zones"]["1"]["name"]["value"], json!("Living Room"));
        assert_eq!(value["devices"]["1"]["available"]["available"], json!(true));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(
            &dir.path().join("absent.json"),
            &dir.path().join("out.json"),
            BuildOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn failed_conversion_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        fs::write(&input, r#"[{"value": 1}]"#).unwrap();

        assert!(convert_file(&input, &output, BuildOptions::default()).is_err());
        assert!(!output.exists());
    }
}
