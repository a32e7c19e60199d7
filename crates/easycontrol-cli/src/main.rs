//! EasyControl CLI
//!
//! - `convert`: turn a flat settings dump into a nested, decoded settings tree
//! - `heat-curve`: sample the Weather Dependent Control flow temperature curves
//! - `config`: show the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::convert::{self, ConvertArgs};
use commands::heat_curve::{self, HeatCurveArgs};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "easycontrol")]
#[command(about = "Tools for Bosch EasyControl settings dumps", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "EASYCONTROL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a settings dump into a nested settings tree
    Convert(ConvertArgs),

    /// Print heat-curve samples
    #[command(alias = "curve")]
    HeatCurve(HeatCurveArgs),

    /// Show configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert(args) => convert::execute(&args, &config.convert),
        Commands::HeatCurve(args) => heat_curve::execute(&args, &config.heat_curve),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
