//! `heat-curve`: sample the Weather Dependent Control flow temperature curves

use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use easycontrol_wdc::{CurveParams, CurveSample, HeatCurves, HeatingType, RoomInfluence};

use crate::config::HeatCurveConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CurveFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Default, Args)]
pub struct HeatCurveArgs {
    /// Heating type whose factory curve is the starting point
    #[arg(short = 't', long)]
    pub heating_type: Option<HeatingType>,

    /// Flow temperature at 20 °C outside
    #[arg(long)]
    pub start_point: Option<f64>,

    /// Flow temperature at -10 °C outside
    #[arg(long)]
    pub end_point: Option<f64>,

    /// Minimum flow temperature
    #[arg(long)]
    pub min_flow: Option<f64>,

    /// Maximum flow temperature
    #[arg(long)]
    pub max_flow: Option<f64>,

    /// Outside temperature at or above which heating stops
    #[arg(long)]
    pub summer_setback: Option<f64>,

    /// Room set point
    #[arg(short, long)]
    pub set_point: Option<f64>,

    /// Actual room temperature
    #[arg(short, long)]
    pub room_temperature: Option<f64>,

    /// Room influence: none, low, medium, high (or 0-3)
    #[arg(long)]
    pub room_influence: Option<RoomInfluence>,

    /// Outside temperature step between emitted samples, in °C
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CurveFormat::Csv)]
    pub format: CurveFormat,
}

impl HeatCurveArgs {
    /// Command line over config file over heating type defaults
    #[must_use]
    pub fn resolve(&self, config: &HeatCurveConfig) -> CurveParams {
        let heating_type = self.heating_type.unwrap_or(config.heating_type);
        let defaults = CurveParams::for_heating_type(heating_type);
        let pick = |arg: Option<f64>, configured: Option<f64>, default: f64| {
            arg.or(configured).unwrap_or(default)
        };

        CurveParams {
            start_point: pick(self.start_point, config.start_point, defaults.start_point),
            end_point: pick(self.end_point, config.end_point, defaults.end_point),
            min_flow: pick(self.min_flow, config.min_flow, defaults.min_flow),
            max_flow: pick(self.max_flow, config.max_flow, defaults.max_flow),
            summer_setback: pick(
                self.summer_setback,
                config.summer_setback,
                defaults.summer_setback,
            ),
            set_point: pick(self.set_point, config.set_point, defaults.set_point),
            room_temperature: pick(
                self.room_temperature,
                config.room_temperature,
                defaults.room_temperature,
            ),
            room_influence: self
                .room_influence
                .or(config.room_influence)
                .unwrap_or(defaults.room_influence),
        }
    }
}

pub fn execute(args: &HeatCurveArgs, config: &HeatCurveConfig) -> Result<()> {
    let curves = HeatCurves::compute(args.resolve(config))?;
    let stride = stride(args.step)?;
    let stdout = io::stdout();
    write_samples(&mut stdout.lock(), &curves, stride, args.format)
}

/// Number of 0.01 °C samples between emitted rows
fn stride(step: f64) -> Result<usize> {
    if !(step.is_finite() && step >= 0.01) {
        bail!("step must be at least 0.01 °C, got {step}");
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stride = (step * 100.0).round() as usize;
    Ok(stride.max(1))
}

pub fn write_samples<W: Write>(
    out: &mut W,
    curves: &HeatCurves,
    stride: usize,
    format: CurveFormat,
) -> Result<()> {
    let samples: Vec<CurveSample> = curves.samples().step_by(stride).collect();
    match format {
        CurveFormat::Csv => {
            writeln!(out, "outside,basic,set_point,room")?;
            for s in &samples {
                let room = s.room.map(|r| format!("{r:.2}")).unwrap_or_default();
                writeln!(
                    out,
                    "{:.2},{:.2},{:.2},{room}",
                    s.outside, s.basic, s.set_point
                )?;
            }
        }
        CurveFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &samples)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
