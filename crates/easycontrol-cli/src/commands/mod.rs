//! Subcommand implementations

pub mod convert;
pub mod heat_curve;
