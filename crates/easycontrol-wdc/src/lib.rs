//! EasyControl Weather Dependent Control (WDC)
//!
//! Flow temperature curves as computed by the thermostat's weather
//! compensation: the basic curve, its set-point offset and its room
//! temperature offset, each limited by the flow temperature bounds and the
//! summer setback threshold.
//!
//! # Example
//!
//! ```
//! use easycontrol_wdc::{CurveParams, HeatCurves, HeatingType};
//!
//! let params = CurveParams::for_heating_type(HeatingType::Radiator).with_set_point(21.0);
//! let curves = HeatCurves::compute(params).unwrap();
//!
//! let at_freezing = curves.at(0.0).unwrap();
//! assert!(at_freezing.set_point > at_freezing.basic);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod curve;
pub mod error;
pub mod params;

pub use curve::{CurveSample, HeatCurves, OUTSIDE_MAX, OUTSIDE_MIN, SAMPLE_COUNT};
pub use error::{CurveError, CurveResult};
pub use params::{CurveParams, HeatingType, RoomInfluence};
