//! Heat-curve parameters
//!
//! Defaults and accepted ranges follow the EasyControl installer menu.

use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Accepted start point (flow temperature at 20 °C outside)
pub const START_POINT_RANGE: RangeInclusive<f64> = 20.0..=45.0;
/// Accepted end point (flow temperature at −10 °C outside)
pub const END_POINT_RANGE: RangeInclusive<f64> = 40.0..=90.0;
pub const SET_POINT_RANGE: RangeInclusive<f64> = 5.0..=30.0;
pub const ROOM_TEMPERATURE_RANGE: RangeInclusive<f64> = 5.0..=30.0;
pub const MIN_FLOW_RANGE: RangeInclusive<f64> = 10.0..=50.0;
pub const MAX_FLOW_RANGE: RangeInclusive<f64> = 25.0..=90.0;
pub const SUMMER_SETBACK_RANGE: RangeInclusive<f64> = 10.0..=30.0;

/// Heat emitter installed on the circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatingType {
    #[default]
    Radiator,
    Convector,
    Underfloor,
}

impl HeatingType {
    pub const ALL: [Self; 3] = [Self::Radiator, Self::Convector, Self::Underfloor];

    /// Factory start and end point of the basic curve
    #[must_use]
    pub fn default_curve(self) -> (f64, f64) {
        match self {
            Self::Radiator | Self::Convector => (20.0, 75.0),
            Self::Underfloor => (20.0, 45.0),
        }
    }

    /// Factory minimum and maximum supply (flow) temperature
    #[must_use]
    pub fn default_supply_limits(self) -> (f64, f64) {
        match self {
            Self::Radiator | Self::Convector => (20.0, 90.0),
            Self::Underfloor => (20.0, 45.0),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radiator => "radiator",
            Self::Convector => "convector",
            Self::Underfloor => "underfloor",
        }
    }
}

impl Display for HeatingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeatingType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CurveError::UnknownVariant {
                kind: "heating type",
                value: s.to_string(),
            })
    }
}

/// How strongly the room temperature error shifts the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomInfluence {
    None,
    Low,
    Medium,
    #[default]
    High,
}

impl RoomInfluence {
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// Degrees of flow offset per degree of room temperature error
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Low => 1.0,
            Self::Medium => 2.0,
            Self::High => 3.0,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for RoomInfluence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.factor())
    }
}

impl FromStr for RoomInfluence {
    type Err = CurveError;

    /// Accepts the name (`medium`) or the factor (`2`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s) || i.factor().to_string() == s)
            .ok_or_else(|| CurveError::UnknownVariant {
                kind: "room influence",
                value: s.to_string(),
            })
    }
}

/// Inputs to the Weather Dependent Control curves, all in °C
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Flow temperature at 20 °C outside
    pub start_point: f64,
    /// Flow temperature at −10 °C outside
    pub end_point: f64,
    pub min_flow: f64,
    pub max_flow: f64,
    /// Heating switches off at or above this outside temperature
    pub summer_setback: f64,
    pub set_point: f64,
    /// Measured room temperature, used with [`RoomInfluence`]
    pub room_temperature: f64,
    pub room_influence: RoomInfluence,
}

impl CurveParams {
    /// Factory parameters for a heating type
    #[must_use]
    pub fn for_heating_type(heating_type: HeatingType) -> Self {
        let (start_point, end_point) = heating_type.default_curve();
        let (min_flow, max_flow) = heating_type.default_supply_limits();
        Self {
            start_point,
            end_point,
            min_flow,
            max_flow,
            summer_setback: 18.0,
            set_point: 20.0,
            room_temperature: 16.0,
            room_influence: RoomInfluence::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_set_point(mut self, set_point: f64) -> Self {
        self.set_point = set_point;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_room(mut self, room_temperature: f64, influence: RoomInfluence) -> Self {
        self.room_temperature = room_temperature;
        self.room_influence = influence;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_curve(mut self, start_point: f64, end_point: f64) -> Self {
        self.start_point = start_point;
        self.end_point = end_point;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_flow_limits(mut self, min_flow: f64, max_flow: f64) -> Self {
        self.min_flow = min_flow;
        self.max_flow = max_flow;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_summer_setback(mut self, summer_setback: f64) -> Self {
        self.summer_setback = summer_setback;
        self
    }

    /// Check every parameter against its accepted range
    ///
    /// # Errors
    /// Returns [`CurveError::OutOfRange`] for the first offending parameter
    pub fn validate(&self) -> CurveResult<()> {
        check("start point", self.start_point, &START_POINT_RANGE)?;
        check("end point", self.end_point, &END_POINT_RANGE)?;
        check("minimum flow temperature", self.min_flow, &MIN_FLOW_RANGE)?;
        check("maximum flow temperature", self.max_flow, &MAX_FLOW_RANGE)?;
        check("summer setback", self.summer_setback, &SUMMER_SETBACK_RANGE)?;
        check("set point", self.set_point, &SET_POINT_RANGE)?;
        check(
            "room temperature",
            self.room_temperature,
            &ROOM_TEMPERATURE_RANGE,
        )
    }

    /// Resolve overlapping limits the way the thermostat does
    ///
    /// The end point never drops below the start point and the maximum flow
    /// temperature never drops below the minimum.
    #[must_use]
    pub fn reconciled(mut self) -> Self {
        if self.start_point > self.end_point {
            tracing::debug!(
                start = self.start_point,
                end = self.end_point,
                "raising end point to start point"
            );
            self.end_point = self.start_point;
        }
        if self.min_flow > self.max_flow {
            tracing::debug!(
                min = self.min_flow,
                max = self.max_flow,
                "raising maximum flow to minimum flow"
            );
            self.max_flow = self.min_flow;
        }
        self
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::for_heating_type(HeatingType::default())
    }
}

fn check(parameter: &'static str, value: f64, range: &RangeInclusive<f64>) -> CurveResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(CurveError::OutOfRange {
            parameter,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
