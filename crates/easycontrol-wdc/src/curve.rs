//! Heat-curve calculation
//!
//! The basic curve is a straight line from the end point at −10 °C outside
//! to the start point at 20 °C outside. Two parallel offsets are derived
//! from it:
//!
//! - set point: `(set point − 20) × 3`
//! - room temperature: `(set point − room temperature) × influence factor`
//!
//! Both are clamped to the flow temperature limits and drop to zero at or
//! above the summer setback threshold.

use serde::Serialize;

use crate::error::CurveResult;
use crate::params::{CurveParams, RoomInfluence};

/// Coldest modelled outside temperature
pub const OUTSIDE_MIN: f64 = -10.0;
/// Warmest modelled outside temperature
pub const OUTSIDE_MAX: f64 = 20.0;
/// Samples per °C of outside temperature
const SAMPLES_PER_DEGREE: usize = 100;
/// Number of samples across the modelled range, ends included
pub const SAMPLE_COUNT: usize = 30 * SAMPLES_PER_DEGREE + 1;

/// Room set point the basic curve is designed for
const REFERENCE_SET_POINT: f64 = 20.0;
/// Flow offset per degree of set point above the reference
const SET_POINT_GAIN: f64 = 3.0;

/// One outside temperature and the flow temperatures it yields
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    pub outside: f64,
    pub basic: f64,
    pub set_point: f64,
    /// Absent when room influence is off
    pub room: Option<f64>,
}

/// Sampled heat curves for one parameter set
#[derive(Debug, Clone, PartialEq)]
pub struct HeatCurves {
    params: CurveParams,
    outside: Vec<f64>,
    basic: Vec<f64>,
    set_point: Vec<f64>,
    room: Option<Vec<f64>>,
}

impl HeatCurves {
    /// Validate, reconcile and sample the curves
    ///
    /// # Errors
    /// Returns error if any parameter is outside its accepted range
    pub fn compute(params: CurveParams) -> CurveResult<Self> {
        params.validate()?;
        let params = params.reconciled();

        let outside = outside_temperatures();
        let basic = linspace(params.end_point, params.start_point, SAMPLE_COUNT);

        let set_point_offset = (params.set_point - REFERENCE_SET_POINT) * SET_POINT_GAIN;
        let set_point = adjusted(&params, &outside, &basic, set_point_offset);

        let room = (params.room_influence != RoomInfluence::None).then(|| {
            let offset =
                (params.set_point - params.room_temperature) * params.room_influence.factor();
            adjusted(&params, &outside, &basic, offset)
        });

        tracing::debug!(
            samples = outside.len(),
            set_point_offset,
            room_influence = %params.room_influence,
            "computed heat curves"
        );

        Ok(Self {
            params,
            outside,
            basic,
            set_point,
            room,
        })
    }

    /// Parameters after reconciliation
    #[inline]
    #[must_use]
    pub fn params(&self) -> &CurveParams {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn outside(&self) -> &[f64] {
        &self.outside
    }

    #[inline]
    #[must_use]
    pub fn basic(&self) -> &[f64] {
        &self.basic
    }

    #[inline]
    #[must_use]
    pub fn set_point(&self) -> &[f64] {
        &self.set_point
    }

    #[inline]
    #[must_use]
    pub fn room(&self) -> Option<&[f64]> {
        self.room.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.outside.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outside.is_empty()
    }

    /// Sample at index `i`
    #[must_use]
    pub fn sample(&self, i: usize) -> Option<CurveSample> {
        Some(CurveSample {
            outside: *self.outside.get(i)?,
            basic: self.basic[i],
            set_point: self.set_point[i],
            room: self.room.as_ref().map(|room| room[i]),
        })
    }

    /// Every sample from coldest to warmest
    pub fn samples(&self) -> impl Iterator<Item = CurveSample> + '_ {
        (0..self.len()).filter_map(|i| self.sample(i))
    }

    /// Sample nearest to an outside temperature within the modelled range
    #[must_use]
    pub fn at(&self, outside: f64) -> Option<CurveSample> {
        if !(OUTSIDE_MIN..=OUTSIDE_MAX).contains(&outside) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = ((outside - OUTSIDE_MIN) * SAMPLES_PER_DEGREE as f64).round() as usize;
        self.sample(index)
    }
}

/// Outside temperatures from −10 °C to 20 °C in 0.01 °C steps
#[allow(clippy::cast_precision_loss)]
fn outside_temperatures() -> Vec<f64> {
    (0..SAMPLE_COUNT)
        .map(|i| OUTSIDE_MIN + i as f64 / SAMPLES_PER_DEGREE as f64)
        .collect()
}

/// `count` evenly spaced values from `from` to `to`, both included
#[allow(clippy::cast_precision_loss)]
fn linspace(from: f64, to: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let span = (count - 1) as f64;
            (0..count)
                .map(|i| from + (to - from) * (i as f64 / span))
                .collect()
        }
    }
}

/// Offset the basic curve, clamp to the flow limits and apply summer setback
fn adjusted(params: &CurveParams, outside: &[f64], basic: &[f64], offset: f64) -> Vec<f64> {
    outside
        .iter()
        .zip(basic)
        .map(|(&t, &flow)| {
            if t >= params.summer_setback {
                0.0
            } else {
                (flow + offset).clamp(params.min_flow, params.max_flow)
            }
        })
        .collect()
}
