// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Reference signals used as setpoints or open-loop inputs.
//!
//! Any `Fn(usize) -> f64` closure is a [`Signal`], these types cover the
//! common cases and can be built from configuration text.

use std::fmt;
use std::str::FromStr;

use crate::sim_error;
use crate::traits::Signal;
use crate::types::{SimError, check_finite};

/// The same value at every step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(pub f64);

impl Signal for Constant {
    fn value(&self, _t: usize) -> f64 {
        self.0
    }
}

/// A piecewise-constant signal.
///
/// Each level holds from its start step until the start of the next level.
/// Steps before the first start take the first level's value.
///
/// The text form is a comma-separated list of `start:value` pairs, for
/// example `0:0,100:50,300:10`. A single bare number is a constant level.
#[derive(Clone, Debug, PartialEq)]
pub struct StepSchedule {
    levels: Vec<(usize, f64)>,
}

impl StepSchedule {
    /// Create a schedule from `(start, value)` pairs.
    ///
    /// The starts must be strictly increasing and the values finite.
    pub fn new(levels: Vec<(usize, f64)>) -> Result<Self, SimError> {
        if levels.is_empty() {
            return sim_error!("setpoint schedule must contain at least one level");
        }
        for (start, value) in &levels {
            check_finite(&format!("setpoint level at step {start}"), *value)?;
        }
        if levels.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return sim_error!("setpoint schedule steps must be strictly increasing");
        }
        Ok(Self { levels })
    }

    /// The `(start, value)` pairs making up this schedule.
    #[must_use]
    pub fn levels(&self) -> &[(usize, f64)] {
        &self.levels
    }
}

impl Signal for StepSchedule {
    fn value(&self, t: usize) -> f64 {
        // Index of the first level that starts after `t`
        let after = self.levels.partition_point(|(start, _)| *start <= t);
        self.levels[after.saturating_sub(1)].1
    }
}

impl FromStr for StepSchedule {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut levels = Vec::new();
        for entry in s.split(',').map(str::trim) {
            let (start, value) = match entry.split_once(':') {
                Some((start, value)) => (start.trim(), value.trim()),
                None => ("0", entry),
            };
            let Ok(start) = start.parse::<usize>() else {
                return sim_error!(format!("invalid step '{start}' in setpoint '{s}'"));
            };
            let Ok(value) = value.parse::<f64>() else {
                return sim_error!(format!("invalid value '{value}' in setpoint '{s}'"));
            };
            levels.push((start, value));
        }
        Self::new(levels)
    }
}

impl fmt::Display for StepSchedule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text: Vec<String> = self
            .levels
            .iter()
            .map(|(start, value)| format!("{start}:{value}"))
            .collect();
        write!(f, "{}", text.join(","))
    }
}
