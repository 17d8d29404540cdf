// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A memoryless process whose output ramps linearly between two saturation
//! thresholds.
//!
//! This models the hit rate of a cache as a function of its size: below the
//! `lower` threshold nothing hits, above the `upper` threshold everything
//! does, and in between the hit rate is proportional to the size.
//!
//! ```text
//!   1 |            ______
//!     |          /
//!     |        /
//!   0 |______/
//!          lower  upper
//! ```
//!
//! A NaN input produces a NaN output.

use loopsim_engine::sim_error;
use loopsim_engine::traits::Process;
use loopsim_engine::types::{SimError, check_finite};

/// Input at which the default process starts to respond.
pub const DEFAULT_LOWER: f64 = 0.0;

/// Input at which the default process saturates.
pub const DEFAULT_UPPER: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticProcess {
    lower: f64,
    upper: f64,
}

impl Default for StaticProcess {
    /// `output = clamp(input / 100, 0, 1)`
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
        }
    }
}

impl StaticProcess {
    /// Create a process that saturates at `lower` and `upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, SimError> {
        let lower = check_finite("lower threshold", lower)?;
        let upper = check_finite("upper threshold", upper)?;
        if lower >= upper {
            return sim_error!(format!(
                "lower threshold ({lower}) must be below upper threshold ({upper})"
            ));
        }
        Ok(Self { lower, upper })
    }

    /// Map a single input to the output range `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, input: f64) -> f64 {
        ((input - self.lower) / (self.upper - self.lower)).clamp(0.0, 1.0)
    }

    /// Map each of `inputs` independently.
    #[must_use]
    pub fn evaluate_batch(&self, inputs: &[f64]) -> Vec<f64> {
        inputs.iter().map(|u| self.evaluate(*u)).collect()
    }

    #[must_use]
    pub fn thresholds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl Process for StaticProcess {
    fn step(&mut self, input: f64) -> f64 {
        self.evaluate(input)
    }
}
