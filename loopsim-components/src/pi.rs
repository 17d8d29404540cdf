// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A proportional-integral controller without a derivative term.
//!
//! The integral is the plain running sum of the error, equivalent to a
//! time quantum of `1`. Setting `ki` to zero gives a pure proportional
//! controller, setting `kp` to zero a pure integral one.

use log::warn;
use loopsim_engine::traits::Controller;
use loopsim_engine::types::{SimError, check_finite};

#[derive(Clone, Debug, PartialEq)]
pub struct Pi {
    kp: f64,
    ki: f64,

    /// Cumulative error
    integral: f64,
}

impl Pi {
    /// Create a controller with the given gains, which must be finite.
    pub fn new(kp: f64, ki: f64) -> Result<Self, SimError> {
        let kp = check_finite("kp", kp)?;
        let ki = check_finite("ki", ki)?;
        if kp == 0.0 && ki == 0.0 {
            warn!("PI created with all gains zero, output will always be 0");
        }

        Ok(Self {
            kp,
            ki,
            integral: 0.0,
        })
    }

    /// A controller that only applies the proportional term.
    pub fn proportional(kp: f64) -> Result<Self, SimError> {
        Self::new(kp, 0.0)
    }

    /// A controller whose output is `ki` times the cumulative error.
    pub fn integral_only(ki: f64) -> Result<Self, SimError> {
        Self::new(0.0, ki)
    }

    #[must_use]
    pub fn gains(&self) -> (f64, f64) {
        (self.kp, self.ki)
    }
}

impl Controller for Pi {
    fn step(&mut self, error: f64) -> f64 {
        self.integral += error;

        self.kp * error + self.ki * self.integral
    }

    fn integral(&self) -> f64 {
        self.integral
    }

    fn reset(&mut self) {
        self.integral = 0.0;
    }
}
