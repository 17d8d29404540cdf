// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A proportional-integral-derivative controller.
//!
//! On every [step](Controller::step) with error `e`:
//!
//! ```text
//! integral   += e * dt
//! derivative  = (e - previous_error) / dt
//! previous_error = e
//! output      = kp * e + ki * integral + kd * derivative
//! ```
//!
//! All three state values are updated even when the corresponding gain is
//! zero, so a P or PI configuration behaves identically to a PID with the
//! unused gains set to zero.

use log::warn;
use loopsim_engine::traits::Controller;
use loopsim_engine::types::{SimError, check_finite, check_positive};

/// The time quantum used unless one is configured.
pub const DEFAULT_DT: f64 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct Pid {
    // Configuration
    kp: f64,
    ki: f64,
    kd: f64,
    dt: f64,

    // State
    integral: f64,
    derivative: f64,
    previous_error: f64,
}

impl Pid {
    /// Create a controller with the given gains and [`DEFAULT_DT`].
    pub fn new(kp: f64, ki: f64, kd: f64) -> Result<Self, SimError> {
        Self::with_dt(kp, ki, kd, DEFAULT_DT)
    }

    /// Create a controller with the given gains and time quantum.
    ///
    /// The gains must be finite and `dt` must be finite and greater than zero.
    pub fn with_dt(kp: f64, ki: f64, kd: f64, dt: f64) -> Result<Self, SimError> {
        let kp = check_finite("kp", kp)?;
        let ki = check_finite("ki", ki)?;
        let kd = check_finite("kd", kd)?;
        let dt = check_positive("dt", dt)?;
        if kp == 0.0 && ki == 0.0 && kd == 0.0 {
            warn!("PID created with all gains zero, output will always be 0");
        }

        Ok(Self {
            kp,
            ki,
            kd,
            dt,
            integral: 0.0,
            derivative: 0.0,
            previous_error: 0.0,
        })
    }

    #[must_use]
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.kp, self.ki, self.kd)
    }

    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Most recent rate of change of the error.
    #[must_use]
    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    #[must_use]
    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }
}

impl Controller for Pid {
    fn step(&mut self, error: f64) -> f64 {
        self.integral += error * self.dt;
        self.derivative = (error - self.previous_error) / self.dt;
        self.previous_error = error;

        self.kp * error + self.ki * self.integral + self.kd * self.derivative
    }

    fn integral(&self) -> f64 {
        self.integral
    }

    fn reset(&mut self) {
        self.integral = 0.0;
        self.derivative = 0.0;
        self.previous_error = 0.0;
    }
}
