// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The seams between the parts of a feedback loop.
//!
//! Controllers and processes only ever exchange plain numbers through the
//! [driver](crate::driver).

/// A stateful transfer function from tracking error to control action.
pub trait Controller {
    /// Consume the error for the current step and return the control action.
    ///
    /// Must be total over all finite inputs and update any internal state
    /// exactly once per call.
    fn step(&mut self, error: f64) -> f64;

    /// The accumulated error term held by the controller.
    ///
    /// There is no anti-windup so this is unbounded under sustained error.
    fn integral(&self) -> f64;

    /// Clear all accumulated state, leaving the gains untouched.
    fn reset(&mut self);
}

/// A plant driven by a control input.
pub trait Process {
    /// Apply the control input for the current step and return the output.
    fn step(&mut self, input: f64) -> f64;
}

/// A value defined for every step of a run, such as a setpoint or an
/// open-loop input.
pub trait Signal {
    /// The value at step `t`.
    fn value(&self, t: usize) -> f64;
}

impl<F> Signal for F
where
    F: Fn(usize) -> f64,
{
    fn value(&self, t: usize) -> f64 {
        self(t)
    }
}
