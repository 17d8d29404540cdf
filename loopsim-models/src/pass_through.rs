// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A process whose output is its input.
//!
//! In a closed loop the driver feeds the previous output back, so placing a
//! controller in front of a [`PassThrough`] gives `y(t) = k * (r - y(t - 1))`
//! for a proportional gain `k`. This is the simplest system in which the
//! effect of the gain on stability can be studied: for `|k| < 1` the output
//! settles at `k * r / (1 + k)`, short of the setpoint, alternating around
//! that value on the way when `k` is positive. For `|k| > 1` it diverges.

use loopsim_engine::traits::Process;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassThrough;

impl Process for PassThrough {
    fn step(&mut self, input: f64) -> f64 {
        input
    }
}
