// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Run a process, with or without a controller, for a fixed number of steps.
//!
//! # Open loop
//!
//! The input signal is applied directly to the process:
//!
//! ```text
//! u(t) -> process -> y
//! ```
//!
//! # Closed loop
//!
//! The output of each step is fed back to form the error of the next:
//!
//! ```text
//! r(t) -> (+) -> e -> controller -> u -> process -> y
//!          ^-                                       |
//!          |-------------- y(t - 1) ----------------|
//! ```
//!
//! The previous output is taken to be `0` before the first step. Every run
//! performs exactly `steps` iterations and records one sample per iteration.

use log::{debug, trace, warn};

use crate::trace::{ClosedLoopSample, OpenLoopSample, Trace};
use crate::traits::{Controller, Process, Signal};
use crate::types::{SimError, check_non_zero};

/// Apply `input` to `process` for `steps` steps.
pub fn run_open_loop<P, S>(
    process: &mut P,
    input: &S,
    steps: usize,
) -> Result<Trace<OpenLoopSample>, SimError>
where
    P: Process + ?Sized,
    S: Signal + ?Sized,
{
    check_non_zero("steps", steps)?;
    debug!("open loop: running {steps} steps");

    let mut trace = Trace::with_capacity(steps);
    for time in 0..steps {
        let u = input.value(time);
        let y = process.step(u);
        trace!("t={time} u={u} y={y}");

        trace.push(OpenLoopSample {
            time,
            input: u,
            output: y,
        });
    }

    debug!("open loop: done");
    Ok(trace)
}

/// Regulate `process` with `controller` so that it tracks `setpoint`.
///
/// The controller and process are mutated in place and are left in their
/// final state, which allows a caller to deliberately continue from a warm
/// instance.
pub fn run_closed_loop<C, P, S>(
    controller: &mut C,
    process: &mut P,
    setpoint: &S,
    steps: usize,
) -> Result<Trace<ClosedLoopSample>, SimError>
where
    C: Controller + ?Sized,
    P: Process + ?Sized,
    S: Signal + ?Sized,
{
    check_non_zero("steps", steps)?;
    debug!("closed loop: running {steps} steps");

    let mut trace = Trace::with_capacity(steps);
    let mut previous_output = 0.0;
    let mut cumulative_error = 0.0;
    let mut warned = false;

    for time in 0..steps {
        let r = setpoint.value(time);
        let e = r - previous_output;
        cumulative_error += e;

        let u = controller.step(e);
        if !u.is_finite() && !warned {
            warn!("closed loop: control action became {u} at step {time}");
            warned = true;
        }

        let y = process.step(u);
        trace!("t={time} r={r} e={e} u={u} y={y}");

        trace.push(ClosedLoopSample {
            time,
            setpoint: r,
            error: e,
            cumulative_error,
            integral: controller.integral(),
            control: u,
            output: y,
        });
        previous_output = y;
    }

    debug!("closed loop: done, final integral {}", controller.integral());
    Ok(trace)
}
