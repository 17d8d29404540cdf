// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The samples recorded by the [driver](crate::driver).
//!
//! A [`Trace`] is append-only while a run is in progress and read-only once
//! it has been returned to the caller.

use std::ops::Range;

use itertools::{Itertools, MinMaxResult};
use loopsim_track::Columns;

/// A sample that carries the measured process output.
pub trait Measured {
    /// The process output recorded in this sample.
    fn output(&self) -> f64;
}

/// One step of an open-loop run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpenLoopSample {
    pub time: usize,
    pub input: f64,
    pub output: f64,
}

/// One step of a closed-loop run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosedLoopSample {
    pub time: usize,
    pub setpoint: f64,

    /// Setpoint minus the output of the previous step.
    pub error: f64,

    /// Plain running sum of `error` up to and including this step.
    pub cumulative_error: f64,

    /// The controller's own integral term after this step.
    pub integral: f64,

    /// Control action produced by the controller.
    pub control: f64,
    pub output: f64,
}

impl Measured for OpenLoopSample {
    fn output(&self) -> f64 {
        self.output
    }
}

impl Measured for ClosedLoopSample {
    fn output(&self) -> f64 {
        self.output
    }
}

impl Columns for OpenLoopSample {
    fn names() -> Vec<&'static str> {
        vec!["t", "u", "y"]
    }

    fn values(&self) -> Vec<f64> {
        vec![self.time as f64, self.input, self.output]
    }
}

impl Columns for ClosedLoopSample {
    fn names() -> Vec<&'static str> {
        vec!["t", "r", "e", "c", "i", "u", "y"]
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.time as f64,
            self.setpoint,
            self.error,
            self.cumulative_error,
            self.integral,
            self.control,
            self.output,
        ]
    }
}

/// An ordered sequence of samples, one per step.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace<T> {
    samples: Vec<T>,
}

impl<T> Trace<T> {
    pub(crate) fn with_capacity(steps: usize) -> Self {
        Self {
            samples: Vec::with_capacity(steps),
        }
    }

    pub(crate) fn push(&mut self, sample: T) {
        self.samples.push(sample);
    }

    #[must_use]
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.samples.iter()
    }

    /// The samples with time index in `range`.
    ///
    /// The range is truncated to the length of the trace.
    #[must_use]
    pub fn window(&self, range: Range<usize>) -> &[T] {
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);
        &self.samples[start..end]
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }
}

impl<T: Measured> Trace<T> {
    /// Mean output over the steps in `range`, `None` if the window is empty.
    #[must_use]
    pub fn mean_output(&self, range: Range<usize>) -> Option<f64> {
        mean(self.window(range).iter().map(Measured::output))
    }

    /// Smallest and largest output over the whole trace.
    #[must_use]
    pub fn output_bounds(&self) -> Option<(f64, f64)> {
        match self
            .samples
            .iter()
            .map(Measured::output)
            .minmax_by(f64::total_cmp)
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(y) => Some((y, y)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        }
    }
}

impl Trace<ClosedLoopSample> {
    /// Mean absolute tracking error over the steps in `range`.
    #[must_use]
    pub fn mean_abs_error(&self, range: Range<usize>) -> Option<f64> {
        mean(self.window(range).iter().map(|s| s.error.abs()))
    }
}

impl<'a, T> IntoIterator for &'a Trace<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
