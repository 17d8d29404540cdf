// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Sources of randomness for stochastic processes.
//!
//! Processes never reach for a global generator, they are given a
//! [`RandomSource`] when they are created. The source reports through
//! [`RandomSource::mode`] whether its sequence is reproducible.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How a [`RandomSource`] was initialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RngMode {
    /// Explicitly seeded, runs with the same seed are identical.
    Seeded(u64),

    /// Seeded from operating system entropy, every run is different.
    Entropy,

    /// Replaying a fixed list of values (used by tests).
    Scripted,
}

impl fmt::Display for RngMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RngMode::Seeded(seed) => write!(f, "seeded({seed})"),
            RngMode::Entropy => write!(f, "entropy"),
            RngMode::Scripted => write!(f, "scripted"),
        }
    }
}

/// A generator of uniformly distributed reals.
pub trait RandomSource {
    /// Return the next value in the range `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Report how this source was initialised.
    fn mode(&self) -> RngMode;

    /// Return a value drawn uniformly from `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }
}

/// The default [`RandomSource`], backed by a [`StdRng`].
pub struct SimRng {
    rng: StdRng,
    mode: RngMode,
}

impl SimRng {
    /// Create a generator whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mode: RngMode::Seeded(seed),
        }
    }

    /// Create a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            mode: RngMode::Entropy,
        }
    }

    /// Seeded when a seed is given, otherwise from entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn mode(&self) -> RngMode {
        self.mode
    }
}

impl<R> RandomSource for Box<R>
where
    R: RandomSource + ?Sized,
{
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn mode(&self) -> RngMode {
        (**self).mode()
    }
}
