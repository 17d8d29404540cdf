// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A two-stage queue with random throughput at each stage.
//!
//! Units move through the buffer as follows:
//!
//! ```text
//!   input -> [ready pool (wip)] -> [backlog (queued)] -> downstream
//!          admit             transfer               release
//! ```
//!
//! On every step:
//!  1. **Admit**: the input is rounded to the nearest integer, clamped to
//!     `[0, max_wip]` and added to the ready pool.
//!  2. **Transfer**: a value drawn uniformly from `[0, wip]` is rounded and
//!     moved from the ready pool to the backlog.
//!  3. **Release**: a value drawn uniformly from `[0, max_flow]` is rounded,
//!     limited to the size of the backlog, and leaves the buffer.
//!
//! The output is the length of the backlog. The average release per step is
//! `max_flow / 2`.
//!
//! # Rounding
//!
//! All rounding is to the nearest integer with ties to even, and always
//! happens before clamping. A NaN input admits nothing.
//!
//! # Capacity
//!
//! `max_wip` limits how many units are admitted on any one step, it does not
//! limit the size of the ready pool: units that are not transferred stay in
//! the pool and add to the next step's admission. Use
//! [`Buffer::last_admitted`] to observe the per-step limit.

use log::trace;
use loopsim_engine::random::{RandomSource, RngMode, SimRng};
use loopsim_engine::traits::Process;
use loopsim_engine::types::{SimError, check_non_zero};

/// Round to the nearest integer, ties to even.
fn round_to_units(value: f64) -> f64 {
    value.round_ties_even()
}

pub struct Buffer<R = SimRng>
where
    R: RandomSource,
{
    // Configuration
    max_wip: u64,
    max_flow: u64,

    // State
    wip: u64,
    queued: u64,
    rng: R,

    // Statistics
    last_admitted: u64,
    num_admitted: u64,
    num_released: u64,
}

impl Buffer<SimRng> {
    /// Create a buffer using the default generator.
    ///
    /// The generator is seeded from `seed` when one is given, otherwise from
    /// operating system entropy.
    pub fn new(max_wip: u64, max_flow: u64, seed: Option<u64>) -> Result<Self, SimError> {
        Self::with_rng(max_wip, max_flow, SimRng::new(seed))
    }
}

impl<R> Buffer<R>
where
    R: RandomSource,
{
    /// Create a buffer which draws its random transfers from `rng`.
    pub fn with_rng(max_wip: u64, max_flow: u64, rng: R) -> Result<Self, SimError> {
        Ok(Self {
            max_wip: check_non_zero("max_wip", max_wip)?,
            max_flow: check_non_zero("max_flow", max_flow)?,
            wip: 0,
            queued: 0,
            rng,
            last_admitted: 0,
            num_admitted: 0,
            num_released: 0,
        })
    }

    /// Advance the buffer by one step and return the backlog length.
    pub fn step(&mut self, input: f64) -> u64 {
        self.advance(input)
    }

    fn advance(&mut self, input: f64) -> u64 {
        let admitted = self.admit(input);
        self.wip += admitted;

        // Never more than is in the ready pool
        let transferred = self.draw(self.wip).min(self.wip);
        self.wip -= transferred;
        self.queued += transferred;

        let released = self.draw(self.max_flow).min(self.queued);
        self.queued -= released;

        self.last_admitted = admitted;
        self.num_admitted += admitted;
        self.num_released += released;
        trace!(
            "buffer: admit {admitted}, transfer {transferred}, release {released} -> wip {}, queued {}",
            self.wip,
            self.queued
        );

        self.queued
    }

    fn admit(&self, input: f64) -> u64 {
        let units = round_to_units(input);
        if units.is_nan() || units <= 0.0 {
            0
        } else if units >= self.max_wip as f64 {
            self.max_wip
        } else {
            units as u64
        }
    }

    /// A rounded uniform draw from `[0, limit]`.
    fn draw(&mut self, limit: u64) -> u64 {
        let value = round_to_units(self.rng.uniform(0.0, limit as f64));
        value as u64
    }

    /// Size of the ready pool.
    #[must_use]
    pub fn wip(&self) -> u64 {
        self.wip
    }

    /// Length of the backlog, the observable output.
    #[must_use]
    pub fn queued(&self) -> u64 {
        self.queued
    }

    #[must_use]
    pub fn max_wip(&self) -> u64 {
        self.max_wip
    }

    #[must_use]
    pub fn max_flow(&self) -> u64 {
        self.max_flow
    }

    /// Number of units admitted on the most recent step.
    #[must_use]
    pub fn last_admitted(&self) -> u64 {
        self.last_admitted
    }

    /// Total number of units admitted since creation or the last reset.
    #[must_use]
    pub fn num_admitted(&self) -> u64 {
        self.num_admitted
    }

    /// Total number of units released downstream.
    #[must_use]
    pub fn num_released(&self) -> u64 {
        self.num_released
    }

    /// The source of the random transfers and releases.
    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Whether the random draws of this buffer are reproducible.
    #[must_use]
    pub fn rng_mode(&self) -> RngMode {
        self.rng.mode()
    }

    /// Empty both stages and clear the statistics.
    ///
    /// The random generator carries on from where it was.
    pub fn reset(&mut self) {
        self.wip = 0;
        self.queued = 0;
        self.last_admitted = 0;
        self.num_admitted = 0;
        self.num_released = 0;
    }
}

impl<R> Process for Buffer<R>
where
    R: RandomSource,
{
    fn step(&mut self, input: f64) -> f64 {
        self.advance(input) as f64
    }
}
