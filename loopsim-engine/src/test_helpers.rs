// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Helpers for writing deterministic tests of stochastic models.

use crate::random::{RandomSource, RngMode};

/// A [`RandomSource`] that replays a fixed list of unit values.
///
/// The list is repeated once it has been exhausted. Values are clamped to
/// `[0, 1]` when they are returned.
pub struct ScriptedRng {
    units: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    /// Create a source that cycles through `units`.
    ///
    /// # Panics
    ///
    /// Panics if `units` is empty.
    #[must_use]
    pub fn new(units: Vec<f64>) -> Self {
        assert!(!units.is_empty(), "ScriptedRng needs at least one value");
        Self { units, next: 0 }
    }

    /// A source that always returns the same value.
    #[must_use]
    pub fn constant(unit: f64) -> Self {
        Self::new(vec![unit])
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn num_drawn(&self) -> usize {
        self.next
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let unit = self.units[self.next % self.units.len()];
        self.next += 1;
        unit.clamp(0.0, 1.0)
    }

    fn mode(&self) -> RngMode {
        RngMode::Scripted
    }
}
