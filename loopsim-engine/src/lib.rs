// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The loopsim engine executes discrete-time feedback loops.
//!
//! A loop is made up of a [controller](crate::traits::Controller) and a
//! [process](crate::traits::Process) that are unaware of each other. The
//! [driver](crate::driver) is the only part that knows about the whole loop:
//! on every step it computes the tracking error from a
//! [setpoint](crate::traits::Signal), passes it to the controller, feeds the
//! resulting control action to the process and records a sample in a
//! [`Trace`](crate::trace::Trace).
//!
//! # Example
//!
//! ```rust
//! use loopsim_engine::driver::run_closed_loop;
//! use loopsim_engine::signal::Constant;
//! use loopsim_engine::traits::{Controller, Process};
//!
//! /// Integrate the error
//! struct Integrator(f64);
//!
//! impl Controller for Integrator {
//!     fn step(&mut self, error: f64) -> f64 {
//!         self.0 += error;
//!         0.5 * self.0
//!     }
//!     fn integral(&self) -> f64 {
//!         self.0
//!     }
//!     fn reset(&mut self) {
//!         self.0 = 0.0;
//!     }
//! }
//!
//! /// Output whatever it is given
//! struct Wire;
//!
//! impl Process for Wire {
//!     fn step(&mut self, input: f64) -> f64 {
//!         input
//!     }
//! }
//!
//! let trace = run_closed_loop(&mut Integrator(0.0), &mut Wire, &Constant(1.0), 50).unwrap();
//! assert_eq!(trace.len(), 50);
//! assert!((trace.last().unwrap().output - 1.0).abs() < 1e-6);
//! ```

pub mod driver;
pub mod random;
pub mod signal;
pub mod test_helpers;
pub mod trace;
pub mod traits;
pub mod types;
