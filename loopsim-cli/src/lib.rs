// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Run feedback control experiments from the command line.
//!
//! The [configuration](crate::config) selects one of the
//! [experiments](crate::experiments) and the parameters of the controller
//! and process. The resulting trace is written as comma-separated rows.
//!
//! # Examples
//!
//! Regulate the stochastic buffer with a PI controller:
//! ```bash
//! $ cargo run --bin loopsim -- --experiment closed-loop --seed 1 --kp 1.25 --ki 0.01
//! ```
//!
//! Sweep the gain of an integral controller for the cache hit rate:
//! ```bash
//! $ cargo run --bin loopsim -- --experiment cache --gains 10,50,175 --output cache.csv
//! ```

pub mod config;
pub mod experiments;
