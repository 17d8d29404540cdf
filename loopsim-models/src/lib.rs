// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Processes that can be driven by a controller.
//!
//! Every model implements [`Process`](loopsim_engine::traits::Process) so it
//! can be placed in either an open or a closed loop.

pub mod buffer;
pub mod pass_through;
pub mod saturating;
