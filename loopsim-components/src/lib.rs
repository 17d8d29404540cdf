// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Controllers that turn a tracking error into a control action.
//!
//! Two variants are provided:
//!  - [`Pid`](crate::pid::Pid): the full three-term controller, integrating
//!    and differentiating over a fixed time quantum `dt`.
//!  - [`Pi`](crate::pi::Pi): a reduced controller with no derivative term
//!    whose integral is a plain running sum of the error.
//!
//! Neither limits the integral term. Under sustained error it grows without
//! bound and this is visible through
//! [`Controller::integral`](loopsim_engine::traits::Controller::integral).

pub mod pi;
pub mod pid;
