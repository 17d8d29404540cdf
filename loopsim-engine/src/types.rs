// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

// Simulation errors

#[macro_export]
/// Build a [SimError] from a message that supports `to_string`
macro_rules! sim_error {
    ($msg:expr) => {
        Err($crate::types::SimError($msg.to_string()))
    };
}

/// The `SimError` is what should be returned in the case of an error
#[derive(Debug, Clone, PartialEq)]
pub struct SimError(pub String);

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for SimError {}

/// The SimResult is the return type for most simulation functions
pub type SimResult = Result<(), SimError>;

/// Ensure that a configuration value is a finite number.
pub fn check_finite(name: &str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        sim_error!(format!("{name} must be finite, got {value}"))
    }
}

/// Ensure that a configuration value is a finite number greater than zero.
pub fn check_positive(name: &str, value: f64) -> Result<f64, SimError> {
    let value = check_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        sim_error!(format!("{name} must be greater than 0, got {value}"))
    }
}

/// Ensure that a count (capacity or number of steps) is non-zero.
pub fn check_non_zero<T>(name: &str, value: T) -> Result<T, SimError>
where
    T: Copy + Default + PartialEq,
{
    if value == T::default() {
        sim_error!(format!("{name} must be greater than 0"))
    } else {
        Ok(value)
    }
}
