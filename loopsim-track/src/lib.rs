// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This module provides combined _track_ capabilities for the loopsim project.
//!
//! _Track_ means the combination of _log_ and _trace_ where:
//!
//!   - _log_ are text-based human-readable messages emitted at various levels
//!     of verbosity (from `Trace` through to `Error`) using the
//!     [log](https://docs.rs/log) crate.
//!   - _trace_ is the ordered sequence of samples recorded by a simulation
//!     run, written out as comma-separated rows by a [`TraceWriter`].

// Enable warnings for missing documentation
#![warn(missing_docs)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;

pub use log;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

pub mod writer;
pub use writer::{Columns, TraceWriter};

/// A type alias for objects that receive _log_ / _trace_ output.
///
/// The writer must implement Send in order to be shared between threads.
pub type Writer = Box<dyn Write + Send>;

/// The filename used to select the standard streams instead of a file.
pub const STDIO: &str = "-";

/// Take the command-line string and convert it to a Level
pub fn str_to_level(lvl: &str) -> std::io::Result<log::Level> {
    log::Level::from_str(lvl).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unable to parse level string '{lvl}'"),
        )
    })
}

/// Open the destination for output.
///
/// A `file` of `-` selects `stdout`, anything else is created (or truncated)
/// as a file.
pub fn create_writer(file: &str) -> std::io::Result<Writer> {
    if file == STDIO {
        Ok(Box::new(std::io::stdout()))
    } else {
        let f = File::create(file)?;
        Ok(Box::new(BufWriter::new(f)))
    }
}

/// Install the global logger.
///
/// Messages go to `stderr` when `log_file` is `-` so that they never mix with
/// trace rows written to `stdout`.
pub fn setup_logging(level: log::Level, log_file: &str) -> std::io::Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    let filter = level.to_level_filter();

    let result = if log_file == STDIO {
        TermLogger::init(filter, config, TerminalMode::Stderr, ColorChoice::Auto)
    } else {
        WriteLogger::init(filter, config, File::create(log_file)?)
    };
    result.map_err(std::io::Error::other)
}
