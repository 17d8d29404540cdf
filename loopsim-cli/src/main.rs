// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Run a feedback control experiment and write its trace.
//!
//! For latest usage run:
//! ```bash
//! cargo run --bin loopsim -- --help
//! ```
//!
//! See `lib.rs` for details.

use log::{debug, info};
use loopsim_cli::config::Config;
use loopsim_cli::experiments::{run_experiment, write_report};
use loopsim_engine::types::SimError;
use loopsim_track::{TraceWriter, create_writer, setup_logging};

fn io_error(e: std::io::Error) -> SimError {
    SimError(e.to_string())
}

fn main() -> Result<(), SimError> {
    let config = Config::parse_all_sources()?;
    let settings = config.settings()?;

    setup_logging(settings.log_level, &settings.log_file).map_err(io_error)?;
    debug!("settings: {settings:#?}");
    info!(
        "running {:?} for {} steps",
        settings.experiment, settings.steps
    );

    let report = run_experiment(&settings)?;

    let mut writer = TraceWriter::new(create_writer(&settings.output).map_err(io_error)?);
    write_report(&report, &mut writer).map_err(io_error)?;
    Ok(())
}
