// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The experiments that can be selected from the command line.
//!
//! Every run is given freshly constructed controller and process instances,
//! including each gain of the cache sweep.

use log::{info, warn};
use loopsim_components::pi::Pi;
use loopsim_components::pid::Pid;
use loopsim_engine::driver::{run_closed_loop, run_open_loop};
use loopsim_engine::signal::Constant;
use loopsim_engine::trace::{ClosedLoopSample, OpenLoopSample, Trace};
use loopsim_engine::traits::Controller;
use loopsim_engine::types::SimError;
use loopsim_models::buffer::Buffer;
use loopsim_models::pass_through::PassThrough;
use loopsim_models::saturating::StaticProcess;
use loopsim_track::TraceWriter;

use crate::config::{ControllerSettings, Experiment, Settings};

/// The traces produced by an experiment.
#[derive(Debug)]
pub enum Report {
    Open(Trace<OpenLoopSample>),
    Closed(Trace<ClosedLoopSample>),

    /// One trace per gain, in the order the gains were given.
    Sweep(Vec<(f64, Trace<ClosedLoopSample>)>),
}

/// Create the controller described by `settings`.
///
/// A full [`Pid`] is used when a time quantum is configured, otherwise the
/// reduced [`Pi`].
pub fn build_controller(settings: &ControllerSettings) -> Result<Box<dyn Controller>, SimError> {
    match settings.dt {
        Some(dt) => Ok(Box::new(Pid::with_dt(
            settings.kp,
            settings.ki,
            settings.kd,
            dt,
        )?)),
        None => {
            if settings.kd != 0.0 {
                warn!("kd = {} ignored, set dt to use a PID controller", settings.kd);
            }
            Ok(Box::new(Pi::new(settings.kp, settings.ki)?))
        }
    }
}

/// Run the experiment selected in `settings`.
pub fn run_experiment(settings: &Settings) -> Result<Report, SimError> {
    match settings.experiment {
        Experiment::OpenLoop => open_loop(settings).map(Report::Open),
        Experiment::ClosedLoop => closed_loop(settings).map(Report::Closed),
        Experiment::Cache => cache_sweep(settings).map(Report::Sweep),
        Experiment::Direct => direct(settings).map(Report::Closed),
    }
}

fn new_buffer(settings: &Settings) -> Result<Buffer, SimError> {
    let buffer = Buffer::new(settings.max_wip, settings.max_flow, settings.seed)?;
    info!(
        "buffer: max_wip {}, max_flow {}, rng {}",
        settings.max_wip,
        settings.max_flow,
        buffer.rng_mode()
    );
    Ok(buffer)
}

/// Constant input into the buffer.
pub fn open_loop(settings: &Settings) -> Result<Trace<OpenLoopSample>, SimError> {
    let mut buffer = new_buffer(settings)?;
    let trace = run_open_loop(&mut buffer, &Constant(settings.input), settings.steps)?;

    info!(
        "open loop: admitted {}, released {}, final backlog {}",
        buffer.num_admitted(),
        buffer.num_released(),
        buffer.queued()
    );
    Ok(trace)
}

/// The configured controller regulating the buffer backlog.
pub fn closed_loop(settings: &Settings) -> Result<Trace<ClosedLoopSample>, SimError> {
    let mut controller = build_controller(&settings.controller)?;
    let mut buffer = new_buffer(settings)?;
    let trace = run_closed_loop(
        controller.as_mut(),
        &mut buffer,
        &settings.setpoint,
        settings.steps,
    )?;

    info!(
        "closed loop: mean |error| {:.3}, final integral {}",
        trace.mean_abs_error(0..settings.steps).unwrap_or_default(),
        controller.integral()
    );
    Ok(trace)
}

/// An integral controller of each configured gain regulating a cache hit rate.
pub fn cache_sweep(settings: &Settings) -> Result<Vec<(f64, Trace<ClosedLoopSample>)>, SimError> {
    let mut traces = Vec::with_capacity(settings.gains.len());
    for gain in &settings.gains {
        let mut controller = Pi::integral_only(*gain)?;
        let mut cache = StaticProcess::default();
        let trace = run_closed_loop(
            &mut controller,
            &mut cache,
            &settings.setpoint,
            settings.steps,
        )?;

        if let Some(last) = trace.last() {
            info!("cache: gain {gain} final hit rate {:.4}", last.output);
        }
        traces.push((*gain, trace));
    }
    Ok(traces)
}

/// The configured controller with its output fed straight back.
pub fn direct(settings: &Settings) -> Result<Trace<ClosedLoopSample>, SimError> {
    let mut controller = build_controller(&settings.controller)?;
    let trace = run_closed_loop(
        controller.as_mut(),
        &mut PassThrough,
        &settings.setpoint,
        settings.steps,
    )?;

    if let Some(last) = trace.last() {
        info!("direct: final output {}", last.output);
    }
    Ok(trace)
}

/// Write all traces of `report` to `writer`.
pub fn write_report(report: &Report, writer: &mut TraceWriter) -> std::io::Result<()> {
    match report {
        Report::Open(trace) => writer.write_samples(&[], trace.samples())?,
        Report::Closed(trace) => writer.write_samples(&[], trace.samples())?,
        Report::Sweep(traces) => {
            for (gain, trace) in traces {
                writer.write_samples(&[("gain", *gain)], trace.samples())?;
            }
        }
    }
    writer.flush()
}
