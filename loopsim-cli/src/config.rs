// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Configuration gathered from multiple sources.
//!
//! Values are taken from the following sources, each overriding the ones
//! before it:
//!  1. The defaults defined by [`Config::default`].
//!  2. A TOML configuration file given with `--conf-file` (or the
//!     `LOOPSIM_CONF_FILE` environment variable).
//!  3. Environment variables named after the options with a `LOOPSIM_`
//!     prefix, for example `LOOPSIM_KP=0.5`.
//!  4. Command-line options.
//!
//! A [`Config`] holds what the user asked for. It is turned into validated
//! [`Settings`] before anything is simulated.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use loopsim_engine::sim_error;
use loopsim_engine::signal::StepSchedule;
use loopsim_engine::types::{SimError, SimResult, check_finite, check_non_zero, check_positive};
use loopsim_track::str_to_level;
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables that are read.
pub const ENV_PREFIX: &str = "LOOPSIM_";

/// The experiments that can be run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Experiment {
    /// Constant input into the stochastic buffer, no controller.
    OpenLoop,

    /// Controller regulating the backlog of the stochastic buffer.
    ClosedLoop,

    /// Integral controllers of each gain in `gains` regulating a cache hit
    /// rate.
    Cache,

    /// Controller whose output is fed straight back as the measurement.
    Direct,
}

impl Experiment {
    /// Number of steps used when none is configured.
    #[must_use]
    pub fn default_steps(&self) -> usize {
        match self {
            Experiment::OpenLoop | Experiment::ClosedLoop => 1000,
            Experiment::Cache => 20,
            Experiment::Direct => 200,
        }
    }

    /// Setpoint used when none is configured.
    #[must_use]
    pub fn default_setpoint(&self) -> &'static str {
        match self {
            Experiment::OpenLoop | Experiment::ClosedLoop => "0:0,100:50,300:10",
            Experiment::Cache => "0.6",
            Experiment::Direct => "1",
        }
    }

    /// Integral gain used when none is configured.
    ///
    /// The direct experiment studies a purely proportional loop.
    #[must_use]
    pub fn default_ki(&self) -> f64 {
        match self {
            Experiment::Direct => 0.0,
            _ => 0.01,
        }
    }
}

/// Command-line arguments.
#[derive(Parser, Serialize, Deserialize, Debug, PartialEq)]
#[command(name = "loopsim", about = "Discrete-time feedback control experiments")]
pub struct Config {
    /// The experiment to run [default: closed-loop]
    #[arg(long, value_enum)]
    pub experiment: Option<Experiment>,

    /// Proportional gain [default: 1.25]
    #[arg(long, allow_negative_numbers = true)]
    pub kp: Option<f64>,

    /// Integral gain [default: 0.01, 0 for direct]
    #[arg(long, allow_negative_numbers = true)]
    pub ki: Option<f64>,

    /// Derivative gain, only used when `dt` is set [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub kd: Option<f64>,

    /// Time quantum of a full PID controller.
    ///
    /// When not set a PI controller is used whose integral is the plain sum
    /// of the error.
    #[arg(long)]
    pub dt: Option<f64>,

    /// Most units admitted to the buffer per step [default: 50]
    #[arg(long)]
    pub max_wip: Option<u64>,

    /// Most units released from the buffer per step [default: 10]
    #[arg(long)]
    pub max_flow: Option<u64>,

    /// Number of steps to simulate [default: 1000, 20 for cache, 200 for
    /// direct]
    #[arg(long)]
    pub steps: Option<usize>,

    /// Seed for the random generator.
    ///
    /// When not set the generator is seeded from entropy and every run is
    /// different.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Constant input of the open-loop experiment [default: 5]
    #[arg(long, allow_negative_numbers = true)]
    pub input: Option<f64>,

    /// Setpoint schedule as `start:value` pairs, e.g. `0:0,100:50,300:10`
    /// [default: depends on the experiment]
    #[arg(long)]
    pub setpoint: Option<String>,

    /// Gains of the cache experiment [default: 10,50,175]
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub gains: Option<Vec<f64>>,

    /// File the trace is written to, use '-' for stdout [default: -]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Level of log message to display [default: warn]
    #[arg(long)]
    pub log_level: Option<String>,

    /// File log messages are written to, use '-' for stderr [default: -]
    #[arg(short = 'l', long)]
    pub log_file: Option<String>,

    /// Path to additional configuration file
    ///
    /// This additional configuration file must contain TOML, and set values
    /// for fields of this struct.
    #[arg(long)]
    pub conf_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            experiment: Some(Experiment::ClosedLoop),
            kp: Some(1.25),
            ki: None,
            kd: Some(0.0),
            dt: None,
            max_wip: Some(50),
            max_flow: Some(10),
            steps: None,
            seed: None,
            input: Some(5.0),
            setpoint: None,
            gains: Some(vec![10.0, 50.0, 175.0]),
            output: Some("-".to_string()),
            log_level: Some("warn".to_string()),
            log_file: Some("-".to_string()),
            conf_file: None,
        }
    }
}

/// Overwrite each field of `$config` that is set in `$cli`.
macro_rules! merge_set_fields {
    ($config:expr, $cli:expr ; $($field:ident),+) => {
        $(
            if $cli.$field.is_some() {
                $config.$field = $cli.$field;
            }
        )+
    };
}

impl Config {
    /// Parse the command line of this process and merge in all other sources.
    ///
    /// Exits the process after printing a message for `--help` or for
    /// malformed options.
    pub fn parse_all_sources() -> Result<Self, SimError> {
        Self::merge_sources(Self::parse())
    }

    /// As [`Config::parse_all_sources`] but with explicit arguments, the
    /// first of which is the program name.
    pub fn parse_all_sources_from<I, T>(args: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args).map_err(|e| SimError(e.to_string()))?;
        Self::merge_sources(cli)
    }

    /// Layer the defaults, configuration file and environment underneath the
    /// options given in `cli`.
    pub fn merge_sources(cli: Self) -> Result<Self, SimError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let conf_file = cli
            .conf_file
            .clone()
            .or_else(|| std::env::var_os(format!("{ENV_PREFIX}CONF_FILE")).map(PathBuf::from));
        if let Some(conf_file) = conf_file.filter(|f| !f.as_os_str().is_empty()) {
            if conf_file.is_dir() {
                return sim_error!(format!("{} is not a file path", conf_file.display()));
            }
            if !conf_file.exists() {
                return sim_error!(format!("{} not found", conf_file.display()));
            }
            figment = figment.merge(Toml::file(conf_file));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        let mut config: Self = figment
            .extract()
            .map_err(|e| SimError(format!("invalid configuration: {e}")))?;

        merge_set_fields!(config, cli ;
            experiment, kp, ki, kd, dt, max_wip, max_flow, steps, seed, input, setpoint, gains,
            output, log_level, log_file, conf_file);
        Ok(config)
    }

    /// Validate the configuration.
    pub fn settings(&self) -> Result<Settings, SimError> {
        let experiment = required("experiment", self.experiment)?;

        let controller = ControllerSettings {
            kp: check_finite("kp", required("kp", self.kp)?)?,
            ki: check_finite("ki", self.ki.unwrap_or_else(|| experiment.default_ki()))?,
            kd: check_finite("kd", self.kd.unwrap_or_default())?,
            dt: match self.dt {
                Some(dt) => Some(check_positive("dt", dt)?),
                None => None,
            },
        };

        let steps = check_non_zero(
            "steps",
            self.steps.unwrap_or_else(|| experiment.default_steps()),
        )?;
        let setpoint = self
            .setpoint
            .as_deref()
            .unwrap_or_else(|| experiment.default_setpoint())
            .parse::<StepSchedule>()?;

        let gains = self.gains.clone().unwrap_or_default();
        check_gains(experiment, &gains)?;

        let log_level = self.log_level.as_deref().unwrap_or("warn");
        let log_level = str_to_level(log_level).map_err(|e| SimError(e.to_string()))?;

        Ok(Settings {
            experiment,
            controller,
            max_wip: check_non_zero("max_wip", required("max_wip", self.max_wip)?)?,
            max_flow: check_non_zero("max_flow", required("max_flow", self.max_flow)?)?,
            steps,
            seed: self.seed,
            input: check_finite("input", self.input.unwrap_or_default())?,
            setpoint,
            gains,
            output: self.output.clone().unwrap_or_else(|| "-".to_string()),
            log_level,
            log_file: self.log_file.clone().unwrap_or_else(|| "-".to_string()),
        })
    }
}

fn check_gains(experiment: Experiment, gains: &[f64]) -> SimResult {
    for gain in gains {
        check_finite("gain", *gain)?;
    }
    if experiment == Experiment::Cache && gains.is_empty() {
        return sim_error!("the cache experiment needs at least one gain");
    }
    Ok(())
}

fn required<T>(name: &str, value: Option<T>) -> Result<T, SimError> {
    match value {
        Some(value) => Ok(value),
        None => sim_error!(format!("{name} must be set")),
    }
}

/// Gains and time quantum of the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// `None` selects the PI controller.
    pub dt: Option<f64>,
}

/// A validated configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub experiment: Experiment,
    pub controller: ControllerSettings,
    pub max_wip: u64,
    pub max_flow: u64,
    pub steps: usize,
    pub seed: Option<u64>,
    pub input: f64,
    pub setpoint: StepSchedule,
    pub gains: Vec<f64>,
    pub output: String,
    pub log_level: log::Level,
    pub log_file: String,
}
