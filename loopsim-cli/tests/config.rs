// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::env;
use std::fs;

use loopsim_cli::config::{Config, Experiment};
use serial_test::serial;

/// Environment variables any of these tests may set.
const ENV_VARS: [&str; 4] = ["LOOPSIM_KP", "LOOPSIM_STEPS", "LOOPSIM_EXPERIMENT", "LOOPSIM_CONF_FILE"];

fn clear_env() {
    for var in ENV_VARS {
        // SAFETY: all tests that touch the environment run serially.
        unsafe { env::remove_var(var) };
    }
}

fn set_env(var: &str, value: &str) {
    // SAFETY: all tests that touch the environment run serially.
    unsafe { env::set_var(var, value) };
}

#[test]
#[serial]
fn defaults() {
    clear_env();
    let config = Config::parse_all_sources_from(["loopsim"]).unwrap();
    assert_eq!(config, Config::default());

    let settings = config.settings().unwrap();
    assert_eq!(settings.experiment, Experiment::ClosedLoop);
    assert_eq!(settings.steps, 1000);
    assert_eq!(settings.controller.kp, 1.25);
    assert_eq!(settings.controller.ki, 0.01);
    assert_eq!(settings.controller.dt, None);
    assert_eq!(settings.max_wip, 50);
    assert_eq!(settings.max_flow, 10);
    assert_eq!(settings.seed, None);
    assert_eq!(settings.setpoint.to_string(), "0:0,100:50,300:10");
    assert_eq!(settings.log_level, log::Level::Warn);
}

#[test]
#[serial]
fn experiment_defaults() {
    clear_env();
    let config = Config::parse_all_sources_from(["loopsim", "--experiment", "cache"]).unwrap();
    let settings = config.settings().unwrap();
    assert_eq!(settings.steps, 20);
    assert_eq!(settings.setpoint.to_string(), "0:0.6");
    assert_eq!(settings.gains, vec![10.0, 50.0, 175.0]);

    assert_eq!(settings.controller.ki, 0.01);

    let config = Config::parse_all_sources_from(["loopsim", "--experiment", "direct"]).unwrap();
    let settings = config.settings().unwrap();
    assert_eq!(settings.steps, 200);
    assert_eq!(settings.controller.ki, 0.0);

    // An explicit integral gain still applies
    let config =
        Config::parse_all_sources_from(["loopsim", "--experiment", "direct", "--ki", "0.1"])
            .unwrap();
    assert_eq!(config.settings().unwrap().controller.ki, 0.1);
}

#[test]
#[serial]
fn command_line_options() {
    clear_env();
    let config = Config::parse_all_sources_from([
        "loopsim",
        "--kp",
        "-0.5",
        "--dt",
        "0.1",
        "--seed",
        "17",
        "--gains",
        "1,2,3",
        "--setpoint",
        "0:5,10:7",
    ])
    .unwrap();

    let settings = config.settings().unwrap();
    assert_eq!(settings.controller.kp, -0.5);
    assert_eq!(settings.controller.dt, Some(0.1));
    assert_eq!(settings.seed, Some(17));
    assert_eq!(settings.gains, vec![1.0, 2.0, 3.0]);
    assert_eq!(settings.setpoint.levels(), &[(0, 5.0), (10, 7.0)]);
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    set_env("LOOPSIM_KP", "0.75");
    set_env("LOOPSIM_EXPERIMENT", "open-loop");
    let config = Config::parse_all_sources_from(["loopsim"]);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.kp, Some(0.75));
    assert_eq!(config.experiment, Some(Experiment::OpenLoop));
}

#[test]
#[serial]
fn priority_of_sources() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let conf_file = dir.path().join("loopsim.toml");
    fs::write(&conf_file, "kp = 2.0\nki = 0.5\nsteps = 30\nmax_wip = 7\n").unwrap();

    // File beats defaults, environment beats file, command line beats both
    set_env("LOOPSIM_STEPS", "40");
    let config = Config::parse_all_sources_from([
        "loopsim",
        "--conf-file",
        conf_file.to_str().unwrap(),
        "--ki",
        "0.25",
    ]);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.kp, Some(2.0));
    assert_eq!(config.ki, Some(0.25));
    assert_eq!(config.steps, Some(40));
    assert_eq!(config.max_wip, Some(7));
    assert_eq!(config.max_flow, Some(10));
}

#[test]
#[serial]
fn conf_file_from_environment() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let conf_file = dir.path().join("env.toml");
    fs::write(&conf_file, "experiment = \"direct\"\n").unwrap();

    set_env("LOOPSIM_CONF_FILE", conf_file.to_str().unwrap());
    let config = Config::parse_all_sources_from(["loopsim"]);
    clear_env();

    assert_eq!(config.unwrap().experiment, Some(Experiment::Direct));
}

#[test]
#[serial]
fn conf_file_errors() {
    clear_env();
    let result = Config::parse_all_sources_from(["loopsim", "--conf-file", "no-such-file.toml"]);
    assert!(result.unwrap_err().0.contains("not found"));

    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_str().unwrap();
    let result = Config::parse_all_sources_from(["loopsim", "--conf-file", dir_path]);
    assert!(result.unwrap_err().0.contains("not a file path"));

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "steps = \"many\"\n").unwrap();
    let result = Config::parse_all_sources_from(["loopsim", "--conf-file", bad.to_str().unwrap()]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn invalid_settings() {
    clear_env();
    let invalid = [
        ["loopsim", "--steps", "0"],
        ["loopsim", "--max-wip", "0"],
        ["loopsim", "--max-flow", "0"],
        ["loopsim", "--kp", "NaN"],
        ["loopsim", "--ki", "inf"],
        ["loopsim", "--dt", "0"],
        ["loopsim", "--setpoint", "10:1,5:2"],
        ["loopsim", "--log-level", "loud"],
        ["loopsim", "--gains", "1,NaN"],
    ];
    for args in invalid {
        let config = Config::parse_all_sources_from(args).unwrap();
        assert!(config.settings().is_err(), "{args:?} should be rejected");
    }

    let no_gains = Config {
        experiment: Some(Experiment::Cache),
        gains: Some(Vec::new()),
        ..Config::default()
    };
    let err = no_gains.settings().unwrap_err();
    assert_eq!(err.0, "the cache experiment needs at least one gain");
}

#[test]
#[serial]
fn malformed_options() {
    clear_env();
    assert!(Config::parse_all_sources_from(["loopsim", "--experiment", "nope"]).is_err());
    assert!(Config::parse_all_sources_from(["loopsim", "--steps", "-3"]).is_err());
    assert!(Config::parse_all_sources_from(["loopsim", "--unknown"]).is_err());
}
