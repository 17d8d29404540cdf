// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use loopsim_engine::random::{RandomSource, RngMode, SimRng};
use loopsim_engine::test_helpers::ScriptedRng;
use loopsim_engine::traits::Process;
use loopsim_models::buffer::Buffer;

const MAX_WIP: u64 = 50;
const MAX_FLOW: u64 = 10;

#[test]
fn scripted_steps() {
    let mut buffer = Buffer::with_rng(MAX_WIP, MAX_FLOW, ScriptedRng::constant(0.5)).unwrap();

    // Admit 20, transfer 10 of them, release 5
    assert_eq!(buffer.step(20.0), 5);
    assert_eq!(buffer.wip(), 10);

    // Admit 20 to give 30, transfer 15, release 5
    assert_eq!(buffer.step(20.0), 15);
    assert_eq!(buffer.wip(), 15);

    assert_eq!(buffer.num_admitted(), 40);
    assert_eq!(buffer.num_released(), 10);
    assert_eq!(buffer.last_admitted(), 20);

    // One transfer and one release draw per step
    assert_eq!(buffer.rng().num_drawn(), 4);
}

#[test]
fn draws_round_ties_to_even() {
    let mut buffer = Buffer::with_rng(MAX_WIP, MAX_FLOW, ScriptedRng::constant(0.25)).unwrap();

    // Transfer of 2.5 and release of 2.5 both round down to 2
    assert_eq!(buffer.step(10.0), 0);
    assert_eq!(buffer.wip(), 8);
    assert_eq!(buffer.num_released(), 2);

    // Transfer of 2.0 exactly
    assert_eq!(buffer.step(0.0), 0);
    assert_eq!(buffer.wip(), 6);
}

#[test]
fn release_limited_by_backlog() {
    let mut buffer = Buffer::with_rng(MAX_WIP, MAX_FLOW, ScriptedRng::new(vec![0.1, 0.9])).unwrap();

    // Transfer 1, release could be 9 but only 1 is queued
    assert_eq!(buffer.step(10.0), 0);
    assert_eq!(buffer.wip(), 9);
    assert_eq!(buffer.num_released(), 1);
}

#[test]
fn admission_clamped_per_step() {
    let mut buffer = Buffer::with_rng(MAX_WIP, MAX_FLOW, ScriptedRng::constant(0.0)).unwrap();

    buffer.step(1000.0);
    assert_eq!(buffer.last_admitted(), MAX_WIP);
    buffer.step(-1000.0);
    assert_eq!(buffer.last_admitted(), 0);
    buffer.step(f64::NAN);
    assert_eq!(buffer.last_admitted(), 0);

    // Nothing is ever transferred with a zero draw
    assert_eq!(buffer.wip(), MAX_WIP);
    assert_eq!(buffer.queued(), 0);
}

#[test]
fn units_are_conserved() {
    for seed in 0..20 {
        let mut buffer = Buffer::new(MAX_WIP, MAX_FLOW, Some(seed)).unwrap();
        let mut inputs = SimRng::seeded(seed + 1000);

        for _ in 0..500 {
            let input = inputs.uniform(-100.0, 200.0);
            let queued = buffer.step(input);

            assert_eq!(queued, buffer.queued());
            assert!(buffer.last_admitted() <= MAX_WIP);
            assert_eq!(
                buffer.num_admitted(),
                buffer.wip() + buffer.queued() + buffer.num_released()
            );
        }
    }
}

#[test]
fn zero_input_drains() {
    let mut buffer = Buffer::new(MAX_WIP, MAX_FLOW, Some(0x123)).unwrap();
    for _ in 0..20 {
        buffer.step(MAX_WIP as f64);
    }
    assert!(buffer.wip() + buffer.queued() > 0);

    let mut previous = buffer.wip() + buffer.queued();
    for _ in 0..1000 {
        buffer.step(0.0);
        let held = buffer.wip() + buffer.queued();
        assert!(held <= previous);
        previous = held;
    }
    assert_eq!(buffer.wip(), 0);
    assert_eq!(buffer.queued(), 0);
}

#[test]
fn process_output_is_queue_length() {
    let mut buffer = Buffer::with_rng(MAX_WIP, MAX_FLOW, ScriptedRng::constant(0.5)).unwrap();
    let output = Process::step(&mut buffer, 20.0);
    assert_eq!(output, 5.0);
}

#[test]
fn rng_modes() {
    assert_eq!(
        Buffer::new(MAX_WIP, MAX_FLOW, Some(3)).unwrap().rng_mode(),
        RngMode::Seeded(3)
    );
    assert_eq!(
        Buffer::new(MAX_WIP, MAX_FLOW, None).unwrap().rng_mode(),
        RngMode::Entropy
    );
    let scripted = Buffer::with_rng(MAX_WIP, MAX_FLOW, ScriptedRng::constant(0.5)).unwrap();
    assert_eq!(scripted.rng_mode(), RngMode::Scripted);
}

#[test]
fn boxed_source() {
    let rng: Box<dyn RandomSource> = Box::new(ScriptedRng::constant(0.5));
    let mut buffer = Buffer::with_rng(MAX_WIP, MAX_FLOW, rng).unwrap();
    assert_eq!(buffer.step(20.0), 5);
    assert_eq!(buffer.rng_mode(), RngMode::Scripted);
}

#[test]
fn reset_empties_buffer() {
    let mut buffer = Buffer::new(MAX_WIP, MAX_FLOW, Some(9)).unwrap();
    for _ in 0..10 {
        buffer.step(30.0);
    }
    buffer.reset();
    assert_eq!(buffer.wip(), 0);
    assert_eq!(buffer.queued(), 0);
    assert_eq!(buffer.num_admitted(), 0);
    assert_eq!(buffer.num_released(), 0);
    assert_eq!(buffer.max_wip(), MAX_WIP);
    assert_eq!(buffer.max_flow(), MAX_FLOW);
}

#[test]
fn invalid_capacities() {
    assert!(Buffer::new(0, MAX_FLOW, Some(1)).is_err());
    assert!(Buffer::new(MAX_WIP, 0, Some(1)).is_err());
}
