//! External stop signal interrupting blocked maneuvers

use crate::{CENTERED, CLEAR, TestHarness, single_route};
use linetrace_io::mock::{ActuatorCall, MockActuator, ScriptedSensor};
use linetrace_nav::{CancelToken, NavError, RouteController, SystemClock, TurnAction};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn cancelled_token_stops_before_the_next_tick() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CENTERED);
    h.tick().unwrap();

    h.token.cancel();
    assert!(matches!(h.tick(), Err(NavError::Cancelled)));
    assert_eq!(h.motors.last_call(), Some(ActuatorCall::Stop));
}

#[test]
fn cancel_interrupts_a_blocked_turn() {
    let mut config = single_route(&[TurnAction::Left, TurnAction::Stop]);
    config.turn.timeout_ms = 30_000;

    let sensor = ScriptedSensor::from_bits(CLEAR);
    sensor.push_bits([1, 1, 0, 0, 0], 1);
    let motors = MockActuator::new();
    let token = CancelToken::new();
    let mut controller = RouteController::new(
        &config,
        sensor,
        motors.clone(),
        SystemClock::new(),
        token.clone(),
    )
    .unwrap();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(800));
        token.cancel();
    });

    let start = Instant::now();
    let result = controller.tick();
    canceller.join().unwrap();

    assert!(matches!(result, Err(NavError::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(motors.last_call(), Some(ActuatorCall::Stop));
    assert_eq!(controller.step_index(), 0);
}

#[test]
fn cancel_interrupts_the_run_loop_between_ticks() {
    let config = single_route(&[TurnAction::Stop]);
    let motors = MockActuator::new();
    let token = CancelToken::new();
    let mut controller = RouteController::new(
        &config,
        ScriptedSensor::from_bits(CENTERED),
        motors.clone(),
        SystemClock::new(),
        token.clone(),
    )
    .unwrap();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        token.cancel();
    });

    let result = controller.run(config.tick_period());
    canceller.join().unwrap();

    assert!(matches!(result, Err(NavError::Cancelled)));
    assert_eq!(motors.last_call(), Some(ActuatorCall::Stop));
}
