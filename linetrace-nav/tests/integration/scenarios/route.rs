//! Route progression through junctions

use crate::{CENTERED, CLEAR, CROSS, TestHarness, single_route};
use linetrace_io::mock::ActuatorCall;
use linetrace_nav::{DriveCommand, Route, Status, TimeoutPolicy, TurnAction};
use std::time::Duration;

#[test]
fn left_turn_spins_until_centered_then_drives_straight() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Left, TurnAction::Stop]), CENTERED);
    h.queue(CENTERED, 1)
        .queue([1, 1, 0, 0, 0], 1)
        .queue(CLEAR, 2)
        .queue(CENTERED, 1);

    h.tick().unwrap();
    assert_eq!(h.step(), 0);

    h.tick().unwrap();
    assert_eq!(h.step(), 1);
    assert_eq!(h.pivots(), vec![false]);
    assert_eq!(h.motors.last_call(), Some(ActuatorCall::Stop));

    assert_eq!(h.tick().unwrap(), Status::Following);
    assert_eq!(h.controller.last_command(), Some(DriveCommand::STRAIGHT));
    assert_eq!(h.last_set(), Some((0.4, 0.4)));
}

#[test]
fn step_index_is_monotone_through_success_and_timeout() {
    let mut config = single_route(&[
        TurnAction::Left,
        TurnAction::Right,
        TurnAction::Straight,
        TurnAction::Stop,
    ]);
    config.turn.timeout_ms = 200;

    let mut h = TestHarness::new(&config, CENTERED);
    h.queue(CENTERED, 2)
        .queue([1, 1, 0, 0, 0], 1)
        .queue(CENTERED, 1)
        .queue(CENTERED, 45)
        .queue([0, 0, 0, 1, 1], 1)
        .queue(CLEAR, 11)
        .queue(CENTERED, 45)
        .queue(CROSS, 1)
        .queue(CENTERED, 10)
        .queue(CROSS, 1);

    let mut steps = vec![h.step()];
    for _ in 0..200 {
        let status = h.tick().unwrap();
        steps.push(h.step());
        if status.is_terminal() {
            break;
        }
    }

    assert_eq!(h.controller.status(), Status::RouteDone);
    assert_eq!(*steps.last().unwrap(), 4);
    for pair in steps.windows(2) {
        assert!(pair[1] == pair[0] || pair[1] == pair[0] + 1, "{:?}", pair);
    }
    assert_eq!(steps.windows(2).filter(|p| p[1] > p[0]).count(), 4);
    // left aligned, right timed out with a single attempt
    assert_eq!(h.pivots(), vec![false, true]);
}

#[test]
fn final_stop_makes_route_done_terminal() {
    let mut h = TestHarness::new(
        &single_route(&[TurnAction::Straight, TurnAction::Stop]),
        CENTERED,
    );
    h.queue(CENTERED, 1)
        .queue(CROSS, 1)
        .queue(CENTERED, 10)
        .queue(CROSS, 1);

    let ticks = h
        .tick_until(50, |h| h.controller.status().is_terminal())
        .unwrap();
    assert!(ticks < 50);
    assert_eq!(h.controller.status(), Status::RouteDone);
    assert_eq!(h.step(), 2);
    assert_eq!(h.motors.last_call(), Some(ActuatorCall::Stop));
    assert!(h.motors.stop_count() >= 2);

    let calls = h.motors.calls().len();
    let reads = h.sensor.reads();
    for _ in 0..10 {
        assert_eq!(h.tick().unwrap(), Status::RouteDone);
    }
    assert_eq!(h.motors.calls().len(), calls);
    assert_eq!(h.sensor.reads(), reads);
}

#[test]
fn stop_in_the_middle_ends_the_route() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop, TurnAction::Left]), CROSS);

    h.tick().unwrap();
    assert_eq!(h.step(), 1);
    assert_eq!(h.tick().unwrap(), Status::RouteDone);
    assert!(h.pivots().is_empty());
}

#[test]
fn route_without_stop_finishes_without_extra_commands() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Straight]), CENTERED);
    h.queue(CROSS, 1);

    h.tick().unwrap();
    let calls = h.motors.calls().len();
    assert_eq!(h.tick().unwrap(), Status::RouteDone);
    assert_eq!(h.motors.calls().len(), calls);
    assert_eq!(h.motors.stop_count(), 0);
}

#[test]
fn route_sequence_dwells_at_destination() {
    let mut config = single_route(&[TurnAction::Stop]);
    config.routes.insert(
        "second".into(),
        Route {
            plan: vec![TurnAction::Right, TurnAction::Stop],
            destination: "Second".into(),
        },
    );
    config.route_sequence = vec!["test".into(), "second".into()];

    let mut h = TestHarness::new(&config, CENTERED);
    h.queue(CROSS, 1);

    h.tick().unwrap();
    assert_eq!(h.controller.route_index(), 0);
    let before_dwell = h.now();

    assert_eq!(h.tick().unwrap(), Status::Following);
    assert_eq!(h.controller.route_index(), 1);
    assert_eq!(h.step(), 0);
    assert!(h.now() - before_dwell >= Duration::from_millis(5000));

    h.queue([0, 0, 1, 1, 1], 1).queue(CENTERED, 1);
    h.tick().unwrap();
    assert_eq!(h.step(), 1);
    assert_eq!(h.pivots(), vec![true]);
}

#[test]
fn retry_policy_pivots_again_but_advances_once() {
    let mut config = single_route(&[TurnAction::Left, TurnAction::Stop]);
    config.turn.timeout_policy = TimeoutPolicy::Retry;
    config.turn.max_retries = 1;

    let mut h = TestHarness::new(&config, CLEAR);
    h.queue([1, 1, 1, 0, 0], 1);

    h.tick().unwrap();
    assert_eq!(h.step(), 1);
    assert_eq!(h.pivots(), vec![false, false]);
    assert_eq!(h.motors.last_call(), Some(ActuatorCall::Stop));
}

#[test]
fn inverted_turns_pivot_the_other_way() {
    let mut config = single_route(&[TurnAction::Left, TurnAction::Stop]);
    config.turn.invert_turns = true;

    let mut h = TestHarness::new(&config, CENTERED);
    h.queue([1, 1, 0, 0, 0], 1).queue(CENTERED, 1);

    h.tick().unwrap();
    assert_eq!(h.step(), 1);
    assert_eq!(h.pivots(), vec![true]);
}
