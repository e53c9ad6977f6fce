//! Grace period and recovery search after the line disappears

use crate::{CENTERED, CLEAR, TestHarness, single_route};
use linetrace_io::mock::ActuatorCall;
use linetrace_nav::{LastDirection, Status, TurnAction};
use std::time::Duration;

#[test]
fn search_pivots_last_side_first_then_stops() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CLEAR);
    h.queue([0, 0, 0, 1, 0], 1).queue(CLEAR, 1);

    h.tick().unwrap();
    assert_eq!(h.controller.last_direction(), LastDirection::Right);

    let ticks = h
        .tick_until(20, |h| h.controller.status().is_terminal())
        .unwrap();
    assert!(ticks < 20);
    assert_eq!(h.controller.status(), Status::LineLost);

    // right first, then left
    assert_eq!(h.pivots(), vec![true, false]);
    assert_eq!(h.motors.last_call(), Some(ActuatorCall::Stop));

    let calls = h.motors.calls().len();
    assert_eq!(h.tick().unwrap(), Status::LineLost);
    assert_eq!(h.motors.calls().len(), calls);
}

#[test]
fn grace_period_creeps_before_searching() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CLEAR);
    h.queue([0, 1, 0, 0, 0], 1).queue(CLEAR, 1);

    h.tick().unwrap();
    let lost_at = h.now();

    // Still inside the grace period: creeping, no pivots yet
    for _ in 0..5 {
        h.tick().unwrap();
    }
    assert!(h.now() - lost_at < Duration::from_millis(300) + Duration::from_millis(50));
    assert!(h.pivots().is_empty());
    let (left, right) = h.last_set().expect("creep command");
    assert!(left < right, "creep should favour the left side");

    h.tick().unwrap();
    h.tick().unwrap();
    assert!(!h.pivots().is_empty());
    assert_eq!(h.pivots()[0], false);
}

#[test]
fn search_reacquires_and_resumes_following() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CLEAR);
    h.queue([0, 0, 0, 1, 0], 1).queue(CLEAR, 7).queue(CENTERED, 1);

    let ticks = h
        .tick_until(10, |h| !h.pivots().is_empty())
        .unwrap();
    assert!(ticks < 10);
    assert_eq!(h.controller.status(), Status::Following);
    assert_eq!(h.pivots(), vec![true]);

    h.tick().unwrap();
    assert_eq!(h.controller.status(), Status::Following);
    assert_eq!(h.step(), 0);
}

#[test]
fn brief_dropout_does_not_trigger_search() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CENTERED);
    for _ in 0..10 {
        h.queue(CENTERED, 2).queue(CLEAR, 3);
    }

    for _ in 0..50 {
        h.tick().unwrap();
    }
    assert!(h.pivots().is_empty());
    assert_eq!(h.controller.status(), Status::Following);
}
