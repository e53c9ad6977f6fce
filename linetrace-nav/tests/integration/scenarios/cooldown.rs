//! Junction debouncing while the sensor bar still overlaps a junction

use crate::{TestHarness, single_route};
use linetrace_nav::{Clock, TurnAction};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(50);

/// Junction handling window: (tick start, tick end)
type Event = (Duration, Duration);

/// Tick with a permanently held pattern and record every junction handling
fn junction_events(plan: &[TurnAction], bits: [u8; 5], ticks: usize) -> Vec<Event> {
    let mut config = single_route(plan);
    config.turn.timeout_ms = 200;
    let mut h = TestHarness::new(&config, bits);

    let mut events = Vec::new();
    for _ in 0..ticks {
        let before = h.step();
        let start = h.clock.now();
        let status = h.controller.tick().unwrap();
        let end = h.clock.now();
        if h.step() > before {
            events.push((start, end));
        }
        if status.is_terminal() {
            break;
        }
        h.clock.advance(TICK);
    }
    events
}

#[test]
fn crossing_cooldown_separates_straight_junctions() {
    let plan = [TurnAction::Straight; 6];
    let events = junction_events(&plan, [1, 1, 1, 0, 0], 200);

    assert_eq!(events.len(), 6);
    for pair in events.windows(2) {
        let gap = pair[1].0 - pair[0].1;
        assert!(gap >= Duration::from_millis(300), "gap {:?}", gap);
    }
}

#[test]
fn turn_cooldown_is_longer() {
    let plan = [TurnAction::Left, TurnAction::Left, TurnAction::Left];
    let events = junction_events(&plan, [1, 1, 0, 0, 0], 400);

    assert_eq!(events.len(), 3);
    for pair in events.windows(2) {
        let gap = pair[1].0 - pair[0].1;
        assert!(gap >= Duration::from_millis(2000), "gap {:?}", gap);
        assert!(gap < Duration::from_millis(2100), "gap {:?}", gap);
    }
}

#[test]
fn first_junction_is_not_delayed() {
    let events = junction_events(&[TurnAction::Straight], [1, 1, 1, 1, 1], 5);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Duration::ZERO);
}
