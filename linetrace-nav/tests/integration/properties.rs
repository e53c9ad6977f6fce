//! Properties that must hold for every input, checked over exhaustive or
//! swept input sets.

use crate::{CENTERED, TestHarness, single_route};
use linetrace_io::mock::readings_from_bits;
use linetrace_io::{CHANNEL_COUNT, UNAVAILABLE};
use linetrace_nav::{DriveCommand, Pattern, Status, TurnAction, is_junction};

const THRESHOLD: f32 = 0.5;

/// Raw values around and on the threshold
const SWEEP: [f32; 7] = [0.0, 0.2, 0.49, 0.5, 0.51, 0.8, 1.0];

#[test]
fn binarization_has_no_cross_channel_coupling() {
    for channel in 0..CHANNEL_COUNT {
        for &value in &SWEEP {
            for &background in &SWEEP {
                let mut raw = [Some(background); CHANNEL_COUNT];
                raw[channel] = Some(value);
                let bits = Pattern::from_readings(&raw, THRESHOLD).bits();

                for (i, bit) in bits.iter().enumerate() {
                    let reading = if i == channel { value } else { background };
                    assert_eq!(*bit == 1, reading < THRESHOLD, "channel {} of {:?}", i, raw);
                }
            }
        }
    }
}

#[test]
fn unavailable_channels_read_as_background() {
    let mut raw = UNAVAILABLE;
    raw[2] = Some(0.1);
    assert_eq!(Pattern::from_readings(&raw, THRESHOLD).bits(), CENTERED);

    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CENTERED);
    h.sensor.push(UNAVAILABLE);
    h.sensor.push(raw);
    assert_eq!(h.tick().unwrap(), Status::Following);
    assert_eq!(h.tick().unwrap(), Status::Following);
    assert_eq!(h.controller.last_command(), Some(DriveCommand::STRAIGHT));
}

#[test]
fn centered_patterns_drive_straight_with_equal_scales() {
    for bits in [
        [0, 0, 1, 0, 0],
        [0, 1, 1, 0, 0],
        [0, 0, 1, 1, 0],
        [0, 1, 1, 1, 0],
        [0, 1, 0, 1, 0],
    ] {
        let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), bits);
        for _ in 0..5 {
            h.tick().unwrap();
            let (left, right) = h.last_set().expect("drive command");
            assert_eq!(left, right, "{:?}", bits);
            assert!(left > 0.0);
        }
        assert_eq!(h.step(), 0);
    }
}

#[test]
fn junction_predicate_over_all_patterns() {
    for n in 0u8..32 {
        let bits = [4, 3, 2, 1, 0].map(|shift| (n >> shift) & 1);
        let [l1, l2, m, r2, r1] = bits.map(|b| b == 1);
        let expected = (l1 && (l2 || m)) || (r1 && (r2 || m)) || (l1 && r1);
        assert_eq!(is_junction(Pattern::from_bits(bits)), expected, "{:?}", bits);
    }
    assert!(!is_junction(Pattern::from_bits([0, 1, 0, 1, 0])));
}

#[test]
fn symmetric_inner_pattern_never_consumes_a_step() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Left]), [0, 1, 0, 1, 0]);
    for _ in 0..20 {
        h.tick().unwrap();
    }
    assert_eq!(h.step(), 0);
    assert!(h.pivots().is_empty());
}

#[test]
fn stable_input_converges_to_fixed_command() {
    for bits in [[0, 1, 0, 0, 0], [0, 0, 0, 1, 0], [1, 0, 0, 0, 0], [0, 0, 0, 0, 1]] {
        let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), bits);
        let commands: Vec<_> = (0..30)
            .map(|_| {
                h.tick().unwrap();
                h.controller.last_command().expect("command")
            })
            .collect();

        let settled = commands[29];
        assert!(
            commands[15..].iter().all(|c| *c == settled),
            "{:?} oscillates: {:?}",
            bits,
            &commands[15..]
        );
        assert!((0.0..=1.0).contains(&settled.left));
        assert!((0.0..=1.0).contains(&settled.right));
    }
}

#[test]
fn scripted_frames_are_read_whole() {
    let mut h = TestHarness::new(&single_route(&[TurnAction::Stop]), CENTERED);
    h.sensor.push(readings_from_bits([0, 1, 0, 0, 0]));
    h.tick().unwrap();
    let (left, right) = h.last_set().expect("drive command");
    assert!(left < right);
}
