//! Binarized sensor frames and pattern classification
//!
//! A [`SensorFrame`] is one coherent snapshot of the five channels together
//! with its binary [`Pattern`]. Bit order is far-left first.
//!
//! Classification is an ordered decision table. The predicates are disjoint,
//! so the order only documents which rule names each pattern:
//!
//! ```text
//! 1. Centered    no outer bit; center set, or both inner bits set
//! 2. Mild        one inner bit alone                  01000 / 00010
//! 3. Sharp       one outer bit, other outer clear     1xxx0 / 0xxx1
//! 4. Crossing    both outer bits set                  1xxx1
//! 5. Lost        nothing set                          00000
//! ```

use linetrace_io::{CHANNEL_COUNT, Channel, Readings};
use std::fmt;

/// Five-bit line pattern; `true` means that sensor sees the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern([bool; CHANNEL_COUNT]);

/// Line position as seen by the sensor bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternClass {
    Centered,
    MildLeft,
    MildRight,
    SharpLeft,
    SharpRight,
    Crossing,
    Lost,
}

impl Pattern {
    pub const CLEAR: Pattern = Pattern([false; CHANNEL_COUNT]);

    /// Build from `0`/`1` values, far-left first
    pub const fn from_bits(bits: [u8; CHANNEL_COUNT]) -> Self {
        let mut flags = [false; CHANNEL_COUNT];
        let mut i = 0;
        while i < CHANNEL_COUNT {
            flags[i] = bits[i] != 0;
            i += 1;
        }
        Pattern(flags)
    }

    /// Threshold raw readings; a missing channel counts as off-line
    pub fn from_readings(readings: &Readings, threshold: f32) -> Self {
        Pattern(readings.map(|r| matches!(r, Some(v) if v < threshold)))
    }

    pub fn bits(&self) -> [u8; CHANNEL_COUNT] {
        self.0.map(u8::from)
    }

    #[inline]
    pub fn is_set(&self, channel: Channel) -> bool {
        self.0[channel.index()]
    }

    /// No sensor sees the line
    pub fn is_clear(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }

    /// Patterns that end a pivot: line under the center, alone or with
    /// one inner neighbor
    pub fn is_aligned(&self) -> bool {
        matches!(self.bits(), [0, 0, 1, 0, 0] | [0, 1, 1, 0, 0] | [0, 0, 1, 1, 0])
    }

    pub fn classify(&self) -> PatternClass {
        let [far_left, left, center, right, far_right] = self.0;
        let outer = far_left || far_right;

        if !outer && (center || (left && right)) {
            PatternClass::Centered
        } else if !outer && left {
            PatternClass::MildLeft
        } else if !outer && right {
            PatternClass::MildRight
        } else if far_left && !far_right {
            PatternClass::SharpLeft
        } else if far_right && !far_left {
            PatternClass::SharpRight
        } else if far_left && far_right {
            PatternClass::Crossing
        } else {
            PatternClass::Lost
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One coherent sensor reading and its pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFrame {
    pub readings: Readings,
    pub pattern: Pattern,
}

impl SensorFrame {
    pub fn new(readings: Readings, threshold: f32) -> Self {
        Self {
            readings,
            pattern: Pattern::from_readings(&readings, threshold),
        }
    }
}
