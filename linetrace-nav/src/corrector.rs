//! Line-centering correction
//!
//! Maps a pattern to wheel scales relative to base speed. The near wheel is
//! throttled toward the line, the far wheel keeps (or boosts) its speed:
//!
//! | Class       | Left           | Right          |
//! |-------------|----------------|----------------|
//! | Centered    | 1.0            | 1.0            |
//! | MildLeft    | `smooth_turn`  | 1.0            |
//! | MildRight   | 1.0            | `smooth_turn`  |
//! | SharpLeft   | `sharp_turn`   | `sharp_boost`  |
//! | SharpRight  | `sharp_boost`  | `sharp_turn`   |
//! | Crossing    | 1.0            | 1.0            |
//! | Lost        | creep toward the last known side |
//!
//! Output is always clamped to `[0, 1]`.

use crate::config::CorrectionConfig;
use crate::drive::DriveCommand;
use crate::frame::{Pattern, PatternClass};

/// Side the line was last seen on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastDirection {
    #[default]
    Unknown,
    Straight,
    Left,
    Right,
}

/// One correction decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub class: PatternClass,
    pub command: DriveCommand,
    pub direction: LastDirection,
}

pub struct LineCorrector {
    config: CorrectionConfig,
    search_scale: f32,
    boost_remaining: u32,
}

impl LineCorrector {
    /// `search_scale` sets the creep speed while the line is missing
    pub fn new(config: CorrectionConfig, search_scale: f32) -> Self {
        let boost_remaining = config.startup_boost_ticks;
        Self {
            config,
            search_scale,
            boost_remaining,
        }
    }

    /// Boost the next corrections after a junction
    pub fn start_boost(&mut self) {
        self.boost_remaining = self.config.boost_ticks;
    }

    pub fn boost_remaining(&self) -> u32 {
        self.boost_remaining
    }

    pub fn correct(&mut self, pattern: Pattern, last: LastDirection) -> Correction {
        let c = &self.config;
        let class = pattern.classify();

        let (command, direction) = match class {
            PatternClass::Centered | PatternClass::Crossing => {
                (DriveCommand::STRAIGHT, LastDirection::Straight)
            }
            PatternClass::MildLeft => (DriveCommand::new(c.smooth_turn, 1.0), LastDirection::Left),
            PatternClass::MildRight => {
                (DriveCommand::new(1.0, c.smooth_turn), LastDirection::Right)
            }
            PatternClass::SharpLeft => (
                DriveCommand::new(c.sharp_turn, c.sharp_boost),
                LastDirection::Left,
            ),
            PatternClass::SharpRight => (
                DriveCommand::new(c.sharp_boost, c.sharp_turn),
                LastDirection::Right,
            ),
            PatternClass::Lost => {
                let s = self.search_scale;
                let creep = match last {
                    LastDirection::Left => DriveCommand::new(0.0, s),
                    LastDirection::Right => DriveCommand::new(s, 0.0),
                    LastDirection::Straight | LastDirection::Unknown => DriveCommand::new(s, s),
                };
                (creep, last)
            }
        };

        let factor = if self.boost_remaining > 0 && class != PatternClass::Lost {
            self.boost_remaining -= 1;
            self.config.boost_factor
        } else {
            1.0
        };

        Correction {
            class,
            command: command.scaled_forward(factor),
            direction,
        }
    }
}
