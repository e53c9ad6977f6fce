//! Line-lost recovery search
//!
//! Runs once the line has been missing for the grace period: a short reverse
//! pulse to back out of an overshoot, then a pivot toward the side the line
//! was last seen on, then the opposite side. If neither pivot finds the line
//! the motors are stopped and the caller reports the line as lost.

use crate::clock::Clock;
use crate::config::{RecoveryConfig, TurnConfig};
use crate::corrector::LastDirection;
use crate::drive::Side;
use crate::error::Result;
use crate::hardware::Hardware;
use crate::turn::{Spin, spin_until_aligned};
use linetrace_io::{ActuatorSink, SensorSource};
use std::time::Duration;
use tracing::{info, warn};

pub struct RecoverySearch {
    config: RecoveryConfig,
    magnitude: f32,
    pivot_grace: Duration,
    poll: Duration,
}

impl RecoverySearch {
    /// Pivot speed, grace and poll interval are shared with junction turns
    pub fn new(config: RecoveryConfig, turn: &TurnConfig) -> Self {
        Self {
            config,
            magnitude: turn.pivot_scale,
            pivot_grace: Duration::from_millis(turn.pivot_grace_ms),
            poll: Duration::from_millis(turn.poll_ms),
        }
    }

    /// How long the line may be missing before [`search`](Self::search) runs
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.config.grace_ms)
    }

    /// First pivot side for a given prior
    pub fn first_side(&self, last: LastDirection) -> Side {
        match last {
            LastDirection::Left => Side::Left,
            LastDirection::Right => Side::Right,
            LastDirection::Straight | LastDirection::Unknown => self.config.default_direction,
        }
    }

    /// Search both sides; returns the side the line was found on
    pub fn search<S, A, C>(
        &self,
        hw: &mut Hardware<S, A, C>,
        last: LastDirection,
    ) -> Result<Option<Side>>
    where
        S: SensorSource,
        A: ActuatorSink,
        C: Clock,
    {
        let first = self.first_side(last);
        info!(
            "Line lost (last seen {:?}), reversing then searching {:?} first",
            last, first
        );

        hw.drive().reverse(self.config.reverse_scale)?;
        hw.hold(Duration::from_millis(self.config.reverse_ms))?;
        hw.drive().stop()?;

        for side in [first, first.opposite()] {
            let spin = Spin {
                side,
                magnitude: self.magnitude,
                grace: self.pivot_grace,
                timeout: Duration::from_millis(self.config.pivot_timeout_ms),
                poll: self.poll,
            };
            if spin_until_aligned(hw, &spin)? {
                info!("Line reacquired pivoting {:?}", side);
                return Ok(Some(side));
            }
            warn!("No line found pivoting {:?}", side);
        }

        hw.drive().stop()?;
        Ok(None)
    }
}
