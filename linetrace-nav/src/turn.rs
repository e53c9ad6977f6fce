//! Junction maneuvers
//!
//! # Turn Sequence
//!
//! ```text
//! 1. Nudge forward into the junction      (nudge_ms)
//! 2. Stop and let the chassis settle      (settle_ms)
//! 3. Pivot toward the branch
//! 4. Ignore the sensors for a short grace (pivot_grace_ms)
//! 5. Poll every poll_ms until aligned or timeout_ms since the pivot began
//! ```
//!
//! A timed-out pivot stops the motors. With [`TimeoutPolicy::Retry`] the
//! pivot is repeated up to `max_retries` times before giving up.

use crate::clock::Clock;
use crate::config::{TimeoutPolicy, TurnConfig};
use crate::drive::Side;
use crate::error::Result;
use crate::hardware::Hardware;
use crate::route::TurnAction;
use linetrace_io::{ActuatorSink, SensorSource};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Parameters for one pivot-until-aligned attempt
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    pub side: Side,
    pub magnitude: f32,
    pub grace: Duration,
    pub timeout: Duration,
    pub poll: Duration,
}

/// Pivot until the pattern is aligned or the timeout expires
///
/// The motors are stopped either way. Returns `true` when the line was
/// found.
pub fn spin_until_aligned<S, A, C>(hw: &mut Hardware<S, A, C>, spin: &Spin) -> Result<bool>
where
    S: SensorSource,
    A: ActuatorSink,
    C: Clock,
{
    let start = hw.now();
    hw.drive().pivot(spin.side, spin.magnitude)?;
    hw.hold(spin.grace)?;

    loop {
        let frame = hw.frame();
        if frame.pattern.is_aligned() {
            hw.drive().stop()?;
            debug!(
                "Aligned on {} after {:?} pivoting {:?}",
                frame.pattern,
                hw.now().saturating_sub(start),
                spin.side
            );
            return Ok(true);
        }
        if hw.now().saturating_sub(start) >= spin.timeout {
            hw.drive().stop()?;
            return Ok(false);
        }
        hw.hold(spin.poll)?;
    }
}

/// Result of a junction maneuver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Pivot found the line
    Aligned { attempts: u32 },
    /// Every pivot attempt ran out of time
    TimedOut { attempts: u32 },
    /// Drove straight through
    Passed,
    /// Rolled in and halted
    Stopped,
}

/// Executes one route action at a junction
pub struct TurnExecutor {
    config: TurnConfig,
}

impl TurnExecutor {
    pub fn new(config: TurnConfig) -> Self {
        Self { config }
    }

    /// Action after applying `invert_turns`
    pub fn resolve(&self, action: TurnAction) -> TurnAction {
        if self.config.invert_turns {
            action.mirrored()
        } else {
            action
        }
    }

    /// Run `action` to completion, blocking the caller
    pub fn execute<S, A, C>(
        &self,
        hw: &mut Hardware<S, A, C>,
        action: TurnAction,
    ) -> Result<TurnOutcome>
    where
        S: SensorSource,
        A: ActuatorSink,
        C: Clock,
    {
        match self.resolve(action) {
            TurnAction::Straight => {
                hw.drive().forward()?;
                hw.hold(Duration::from_millis(self.config.straight_ms))?;
                Ok(TurnOutcome::Passed)
            }
            TurnAction::Stop => {
                hw.drive().forward()?;
                hw.hold(Duration::from_millis(self.config.stop_roll_ms))?;
                hw.drive().stop()?;
                Ok(TurnOutcome::Stopped)
            }
            TurnAction::Left => self.turn(hw, Side::Left),
            TurnAction::Right => self.turn(hw, Side::Right),
        }
    }

    fn turn<S, A, C>(&self, hw: &mut Hardware<S, A, C>, side: Side) -> Result<TurnOutcome>
    where
        S: SensorSource,
        A: ActuatorSink,
        C: Clock,
    {
        hw.drive().forward()?;
        hw.hold(Duration::from_millis(self.config.nudge_ms))?;
        hw.drive().stop()?;
        hw.hold(Duration::from_millis(self.config.settle_ms))?;

        let spin = Spin {
            side,
            magnitude: self.config.pivot_scale,
            grace: Duration::from_millis(self.config.pivot_grace_ms),
            timeout: Duration::from_millis(self.config.timeout_ms),
            poll: Duration::from_millis(self.config.poll_ms),
        };
        let attempts = match self.config.timeout_policy {
            TimeoutPolicy::Advance => 1,
            TimeoutPolicy::Retry => self.config.max_retries.saturating_add(1),
        };

        for attempt in 1..=attempts {
            if spin_until_aligned(hw, &spin)? {
                info!("Turn {:?} aligned (attempt {})", side, attempt);
                return Ok(TurnOutcome::Aligned { attempts: attempt });
            }
            warn!(
                "Turn {:?} timed out after {:?} (attempt {}/{})",
                side, spin.timeout, attempt, attempts
            );
        }
        Ok(TurnOutcome::TimedOut { attempts })
    }
}
