//! Differential drive on top of an [`ActuatorSink`]
//!
//! Commands are expressed relative to the configured base speeds: a
//! [`DriveCommand`] of `(1.0, 1.0)` drives both wheels at their base duty.
//! Negative values drive a wheel backwards. Duties sent to the sink are
//! always clamped to `[-1, 1]`.

use crate::config::DriveConfig;
use crate::error::Result;
use linetrace_io::ActuatorSink;
use serde::Deserialize;

/// Turning side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Wheel command relative to base speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    pub left: f32,
    pub right: f32,
}

impl DriveCommand {
    pub const STRAIGHT: DriveCommand = DriveCommand::new(1.0, 1.0);

    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Spin in place; the outside wheel drives forward
    pub fn pivot(side: Side, magnitude: f32) -> Self {
        match side {
            Side::Left => Self::new(-magnitude, magnitude),
            Side::Right => Self::new(magnitude, -magnitude),
        }
    }

    /// Both wheels backwards
    pub fn reverse(magnitude: f32) -> Self {
        Self::new(-magnitude, -magnitude)
    }

    /// Multiply both wheels, keeping each in `[0, 1]`
    pub fn scaled_forward(self, factor: f32) -> Self {
        Self::new(
            (self.left * factor).clamp(0.0, 1.0),
            (self.right * factor).clamp(0.0, 1.0),
        )
    }
}

/// Two-wheel drive bound to an actuator sink
pub struct DifferentialDrive<A> {
    sink: A,
    base_left: f32,
    base_right: f32,
    last: Option<DriveCommand>,
}

impl<A: ActuatorSink> DifferentialDrive<A> {
    pub fn new(sink: A, config: &DriveConfig) -> Self {
        Self {
            sink,
            base_left: config.base_speed_left,
            base_right: config.base_speed_right,
            last: None,
        }
    }

    /// Drive with a command relative to base speed
    pub fn apply(&mut self, command: DriveCommand) -> Result<()> {
        self.set_raw(command.left * self.base_left, command.right * self.base_right)?;
        self.last = Some(command);
        Ok(())
    }

    /// Both wheels at base speed
    pub fn forward(&mut self) -> Result<()> {
        self.apply(DriveCommand::STRAIGHT)
    }

    pub fn pivot(&mut self, side: Side, magnitude: f32) -> Result<()> {
        self.apply(DriveCommand::pivot(side, magnitude))
    }

    pub fn reverse(&mut self, magnitude: f32) -> Result<()> {
        self.apply(DriveCommand::reverse(magnitude))
    }

    /// Raw duty, bypassing base speed
    ///
    /// A failed write still tries to halt the motors before the error is
    /// returned.
    pub fn set_raw(&mut self, left: f32, right: f32) -> Result<()> {
        let left = left.clamp(-1.0, 1.0);
        let right = right.clamp(-1.0, 1.0);
        if let Err(e) = self.sink.set(left, right) {
            tracing::error!("Motor write ({:.2}, {:.2}) failed: {}", left, right, e);
            if let Err(stop_err) = self.sink.stop() {
                tracing::error!("Emergency stop failed: {}", stop_err);
            }
            self.last = None;
            return Err(e.into());
        }
        Ok(())
    }

    /// Halt both wheels
    pub fn stop(&mut self) -> Result<()> {
        self.sink.stop()?;
        self.last = Some(DriveCommand::new(0.0, 0.0));
        Ok(())
    }

    /// Last command accepted by the sink
    pub fn last_command(&self) -> Option<DriveCommand> {
        self.last
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }
}
