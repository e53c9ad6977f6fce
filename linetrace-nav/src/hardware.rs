//! Hardware bundle handed to blocking maneuvers
//!
//! Groups the sensor source, the drive and the pacer so that turn and
//! recovery code can read frames, command wheels and wait without knowing
//! which implementations sit behind them.

use crate::clock::{Clock, Pacer};
use crate::drive::DifferentialDrive;
use crate::error::Result;
use crate::frame::SensorFrame;
use linetrace_io::{ActuatorSink, SensorSource};
use std::time::Duration;

pub struct Hardware<S, A, C> {
    sensors: S,
    drive: DifferentialDrive<A>,
    pacer: Pacer<C>,
    threshold: f32,
}

impl<S, A, C> Hardware<S, A, C>
where
    S: SensorSource,
    A: ActuatorSink,
    C: Clock,
{
    pub fn new(sensors: S, drive: DifferentialDrive<A>, pacer: Pacer<C>, threshold: f32) -> Self {
        Self {
            sensors,
            drive,
            pacer,
            threshold,
        }
    }

    /// Read one snapshot and binarize it
    pub fn frame(&mut self) -> SensorFrame {
        SensorFrame::new(self.sensors.read(), self.threshold)
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.pacer.now()
    }

    /// Cancellable wait
    pub fn hold(&self, duration: Duration) -> Result<()> {
        self.pacer.hold(duration)
    }

    pub fn pacer(&self) -> &Pacer<C> {
        &self.pacer
    }

    pub fn drive(&mut self) -> &mut DifferentialDrive<A> {
        &mut self.drive
    }

    pub fn drive_ref(&self) -> &DifferentialDrive<A> {
        &self.drive
    }

    /// Best-effort halt used on cancellation; failures are only logged
    pub fn hard_stop(&mut self) {
        if let Err(e) = self.drive.stop() {
            tracing::error!("Hard stop failed: {}", e);
        }
    }
}
