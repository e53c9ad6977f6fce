//! Thread layout for LinetraceNav.
//!
//! A single control thread owns the route controller and ticks it at a
//! fixed period. The main thread only watches [`SharedState`].

mod control;

pub use control::ControlThread;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::clock::Clock;
use crate::controller::{RouteController, Status};
use crate::error::{NavError, Result};
use crate::shared::SharedState;

use linetrace_io::{ActuatorSink, SensorSource};

/// Spawn the control thread and return its handle.
pub fn spawn_control<S, A, C>(
    controller: RouteController<S, A, C>,
    shared_state: Arc<SharedState>,
    period: Duration,
) -> Result<JoinHandle<Result<Status>>>
where
    S: SensorSource + 'static,
    A: ActuatorSink + 'static,
    C: Clock + 'static,
{
    thread::Builder::new()
        .name("control".into())
        .spawn(move || ControlThread::new(controller, shared_state, period).run())
        .map_err(NavError::Io)
}
