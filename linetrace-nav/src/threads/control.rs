//! Control thread: fixed-period ticking of the route controller.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::controller::{RouteController, Status};
use crate::error::{NavError, Result};
use crate::shared::SharedState;

use linetrace_io::{ActuatorSink, SensorSource};

/// Control thread state and logic.
pub struct ControlThread<S, A, C> {
    controller: RouteController<S, A, C>,
    shared_state: Arc<SharedState>,
    period: Duration,
}

impl<S, A, C> ControlThread<S, A, C>
where
    S: SensorSource,
    A: ActuatorSink,
    C: Clock,
{
    pub fn new(
        controller: RouteController<S, A, C>,
        shared_state: Arc<SharedState>,
        period: Duration,
    ) -> Self {
        Self {
            controller: controller.with_shared(Arc::clone(&shared_state)),
            shared_state,
            period,
        }
    }

    /// Run until the route ends, the line is lost, or the run is cancelled.
    pub fn run(&mut self) -> Result<Status> {
        tracing::info!(
            "Control thread started: route '{}' ({} steps), tick {:?}",
            self.controller.plan().name(),
            self.controller.plan().len(),
            self.period
        );

        let result = self.controller.run(self.period);

        match &result {
            Ok(status) => tracing::info!("Control loop finished: {:?}", status),
            Err(NavError::Cancelled) => tracing::info!("Control loop cancelled"),
            Err(e) => {
                tracing::error!("Control loop failed: {}", e);
                self.shared_state.set_fault();
            }
        }

        if let Err(e) = self.controller.halt() {
            tracing::error!("Final stop failed: {}", e);
        }
        self.shared_state.signal_shutdown();
        result
    }
}
