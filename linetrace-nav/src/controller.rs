//! Route controller: the per-tick navigation state machine
//!
//! # States
//!
//! ```text
//!              junction && cooldown elapsed
//!   FOLLOWING ─────────────────────────────▶ AT_JUNCTION
//!      ▲  │                                      │
//!      │  │         maneuver returns             │
//!      │  └◀─────────────────────────────────────┘
//!      │
//!      ├──▶ ROUTE_DONE   plan consumed (checked before junctions)
//!      └──▶ LINE_LOST    recovery search failed on both sides
//! ```
//!
//! AT_JUNCTION is transient: the maneuver runs to completion inside the
//! tick that detected the junction. ROUTE_DONE and LINE_LOST are terminal;
//! later ticks return the status without touching the hardware.

use crate::clock::{CancelToken, Clock, Pacer};
use crate::config::NavConfig;
use crate::corrector::{LastDirection, LineCorrector};
use crate::drive::{DifferentialDrive, DriveCommand};
use crate::error::{NavError, Result};
use crate::frame::{PatternClass, SensorFrame};
use crate::hardware::Hardware;
use crate::junction::{self, JunctionKind};
use crate::recovery::RecoverySearch;
use crate::route::{CooldownTimer, RoutePlan, TurnAction};
use crate::shared::SharedState;
use crate::turn::{TurnExecutor, TurnOutcome};
use linetrace_io::{ActuatorSink, SensorSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Controller status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Following = 0,
    AtJunction = 1,
    RouteDone = 2,
    LineLost = 3,
}

impl Status {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Status::AtJunction,
            2 => Status::RouteDone,
            3 => Status::LineLost,
            _ => Status::Following,
        }
    }

    /// No further transitions happen from this status
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::RouteDone | Status::LineLost)
    }
}

pub struct RouteController<S, A, C> {
    hw: Hardware<S, A, C>,
    corrector: LineCorrector,
    turns: TurnExecutor,
    recovery: RecoverySearch,

    routes: Vec<RoutePlan>,
    route_index: usize,
    cooldown: CooldownTimer,
    last_direction: LastDirection,
    lost_since: Option<Duration>,
    dwell: Duration,

    status: Status,
    shared: Option<Arc<SharedState>>,
}

impl<S, A, C> RouteController<S, A, C>
where
    S: SensorSource,
    A: ActuatorSink,
    C: Clock,
{
    /// Build a controller for the configured route sequence
    pub fn new(
        config: &NavConfig,
        sensors: S,
        actuator: A,
        clock: C,
        cancel: CancelToken,
    ) -> Result<Self> {
        config.validate()?;

        let routes = config
            .sequence()?
            .into_iter()
            .map(|(name, route)| RoutePlan::new(name, route))
            .collect();

        let pacer = Pacer::new(clock, cancel, Duration::from_millis(config.turn.poll_ms));
        let drive = DifferentialDrive::new(actuator, &config.drive);
        let hw = Hardware::new(sensors, drive, pacer, config.sensors.threshold);

        Ok(Self {
            hw,
            corrector: LineCorrector::new(
                config.correction.clone(),
                config.recovery.search_scale,
            ),
            turns: TurnExecutor::new(config.turn.clone()),
            recovery: RecoverySearch::new(config.recovery.clone(), &config.turn),
            routes,
            route_index: 0,
            cooldown: CooldownTimer::new(&config.junction),
            last_direction: LastDirection::Unknown,
            lost_since: None,
            dwell: Duration::from_millis(config.turn.destination_dwell_ms),
            status: Status::Following,
            shared: None,
        })
    }

    /// Publish status changes to `shared`
    pub fn with_shared(mut self, shared: Arc<SharedState>) -> Self {
        shared.publish(self.status, self.route_index, self.step_index());
        self.shared = Some(shared);
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Route currently being driven
    pub fn plan(&self) -> &RoutePlan {
        &self.routes[self.route_index]
    }

    pub fn route_index(&self) -> usize {
        self.route_index
    }

    pub fn step_index(&self) -> usize {
        self.plan().step_index()
    }

    pub fn last_direction(&self) -> LastDirection {
        self.last_direction
    }

    /// Last command accepted by the actuator
    pub fn last_command(&self) -> Option<DriveCommand> {
        self.hw.drive_ref().last_command()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        self.hw.pacer().cancel_token()
    }

    /// Run one control step
    pub fn tick(&mut self) -> Result<Status> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        let result = self.step();
        self.guard(result)?;
        Ok(self.status)
    }

    /// Tick every `period` until a terminal status or an error
    pub fn run(&mut self, period: Duration) -> Result<Status> {
        loop {
            let started = self.hw.now();
            let status = self.tick()?;
            if status.is_terminal() {
                return Ok(status);
            }
            let elapsed = self.hw.now().saturating_sub(started);
            let wait = self.hw.hold(period.saturating_sub(elapsed));
            self.guard(wait)?;
        }
    }

    /// Stop the motors
    pub fn halt(&mut self) -> Result<()> {
        self.hw.drive().stop()
    }

    /// Hard-stop on cancellation before the error leaves the controller
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(NavError::Cancelled) = result {
            warn!("Cancelled at step {} of '{}'", self.step_index(), self.plan().name());
            self.hw.hard_stop();
        }
        result
    }

    fn step(&mut self) -> Result<()> {
        self.hw.pacer().check()?;

        if self.plan().is_complete() {
            return self.finish_route();
        }

        let frame = self.hw.frame();
        let now = self.hw.now();

        if self.cooldown.is_elapsed(now)
            && let Some(kind) = junction::detect(frame.pattern)
            && let Some(action) = self.plan().current()
        {
            return self.handle_junction(kind, action, &frame);
        }

        self.follow(&frame)
    }

    fn handle_junction(
        &mut self,
        kind: JunctionKind,
        action: TurnAction,
        frame: &SensorFrame,
    ) -> Result<()> {
        self.set_status(Status::AtJunction);
        info!(
            "Junction {:?} ({}) at step {}/{} of '{}': {}",
            kind,
            frame.pattern,
            self.step_index() + 1,
            self.plan().len(),
            self.plan().name(),
            action
        );

        let outcome = match self.turns.execute(&mut self.hw, action) {
            Ok(outcome) => outcome,
            Err(e) => {
                // Maneuver aborted; the step is not consumed
                self.set_status(Status::Following);
                return Err(e);
            }
        };
        if let TurnOutcome::TimedOut { attempts } = outcome {
            warn!(
                "Turn {} never re-acquired the line ({} attempts), advancing anyway",
                action, attempts
            );
        }

        self.routes[self.route_index].advance();
        self.cooldown.restart(self.hw.now(), action);
        self.corrector.start_boost();
        self.last_direction = LastDirection::Straight;
        self.lost_since = None;
        if let Some(shared) = &self.shared {
            shared.record_junction();
        }

        debug!("Junction handled: {:?}", outcome);
        self.set_status(Status::Following);
        Ok(())
    }

    fn follow(&mut self, frame: &SensorFrame) -> Result<()> {
        let correction = self.corrector.correct(frame.pattern, self.last_direction);
        self.last_direction = correction.direction;

        if correction.class == PatternClass::Lost {
            let now = self.hw.now();
            let since = *self.lost_since.get_or_insert(now);
            if now.saturating_sub(since) >= self.recovery.grace() {
                self.lost_since = None;
                return self.recover();
            }
        } else {
            self.lost_since = None;
        }

        debug!(
            "{} {:?} -> ({:.2}, {:.2})",
            frame.pattern, correction.class, correction.command.left, correction.command.right
        );
        self.hw.drive().apply(correction.command)
    }

    fn recover(&mut self) -> Result<()> {
        match self.recovery.search(&mut self.hw, self.last_direction)? {
            Some(_) => {
                self.last_direction = LastDirection::Straight;
                Ok(())
            }
            None => {
                self.hw.drive().stop()?;
                warn!(
                    "Line lost at step {}/{} of '{}'",
                    self.step_index(),
                    self.plan().len(),
                    self.plan().name()
                );
                self.set_status(Status::LineLost);
                Ok(())
            }
        }
    }

    fn finish_route(&mut self) -> Result<()> {
        let plan = self.plan();
        let ended_with_stop = plan.last_completed() == Some(TurnAction::Stop);
        info!(
            "Route '{}' complete after {} steps, destination '{}'",
            plan.name(),
            plan.step_index(),
            plan.destination()
        );

        if ended_with_stop {
            self.hw.drive().stop()?;
        }

        if self.route_index + 1 < self.routes.len() {
            if ended_with_stop {
                self.hw.hold(self.dwell)?;
            }
            self.route_index += 1;
            self.corrector.start_boost();
            info!(
                "Starting route '{}' toward '{}'",
                self.plan().name(),
                self.plan().destination()
            );
            self.set_status(Status::Following);
        } else {
            self.set_status(Status::RouteDone);
        }
        Ok(())
    }

    fn set_status(&mut self, status: Status) {
        if status != self.status {
            debug!("Status {:?} -> {:?}", self.status, status);
        }
        self.status = status;
        if let Some(shared) = &self.shared {
            shared.publish(status, self.route_index, self.step_index());
        }
    }
}
