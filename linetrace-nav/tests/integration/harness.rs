//! Core test harness for integration tests
//!
//! Drives a [`RouteController`] synchronously with a scripted sensor, a
//! recording actuator and a manual clock. Each [`TestHarness::tick`] runs one
//! control step and then advances virtual time by one tick period, the same
//! way the control thread paces itself.

use linetrace_io::mock::{ActuatorCall, MockActuator, ScriptedSensor};
use linetrace_nav::{
    CancelToken, Clock, ManualClock, NavConfig, Result, Route, RouteController, Status, TurnAction,
};
use std::time::Duration;

pub const CENTERED: [u8; 5] = [0, 0, 1, 0, 0];
pub const CLEAR: [u8; 5] = [0, 0, 0, 0, 0];
pub const CROSS: [u8; 5] = [1, 1, 1, 1, 1];

/// Configuration driving a single route named `test`
pub fn single_route(plan: &[TurnAction]) -> NavConfig {
    let mut config = NavConfig::default();
    config.routes.insert(
        "test".into(),
        Route {
            plan: plan.to_vec(),
            destination: "Test".into(),
        },
    );
    config.route_sequence = vec!["test".into()];
    config
}

pub struct TestHarness {
    pub sensor: ScriptedSensor,
    pub motors: MockActuator,
    pub clock: ManualClock,
    pub token: CancelToken,
    pub controller: RouteController<ScriptedSensor, MockActuator, ManualClock>,
    period: Duration,
}

impl TestHarness {
    /// Harness whose sensor holds `initial` until frames are queued
    pub fn new(config: &NavConfig, initial: [u8; 5]) -> Self {
        let sensor = ScriptedSensor::from_bits(initial);
        let motors = MockActuator::new();
        let clock = ManualClock::new();
        let token = CancelToken::new();
        let controller = RouteController::new(
            config,
            sensor.clone(),
            motors.clone(),
            clock.clone(),
            token.clone(),
        )
        .expect("valid test configuration");

        Self {
            sensor,
            motors,
            clock,
            token,
            controller,
            period: config.tick_period(),
        }
    }

    /// Queue a pattern for the next `count` reads
    pub fn queue(&self, bits: [u8; 5], count: usize) -> &Self {
        self.sensor.push_bits(bits, count);
        self
    }

    /// One control step followed by one tick period of virtual time
    pub fn tick(&mut self) -> Result<Status> {
        let status = self.controller.tick()?;
        self.clock.advance(self.period);
        Ok(status)
    }

    /// Tick until `done` holds or `limit` ticks have run
    pub fn tick_until(&mut self, limit: usize, done: impl Fn(&Self) -> bool) -> Result<usize> {
        for n in 0..limit {
            if done(self) {
                return Ok(n);
            }
            self.tick()?;
        }
        Ok(limit)
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn step(&self) -> usize {
        self.controller.step_index()
    }

    /// Last wheel duties written, if the last call was a `set`
    pub fn last_set(&self) -> Option<(f32, f32)> {
        match self.motors.last_call() {
            Some(ActuatorCall::Set { left, right }) => Some((left, right)),
            _ => None,
        }
    }

    /// In-place pivots in call order; `true` means a right pivot
    pub fn pivots(&self) -> Vec<bool> {
        self.motors
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                ActuatorCall::Set { left, right } if left * right < 0.0 => Some(left > 0.0),
                _ => None,
            })
            .collect()
    }
}
