//! Route plans and junction cooldown

use crate::config::JunctionConfig;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Action taken at a junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnAction {
    Straight,
    Left,
    Right,
    Stop,
}

impl TurnAction {
    /// Left and right swapped
    pub fn mirrored(self) -> Self {
        match self {
            TurnAction::Left => TurnAction::Right,
            TurnAction::Right => TurnAction::Left,
            other => other,
        }
    }

    /// Actions that leave the robot partly on the junction afterwards
    pub fn needs_long_cooldown(self) -> bool {
        !matches!(self, TurnAction::Straight)
    }
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TurnAction::Straight => "straight",
            TurnAction::Left => "left",
            TurnAction::Right => "right",
            TurnAction::Stop => "stop",
        })
    }
}

/// Named route as written in the configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    pub plan: Vec<TurnAction>,
    #[serde(default)]
    pub destination: String,
}

/// Route being driven and the position in it
#[derive(Debug, Clone)]
pub struct RoutePlan {
    name: String,
    route: Route,
    step_index: usize,
    halted: bool,
}

impl RoutePlan {
    pub fn new(name: impl Into<String>, route: Route) -> Self {
        Self {
            name: name.into(),
            route,
            step_index: 0,
            halted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destination(&self) -> &str {
        &self.route.destination
    }

    pub fn len(&self) -> usize {
        self.route.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.plan.is_empty()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Action for the next junction
    pub fn current(&self) -> Option<TurnAction> {
        if self.halted {
            return None;
        }
        self.route.plan.get(self.step_index).copied()
    }

    /// Most recently consumed action
    pub fn last_completed(&self) -> Option<TurnAction> {
        self.step_index
            .checked_sub(1)
            .and_then(|i| self.route.plan.get(i).copied())
    }

    /// Consume the current action; a `stop` ends the route
    pub fn advance(&mut self) {
        if let Some(action) = self.current() {
            self.step_index += 1;
            if action == TurnAction::Stop {
                self.halted = true;
            }
        }
    }

    /// All steps consumed, or a stop was executed
    pub fn is_complete(&self) -> bool {
        self.halted || self.step_index >= self.route.plan.len()
    }
}

/// Suppresses junction detection after a junction was handled
#[derive(Debug, Clone)]
pub struct CooldownTimer {
    last: Option<Duration>,
    window: Duration,
    cross: Duration,
    turn: Duration,
}

impl CooldownTimer {
    pub fn new(config: &JunctionConfig) -> Self {
        Self {
            last: None,
            window: Duration::ZERO,
            cross: Duration::from_millis(config.cross_cooldown_ms),
            turn: Duration::from_millis(config.turn_cooldown_ms),
        }
    }

    /// True once the window since the last junction has passed
    pub fn is_elapsed(&self, now: Duration) -> bool {
        match self.last {
            Some(last) => now.saturating_sub(last) >= self.window,
            None => true,
        }
    }

    /// Start a new window sized for the action just completed
    pub fn restart(&mut self, now: Duration, action: TurnAction) {
        self.last = Some(now);
        self.window = if action.needs_long_cooldown() {
            self.turn
        } else {
            self.cross
        };
    }
}
