//! Configuration loading for LinetraceNav
//!
//! Every table is optional. A missing file section falls back to the values
//! the controller was tuned with on the physical robot.

use crate::drive::Side;
use crate::error::{NavError, Result};
use crate::route::{Route, TurnAction};
use linetrace_io::sim::SimulationConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub sensors: SensorConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default)]
    pub correction: CorrectionConfig,

    #[serde(default)]
    pub junction: JunctionConfig,

    #[serde(default)]
    pub turn: TurnConfig,

    #[serde(default)]
    pub recovery: RecoveryConfig,

    #[serde(default)]
    pub control: ControlConfig,

    /// Named routes; a file that defines `[routes]` replaces the built-in table
    #[serde(default = "default_routes")]
    pub routes: BTreeMap<String, Route>,

    /// Routes driven one after another
    #[serde(default = "default_route_sequence")]
    pub route_sequence: Vec<String>,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Binarization settings
#[derive(Clone, Debug, Deserialize)]
pub struct SensorConfig {
    /// Readings strictly below this are "on line" (default: 0.5)
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

/// Wheel speed scaling
#[derive(Clone, Debug, Deserialize)]
pub struct DriveConfig {
    /// Left wheel duty at command 1.0 (default: 0.4)
    #[serde(default = "default_base_speed")]
    pub base_speed_left: f32,

    /// Right wheel duty at command 1.0 (default: 0.4)
    #[serde(default = "default_base_speed")]
    pub base_speed_right: f32,
}

/// Line correction profile
#[derive(Clone, Debug, Deserialize)]
pub struct CorrectionConfig {
    /// Near-wheel scale for a mild deviation (default: 0.6)
    #[serde(default = "default_smooth_turn")]
    pub smooth_turn: f32,

    /// Near-wheel scale for a sharp deviation (default: 0.0)
    #[serde(default)]
    pub sharp_turn: f32,

    /// Far-wheel scale for a sharp deviation (default: 1.0)
    #[serde(default = "default_sharp_boost")]
    pub sharp_boost: f32,

    /// Multiplier applied while a boost is active (default: 1.2)
    #[serde(default = "default_boost_factor")]
    pub boost_factor: f32,

    /// Boosted ticks after each junction (default: 10)
    #[serde(default = "default_boost_ticks")]
    pub boost_ticks: u32,

    /// Boosted ticks at startup (default: 2)
    #[serde(default = "default_startup_boost_ticks")]
    pub startup_boost_ticks: u32,
}

/// Junction cooldowns
#[derive(Clone, Debug, Deserialize)]
pub struct JunctionConfig {
    /// Cooldown after a straight crossing in milliseconds (default: 300)
    #[serde(default = "default_cross_cooldown_ms")]
    pub cross_cooldown_ms: u64,

    /// Cooldown after a turn or stop in milliseconds (default: 2000)
    #[serde(default = "default_turn_cooldown_ms")]
    pub turn_cooldown_ms: u64,
}

/// What to do when a pivot never re-acquires the line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Stop and carry on with the next step
    #[default]
    Advance,
    /// Pivot again, up to `max_retries` times
    Retry,
}

/// Junction maneuver timings
#[derive(Clone, Debug, Deserialize)]
pub struct TurnConfig {
    #[serde(default = "default_nudge_ms")]
    pub nudge_ms: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Pivot time before the sensors are polled
    #[serde(default = "default_pivot_grace_ms")]
    pub pivot_grace_ms: u64,

    /// Pivot wheel magnitude relative to base speed (default: 1.0)
    #[serde(default = "default_pivot_scale")]
    pub pivot_scale: f32,

    /// Pivot timeout in milliseconds (default: 2500)
    #[serde(default = "default_turn_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,

    /// Forward pulse through a straight crossing
    #[serde(default = "default_straight_ms")]
    pub straight_ms: u64,

    /// Roll-in before a stop action halts
    #[serde(default = "default_stop_roll_ms")]
    pub stop_roll_ms: u64,

    /// Pause at a destination before the next route starts
    #[serde(default = "default_destination_dwell_ms")]
    pub destination_dwell_ms: u64,

    #[serde(default)]
    pub timeout_policy: TimeoutPolicy,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Swap left and right in every route
    #[serde(default)]
    pub invert_turns: bool,
}

/// Line-lost recovery
#[derive(Clone, Debug, Deserialize)]
pub struct RecoveryConfig {
    /// Time the line may be missing before a search starts
    #[serde(default = "default_recovery_grace_ms")]
    pub grace_ms: u64,

    /// Creep speed toward the last known side during the grace period
    #[serde(default = "default_search_scale")]
    pub search_scale: f32,

    #[serde(default = "default_reverse_ms")]
    pub reverse_ms: u64,

    #[serde(default = "default_reverse_scale")]
    pub reverse_scale: f32,

    /// Timeout for each search pivot
    #[serde(default = "default_recovery_pivot_timeout_ms")]
    pub pivot_timeout_ms: u64,

    /// First pivot side when the last direction is unknown
    #[serde(default = "default_search_direction")]
    pub default_direction: Side,
}

/// Control loop timing
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Tick period in milliseconds (default: 50)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_speed_left: default_base_speed(),
            base_speed_right: default_base_speed(),
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            smooth_turn: default_smooth_turn(),
            sharp_turn: 0.0,
            sharp_boost: default_sharp_boost(),
            boost_factor: default_boost_factor(),
            boost_ticks: default_boost_ticks(),
            startup_boost_ticks: default_startup_boost_ticks(),
        }
    }
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            cross_cooldown_ms: default_cross_cooldown_ms(),
            turn_cooldown_ms: default_turn_cooldown_ms(),
        }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            nudge_ms: default_nudge_ms(),
            settle_ms: default_settle_ms(),
            pivot_grace_ms: default_pivot_grace_ms(),
            pivot_scale: default_pivot_scale(),
            timeout_ms: default_turn_timeout_ms(),
            poll_ms: default_poll_ms(),
            straight_ms: default_straight_ms(),
            stop_roll_ms: default_stop_roll_ms(),
            destination_dwell_ms: default_destination_dwell_ms(),
            timeout_policy: TimeoutPolicy::default(),
            max_retries: default_max_retries(),
            invert_turns: false,
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            grace_ms: default_recovery_grace_ms(),
            search_scale: default_search_scale(),
            reverse_ms: default_reverse_ms(),
            reverse_scale: default_reverse_scale(),
            pivot_timeout_ms: default_recovery_pivot_timeout_ms(),
            default_direction: default_search_direction(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            sensors: SensorConfig::default(),
            drive: DriveConfig::default(),
            correction: CorrectionConfig::default(),
            junction: JunctionConfig::default(),
            turn: TurnConfig::default(),
            recovery: RecoveryConfig::default(),
            control: ControlConfig::default(),
            routes: default_routes(),
            route_sequence: default_route_sequence(),
            simulation: SimulationConfig::default(),
        }
    }
}

// Default value functions
fn default_threshold() -> f32 {
    0.5
}
fn default_base_speed() -> f32 {
    0.4
}
fn default_smooth_turn() -> f32 {
    0.6
}
fn default_sharp_boost() -> f32 {
    1.0
}
fn default_boost_factor() -> f32 {
    1.2
}
fn default_boost_ticks() -> u32 {
    10
}
fn default_startup_boost_ticks() -> u32 {
    2
}
fn default_cross_cooldown_ms() -> u64 {
    300
}
fn default_turn_cooldown_ms() -> u64 {
    2000
}
fn default_nudge_ms() -> u64 {
    150
}
fn default_settle_ms() -> u64 {
    400
}
fn default_pivot_grace_ms() -> u64 {
    100
}
fn default_pivot_scale() -> f32 {
    1.0
}
fn default_turn_timeout_ms() -> u64 {
    2500
}
fn default_poll_ms() -> u64 {
    10
}
fn default_straight_ms() -> u64 {
    400
}
fn default_stop_roll_ms() -> u64 {
    2000
}
fn default_destination_dwell_ms() -> u64 {
    5000
}
fn default_max_retries() -> u32 {
    1
}
fn default_recovery_grace_ms() -> u64 {
    300
}
fn default_search_scale() -> f32 {
    0.6
}
fn default_reverse_ms() -> u64 {
    250
}
fn default_reverse_scale() -> f32 {
    0.5
}
fn default_recovery_pivot_timeout_ms() -> u64 {
    1500
}
fn default_search_direction() -> Side {
    Side::Right
}
fn default_tick_ms() -> u64 {
    50
}

fn route(plan: &[TurnAction], destination: &str) -> Route {
    Route {
        plan: plan.to_vec(),
        destination: destination.to_string(),
    }
}

fn default_routes() -> BTreeMap<String, Route> {
    use TurnAction::{Left, Right, Stop, Straight};
    BTreeMap::from([
        (
            "depot-arcade".to_string(),
            route(&[Right, Left, Stop], "Arcade"),
        ),
        (
            "depot-wildwaterbaan".to_string(),
            route(
                &[Right, Straight, Straight, Left, Left, Stop],
                "Wildwaterbaan",
            ),
        ),
        (
            "depot-achtbaan".to_string(),
            route(&[Straight, Straight, Straight, Left, Stop], "Achtbaan"),
        ),
        (
            "depot-reuzenrad".to_string(),
            route(&[Straight, Straight, Left, Stop], "Reuzenrad"),
        ),
    ])
}

fn default_route_sequence() -> Vec<String> {
    vec!["depot-reuzenrad".to_string()]
}

/// Upper bound on extra pivots at one junction
pub const MAX_TURN_RETRIES: u32 = 10;

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: NavConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.sensors.threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(NavError::Config(format!(
                "sensors.threshold must lie in (0, 1), got {}",
                threshold
            )));
        }

        for (name, speed) in [
            ("drive.base_speed_left", self.drive.base_speed_left),
            ("drive.base_speed_right", self.drive.base_speed_right),
        ] {
            if !(0.0..=1.0).contains(&speed) {
                return Err(NavError::Config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, speed
                )));
            }
        }

        if self.control.tick_ms == 0 {
            return Err(NavError::Config("control.tick_ms must be positive".into()));
        }
        if self.turn.poll_ms == 0 {
            return Err(NavError::Config("turn.poll_ms must be positive".into()));
        }
        if self.turn.max_retries > MAX_TURN_RETRIES {
            return Err(NavError::Config(format!(
                "turn.max_retries must be at most {}, got {}",
                MAX_TURN_RETRIES, self.turn.max_retries
            )));
        }

        if self.route_sequence.is_empty() {
            return Err(NavError::Config("route_sequence is empty".into()));
        }
        for name in &self.route_sequence {
            let Some(route) = self.routes.get(name) else {
                return Err(NavError::Config(format!("unknown route '{}'", name)));
            };
            if route.plan.is_empty() {
                return Err(NavError::Config(format!("route '{}' has no steps", name)));
            }
        }

        Ok(())
    }

    /// Look up a named route
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Routes of the sequence, in driving order
    pub fn sequence(&self) -> Result<Vec<(String, Route)>> {
        self.route_sequence
            .iter()
            .map(|name| {
                self.routes
                    .get(name)
                    .map(|route| (name.clone(), route.clone()))
                    .ok_or_else(|| NavError::Config(format!("unknown route '{}'", name)))
            })
            .collect()
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.control.tick_ms)
    }
}
