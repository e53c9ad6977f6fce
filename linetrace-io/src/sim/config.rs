//! Track simulation configuration
//!
//! Every parameter has a default that matches the small two-wheel chassis
//! the controller was tuned on, so an empty `[simulation]` table is valid.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! SimulationConfig
//! ├── start_x/y/theta               # Initial pose
//! ├── speed_factor, rate_hz, seed   # Simulation control
//! ├── RobotConfig                   # Chassis geometry
//! │   ├── wheel_base, max_wheel_speed
//! │   └── sensor_offset, sensor_spacing
//! ├── TrackConfig                   # Tape layout
//! │   └── tape_width, segments
//! └── OpticsConfig                  # Reflectance model
//!     └── line/floor reflectance, noise, dropout
//! ```

use serde::Deserialize;

/// Top-level simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Initial X position (meters)
    #[serde(default = "default_start_x")]
    pub start_x: f32,

    /// Initial Y position (meters)
    #[serde(default)]
    pub start_y: f32,

    /// Initial heading (radians, CCW from +X)
    #[serde(default)]
    pub start_theta: f32,

    /// Simulation speed multiplier (2.0 = twice real time)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,

    /// Physics and sensor update rate (Hz)
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f32,

    /// Noise seed (0 = random each run)
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    #[serde(default)]
    pub robot: RobotConfig,

    #[serde(default)]
    pub track: TrackConfig,

    #[serde(default)]
    pub optics: OpticsConfig,
}

/// Chassis geometry
#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    /// Distance between wheels (meters)
    #[serde(default = "default_wheel_base")]
    pub wheel_base: f32,

    /// Wheel surface speed at duty 1.0 (m/s)
    #[serde(default = "default_max_wheel_speed")]
    pub max_wheel_speed: f32,

    /// Sensor bar distance ahead of the axle (meters)
    #[serde(default = "default_sensor_offset")]
    pub sensor_offset: f32,

    /// Spacing between adjacent sensors (meters)
    #[serde(default = "default_sensor_spacing")]
    pub sensor_spacing: f32,
}

/// Tape layout
#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    /// Tape width (meters)
    #[serde(default = "default_tape_width")]
    pub tape_width: f32,

    /// Straight tape pieces as `[[x1, y1], [x2, y2]]`
    #[serde(default = "default_segments")]
    pub segments: Vec<[[f32; 2]; 2]>,
}

/// Reflectance model
#[derive(Debug, Clone, Deserialize)]
pub struct OpticsConfig {
    /// Normalized reading over tape
    #[serde(default = "default_line_reflectance")]
    pub line_reflectance: f32,

    /// Normalized reading over floor
    #[serde(default = "default_floor_reflectance")]
    pub floor_reflectance: f32,

    /// Reading noise standard deviation
    #[serde(default = "default_noise_stddev")]
    pub noise_stddev: f32,

    /// Probability that a channel skips an update
    #[serde(default)]
    pub dropout_rate: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_x: default_start_x(),
            start_y: 0.0,
            start_theta: 0.0,
            speed_factor: default_speed_factor(),
            rate_hz: default_rate_hz(),
            random_seed: default_random_seed(),
            robot: RobotConfig::default(),
            track: TrackConfig::default(),
            optics: OpticsConfig::default(),
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_base: default_wheel_base(),
            max_wheel_speed: default_max_wheel_speed(),
            sensor_offset: default_sensor_offset(),
            sensor_spacing: default_sensor_spacing(),
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            tape_width: default_tape_width(),
            segments: default_segments(),
        }
    }
}

impl Default for OpticsConfig {
    fn default() -> Self {
        Self {
            line_reflectance: default_line_reflectance(),
            floor_reflectance: default_floor_reflectance(),
            noise_stddev: default_noise_stddev(),
            dropout_rate: 0.0,
        }
    }
}

fn default_start_x() -> f32 {
    0.1
}
fn default_speed_factor() -> f32 {
    1.0
}
fn default_rate_hz() -> f32 {
    100.0
}
fn default_random_seed() -> u64 {
    42
}
fn default_wheel_base() -> f32 {
    0.12
}
fn default_max_wheel_speed() -> f32 {
    0.5
}
fn default_sensor_offset() -> f32 {
    0.06
}
fn default_sensor_spacing() -> f32 {
    0.012
}
fn default_tape_width() -> f32 {
    0.019
}
fn default_line_reflectance() -> f32 {
    0.15
}
fn default_floor_reflectance() -> f32 {
    0.85
}
fn default_noise_stddev() -> f32 {
    0.03
}

/// Main line along +X with crossings at x=0.5 and x=1.0, a left branch at
/// x=1.5 and a stop bar across that branch.
fn default_segments() -> Vec<[[f32; 2]; 2]> {
    vec![
        [[0.0, 0.0], [2.0, 0.0]],
        [[0.5, -0.3], [0.5, 0.3]],
        [[1.0, -0.3], [1.0, 0.3]],
        [[1.5, 0.0], [1.5, 1.0]],
        [[1.3, 0.7], [1.7, 0.7]],
    ]
}
