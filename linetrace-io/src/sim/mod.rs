//! Track simulator for hardware-free line following
//!
//! Stands in for the microcontroller link: a simulation thread integrates the
//! chassis pose from the last actuator command and publishes each step's
//! reflectance readings into a [`SensorBuffer`] as one frame.
//!
//! # Simulation Loop
//!
//! ```text
//! Every 1/rate_hz seconds (scaled by speed_factor):
//! 1. Read wheel duty from shared state
//! 2. Integrate pose (differential drive kinematics)
//! 3. Sample tape under each of the five sensors
//! 4. Add Gaussian noise, drop channels at dropout_rate
//! 5. Publish the frame; dropped channels keep their previous value
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: Simulation parameters
//! - [`physics`]: Kinematics and sensor bar geometry
//! - [`track`]: Tape layout
//! - [`noise`]: Seeded reading jitter and channel dropout

pub mod config;
mod noise;
mod physics;
mod track;

pub use config::SimulationConfig;
pub use physics::Pose2D;

use crate::buffer::SensorBuffer;
use crate::drivers::ActuatorSink;
use crate::error::{Error, Result};
use crate::types::Readings;

use noise::SensorNoise;
use physics::PhysicsState;
use track::Track;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Atomic f32 wrapper using AtomicU32
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

/// Shared state between the simulation thread and its handles
struct SharedState {
    left_duty: AtomicF32,
    right_duty: AtomicF32,
    shutdown: AtomicBool,
    pose: Mutex<Pose2D>,
}

/// Single-threaded simulation core, stepped explicitly
pub struct Simulation {
    config: SimulationConfig,
    physics: PhysicsState,
    track: Track,
    noise: SensorNoise,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let start = Pose2D::new(config.start_x, config.start_y, config.start_theta);
        let physics = PhysicsState::new(start, &config.robot);
        let track = Track::new(&config.track);
        let noise = SensorNoise::new(config.random_seed, &config.optics);
        Self {
            config,
            physics,
            track,
            noise,
        }
    }

    /// Current chassis pose
    pub fn pose(&self) -> Pose2D {
        self.physics.pose()
    }

    /// Advance the chassis by `dt` seconds
    pub fn step(&mut self, dt: f32, left_duty: f32, right_duty: f32) {
        self.physics.update(dt, left_duty, right_duty);
    }

    /// Sample the five sensors; `None` marks a dropped channel
    pub fn sense(&mut self) -> Readings {
        let line = self.config.optics.line_reflectance;
        let floor = self.config.optics.floor_reflectance;
        let track = &self.track;
        let noise = &mut self.noise;
        self.physics.sensor_points().map(|(x, y)| {
            let ideal = if track.covers(x, y) { line } else { floor };
            noise.reading(ideal)
        })
    }
}

/// Simulated robot running on its own thread
pub struct SimulatedRobot {
    sensors: Arc<SensorBuffer>,
    shared: Arc<SharedState>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedRobot {
    /// Spawn the simulation thread
    pub fn start(config: SimulationConfig) -> Result<Self> {
        if config.rate_hz <= 0.0 || config.speed_factor <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "rate_hz ({}) and speed_factor ({}) must be positive",
                config.rate_hz, config.speed_factor
            )));
        }

        let sim = Simulation::new(config.clone());
        log::info!(
            "Track loaded: {} tape segments, start ({:.2}, {:.2}, {:.0}°)",
            sim.track.len(),
            config.start_x,
            config.start_y,
            config.start_theta.to_degrees()
        );

        let sensors = SensorBuffer::shared();
        let shared = Arc::new(SharedState {
            left_duty: AtomicF32::new(0.0),
            right_duty: AtomicF32::new(0.0),
            shutdown: AtomicBool::new(false),
            pose: Mutex::new(sim.pose()),
        });

        let thread_sensors = Arc::clone(&sensors);
        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("track-simulation".to_string())
            .spawn(move || simulation_loop(config, sim, thread_shared, thread_sensors))
            .map_err(|e| Error::Other(format!("Failed to spawn simulation thread: {}", e)))?;

        Ok(Self {
            sensors,
            shared,
            handle: Some(handle),
        })
    }

    /// Sensor buffer fed by the simulation
    pub fn sensors(&self) -> Arc<SensorBuffer> {
        Arc::clone(&self.sensors)
    }

    /// Actuator handle driving the simulated wheels
    pub fn actuator(&self) -> SimActuator {
        SimActuator {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Latest simulated pose
    pub fn pose(&self) -> Pose2D {
        *self.shared.pose.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Stop the simulation thread and wait for it
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SimulatedRobot {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Actuator sink writing into the simulation
#[derive(Clone)]
pub struct SimActuator {
    shared: Arc<SharedState>,
}

impl ActuatorSink for SimActuator {
    fn set(&mut self, left: f32, right: f32) -> Result<()> {
        if !left.is_finite() || !right.is_finite() {
            return Err(Error::Actuator(format!(
                "non-finite duty ({}, {})",
                left, right
            )));
        }
        self.shared
            .left_duty
            .store(left.clamp(-1.0, 1.0), Ordering::Relaxed);
        self.shared
            .right_duty
            .store(right.clamp(-1.0, 1.0), Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.shared.left_duty.store(0.0, Ordering::Relaxed);
        self.shared.right_duty.store(0.0, Ordering::Relaxed);
        Ok(())
    }
}

/// Main simulation loop
fn simulation_loop(
    config: SimulationConfig,
    mut sim: Simulation,
    shared: Arc<SharedState>,
    sensors: Arc<SensorBuffer>,
) {
    let interval = Duration::from_secs_f32(1.0 / (config.rate_hz * config.speed_factor));
    let mut last_time = Instant::now();

    log::info!(
        "Simulation loop started: speed_factor={}, interval={:?}",
        config.speed_factor,
        interval
    );

    while !shared.shutdown.load(Ordering::Relaxed) {
        let loop_start = Instant::now();

        let now = Instant::now();
        let sim_dt = now.duration_since(last_time).as_secs_f32() * config.speed_factor;
        last_time = now;

        let left = shared.left_duty.load(Ordering::Relaxed);
        let right = shared.right_duty.load(Ordering::Relaxed);
        sim.step(sim_dt, left, right);

        if let Ok(mut pose) = shared.pose.lock() {
            *pose = sim.pose();
        }

        sensors.publish(sim.sense());

        let elapsed = loop_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }

    log::info!("Simulation loop terminated");
}
