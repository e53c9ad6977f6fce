//! Differential drive kinematics for the simulated chassis

use super::config::RobotConfig;
use crate::types::{CHANNEL_COUNT, Channel};
use std::f32::consts::{PI, TAU};

/// 2D pose (position and orientation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading angle in radians
    pub theta: f32,
}

impl Pose2D {
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }
}

/// Physics state for the simulated robot
pub struct PhysicsState {
    pose: Pose2D,
    wheel_base: f32,
    max_wheel_speed: f32,
    sensor_offset: f32,
    sensor_spacing: f32,
}

impl PhysicsState {
    /// Create new physics state at given pose
    pub fn new(start: Pose2D, config: &RobotConfig) -> Self {
        Self {
            pose: start,
            wheel_base: config.wheel_base,
            max_wheel_speed: config.max_wheel_speed,
            sensor_offset: config.sensor_offset,
            sensor_spacing: config.sensor_spacing,
        }
    }

    #[inline]
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// Advance the pose by `dt` seconds under signed wheel duty
    pub fn update(&mut self, dt: f32, left_duty: f32, right_duty: f32) {
        let v_left = left_duty.clamp(-1.0, 1.0) * self.max_wheel_speed;
        let v_right = right_duty.clamp(-1.0, 1.0) * self.max_wheel_speed;

        let linear = (v_left + v_right) / 2.0;
        let angular = (v_right - v_left) / self.wheel_base;

        let Pose2D { x, y, theta } = self.pose;
        let (new_x, new_y, new_theta) = if angular.abs() < 1e-6 {
            // Straight line motion
            (
                x + linear * theta.cos() * dt,
                y + linear * theta.sin() * dt,
                theta,
            )
        } else {
            // Arc motion
            let r = linear / angular;
            let new_theta = theta + angular * dt;
            (
                x + r * (new_theta.sin() - theta.sin()),
                y + r * (theta.cos() - new_theta.cos()),
                new_theta,
            )
        };

        self.pose = Pose2D::new(new_x, new_y, new_theta);
    }

    /// World positions of the five sensors, far-left first
    pub fn sensor_points(&self) -> [(f32, f32); CHANNEL_COUNT] {
        let Pose2D { x, y, theta } = self.pose;
        let (sin, cos) = theta.sin_cos();
        let bar_x = x + self.sensor_offset * cos;
        let bar_y = y + self.sensor_offset * sin;

        // Robot-left is (-sin, cos); slot -2 is the far-left sensor.
        Channel::ALL.map(|ch| {
            let lateral = -(ch.slot() as f32) * self.sensor_spacing;
            (bar_x - lateral * sin, bar_y + lateral * cos)
        })
    }
}

/// Normalize angle to [-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}
