//! Reflectance noise and channel dropout
//!
//! Turns the ideal reflectance under a sensor into what the ADC would
//! report: jittered, clamped to the normalized range, and occasionally
//! missing when a channel skips an update.

use super::config::OpticsConfig;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

/// Per-channel reading model
pub struct SensorNoise {
    rng: SmallRng,
    jitter: Option<Normal<f32>>,
    dropout: f64,
}

impl SensorNoise {
    /// Seed 0 draws from OS entropy
    pub fn new(seed: u64, optics: &OpticsConfig) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };

        let jitter = if optics.noise_stddev > 0.0 {
            Normal::new(0.0, optics.noise_stddev).ok()
        } else {
            None
        };

        let dropout = if optics.dropout_rate.is_finite() {
            f64::from(optics.dropout_rate.clamp(0.0, 1.0))
        } else {
            0.0
        };

        Self {
            rng,
            jitter,
            dropout,
        }
    }

    /// Reading for one channel over a surface of reflectance `ideal`
    ///
    /// `None` when the channel drops this update.
    pub fn reading(&mut self, ideal: f32) -> Option<f32> {
        if self.dropout > 0.0 && self.rng.gen_bool(self.dropout) {
            return None;
        }
        let offset = match &self.jitter {
            Some(normal) => self.rng.sample(normal),
            None => 0.0,
        };
        Some((ideal + offset).clamp(0.0, 1.0))
    }
}
