//! Shared sensor buffer with whole-frame snapshot reads.
//!
//! Sensor values may be delivered from a separate I/O context (callbacks,
//! a reader thread, the simulator). The control loop reads all five channels
//! at the start of a tick. Every write and every read happens under one lock,
//! so a reader always sees a frame in which each channel holds either its
//! previous or its new value and never a mix produced mid-read.

use crate::drivers::SensorSource;
use crate::types::{Readings, UNAVAILABLE};
use std::sync::{Arc, Mutex, MutexGuard};

/// Snapshot of the buffer at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Readings, far-left first
    pub readings: Readings,
    /// Number of writes applied so far
    pub sequence: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            readings: UNAVAILABLE,
            sequence: 0,
        }
    }
}

/// Five-channel reflectance buffer (shared between threads)
#[derive(Debug, Default)]
pub struct SensorBuffer {
    inner: Mutex<Snapshot>,
}

impl SensorBuffer {
    /// Create an empty buffer (all channels unavailable)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer behind an `Arc`, ready to hand to a writer and a reader
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // A poisoned lock still guards plain `Copy` data, so keep using it.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("Sensor buffer lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Write one frame under a single lock
    ///
    /// Values are clamped to [0, 1]. A `None` or NaN channel keeps its
    /// previous value.
    pub fn publish(&self, readings: Readings) {
        let mut snap = self.lock();
        for (slot, value) in snap.readings.iter_mut().zip(readings) {
            if let Some(value) = value.and_then(sanitize) {
                *slot = Some(value);
            }
        }
        snap.sequence += 1;
    }

    /// Consistent copy of all channels
    pub fn snapshot(&self) -> Snapshot {
        *self.lock()
    }
}

#[inline]
fn sanitize(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, 1.0))
    }
}

impl SensorSource for Arc<SensorBuffer> {
    fn read(&mut self) -> Readings {
        self.snapshot().readings
    }
}
