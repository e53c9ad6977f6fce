//! Mock sensor and actuator drivers for testing
//!
//! Both mocks are cheap to clone and share their state, so a test can move
//! one clone into the controller and keep another for inspection.

use crate::drivers::{ActuatorSink, SensorSource};
use crate::error::{Error, Result};
use crate::types::{CHANNEL_COUNT, Readings};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Reading used for a channel that sees the line
pub const DARK: f32 = 0.1;
/// Reading used for a channel that sees background
pub const BRIGHT: f32 = 0.9;

/// Build readings from a line pattern (1 = over the line)
pub fn readings_from_bits(bits: [u8; CHANNEL_COUNT]) -> Readings {
    bits.map(|b| Some(if b != 0 { DARK } else { BRIGHT }))
}

/// One call received by [`MockActuator`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Set { left: f32, right: f32 },
    Stop,
}

#[derive(Debug, Default)]
struct MockActuatorState {
    calls: Vec<ActuatorCall>,
    fail_set: bool,
    fail_stop: bool,
}

/// Recording actuator with fault injection
#[derive(Clone, Default)]
pub struct MockActuator {
    state: Arc<Mutex<MockActuatorState>>,
}

impl MockActuator {
    /// Create new mock actuator
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockActuatorState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Make subsequent `set` calls fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_set = fail;
    }

    /// Make subsequent `stop` calls fail
    pub fn fail_stops(&self, fail: bool) {
        self.lock().fail_stop = fail;
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.lock().calls.clone()
    }

    /// Most recent call
    pub fn last_call(&self) -> Option<ActuatorCall> {
        self.lock().calls.last().copied()
    }

    /// Number of `stop` calls received
    pub fn stop_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Stop))
            .count()
    }
}

impl ActuatorSink for MockActuator {
    fn set(&mut self, left: f32, right: f32) -> Result<()> {
        let mut state = self.lock();
        if state.fail_set {
            return Err(Error::Actuator("mock write rejected".to_string()));
        }
        state.calls.push(ActuatorCall::Set { left, right });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(ActuatorCall::Stop);
        if state.fail_stop {
            return Err(Error::Actuator("mock stop rejected".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct ScriptState {
    frames: VecDeque<Readings>,
    last: Readings,
    reads: usize,
}

/// Sensor source that plays back a script of frames
///
/// Each read consumes one frame; once the script runs out the last frame
/// repeats forever.
#[derive(Clone)]
pub struct ScriptedSensor {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSensor {
    /// Create a source that starts with `initial` and plays nothing else
    pub fn new(initial: Readings) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                frames: VecDeque::new(),
                last: initial,
                reads: 0,
            })),
        }
    }

    /// Create a source holding a single line pattern
    pub fn from_bits(bits: [u8; CHANNEL_COUNT]) -> Self {
        Self::new(readings_from_bits(bits))
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Queue a frame
    pub fn push(&self, readings: Readings) {
        self.lock().frames.push_back(readings);
    }

    /// Queue a line pattern `count` times
    pub fn push_bits(&self, bits: [u8; CHANNEL_COUNT], count: usize) {
        let mut state = self.lock();
        for _ in 0..count {
            state.frames.push_back(readings_from_bits(bits));
        }
    }

    /// Number of reads performed
    pub fn reads(&self) -> usize {
        self.lock().reads
    }
}

impl SensorSource for ScriptedSensor {
    fn read(&mut self) -> Readings {
        let mut state = self.lock();
        state.reads += 1;
        if let Some(frame) = state.frames.pop_front() {
            state.last = frame;
        }
        state.last
    }
}
