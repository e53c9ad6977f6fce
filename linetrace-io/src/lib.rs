//! LinetraceIO - Hardware abstraction for a five-channel line follower
//!
//! This library provides the two capabilities the navigation core consumes
//! and the stand-ins used when no robot is attached.
//!
//! ## Components
//!
//! - [`SensorSource`] / [`ActuatorSink`]: the hardware seams
//! - [`SensorBuffer`]: shared channel buffer with whole-frame snapshot reads
//! - [`mock`]: scripted sensor and recording actuator for tests
//! - [`sim`]: track simulator driving both seams from a background thread

pub mod buffer;
pub mod drivers;
pub mod error;
pub mod mock;
pub mod sim;
pub mod types;

// Re-export commonly used types
pub use buffer::{SensorBuffer, Snapshot};
pub use drivers::{ActuatorSink, SensorSource};
pub use error::{Error, Result};
pub use types::{CHANNEL_COUNT, Channel, Readings, UNAVAILABLE};
