//! Wheel actuator trait

use crate::error::Result;

/// Differential wheel actuator
///
/// The sink holds the last written command until it is overwritten.
pub trait ActuatorSink: Send {
    /// Set signed wheel duty
    ///
    /// # Arguments
    /// * `left` - Left wheel duty in [-1, 1], sign is direction
    /// * `right` - Right wheel duty in [-1, 1], sign is direction
    fn set(&mut self, left: f32, right: f32) -> Result<()>;

    /// Stop both wheels immediately
    fn stop(&mut self) -> Result<()>;
}

impl<T: ActuatorSink + ?Sized> ActuatorSink for Box<T> {
    fn set(&mut self, left: f32, right: f32) -> Result<()> {
        (**self).set(left, right)
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }
}
