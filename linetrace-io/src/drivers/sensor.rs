//! Line sensor trait

use crate::types::Readings;

/// Five-channel reflectance source
///
/// Implementations may be fed asynchronously, but `read` must return a
/// snapshot in which no channel update is half-applied relative to the others.
pub trait SensorSource: Send {
    /// Latest normalized readings (0.0 dark .. 1.0 bright), far-left first
    fn read(&mut self) -> Readings;
}

impl<T: SensorSource + ?Sized> SensorSource for Box<T> {
    fn read(&mut self) -> Readings {
        (**self).read()
    }
}
