//! Device driver traits

pub mod actuator;
pub mod sensor;

pub use actuator::ActuatorSink;
pub use sensor::SensorSource;
