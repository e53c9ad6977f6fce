//! Shared state between the control thread and the main thread.
//!
//! The control thread publishes its status and route position here after
//! every change; the main thread polls it for logging and to decide when the
//! run is over. Everything is lock-free.

use crate::controller::Status;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicUsize, Ordering};

/// Shared state between all threads.
#[derive(Debug)]
pub struct SharedState {
    status: AtomicU8,

    /// Index into the route sequence
    route_index: AtomicUsize,

    /// Step within the current route
    step_index: AtomicUsize,

    /// Junctions handled over the whole run
    junction_count: AtomicU32,

    /// Control loop terminated with an error
    pub fault: AtomicBool,

    /// Shutdown signal for graceful termination
    pub shutdown: AtomicBool,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(Status::Following as u8),
            route_index: AtomicUsize::new(0),
            step_index: AtomicUsize::new(0),
            junction_count: AtomicU32::new(0),
            fault: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Publish controller status and route position
    pub fn publish(&self, status: Status, route_index: usize, step_index: usize) {
        self.route_index.store(route_index, Ordering::Release);
        self.step_index.store(step_index, Ordering::Release);
        self.status.store(status as u8, Ordering::Release);
    }

    pub fn status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::Acquire))
    }

    /// (route index, step index)
    pub fn position(&self) -> (usize, usize) {
        (
            self.route_index.load(Ordering::Acquire),
            self.step_index.load(Ordering::Acquire),
        )
    }

    pub fn record_junction(&self) {
        self.junction_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn junction_count(&self) -> u32 {
        self.junction_count.load(Ordering::Relaxed)
    }

    /// Mark the control loop as failed.
    pub fn set_fault(&self) {
        self.fault.store(true, Ordering::Release);
    }

    pub fn has_fault(&self) -> bool {
        self.fault.load(Ordering::Acquire)
    }

    /// Signal shutdown.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Check if shutdown is signaled.
    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
