//! LinetraceNav - Navigation core for a five-sensor line follower
//!
//! Follows a taped line, counts junctions and executes a pre-programmed
//! turn at each one until the route's destination is reached.
//!
//! ## Per-Tick Control Flow
//!
//! ```text
//! SensorSource ─▶ SensorFrame ─▶ JunctionDetector ──junction──▶ TurnExecutor
//!                                      │                             │
//!                                      └──otherwise──▶ LineCorrector │
//!                                                           │        │
//!                                                           ▼        ▼
//!                                                    DifferentialDrive ─▶ ActuatorSink
//! ```
//!
//! Hardware arrives through the [`SensorSource`](linetrace_io::SensorSource)
//! and [`ActuatorSink`](linetrace_io::ActuatorSink) traits; time through
//! [`Clock`]. Nothing in this crate talks to a device directly.

pub mod clock;
pub mod config;
pub mod controller;
pub mod corrector;
pub mod drive;
pub mod error;
pub mod frame;
pub mod hardware;
pub mod junction;
pub mod recovery;
pub mod route;
pub mod shared;
pub mod threads;
pub mod turn;

pub use clock::{CancelToken, Clock, ManualClock, Pacer, SystemClock};
pub use config::{NavConfig, TimeoutPolicy};
pub use controller::{RouteController, Status};
pub use corrector::{LastDirection, LineCorrector};
pub use drive::{DifferentialDrive, DriveCommand, Side};
pub use error::{NavError, Result};
pub use frame::{Pattern, PatternClass, SensorFrame};
pub use junction::{JunctionKind, is_junction};
pub use route::{CooldownTimer, Route, RoutePlan, TurnAction};
pub use shared::SharedState;
pub use turn::{TurnExecutor, TurnOutcome};
