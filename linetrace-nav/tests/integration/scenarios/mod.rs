//! End-to-end navigation scenarios

mod cancellation;
mod cooldown;
mod line_lost;
mod route;
