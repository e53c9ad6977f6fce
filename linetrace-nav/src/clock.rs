//! Time source, cancellation, and cancellable waits
//!
//! Every timed maneuver waits through a [`Pacer`], which sleeps in short
//! slices and checks the [`CancelToken`] between them. Tests drive the same
//! code with a [`ManualClock`] whose `sleep` only moves the time forward.

use crate::error::{NavError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock; `sleep` advances time instantly
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed by every clone
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Sliced, cancellable waiting on top of a [`Clock`]
pub struct Pacer<C> {
    clock: C,
    cancel: CancelToken,
    slice: Duration,
}

impl<C: Clock> Pacer<C> {
    /// `slice` bounds how long a wait runs before the token is checked
    pub fn new(clock: C, cancel: CancelToken, slice: Duration) -> Self {
        Self {
            clock,
            cancel,
            slice: slice.max(Duration::from_millis(1)),
        }
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Fail with [`NavError::Cancelled`] once cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(NavError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait for `duration`, giving up early on cancellation
    pub fn hold(&self, duration: Duration) -> Result<()> {
        self.check()?;
        let deadline = self.clock.now() + duration;
        loop {
            let now = self.clock.now();
            if now >= deadline {
                return Ok(());
            }
            self.clock.sleep(self.slice.min(deadline - now));
            self.check()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacer(clock: &ManualClock, token: &CancelToken) -> Pacer<ManualClock> {
        Pacer::new(clock.clone(), token.clone(), Duration::from_millis(10))
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_hold_advances_exactly() {
        let clock = ManualClock::new();
        let token = CancelToken::new();
        pacer(&clock, &token)
            .hold(Duration::from_millis(425))
            .unwrap();
        assert_eq!(clock.now(), Duration::from_millis(425));
    }

    #[test]
    fn test_hold_fails_when_cancelled() {
        let clock = ManualClock::new();
        let token = CancelToken::new();
        let pacer = pacer(&clock, &token);
        token.cancel();
        assert!(matches!(
            pacer.hold(Duration::from_secs(5)),
            Err(NavError::Cancelled)
        ));
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_cancel_interrupts_long_wait() {
        let token = CancelToken::new();
        let pacer = Pacer::new(
            SystemClock::new(),
            token.clone(),
            Duration::from_millis(5),
        );
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            token.cancel();
        });

        let start = Instant::now();
        let result = pacer.hold(Duration::from_secs(10));
        canceller.join().unwrap();

        assert!(matches!(result, Err(NavError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_zero_hold_returns_immediately() {
        let clock = ManualClock::new();
        let token = CancelToken::new();
        pacer(&clock, &token).hold(Duration::ZERO).unwrap();
        assert_eq!(clock.now(), Duration::ZERO);
    }
}
