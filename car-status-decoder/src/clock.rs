//! Monotonic tick sources used to timestamp field updates

use std::cell::Cell;
use std::time::Instant;

/// Milliseconds from a monotonic source
pub type Tick = u64;

/// Read-only access to the current tick
pub trait TickSource {
    /// Current tick; never decreases between calls
    fn now(&self) -> Tick;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// Wall-independent clock counting milliseconds since it was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicClock {
    fn now(&self) -> Tick {
        self.start.elapsed().as_millis() as Tick
    }
}

/// Manually driven clock for tests and deterministic replays
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: Cell<Tick>,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self {
            tick: Cell::new(start),
        }
    }

    /// Move the clock forward by `millis`
    pub fn advance(&self, millis: Tick) {
        self.tick.set(self.tick.get().saturating_add(millis));
    }
}

impl TickSource for ManualClock {
    fn now(&self) -> Tick {
        self.tick.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now(), 10);
        clock.advance(5);
        assert_eq!(clock.now(), 15);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
