//! Leading+trailing debouncer driven by host-supplied instants.
//!
//! The first call of a burst fires immediately and opens a window of `delay`. Calls inside the
//! window only replace the pending arguments; when the window has elapsed, [`Debouncer::poll`]
//! fires once with the latest arguments and opens a fresh window. A window that elapses with
//! nothing pending closes, and the next call is a leading call again.

use std::time::{Duration, Instant};

/// Coalesces calls carrying arguments of type `A`.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    delay: Duration,
    window_end: Option<Instant>,
    pending: Option<A>,
}

impl<A> Debouncer<A> {
    /// A debouncer with the given delay. A zero delay fires every call immediately.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            window_end: None,
            pending: None,
        }
    }

    /// Current delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register a call. Returns the arguments to run with now, if the call is a leading one.
    pub fn call(&mut self, args: A, now: Instant) -> Option<A> {
        if self.delay.is_zero() {
            return Some(args);
        }
        match self.window_end {
            Some(end) if now < end => {
                self.pending = Some(args);
                None
            }
            _ => {
                // Anything still pending from an expired window is superseded by this call.
                self.pending = None;
                self.window_end = Some(now + self.delay);
                Some(args)
            }
        }
    }

    /// Fire the trailing call if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        let end = self.window_end?;
        if now < end {
            return None;
        }
        match self.pending.take() {
            Some(args) => {
                self.window_end = Some(now + self.delay);
                Some(args)
            }
            None => {
                self.window_end = None;
                None
            }
        }
    }

    /// When the pending trailing call is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and(self.window_end)
    }

    /// Returns `true` if a trailing call is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Change the delay. A different delay rebuilds the debouncer, dropping any pending call;
    /// returns whether that happened.
    pub fn set_delay(&mut self, delay: Duration) -> bool {
        if delay == self.delay {
            return false;
        }
        *self = Self::new(delay);
        true
    }

    /// Drop the pending call and close the window.
    pub fn cancel(&mut self) -> Option<A> {
        self.window_end = None;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_leading_then_trailing_with_last_args() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        assert_eq!(debouncer.call(1, start), Some(1));
        assert_eq!(debouncer.call(2, start + Duration::from_millis(10)), None);
        assert_eq!(debouncer.call(3, start + Duration::from_millis(20)), None);
        assert_eq!(debouncer.deadline(), Some(start + DELAY));

        assert_eq!(debouncer.poll(start + Duration::from_millis(99)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some(3));
        assert_eq!(debouncer.poll(start + DELAY * 3), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_window_closes_when_idle() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.call("a", start), Some("a"));
        assert_eq!(debouncer.poll(start + DELAY), None);
        assert_eq!(debouncer.call("b", start + DELAY), Some("b"));
    }

    #[test]
    fn test_zero_delay_fires_every_call() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert_eq!(debouncer.call(1, now), Some(1));
        assert_eq!(debouncer.call(2, now), Some(2));
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_set_delay_rebuilds() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.call(1, now);
        debouncer.call(2, now);
        assert!(!debouncer.set_delay(DELAY));
        assert!(debouncer.has_pending());
        assert!(debouncer.set_delay(Duration::from_millis(10)));
        assert!(!debouncer.has_pending());
        assert_eq!(debouncer.call(3, now), Some(3));
    }
}
