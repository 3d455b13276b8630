//! Recompute scheduling: `Idle -> Scheduled -> Recomputing -> Idle`.

use crate::debounce::Debouncer;
use std::time::{Duration, Instant};

/// Why a recompute was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The document text changed.
    DocumentChanged,
    /// The visible ranges changed.
    ViewportChanged,
    /// The active configuration changed.
    ConfigChanged,
    /// The selection moved.
    SelectionChanged,
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Nothing pending.
    #[default]
    Idle,
    /// A trailing recompute is waiting for its debounce window.
    Scheduled,
    /// A recompute is running.
    Recomputing,
}

/// Debounced recompute scheduler for one kind of highlighting.
///
/// Triggers carry no document state: the recompute closure always reads the latest view, so a
/// newer trigger simply supersedes an older pending one.
#[derive(Debug, Clone)]
pub struct RecomputeScheduler {
    debouncer: Debouncer<Trigger>,
    state: SchedulerState,
    selection_triggers: bool,
    recomputes: u64,
}

impl RecomputeScheduler {
    /// A scheduler that reacts to every trigger.
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            state: SchedulerState::Idle,
            selection_triggers: true,
            recomputes: 0,
        }
    }

    /// Choose whether [`Trigger::SelectionChanged`] schedules a recompute.
    pub fn with_selection_triggers(mut self, enabled: bool) -> Self {
        self.selection_triggers = enabled;
        self
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Debounce delay.
    pub fn delay(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Number of recomputes run so far.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Returns `true` if `trigger` is relevant to this scheduler.
    pub fn accepts(&self, trigger: Trigger) -> bool {
        trigger != Trigger::SelectionChanged || self.selection_triggers
    }

    /// Register a trigger; runs `recompute` immediately when it is the leading call of a burst.
    pub fn trigger<R>(
        &mut self,
        trigger: Trigger,
        now: Instant,
        recompute: impl FnOnce(Trigger) -> R,
    ) -> Option<R> {
        if !self.accepts(trigger) {
            return None;
        }
        match self.debouncer.call(trigger, now) {
            Some(trigger) => Some(self.run(trigger, recompute)),
            None => {
                self.state = SchedulerState::Scheduled;
                None
            }
        }
    }

    /// Run the trailing recompute if its window has elapsed.
    pub fn poll<R>(&mut self, now: Instant, recompute: impl FnOnce(Trigger) -> R) -> Option<R> {
        let trigger = self.debouncer.poll(now)?;
        Some(self.run(trigger, recompute))
    }

    /// When [`poll`](Self::poll) should next be called.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Change the delay, rebuilding the debouncer when it differs. Returns whether it changed.
    pub fn set_delay(&mut self, delay: Duration) -> bool {
        let changed = self.debouncer.set_delay(delay);
        if changed {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "debouncer rebuilt");
            self.state = SchedulerState::Idle;
        }
        changed
    }

    /// Drop any pending recompute.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
        self.state = SchedulerState::Idle;
    }

    fn run<R>(&mut self, trigger: Trigger, recompute: impl FnOnce(Trigger) -> R) -> R {
        self.state = SchedulerState::Recomputing;
        tracing::debug!(?trigger, "recompute");
        let result = recompute(trigger);
        self.recomputes += 1;
        self.state = if self.debouncer.has_pending() {
            SchedulerState::Scheduled
        } else {
            SchedulerState::Idle
        };
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let start = Instant::now();
        let delay = Duration::from_millis(50);
        let mut scheduler = RecomputeScheduler::new(delay);
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let fired = scheduler.trigger(Trigger::DocumentChanged, start, |t| t);
        assert_eq!(fired, Some(Trigger::DocumentChanged));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        assert_eq!(scheduler.trigger(Trigger::ViewportChanged, start, |t| t), None);
        assert_eq!(scheduler.state(), SchedulerState::Scheduled);
        assert_eq!(scheduler.next_deadline(), Some(start + delay));

        assert_eq!(scheduler.poll(start + delay, |t| t), Some(Trigger::ViewportChanged));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.recomputes(), 2);
    }

    #[test]
    fn test_selection_triggers_can_be_ignored() {
        let now = Instant::now();
        let mut scheduler = RecomputeScheduler::new(Duration::ZERO).with_selection_triggers(false);
        assert_eq!(scheduler.trigger(Trigger::SelectionChanged, now, |_| ()), None);
        assert_eq!(scheduler.trigger(Trigger::ConfigChanged, now, |_| ()), Some(()));
    }
}
