//! Fake timers for deterministic tests.
//!
//! Time only moves when a test calls [`MockTimers::advance`]. Due tasks run in
//! `(due time, scheduling order)` order, and the clock reads the task's due
//! time while it runs, so a task scheduled from inside another task is timed
//! from the right moment.

use crate::dom::{TimerTask, Timers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Safety limit on tasks run by a single `run_all`
const MAX_TASKS_PER_RUN: usize = 10_000;

struct TimerEntry {
    due: Duration,
    seq: u64,
    task: TimerTask,
}

#[derive(Default)]
struct TimerState {
    now: Duration,
    next_seq: u64,
    queue: Vec<TimerEntry>,
    fired: usize,
}

impl TimerState {
    fn pop_due(&mut self, until: Duration) -> Option<TimerEntry> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(self.queue.swap_remove(index))
    }
}

/// Shared fake clock with a timer queue
#[derive(Clone, Default)]
pub struct MockTimers {
    state: Rc<RefCell<TimerState>>,
}

impl std::fmt::Debug for MockTimers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockTimers")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .field("fired", &state.fired)
            .finish()
    }
}

impl MockTimers {
    /// Clock at zero, nothing scheduled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fake time since the clock was created
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Timers scheduled but not yet fired
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Timers fired so far
    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.state.borrow().fired
    }

    /// Due time of the earliest pending timer
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.state.borrow().queue.iter().map(|e| e.due).min()
    }

    /// Move time forward by `by`, running every task that falls due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            // No borrow may be held while a task runs: tasks schedule timers
            let entry = {
                let mut state = self.state.borrow_mut();
                let entry = state.pop_due(target);
                if let Some(e) = &entry {
                    state.now = e.due;
                }
                entry
            };
            let Some(entry) = entry else { break };
            (entry.task)();
            self.state.borrow_mut().fired += 1;
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    /// Advance by whole milliseconds
    pub fn advance_ms(&self, ms: u64) -> usize {
        self.advance(Duration::from_millis(ms))
    }

    /// Run timers until none are pending (bounded)
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while ran < MAX_TASKS_PER_RUN {
            let Some(due) = self.next_due() else { break };
            let step = due.saturating_sub(self.now());
            let fired = self.advance(step);
            if fired == 0 {
                break;
            }
            ran += fired;
        }
        ran
    }
}

impl Timers for MockTimers {
    fn set_timeout(&self, delay: Duration, task: TimerTask) {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(TimerEntry { due, seq, task });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_timer_fires_at_due_time() {
        let timers = MockTimers::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        timers.set_timeout(Duration::from_millis(2000), Box::new(move || flag.set(true)));

        assert_eq!(timers.advance_ms(1999), 0);
        assert!(!fired.get());
        assert_eq!(timers.advance_ms(1), 1);
        assert!(fired.get());
        assert_eq!(timers.now(), Duration::from_millis(2000));
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_timers_run_in_due_then_schedule_order() {
        let timers = MockTimers::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (label, ms) in [("c", 30), ("a", 10), ("b", 10)] {
            let order = Rc::clone(&order);
            timers.set_timeout(
                Duration::from_millis(ms),
                Box::new(move || order.borrow_mut().push(label)),
            );
        }

        timers.advance_ms(100);

        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(timers.fired_count(), 3);
    }

    #[test]
    fn test_nested_timer_is_timed_from_parent() {
        let timers = MockTimers::new();
        let fired_at = Rc::new(Cell::new(Duration::ZERO));
        let inner_timers = timers.clone();
        let slot = Rc::clone(&fired_at);
        timers.set_timeout(
            Duration::from_millis(100),
            Box::new(move || {
                let clock = inner_timers.clone();
                inner_timers.set_timeout(
                    Duration::from_millis(50),
                    Box::new(move || slot.set(clock.now())),
                );
            }),
        );

        timers.advance_ms(1000);

        assert_eq!(fired_at.get(), Duration::from_millis(150));
    }

    #[test]
    fn test_run_all() {
        let timers = MockTimers::new();
        timers.set_timeout(Duration::from_secs(8), Box::new(|| {}));
        timers.set_timeout(Duration::from_secs(2), Box::new(|| {}));

        assert_eq!(timers.next_due(), Some(Duration::from_secs(2)));
        assert_eq!(timers.run_all(), 2);
        assert_eq!(timers.now(), Duration::from_secs(8));
        assert_eq!(timers.next_due(), None);
    }
}
