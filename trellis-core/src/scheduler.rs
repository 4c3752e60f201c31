//! Delayed-callback scheduling.
//!
//! Debouncing needs a timer, but the runtime itself has no event loop. Hosts
//! hand a [`Scheduler`] to the combinators that need one. [`ManualScheduler`]
//! is a deterministic virtual-clock implementation: nothing runs until the
//! host advances time, which makes it suitable both as a cooperative event
//! loop and for tests.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Conventional delay for debounced signals.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(16);

/// Shared cancellation flag for a scheduled task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the task. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A source of delayed callbacks.
///
/// Implementations must never run a task whose token has been cancelled, and
/// must not run tasks synchronously from inside `schedule`.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> CancelToken;
}

struct Timer {
    due: Duration,
    seq: u64,
    token: CancelToken,
    task: Box<dyn FnOnce()>,
}

/// Single-threaded scheduler driven by an explicit virtual clock.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use trellis_core::{ManualScheduler, Scheduler};
///
/// let scheduler = ManualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = fired.clone();
/// scheduler.schedule(Duration::from_millis(10), Box::new(move || flag.set(true)));
///
/// scheduler.advance(Duration::from_millis(9));
/// assert!(!fired.get());
/// scheduler.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
}

impl ManualScheduler {
    /// Create a scheduler whose clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of scheduled tasks that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|timer| !timer.token.is_cancelled())
            .count()
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Tasks run in due-time order, ties in scheduling order. Tasks scheduled
    /// by a running task are picked up if they fall due inside the window.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut ran = 0;
        while let Some(timer) = self.pop_next(Some(target)) {
            ran += self.fire(timer);
        }
        self.now.set(target);
        ran
    }

    /// Run every pending task, advancing the clock as far as needed.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(timer) = self.pop_next(None) {
            ran += self.fire(timer);
        }
        ran
    }

    fn fire(&self, timer: Timer) -> usize {
        self.now.set(timer.due);
        if timer.token.is_cancelled() {
            return 0;
        }
        (timer.task)();
        1
    }

    fn pop_next(&self, limit: Option<Duration>) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| limit.map_or(true, |limit| timer.due <= limit))
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> CancelToken {
        let token = CancelToken::new();
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let mut timers = self.timers.borrow_mut();
        // Cancelled timers would otherwise linger until their due time passes.
        timers.retain(|timer| !timer.token.is_cancelled());
        timers.push(Timer {
            due: self.now.get() + delay,
            seq,
            token: token.clone(),
            task,
        });
        token
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn log_task(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> Box<dyn FnOnce()> {
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(tag))
    }

    #[test]
    fn runs_due_tasks_in_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(ms(20), log_task(&log, "late"));
        scheduler.schedule(ms(10), log_task(&log, "early"));
        scheduler.schedule(ms(10), log_task(&log, "early-second"));

        assert_eq!(scheduler.advance(ms(15)), 2);
        assert_eq!(*log.borrow(), vec!["early", "early-second"]);
        assert_eq!(scheduler.now(), ms(15));

        assert_eq!(scheduler.advance(ms(5)), 1);
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let token = scheduler.schedule(ms(5), log_task(&log, "cancelled"));
        assert_eq!(scheduler.pending(), 1);

        token.cancel();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance(ms(10)), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn tasks_scheduled_by_tasks_run_within_window() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = scheduler.clone();
        let inner_log = log.clone();
        scheduler.schedule(
            ms(5),
            Box::new(move || {
                inner_log.borrow_mut().push("outer");
                inner_scheduler.schedule(ms(5), log_task(&inner_log, "inner"));
            }),
        );

        assert_eq!(scheduler.advance(ms(10)), 2);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn run_until_idle_drains_everything() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(ms(100), log_task(&log, "a"));
        scheduler.schedule(ms(300), log_task(&log, "b"));

        assert_eq!(scheduler.run_until_idle(), 2);
        assert_eq!(scheduler.now(), ms(300));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn cancelled_timers_are_pruned_on_schedule() {
        let scheduler = ManualScheduler::new();
        let mut previous: Option<CancelToken> = None;
        for _ in 0..100 {
            if let Some(token) = previous.take() {
                token.cancel();
            }
            previous = Some(scheduler.schedule(ms(10), Box::new(|| {})));
        }

        assert_eq!(scheduler.timers.borrow().len(), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.run_until_idle(), 1);
    }
}
