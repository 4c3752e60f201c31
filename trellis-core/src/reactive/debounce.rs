//! Trailing-edge debounce.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::cached::cached_signal_with_dispatcher;
use super::signal::{Signal, SignalLike};
use super::subscriber::{Notify, Unsubscribe};
use crate::scheduler::{CancelToken, Scheduler};

/// Delays every raw upstream notification until `delay` passes without
/// another one. Timers are per subscription.
struct Debounced<T> {
    source: Signal<T>,
    delay: Duration,
    scheduler: Rc<dyn Scheduler>,
}

impl<T: Clone + 'static> SignalLike<T> for Debounced<T> {
    fn get(&self) -> T {
        self.source.get()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let pending: Rc<RefCell<Option<CancelToken>>> = Rc::new(RefCell::new(None));
        let delay = self.delay;
        let scheduler = Rc::clone(&self.scheduler);

        let timer = Rc::clone(&pending);
        let upstream = SignalLike::subscribe(
            &self.source,
            Rc::new(move || {
                if let Some(previous) = timer.borrow_mut().take() {
                    previous.cancel();
                }
                let observer = Rc::clone(&observer);
                let slot = Rc::clone(&timer);
                let token = scheduler.schedule(
                    delay,
                    Box::new(move || {
                        slot.borrow_mut().take();
                        observer();
                    }),
                );
                *timer.borrow_mut() = Some(token);
            }),
        );

        Unsubscribe::new(move || {
            upstream.unsubscribe();
            if let Some(token) = pending.borrow_mut().take() {
                token.cancel();
            }
        })
    }
}

/// Notify only after `source` has been quiet for `delay`, and only if the
/// value actually changed by then.
///
/// All subscribers share one upstream subscription and one timer.
pub fn debounce_signal<T>(source: &Signal<T>, delay: Duration, scheduler: Rc<dyn Scheduler>) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    let debounced = Signal::new(Debounced {
        source: source.clone(),
        delay,
        scheduler,
    });
    cached_signal_with_dispatcher(&debounced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::atom::atom_from_value;
    use crate::scheduler::ManualScheduler;
    use std::cell::Cell;

    const DELAY: Duration = Duration::from_millis(10);

    fn setup() -> (crate::Atom<i32>, Rc<ManualScheduler>, Signal<i32>, Rc<RefCell<Vec<i32>>>, Unsubscribe) {
        let atom = atom_from_value(0);
        let scheduler = Rc::new(ManualScheduler::new());
        let debounced = atom.as_signal().debounce(DELAY, scheduler.clone());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let reader = debounced.clone();
        let token = debounced.subscribe(move || seen_clone.borrow_mut().push(reader.get()));
        (atom, scheduler, debounced, seen, token)
    }

    #[test]
    fn burst_collapses_to_last_value() {
        let (atom, scheduler, debounced, seen, _token) = setup();

        atom.set(1);
        scheduler.advance(Duration::from_millis(5));
        atom.set(2);
        scheduler.advance(Duration::from_millis(5));
        atom.set(3);
        assert!(seen.borrow().is_empty());
        assert_eq!(debounced.get(), 0);

        scheduler.advance(DELAY);
        assert_eq!(*seen.borrow(), vec![3]);
        assert_eq!(debounced.get(), 3);
    }

    #[test]
    fn quiet_period_restarts_on_each_notification() {
        let (atom, scheduler, _debounced, seen, _token) = setup();

        atom.set(1);
        scheduler.advance(Duration::from_millis(9));
        atom.set(2);
        scheduler.advance(Duration::from_millis(9));
        assert!(seen.borrow().is_empty());

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn no_notification_when_value_returns_to_start() {
        let (atom, scheduler, _debounced, seen, _token) = setup();

        atom.set(1);
        atom.set(0);
        scheduler.run_until_idle();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_cancels_pending_timer() {
        let (atom, scheduler, _debounced, seen, token) = setup();

        atom.set(1);
        assert_eq!(scheduler.pending(), 1);
        token.unsubscribe();
        assert_eq!(scheduler.run_until_idle(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn separate_subscriptions_have_separate_timers() {
        let atom = atom_from_value(0);
        let scheduler = Rc::new(ManualScheduler::new());
        let source = atom.as_signal();
        let raw = Signal::new(Debounced {
            source,
            delay: DELAY,
            scheduler: scheduler.clone(),
        });

        let calls = Rc::new(Cell::new(0));
        let first = calls.clone();
        let second = calls.clone();
        let a = raw.subscribe(move || first.set(first.get() + 1));
        let _b = raw.subscribe(move || second.set(second.get() + 1));

        atom.set(1);
        assert_eq!(scheduler.pending(), 2);
        a.unsubscribe();
        scheduler.run_until_idle();
        assert_eq!(calls.get(), 1);
    }
}
