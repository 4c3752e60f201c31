//! Caching combinators.
//!
//! Both combinators remember the last upstream value and only notify when a
//! raw upstream notification turns out to carry an actual change.
//!
//! - [`cached_signal`] forwards each downstream subscription to its own
//!   upstream subscription.
//! - [`cached_signal_with_dispatcher`] multiplexes: all downstream
//!   subscribers share one upstream subscription, created with the first
//!   subscriber and dropped with the last.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::dispatcher::Dispatcher;
use super::equality::{equals, EqualsFn};
use super::signal::{Signal, SignalLike};
use super::subscriber::{Notify, Observer, Unsubscribe};

struct Cached<T> {
    source: Signal<T>,
    current: Rc<RefCell<T>>,
    equals: EqualsFn<T>,
}

impl<T: Clone + 'static> SignalLike<T> for Cached<T> {
    fn get(&self) -> T {
        self.current.borrow().clone()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let source = self.source.clone();
        let current = Rc::clone(&self.current);
        let equals = Rc::clone(&self.equals);
        // Each subscription compares against what it last saw, so one
        // subscriber refreshing `current` cannot hide the change from others.
        let seen = RefCell::new(self.current.borrow().clone());
        SignalLike::subscribe(
            &self.source,
            Rc::new(move || {
                let next = source.get();
                let unchanged = equals(&seen.borrow(), &next);
                if !unchanged {
                    *seen.borrow_mut() = next.clone();
                    *current.borrow_mut() = next;
                    observer();
                }
            }),
        )
    }
}

/// Cache `source` and notify only on actual changes (`PartialEq`).
///
/// `get` returns the last value seen, not the live upstream value.
pub fn cached_signal<T>(source: &Signal<T>) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    cached_signal_by(source, equals())
}

/// [`cached_signal`] with a custom change test.
pub fn cached_signal_by<T>(source: &Signal<T>, equals: EqualsFn<T>) -> Signal<T>
where
    T: Clone + 'static,
{
    Signal::new(Cached {
        current: Rc::new(RefCell::new(source.get())),
        source: source.clone(),
        equals,
    })
}

struct SharedState<T> {
    dispatcher: Dispatcher<()>,
    current: RefCell<T>,
    upstream: RefCell<Option<Unsubscribe>>,
    equals: EqualsFn<T>,
}

impl<T: Clone + 'static> SharedState<T> {
    fn refresh(&self, source: &Signal<T>) {
        let next = source.get();
        let unchanged = (self.equals)(&self.current.borrow(), &next);
        if !unchanged {
            *self.current.borrow_mut() = next;
            self.dispatcher.dispatch(());
        }
    }

    fn attach(state: &Rc<Self>, source: &Signal<T>) {
        *state.current.borrow_mut() = source.get();

        let weak: Weak<Self> = Rc::downgrade(state);
        let reader = source.clone();
        let token = SignalLike::subscribe(
            source,
            Rc::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.refresh(&reader);
                }
            }),
        );
        *state.upstream.borrow_mut() = Some(token);
        debug!("shared upstream subscription attached");
    }

    fn detach(&self) {
        let token = self.upstream.borrow_mut().take();
        if let Some(token) = token {
            token.unsubscribe();
            debug!("shared upstream subscription released");
        }
    }
}

struct Shared<T> {
    source: Signal<T>,
    state: Rc<SharedState<T>>,
}

impl<T: Clone + 'static> SignalLike<T> for Shared<T> {
    fn get(&self) -> T {
        if self.state.dispatcher.count() == 0 {
            // Nobody keeps the cache fresh while unsubscribed.
            let value = self.source.get();
            *self.state.current.borrow_mut() = value.clone();
            return value;
        }
        self.state.current.borrow().clone()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let entry: Observer<()> = Rc::new(move |_: &()| observer());
        self.state.dispatcher.add(Rc::clone(&entry));
        if self.state.dispatcher.count() == 1 {
            SharedState::attach(&self.state, &self.source);
        }

        let state = Rc::clone(&self.state);
        Unsubscribe::new(move || {
            if state.dispatcher.remove(&entry) && state.dispatcher.count() == 0 {
                state.detach();
            }
        })
    }
}

/// Like [`cached_signal`], but every subscriber shares a single upstream
/// subscription.
///
/// The upstream subscription is created lazily with the first subscriber and
/// torn down when the subscriber count returns to zero.
pub fn cached_signal_with_dispatcher<T>(source: &Signal<T>) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    cached_signal_with_dispatcher_by(source, equals())
}

/// [`cached_signal_with_dispatcher`] with a custom change test.
pub fn cached_signal_with_dispatcher_by<T>(source: &Signal<T>, equals: EqualsFn<T>) -> Signal<T>
where
    T: Clone + 'static,
{
    Signal::new(Shared {
        state: Rc::new(SharedState {
            dispatcher: Dispatcher::new(),
            current: RefCell::new(source.get()),
            upstream: RefCell::new(None),
            equals,
        }),
        source: source.clone(),
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
