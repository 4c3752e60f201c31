//! Signal Implementation
//!
//! A Signal is a read-only reactive value. It is a cheap, clonable handle to
//! something implementing [`SignalLike`]: a `get` that returns the latest
//! committed value and a `subscribe` that registers a raw notification.
//!
//! # How Signals Work
//!
//! 1. Notifications carry no payload. They mean "this may have changed";
//!    the observer calls `get()` to find out what the value is now.
//!
//! 2. A value is committed before its notification is dispatched, so an
//!    observer that calls `get()` from inside its own callback always sees
//!    the new value.
//!
//! 3. Derived signals (`map`, `view`, `filter`) own no dispatcher. They
//!    forward subscriptions to their upstream. Caching combinators interpose
//!    their own, see [`cached_signal`](crate::cached_signal) and
//!    [`cached_signal_with_dispatcher`](crate::cached_signal_with_dispatcher).
//!
//! # Lifetimes
//!
//! A live subscription keeps its upstream chain alive. Everything is released
//! once the subscription is torn down with [`Unsubscribe::unsubscribe`].

use std::fmt::{self, Debug};
use std::rc::Rc;
use std::time::Duration;

use super::cached::cached_signal;
use super::debounce::debounce_signal;
use super::derived::{filter_map_signal, filter_signal, map_signal, view_signal};
use super::log::{LogSink, TracingSink};
use super::subscriber::{Notify, Unsubscribe};
use crate::error::Result;
use crate::lens::Lens;
use crate::scheduler::Scheduler;

/// The minimal read side of the reactive contract.
pub trait SignalLike<T> {
    /// The latest committed value.
    fn get(&self) -> T;

    /// Call `observer` whenever the value might have changed.
    ///
    /// This is a low-level API: the value is not compared before notifying.
    fn subscribe(&self, observer: Notify) -> Unsubscribe;
}

/// Adapter that turns a pair of closures into a [`SignalLike`].
struct FnSignal<G, S> {
    get: G,
    subscribe: S,
}

impl<T, G, S> SignalLike<T> for FnSignal<G, S>
where
    G: Fn() -> T,
    S: Fn(Notify) -> Unsubscribe,
{
    fn get(&self) -> T {
        (self.get)()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        (self.subscribe)(observer)
    }
}

/// A read-only reactive value with derivation operators.
///
/// # Example
///
/// ```rust
/// use trellis_core::atom_from_value;
///
/// let count = atom_from_value(2);
/// let doubled = count.map(|n| n * 2);
/// assert_eq!(doubled.get(), 4);
///
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub struct Signal<T> {
    inner: Rc<dyn SignalLike<T>>,
}

impl<T: Clone + 'static> Signal<T> {
    /// Wrap any [`SignalLike`] into a full signal.
    pub fn new<S>(source: S) -> Self
    where
        S: SignalLike<T> + 'static,
    {
        Self {
            inner: Rc::new(source),
        }
    }

    /// Build a signal from a getter and a subscribe function.
    pub fn from_fn<G, S>(get: G, subscribe: S) -> Self
    where
        G: Fn() -> T + 'static,
        S: Fn(Notify) -> Unsubscribe + 'static,
    {
        Self::new(FnSignal { get, subscribe })
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Register a raw "might have changed" observer.
    pub fn subscribe<F>(&self, observer: F) -> Unsubscribe
    where
        F: Fn() + 'static,
    {
        self.inner.subscribe(Rc::new(observer))
    }

    /// Whether both handles point at the same underlying signal.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Transform every read with `f`. Nothing is cached.
    pub fn map<B, F>(&self, f: F) -> Signal<B>
    where
        B: Clone + 'static,
        F: Fn(&T) -> B + 'static,
    {
        map_signal(self, f)
    }

    /// Read-only projection through a lens.
    pub fn view<B>(&self, lens: Lens<T, B>) -> Signal<B>
    where
        B: Clone + 'static,
    {
        view_signal(self, lens)
    }

    /// Keep the last value that satisfied `predicate`.
    ///
    /// Fails if the current value does not satisfy it.
    pub fn filter<P>(&self, predicate: P) -> Result<Signal<T>>
    where
        P: Fn(&T) -> bool + 'static,
    {
        filter_signal(self, predicate)
    }

    /// Narrowing filter: keep the last `Some` that `project` produced.
    ///
    /// Fails if `project` returns `None` for the current value.
    pub fn filter_map<B, P>(&self, project: P) -> Result<Signal<B>>
    where
        B: Clone + 'static,
        P: Fn(&T) -> Option<B> + 'static,
    {
        filter_map_signal(self, project)
    }

    /// Trailing-edge debounce on `scheduler`.
    pub fn debounce(&self, delay: Duration, scheduler: Rc<dyn Scheduler>) -> Signal<T>
    where
        T: PartialEq,
    {
        debounce_signal(self, delay, scheduler)
    }

    /// Emit the value to the default tracing sink, now and on every change.
    pub fn log(&self, message: &str) -> Self
    where
        T: Debug + PartialEq,
    {
        self.log_with(message, Rc::new(TracingSink))
    }

    /// Emit the value to `sink`, now and on every change.
    pub fn log_with(&self, message: &str, sink: Rc<dyn LogSink>) -> Self
    where
        T: Debug + PartialEq,
    {
        let message = message.to_owned();
        // Lives as long as this signal; there is no handle to stop logging.
        let _ = self.for_each(move |value| sink.log(&message, value));
        self.clone()
    }

    /// Call `observer` with the current value now and with every new value.
    ///
    /// A change is a value that is not equal to the previous one.
    pub fn for_each<F>(&self, observer: F) -> Unsubscribe
    where
        T: PartialEq,
        F: Fn(&T) + 'static,
    {
        observer(&self.get());
        self.on_change(observer)
    }

    /// Call `observer` with every new value, but not with the current one.
    pub fn on_change<F>(&self, observer: F) -> Unsubscribe
    where
        T: PartialEq,
        F: Fn(&T) + 'static,
    {
        let cached = cached_signal(self);
        let reader = cached.clone();
        cached.subscribe(move || observer(&reader.get()))
    }
}

impl<T: Clone + 'static> SignalLike<T> for Signal<T> {
    fn get(&self) -> T {
        self.inner.get()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        self.inner.subscribe(observer)
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.get())
            .finish()
    }
}

/// A signal that always holds `value` and never notifies.
pub fn constant_signal<T: Clone + 'static>(value: T) -> Signal<T> {
    Signal::from_fn(move || value.clone(), |_| Unsubscribe::noop())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
