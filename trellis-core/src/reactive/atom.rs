//! Atom Implementation
//!
//! An Atom is a Signal that can be written. Atoms built by
//! [`atom_from_value`] are the only place change notifications originate:
//! `set` compares the new value against the stored one, commits it, and only
//! then dispatches. Every other signal relays or transforms notifications
//! that trace back to such a root.
//!
//! `view` and `filter` on an Atom return Atoms, so read-write capability
//! survives projection. Views hold no storage of their own; reads always go
//! to the root and writes are rebuilt through the lens and written to it.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::derived::filter_signal;
use super::dispatcher::Dispatcher;
use super::equality::{equals, EqualsFn};
use super::log::{LogSink, TracingSink};
use super::signal::{Signal, SignalLike};
use super::subscriber::{Notify, Observer, Unsubscribe};
use crate::error::Result;
use crate::lens::Lens;
use crate::scheduler::Scheduler;

/// The minimal read-write contract.
pub trait AtomLike<T>: SignalLike<T> {
    /// Write a new value.
    fn set(&self, value: T);
}

/// A read-write reactive value.
///
/// # Example
///
/// ```rust
/// use trellis_core::{atom_from_value, lens};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter { count: u32 }
///
/// let root = atom_from_value(Counter { count: 0 });
/// let count = root.view(lens!(Counter, count));
///
/// count.modify(|n| n + 1);
/// assert_eq!(root.get().count, 1);
/// ```
pub struct Atom<T> {
    inner: Rc<dyn AtomLike<T>>,
}

impl<T: Clone + 'static> Atom<T> {
    /// Wrap any [`AtomLike`] into a full atom.
    pub fn new<A>(source: A) -> Self
    where
        A: AtomLike<T> + 'static,
    {
        Self {
            inner: Rc::new(source),
        }
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

    /// Write a new value.
    pub fn set(&self, value: T) {
        self.inner.set(value);
    }

    /// `set(f(get()))`.
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        self.set(f(self.get()));
    }

    /// Like [`modify`](Self::modify), editing a copy of the value in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// A read-only handle onto this atom.
    pub fn as_signal(&self) -> Signal<T> {
        Signal::new(self.clone())
    }

    /// Whether both handles point at the same underlying atom.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read-write projection through a lens.
    ///
    /// Writes rebuild the whole with [`Lens::set`] and go to this atom.
    pub fn view<B>(&self, lens: Lens<T, B>) -> Atom<B>
    where
        B: Clone + 'static,
    {
        Atom::new(ViewAtom {
            root: self.clone(),
            lens,
        })
    }

    /// Reads behave like [`Signal::filter`]; writes always go straight
    /// through, whether or not the written value satisfies `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Result<Atom<T>>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let visible = filter_signal(&self.as_signal(), predicate)?;
        Ok(Atom::new(FilteredAtom {
            visible,
            upstream: self.clone(),
        }))
    }

    /// Read-only narrowing filter; see [`Signal::filter_map`].
    pub fn filter_map<B, P>(&self, project: P) -> Result<Signal<B>>
    where
        B: Clone + 'static,
        P: Fn(&T) -> Option<B> + 'static,
    {
        self.as_signal().filter_map(project)
    }

    /// Read-only transform; see [`Signal::map`].
    pub fn map<B, F>(&self, f: F) -> Signal<B>
    where
        B: Clone + 'static,
        F: Fn(&T) -> B + 'static,
    {
        self.as_signal().map(f)
    }

    /// Read-only debounced view; see [`Signal::debounce`].
    pub fn debounce(&self, delay: Duration, scheduler: Rc<dyn Scheduler>) -> Signal<T>
    where
        T: PartialEq,
    {
        self.as_signal().debounce(delay, scheduler)
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
        self.as_signal().log_with(message, sink);
        self.clone()
    }

    /// Call `observer` with the current value now and with every new value.
    pub fn for_each<F>(&self, observer: F) -> Unsubscribe
    where
        T: PartialEq,
        F: Fn(&T) + 'static,
    {
        self.as_signal().for_each(observer)
    }

    /// Call `observer` with every new value, but not with the current one.
    pub fn on_change<F>(&self, observer: F) -> Unsubscribe
    where
        T: PartialEq,
        F: Fn(&T) + 'static,
    {
        self.as_signal().on_change(observer)
    }
}

impl<T: Clone + 'static> SignalLike<T> for Atom<T> {
    fn get(&self) -> T {
        self.inner.get()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        self.inner.subscribe(observer)
    }
}

impl<T: Clone + 'static> AtomLike<T> for Atom<T> {
    fn set(&self, value: T) {
        self.inner.set(value);
    }
}

impl<T: Clone + 'static> From<Atom<T>> for Signal<T> {
    fn from(atom: Atom<T>) -> Self {
        Signal::new(atom)
    }
}

impl<T> Clone for Atom<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Atom<T>
where
    T: Clone + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("value", &self.inner.get())
            .finish()
    }
}

struct ViewAtom<A, B> {
    root: Atom<A>,
    lens: Lens<A, B>,
}

impl<A: Clone + 'static, B: 'static> SignalLike<B> for ViewAtom<A, B> {
    fn get(&self) -> B {
        self.lens.get(&self.root.get())
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        SignalLike::subscribe(&self.root, observer)
    }
}

impl<A: Clone + 'static, B: 'static> AtomLike<B> for ViewAtom<A, B> {
    fn set(&self, part: B) {
        let whole = self.root.get();
        self.root.set(self.lens.set(&whole, part));
    }
}

struct FilteredAtom<T> {
    visible: Signal<T>,
    upstream: Atom<T>,
}

impl<T: Clone + 'static> SignalLike<T> for FilteredAtom<T> {
    fn get(&self) -> T {
        self.visible.get()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        SignalLike::subscribe(&self.visible, observer)
    }
}

impl<T: Clone + 'static> AtomLike<T> for FilteredAtom<T> {
    fn set(&self, value: T) {
        self.upstream.set(value);
    }
}

/// Storage behind [`atom_from_value`].
struct ValueCell<T> {
    value: RefCell<T>,
    dispatcher: Rc<Dispatcher<()>>,
    equals: EqualsFn<T>,
}

impl<T: Clone + 'static> SignalLike<T> for ValueCell<T> {
    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let entry: Observer<()> = Rc::new(move |_: &()| observer());
        self.dispatcher.add(Rc::clone(&entry));

        let dispatcher: Weak<Dispatcher<()>> = Rc::downgrade(&self.dispatcher);
        Unsubscribe::new(move || {
            if let Some(dispatcher) = dispatcher.upgrade() {
                dispatcher.remove(&entry);
            }
        })
    }
}

impl<T: Clone + 'static> AtomLike<T> for ValueCell<T> {
    fn set(&self, value: T) {
        let unchanged = (self.equals)(&self.value.borrow(), &value);
        if unchanged {
            return;
        }
        // Commit before dispatch so observers read the new value.
        *self.value.borrow_mut() = value;
        self.dispatcher.dispatch(());
    }
}

/// A root atom holding `initial`. Writes equal to the stored value
/// (`PartialEq`) are dropped without notifying.
pub fn atom_from_value<T>(initial: T) -> Atom<T>
where
    T: Clone + PartialEq + 'static,
{
    atom_with_equals(initial, equals())
}

/// A root atom with a custom change test, e.g.
/// [`rc_ptr_equals`](crate::rc_ptr_equals) for reference identity.
pub fn atom_with_equals<T>(initial: T, equals: EqualsFn<T>) -> Atom<T>
where
    T: Clone + 'static,
{
    Atom::new(ValueCell {
        value: RefCell::new(initial),
        dispatcher: Rc::new(Dispatcher::new()),
        equals,
    })
}

struct SignalAndSetter<T, S> {
    signal: Signal<T>,
    setter: S,
}

impl<T: Clone + 'static, S> SignalLike<T> for SignalAndSetter<T, S> {
    fn get(&self) -> T {
        self.signal.get()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        SignalLike::subscribe(&self.signal, observer)
    }
}

impl<T: Clone + 'static, S: Fn(T)> AtomLike<T> for SignalAndSetter<T, S> {
    fn set(&self, value: T) {
        (self.setter)(value);
    }
}

/// Adapt an external read side and write function into an atom.
///
/// No change detection happens here; that is up to `signal` and `setter`.
pub fn atom_from_signal_and_setter<T, S>(signal: Signal<T>, setter: S) -> Atom<T>
where
    T: Clone + 'static,
    S: Fn(T) + 'static,
{
    Atom::new(SignalAndSetter { signal, setter })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
