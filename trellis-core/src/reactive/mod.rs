//! Reactive Primitives
//!
//! This module implements the observable values at the heart of Trellis:
//! signals, atoms, and the combinators that derive new ones from them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a read-only value with a raw "might have changed"
//! subscription. Notifications carry no payload; observers call `get()` to
//! learn the new value. Signals are derived with `map`, `view`, `filter`,
//! `debounce` and friends, each returning another Signal.
//!
//! ## Atoms
//!
//! An Atom is a Signal that can be written. Root atoms compare every write
//! against the stored value and notify only on an actual change. Views and
//! filters of an Atom are themselves Atoms, so a component can be handed a
//! writable slice of a larger state.
//!
//! ## Combinators
//!
//! Caching (`cached_signal`, `cached_signal_with_dispatcher`), timing
//! (`debounce_signal`), selection (`switch_signal`) and joins
//! (`combine_signals`) build new signals out of existing ones.
//!
//! # Implementation Notes
//!
//! This is an observer system, not a dependency graph. Nothing is tracked
//! automatically and there is no topological ordering: notifications flow
//! through explicit subscriptions. The [`Dispatcher`] makes that safe under
//! re-entrancy by queueing nested dispatches and honouring removals that
//! happen mid-dispatch.
//!
//! Everything is single-threaded (`Rc`, `RefCell`).

mod atom;
mod cached;
mod combine;
mod debounce;
mod derived;
mod dispatcher;
mod equality;
mod log;
mod promise;
mod signal;
mod subscriber;
mod switch;

pub use atom::{atom_from_signal_and_setter, atom_from_value, atom_with_equals, Atom, AtomLike};
pub use cached::{
    cached_signal, cached_signal_by, cached_signal_with_dispatcher, cached_signal_with_dispatcher_by,
};
pub use combine::{combine2, combine3, combine_signals};
pub use debounce::debounce_signal;
pub use derived::{filter_map_signal, filter_signal, map_signal, view_signal};
pub use dispatcher::Dispatcher;
pub use equality::{equals, never_equals, rc_ptr_equals, EqualsFn};
pub use log::{LogSink, TracingSink};
pub use promise::{signal_from_future, signal_from_promise, PromiseState, Resolver};
pub use signal::{constant_signal, Signal, SignalLike};
pub use subscriber::{Notify, Observer, SubscriptionGuard, Unsubscribe};
pub use switch::switch_signal;
