//! Pass-through derivations: map, view and filter.
//!
//! None of these own a dispatcher. Each subscription is forwarded to the
//! upstream signal, so their lifetime is entirely the upstream's business.

use std::cell::RefCell;
use std::rc::Rc;

use super::signal::{Signal, SignalLike};
use super::subscriber::{Notify, Unsubscribe};
use crate::error::{Error, Result};
use crate::lens::Lens;

struct Mapped<T, F> {
    source: Signal<T>,
    f: F,
}

impl<T, B, F> SignalLike<B> for Mapped<T, F>
where
    T: Clone + 'static,
    F: Fn(&T) -> B,
{
    fn get(&self) -> B {
        (self.f)(&self.source.get())
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        SignalLike::subscribe(&self.source, observer)
    }
}

/// Recompute `f(source.get())` on every read.
pub fn map_signal<T, B, F>(source: &Signal<T>, f: F) -> Signal<B>
where
    T: Clone + 'static,
    B: Clone + 'static,
    F: Fn(&T) -> B + 'static,
{
    Signal::new(Mapped {
        source: source.clone(),
        f,
    })
}

/// Read-only projection of `source` through `lens`.
pub fn view_signal<A, B>(source: &Signal<A>, lens: Lens<A, B>) -> Signal<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    map_signal(source, move |whole| lens.get(whole))
}

struct Filtered<T, P> {
    source: Signal<T>,
    predicate: Rc<P>,
    /// Last value that satisfied the predicate.
    fallback: Rc<RefCell<T>>,
}

impl<T, P> SignalLike<T> for Filtered<T, P>
where
    T: Clone + 'static,
    P: Fn(&T) -> bool + 'static,
{
    fn get(&self) -> T {
        let value = self.source.get();
        if (self.predicate)(&value) {
            *self.fallback.borrow_mut() = value.clone();
            value
        } else {
            self.fallback.borrow().clone()
        }
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let source = self.source.clone();
        let predicate = Rc::clone(&self.predicate);
        let fallback = Rc::clone(&self.fallback);
        SignalLike::subscribe(
            &self.source,
            Rc::new(move || {
                let value = source.get();
                if predicate(&value) {
                    *fallback.borrow_mut() = value;
                    observer();
                }
            }),
        )
    }
}

/// Follow `source` while `predicate` holds; otherwise hold the last value
/// that satisfied it.
///
/// Subscribers are only notified when the new upstream value passes.
///
/// The fallback holds no storage of its own beyond what the filter has
/// observed: it only moves when a passing value is seen by `get` or by an
/// upstream notification to a subscriber. Passing values written and
/// overwritten while nobody reads or subscribes are never remembered.
///
/// # Errors
///
/// [`Error::InvariantViolation`] if the current value fails the predicate,
/// since there would be no value to fall back to.
pub fn filter_signal<T, P>(source: &Signal<T>, predicate: P) -> Result<Signal<T>>
where
    T: Clone + 'static,
    P: Fn(&T) -> bool + 'static,
{
    let initial = source.get();
    if !predicate(&initial) {
        return Err(Error::filter_rejected_initial());
    }

    Ok(Signal::new(Filtered {
        source: source.clone(),
        predicate: Rc::new(predicate),
        fallback: Rc::new(RefCell::new(initial)),
    }))
}

struct FilterMapped<T, B, P> {
    source: Signal<T>,
    project: Rc<P>,
    fallback: Rc<RefCell<B>>,
}

impl<T, B, P> SignalLike<B> for FilterMapped<T, B, P>
where
    T: Clone + 'static,
    B: Clone + 'static,
    P: Fn(&T) -> Option<B> + 'static,
{
    fn get(&self) -> B {
        match (self.project)(&self.source.get()) {
            Some(part) => {
                *self.fallback.borrow_mut() = part.clone();
                part
            }
            None => self.fallback.borrow().clone(),
        }
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let source = self.source.clone();
        let project = Rc::clone(&self.project);
        let fallback = Rc::clone(&self.fallback);
        SignalLike::subscribe(
            &self.source,
            Rc::new(move || {
                if let Some(part) = project(&source.get()) {
                    *fallback.borrow_mut() = part;
                    observer();
                }
            }),
        )
    }
}

/// Narrowing filter: follow `project(source)` while it is `Some`, otherwise
/// hold the last `Some` value.
///
/// The typical use is picking one variant out of an enum. Fallback and
/// notification rules are those of [`filter_signal`].
///
/// # Errors
///
/// [`Error::InvariantViolation`] if `project` returns `None` for the current
/// value.
pub fn filter_map_signal<T, B, P>(source: &Signal<T>, project: P) -> Result<Signal<B>>
where
    T: Clone + 'static,
    B: Clone + 'static,
    P: Fn(&T) -> Option<B> + 'static,
{
    let initial = project(&source.get()).ok_or_else(Error::filter_rejected_initial)?;

    Ok(Signal::new(FilterMapped {
        source: source.clone(),
        project: Rc::new(project),
        fallback: Rc::new(RefCell::new(initial)),
    }))
}
