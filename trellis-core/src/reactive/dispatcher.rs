//! Dispatcher
//!
//! The dispatcher is the only place in the crate that fans a notification out
//! to many observers. Every change notification ultimately starts at one.
//!
//! # How Dispatch Works
//!
//! 1. Observers are kept in an `Rc<Vec<_>>`. A dispatch takes a clone of that
//!    `Rc` as its snapshot and iterates it in registration order.
//!
//! 2. `add`/`remove` go through `Rc::make_mut`, so while a snapshot is alive
//!    the authoritative list is copied on first mutation and the in-flight
//!    iteration keeps walking the old one.
//!
//! 3. An observer removed mid-dispatch is also recorded in a per-dispatch
//!    exclusion list, so it is skipped if the snapshot still holds it.
//!
//! 4. A re-entrant `dispatch` (an observer dispatching on the same
//!    dispatcher) is queued and runs after the current round has reached
//!    every observer. Rounds run strictly in FIFO order and never nest.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

use super::subscriber::Observer;

/// Re-entrancy-safe, ordered observer registry.
///
/// Duplicates are allowed: adding the same observer twice registers it twice
/// and each registration has to be removed on its own.
pub struct Dispatcher<T> {
    state: RefCell<State<T>>,
}

struct State<T> {
    observers: Rc<Vec<Observer<T>>>,
    dispatching: bool,
    /// Observers removed while the current round is in flight.
    removed: SmallVec<[Observer<T>; 2]>,
    queued: VecDeque<T>,
}

impl<T> Dispatcher<T> {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                observers: Rc::new(Vec::new()),
                dispatching: false,
                removed: SmallVec::new(),
                queued: VecDeque::new(),
            }),
        }
    }

    /// Register an observer at the end of the list.
    pub fn add(&self, observer: Observer<T>) {
        let mut state = self.state.borrow_mut();
        Rc::make_mut(&mut state.observers).push(observer);
    }

    /// Remove the first registration of `observer`.
    ///
    /// Returns `true` if an entry was found. The removal is visible to
    /// [`count`](Self::count) immediately, even mid-dispatch.
    pub fn remove(&self, observer: &Observer<T>) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(index) = state
            .observers
            .iter()
            .position(|registered| Rc::ptr_eq(registered, observer))
        else {
            return false;
        };

        Rc::make_mut(&mut state.observers).remove(index);
        if state.dispatching {
            state.removed.push(Rc::clone(observer));
        }
        true
    }

    /// Number of registrations.
    pub fn count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Whether a dispatch round is currently running.
    pub fn is_dispatching(&self) -> bool {
        self.state.borrow().dispatching
    }

    /// Notify every observer with `value`.
    ///
    /// Called from inside an observer, the value is queued and delivered
    /// once the running round has finished.
    pub fn dispatch(&self, value: T) {
        {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                state.queued.push_back(value);
                trace!(queued = state.queued.len(), "re-entrant dispatch queued");
                return;
            }
            state.dispatching = true;
        }

        let _round = RoundGuard { state: &self.state };
        let mut next = Some(value);
        while let Some(value) = next {
            let snapshot = Rc::clone(&self.state.borrow().observers);
            for observer in snapshot.iter() {
                if self.was_removed(observer) {
                    continue;
                }
                observer(&value);
            }
            drop(snapshot);

            let mut state = self.state.borrow_mut();
            state.removed.clear();
            next = state.queued.pop_front();
        }
    }

    fn was_removed(&self, observer: &Observer<T>) -> bool {
        self.state
            .borrow()
            .removed
            .iter()
            .any(|removed| Rc::ptr_eq(removed, observer))
    }
}

/// Leaves the dispatcher idle again, even if an observer panics.
struct RoundGuard<'a, T> {
    state: &'a RefCell<State<T>>,
}

impl<T> Drop for RoundGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.dispatching = false;
        state.removed.clear();
        state.queued.clear();
    }
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Dispatcher")
            .field("count", &state.observers.len())
            .field("dispatching", &state.dispatching)
            .field("queued", &state.queued.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
