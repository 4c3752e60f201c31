//! Subscriber types for the reactive system.
//!
//! Observers are reference-counted closures. Their identity is the `Rc`
//! allocation: registering the same `Rc` twice yields two independent entries,
//! and removal looks an entry up by pointer.
//!
//! Every subscription hands back an [`Unsubscribe`] token. Dropping the token
//! leaves the subscription in place; call [`Unsubscribe::unsubscribe`] or turn
//! it into a [`SubscriptionGuard`] to tie the subscription to a scope.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// A raw "something may have changed" observer.
///
/// It carries no payload. Observers re-read the signal with `get()`.
pub type Notify = Rc<dyn Fn()>;

/// An observer that receives a value by reference.
pub type Observer<T> = Rc<dyn Fn(&T)>;

/// Capability token that removes exactly one registration.
#[must_use = "an Unsubscribe token is the only way to end the subscription"]
pub struct Unsubscribe {
    teardown: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Unsubscribe {
    /// Create a token that runs `teardown` on the first call to
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            teardown: RefCell::new(Some(Box::new(teardown))),
        }
    }

    /// A token with nothing to tear down.
    pub fn noop() -> Self {
        Self {
            teardown: RefCell::new(None),
        }
    }

    /// Combine several tokens into one that tears all of them down, in order.
    ///
    /// An empty set yields an inactive token.
    pub fn all<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Unsubscribe>,
    {
        let tokens: SmallVec<[Unsubscribe; 4]> = tokens.into_iter().collect();
        if tokens.is_empty() {
            return Self::noop();
        }
        Self::new(move || {
            for token in &tokens {
                token.unsubscribe();
            }
        })
    }

    /// Remove the registration. Later calls do nothing.
    pub fn unsubscribe(&self) {
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Whether the registration is still in place.
    pub fn is_active(&self) -> bool {
        self.teardown.borrow().is_some()
    }

    /// Tie the subscription to the returned guard's lifetime.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { token: self }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Unsubscribes when dropped.
#[derive(Debug)]
pub struct SubscriptionGuard {
    token: Unsubscribe,
}

impl SubscriptionGuard {
    /// Give the token back without unsubscribing.
    pub fn into_inner(self) -> Unsubscribe {
        // The emptied token left behind makes our own Drop a no-op.
        let teardown = self.token.teardown.borrow_mut().take();
        Unsubscribe {
            teardown: RefCell::new(teardown),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.token.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_token() -> (Unsubscribe, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let token = Unsubscribe::new(move || calls_clone.set(calls_clone.get() + 1));
        (token, calls)
    }

    #[test]
    fn unsubscribe_runs_teardown_once() {
        let (token, calls) = counting_token();
        assert!(token.is_active());

        token.unsubscribe();
        token.unsubscribe();

        assert_eq!(calls.get(), 1);
        assert!(!token.is_active());
    }

    #[test]
    fn dropping_token_keeps_subscription() {
        let (token, calls) = counting_token();
        drop(token);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn guard_unsubscribes_on_drop() {
        let (token, calls) = counting_token();
        {
            let _guard = token.into_guard();
            assert_eq!(calls.get(), 0);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn guard_into_inner_disarms() {
        let (token, calls) = counting_token();
        let token = token.into_guard().into_inner();
        assert_eq!(calls.get(), 0);
        token.unsubscribe();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn all_tears_down_every_token() {
        let (a, a_calls) = counting_token();
        let (b, b_calls) = counting_token();
        let both = Unsubscribe::all([a, b]);

        both.unsubscribe();
        both.unsubscribe();

        assert_eq!(a_calls.get(), 1);
        assert_eq!(b_calls.get(), 1);
    }

    #[test]
    fn noop_is_inactive() {
        let token = Unsubscribe::noop();
        assert!(!token.is_active());
        token.unsubscribe();
    }
}
