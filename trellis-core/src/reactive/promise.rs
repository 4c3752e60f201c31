//! Signals over one-shot asynchronous results.
//!
//! The state moves at most once: `Pending` to `Resolved`, or `Pending` to
//! `Rejected`. [`Resolver`] is consumed by the transition, so a second one
//! cannot be expressed.

use std::future::Future;

use super::atom::{atom_with_equals, Atom};
use super::equality::never_equals;
use super::signal::Signal;

/// Where a one-shot result currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromiseState<T, E> {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Resolved(T),
    /// Settled with an error.
    Rejected(E),
}

impl<T, E> PromiseState<T, E> {
    /// Still waiting.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Settled with a value.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Settled with an error.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// The rejection, if any.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }
}

/// Write side of [`signal_from_promise`]. Dropping it leaves the signal
/// pending forever.
pub struct Resolver<T, E> {
    state: Atom<PromiseState<T, E>>,
}

impl<T: Clone + 'static, E: Clone + 'static> Resolver<T, E> {
    /// Settle with `value`.
    pub fn resolve(self, value: T) {
        self.state.set(PromiseState::Resolved(value));
    }

    /// Settle with `error`.
    pub fn reject(self, error: E) {
        self.state.set(PromiseState::Rejected(error));
    }
}

impl<T, E> std::fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

/// A pending signal and the resolver that settles it.
pub fn signal_from_promise<T, E>() -> (Signal<PromiseState<T, E>>, Resolver<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    // The single transition always notifies; no need for `T: PartialEq`.
    let state = atom_with_equals(PromiseState::Pending, never_equals());
    (state.as_signal(), Resolver { state })
}

/// Track `future` as a signal.
///
/// Returns the signal and a driver future. Nothing happens until the host
/// executor polls the driver; when `future` completes the signal settles.
///
/// # Example
///
/// ```rust
/// use trellis_core::{signal_from_future, PromiseState};
///
/// let (signal, driver) = signal_from_future(async { Ok::<_, ()>(42) });
/// assert!(signal.get().is_pending());
///
/// futures::executor::block_on(driver);
/// assert_eq!(signal.get(), PromiseState::Resolved(42));
/// ```
pub fn signal_from_future<T, E, Fut>(future: Fut) -> (Signal<PromiseState<T, E>>, impl Future<Output = ()>)
where
    T: Clone + 'static,
    E: Clone + 'static,
    Fut: Future<Output = Result<T, E>>,
{
    let (signal, resolver) = signal_from_promise();
    let driver = async move {
        match future.await {
            Ok(value) => resolver.resolve(value),
            Err(error) => resolver.reject(error),
        }
    };
    (signal, driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn resolve_moves_out_of_pending_once() {
        let (signal, resolver) = signal_from_promise::<u32, String>();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _token = signal.for_each(move |state| seen_clone.borrow_mut().push(state.clone()));

        resolver.resolve(7);

        assert_eq!(signal.get().value(), Some(&7));
        assert_eq!(
            *seen.borrow(),
            vec![PromiseState::Pending, PromiseState::Resolved(7)]
        );
    }

    #[test]
    fn reject_records_error() {
        let (signal, resolver) = signal_from_promise::<u32, &str>();
        resolver.reject("boom");

        let state = signal.get();
        assert!(state.is_rejected());
        assert_eq!(state.error(), Some(&"boom"));
        assert_eq!(state.value(), None);
    }

    #[test]
    fn future_settles_when_driven() {
        let (tx, rx) = oneshot::channel::<u32>();
        let (signal, driver) = signal_from_future(async move { rx.await.map_err(|_| "cancelled") });

        assert!(signal.get().is_pending());
        tx.send(5).unwrap();
        block_on(driver);
        assert_eq!(signal.get(), PromiseState::Resolved(5));
    }

    #[test]
    fn dropped_sender_rejects() {
        let (tx, rx) = oneshot::channel::<u32>();
        let (signal, driver) = signal_from_future(async move { rx.await.map_err(|_| "cancelled") });

        drop(tx);
        block_on(driver);
        assert_eq!(signal.get(), PromiseState::Rejected("cancelled"));
    }
}
