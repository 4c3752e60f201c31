//! N-ary joins.

use std::rc::Rc;

use smallvec::SmallVec;

use super::signal::{Signal, SignalLike};
use super::subscriber::{Notify, Unsubscribe};

type SubscribeFn = Rc<dyn Fn(Notify) -> Unsubscribe>;

/// Recomputes on every read and relays any input's raw notification.
struct Combined<B> {
    compute: Box<dyn Fn() -> B>,
    sources: SmallVec<[SubscribeFn; 4]>,
}

impl<B> SignalLike<B> for Combined<B> {
    fn get(&self) -> B {
        (self.compute)()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        Unsubscribe::all(
            self.sources
                .iter()
                .map(|subscribe| subscribe(Rc::clone(&observer))),
        )
    }
}

fn subscribe_fn<T: Clone + 'static>(signal: &Signal<T>) -> SubscribeFn {
    let signal = signal.clone();
    Rc::new(move |observer| SignalLike::subscribe(&signal, observer))
}

/// Join any number of same-typed signals.
///
/// Nothing is cached: a notification from any input is passed on as is.
/// Layer [`cached_signal`](crate::cached_signal) or `on_change` on top for
/// change-only delivery.
///
/// # Example
///
/// ```rust
/// use trellis_core::{atom_from_value, combine_signals};
///
/// let a = atom_from_value(1);
/// let b = atom_from_value(2);
/// let sum = combine_signals(vec![a.as_signal(), b.as_signal()], |values| values.iter().sum::<i32>());
///
/// b.set(10);
/// assert_eq!(sum.get(), 11);
/// ```
pub fn combine_signals<A, B, F>(signals: Vec<Signal<A>>, f: F) -> Signal<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(&[A]) -> B + 'static,
{
    let sources = signals.iter().map(subscribe_fn).collect();
    Signal::new(Combined {
        compute: Box::new(move || {
            let values: SmallVec<[A; 4]> = signals.iter().map(Signal::get).collect();
            f(&values)
        }),
        sources,
    })
}

/// Join two signals of different types.
pub fn combine2<A, B, C, F>(a: &Signal<A>, b: &Signal<B>, f: F) -> Signal<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    F: Fn(&A, &B) -> C + 'static,
{
    let sources = SmallVec::from_iter([subscribe_fn(a), subscribe_fn(b)]);
    let (a, b) = (a.clone(), b.clone());
    Signal::new(Combined {
        compute: Box::new(move || f(&a.get(), &b.get())),
        sources,
    })
}

/// Join three signals of different types.
pub fn combine3<A, B, C, D, F>(a: &Signal<A>, b: &Signal<B>, c: &Signal<C>, f: F) -> Signal<D>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    F: Fn(&A, &B, &C) -> D + 'static,
{
    let sources = SmallVec::from_iter([subscribe_fn(a), subscribe_fn(b), subscribe_fn(c)]);
    let (a, b, c) = (a.clone(), b.clone(), c.clone());
    Signal::new(Combined {
        compute: Box::new(move || f(&a.get(), &b.get(), &c.get())),
        sources,
    })
}
