//! Follow a signal of signals.
//!
//! [`switch_signal`] tracks whichever inner signal the outer value currently
//! selects. Like the multiplexing cache it holds one upstream subscription
//! pair (outer plus current inner) for all of its subscribers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::dispatcher::Dispatcher;
use super::signal::{Signal, SignalLike};
use super::subscriber::{Notify, Observer, Unsubscribe};

struct SwitchState<A, B, F> {
    input: Signal<A>,
    select: F,
    current: RefCell<Signal<B>>,
    value: RefCell<B>,
    dispatcher: Dispatcher<()>,
    outer: RefCell<Option<Unsubscribe>>,
    inner: RefCell<Option<Unsubscribe>>,
}

impl<A, B, F> SwitchState<A, B, F>
where
    A: Clone + 'static,
    B: Clone + PartialEq + 'static,
    F: Fn(&A) -> Signal<B> + 'static,
{
    fn select_now(&self) -> Signal<B> {
        (self.select)(&self.input.get())
    }

    fn attach(state: &Rc<Self>) {
        let inner = state.select_now();
        *state.value.borrow_mut() = inner.get();
        *state.current.borrow_mut() = inner.clone();

        let weak = Rc::downgrade(state);
        let outer = SignalLike::subscribe(
            &state.input,
            Rc::new(move || {
                if let Some(state) = weak.upgrade() {
                    Self::on_outer(&state);
                }
            }),
        );
        *state.outer.borrow_mut() = Some(outer);
        *state.inner.borrow_mut() = Some(Self::subscribe_inner(state, &inner));
    }

    fn subscribe_inner(state: &Rc<Self>, inner: &Signal<B>) -> Unsubscribe {
        let weak: Weak<Self> = Rc::downgrade(state);
        SignalLike::subscribe(
            inner,
            Rc::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.on_inner();
                }
            }),
        )
    }

    fn on_outer(state: &Rc<Self>) {
        let next = state.select_now();
        if next.ptr_eq(&state.current.borrow()) {
            return;
        }

        let previous = state.inner.borrow_mut().take();
        if let Some(previous) = previous {
            previous.unsubscribe();
        }
        *state.value.borrow_mut() = next.get();
        *state.current.borrow_mut() = next.clone();
        *state.inner.borrow_mut() = Some(Self::subscribe_inner(state, &next));
        debug!("switched to a new inner signal");

        // A new source is a change even when its value is equal.
        state.dispatcher.dispatch(());
    }

    fn on_inner(&self) {
        let inner = self.current.borrow().clone();
        let next = inner.get();
        let unchanged = *self.value.borrow() == next;
        if !unchanged {
            *self.value.borrow_mut() = next;
            self.dispatcher.dispatch(());
        }
    }

    fn detach(&self) {
        let inner = self.inner.borrow_mut().take();
        let outer = self.outer.borrow_mut().take();
        for token in inner.into_iter().chain(outer) {
            token.unsubscribe();
        }
    }
}

struct Switched<A, B, F> {
    state: Rc<SwitchState<A, B, F>>,
}

impl<A, B, F> SignalLike<B> for Switched<A, B, F>
where
    A: Clone + 'static,
    B: Clone + PartialEq + 'static,
    F: Fn(&A) -> Signal<B> + 'static,
{
    fn get(&self) -> B {
        if self.state.dispatcher.count() == 0 {
            let inner = self.state.select_now();
            *self.state.current.borrow_mut() = inner.clone();
            return inner.get();
        }
        self.state.value.borrow().clone()
    }

    fn subscribe(&self, observer: Notify) -> Unsubscribe {
        let entry: Observer<()> = Rc::new(move |_: &()| observer());
        self.state.dispatcher.add(Rc::clone(&entry));
        if self.state.dispatcher.count() == 1 {
            SwitchState::attach(&self.state);
        }

        let state = Rc::clone(&self.state);
        Unsubscribe::new(move || {
            if state.dispatcher.remove(&entry) && state.dispatcher.count() == 0 {
                state.detach();
            }
        })
    }
}

/// Reflect the inner signal that `select` picks from the current value of
/// `input`.
///
/// Whenever `input` notifies, `select` runs again. If it returns a different
/// signal (by handle identity) the old inner subscription is dropped, the new
/// one is subscribed and subscribers are notified, even if both inner values
/// are equal. Changes of the current inner signal are forwarded when its
/// value actually changes.
pub fn switch_signal<A, B, F>(input: &Signal<A>, select: F) -> Signal<B>
where
    A: Clone + 'static,
    B: Clone + PartialEq + 'static,
    F: Fn(&A) -> Signal<B> + 'static,
{
    let initial = select(&input.get());
    Signal::new(Switched {
        state: Rc::new(SwitchState {
            input: input.clone(),
            value: RefCell::new(initial.get()),
            current: RefCell::new(initial),
            select,
            dispatcher: Dispatcher::new(),
            outer: RefCell::new(None),
            inner: RefCell::new(None),
        }),
    })
}
