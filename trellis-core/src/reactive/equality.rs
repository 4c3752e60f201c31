//! Change detection.
//!
//! Roots and caches decide "did the value change?" with an [`EqualsFn`].
//! The default is `PartialEq`. Callers who want reference identity for
//! shared data can use [`rc_ptr_equals`].

use std::rc::Rc;

/// Returns `true` when two values count as the same (no notification).
pub type EqualsFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// Equality via `PartialEq`.
pub fn equals<T: PartialEq + 'static>() -> EqualsFn<T> {
    Rc::new(|a: &T, b: &T| a == b)
}

/// Reference identity for `Rc`-shared values.
pub fn rc_ptr_equals<U: ?Sized + 'static>() -> EqualsFn<Rc<U>> {
    Rc::new(|a: &Rc<U>, b: &Rc<U>| Rc::ptr_eq(a, b))
}

/// Treat every write as a change.
pub fn never_equals<T: 'static>() -> EqualsFn<T> {
    Rc::new(|_: &T, _: &T| false)
}
