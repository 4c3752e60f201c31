//! Lenses
//!
//! A lens is a pure, composable accessor pair over a whole `A` and a part `B`:
//!
//! - `get(&whole) -> part`
//! - `set(&whole, part) -> new whole`
//!
//! `set` never mutates its input; it returns a new whole with exactly the
//! targeted part replaced. Lenses are what let an [`Atom`](crate::Atom) hand
//! out read-write views of a part of its value.
//!
//! # Laws
//!
//! For every lawful lens `l`, whole `w` and part `p`:
//!
//! - `l.get(&l.set(&w, p)) == p`
//! - `l.set(&w, l.get(&w)) == w` (by content; it is still a fresh value)
//!
//! Composition preserves both laws and is associative.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{lens, Lens};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Profile { name: String }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User { id: u32, profile: Profile }
//!
//! let name: Lens<User, String> = lens!(User, profile).compose(&lens!(Profile, name));
//! let user = User { id: 7, profile: Profile { name: "Alice".into() } };
//!
//! let renamed = name.set(&user, "Bob".into());
//! assert_eq!(renamed.profile.name, "Bob");
//! assert_eq!(renamed.id, 7);
//! assert_eq!(user.profile.name, "Alice");
//! ```

use std::fmt;
use std::rc::Rc;

/// Bidirectional accessor from a whole `A` to a part `B`.
pub struct Lens<A, B> {
    getter: Rc<dyn Fn(&A) -> B>,
    setter: Rc<dyn Fn(&A, B) -> A>,
}

impl<A: 'static, B: 'static> Lens<A, B> {
    /// Build a lens from an explicit get/set pair.
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&A) -> B + 'static,
        S: Fn(&A, B) -> A + 'static,
    {
        Self {
            getter: Rc::new(get),
            setter: Rc::new(set),
        }
    }

    /// Read the part out of `whole`.
    pub fn get(&self, whole: &A) -> B {
        (self.getter)(whole)
    }

    /// Return a copy of `whole` with the part replaced by `part`.
    pub fn set(&self, whole: &A, part: B) -> A {
        (self.setter)(whole, part)
    }

    /// Return a copy of `whole` with the part transformed by `f`.
    pub fn modify<F>(&self, whole: &A, f: F) -> A
    where
        F: FnOnce(B) -> B,
    {
        self.set(whole, f(self.get(whole)))
    }

    /// Focus further: `self` picks `B` out of `A`, `inner` picks `C` out of `B`.
    pub fn compose<C: 'static>(&self, inner: &Lens<B, C>) -> Lens<A, C> {
        let (outer_get, inner_get) = (self.clone(), inner.clone());
        let (outer_set, inner_set) = (self.clone(), inner.clone());
        Lens::new(
            move |whole: &A| inner_get.get(&outer_get.get(whole)),
            move |whole: &A, part: C| {
                let middle = outer_set.get(whole);
                outer_set.set(whole, inner_set.set(&middle, part))
            },
        )
    }
}

impl<A: Clone + 'static> Lens<A, A> {
    /// The lens that focuses on the whole value.
    pub fn identity() -> Self {
        Lens::new(|whole: &A| whole.clone(), |_: &A, part: A| part)
    }
}

impl<T: Clone + 'static> Lens<Vec<T>, T> {
    /// Focus on element `index` of a `Vec`.
    ///
    /// # Panics
    ///
    /// `get` and `set` panic if `index` is out of bounds, like slice indexing.
    pub fn index(index: usize) -> Self {
        Lens::new(
            move |items: &Vec<T>| items[index].clone(),
            move |items: &Vec<T>, item: T| {
                let mut next = items.clone();
                next[index] = item;
                next
            },
        )
    }
}

impl<A, B> Clone for Lens<A, B> {
    fn clone(&self) -> Self {
        Self {
            getter: Rc::clone(&self.getter),
            setter: Rc::clone(&self.setter),
        }
    }
}

impl<A, B> fmt::Debug for Lens<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens")
            .field("whole", &std::any::type_name::<A>())
            .field("part", &std::any::type_name::<B>())
            .finish()
    }
}

/// Build the canonical lens onto a (possibly nested) field of a `Clone` struct.
///
/// `get` clones the field; `set` shallow-clones the whole and replaces the
/// field.
///
/// ```rust
/// use trellis_core::lens;
///
/// #[derive(Clone)]
/// struct Point { x: i32, y: i32 }
///
/// let x = lens!(Point, x);
/// let moved = x.set(&Point { x: 1, y: 2 }, 10);
/// assert_eq!((moved.x, moved.y), (10, 2));
/// ```
#[macro_export]
macro_rules! lens {
    ($whole:ty, $($field:ident).+) => {
        $crate::Lens::<$whole, _>::new(
            |whole: &$whole| whole.$($field).+.clone(),
            |whole: &$whole, part| -> $whole {
                let mut next = ::std::clone::Clone::clone(whole);
                next.$($field).+ = part;
                next
            },
        )
    };
}
