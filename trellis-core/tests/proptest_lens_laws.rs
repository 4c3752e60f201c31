//! Property-based tests for lens laws and view round trips.
//!
//! 1. get-set: `l.get(&l.set(&w, p)) == p`.
//! 2. set-get: `l.set(&w, l.get(&w)) == w`.
//! 3. Composition keeps both laws.
//! 4. Composition is associative.
//! 5. A set through a lens touches nothing but its target.
//! 6. Atom views agree with the lens applied to the root.

use proptest::prelude::*;
use trellis_core::{atom_from_value, lens, Lens};

#[derive(Debug, Clone, PartialEq)]
struct Leaf {
    value: i64,
    tag: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Branch {
    leaf: Leaf,
    items: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
struct Root {
    branch: Branch,
    flag: bool,
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn leaf_strategy() -> impl Strategy<Value = Leaf> {
    (any::<i64>(), "[a-z]{0,8}").prop_map(|(value, tag)| Leaf { value, tag })
}

fn root_strategy() -> impl Strategy<Value = Root> {
    (
        leaf_strategy(),
        proptest::collection::vec(any::<i32>(), 1..8),
        any::<bool>(),
    )
        .prop_map(|(leaf, items, flag)| Root {
            branch: Branch { leaf, items },
            flag,
        })
}

fn value_lens() -> Lens<Root, i64> {
    lens!(Root, branch)
        .compose(&lens!(Branch, leaf))
        .compose(&lens!(Leaf, value))
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Basic laws
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn field_lens_get_set(root in root_strategy(), flag in any::<bool>()) {
        let l = lens!(Root, flag);
        prop_assert_eq!(l.get(&l.set(&root, flag)), flag);
    }

    #[test]
    fn field_lens_set_get(root in root_strategy()) {
        let l = lens!(Root, branch.leaf.tag);
        prop_assert_eq!(l.set(&root, l.get(&root)), root);
    }

    #[test]
    fn index_lens_laws(root in root_strategy(), item in any::<i32>(), pick in any::<prop::sample::Index>()) {
        let items = root.branch.items.clone();
        let l = Lens::<Vec<i32>, i32>::index(pick.index(items.len()));
        prop_assert_eq!(l.get(&l.set(&items, item)), item);
        prop_assert_eq!(l.set(&items, l.get(&items)), items);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Composition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn composed_lens_laws(root in root_strategy(), value in any::<i64>()) {
        let l = value_lens();
        prop_assert_eq!(l.get(&l.set(&root, value)), value);
        prop_assert_eq!(l.set(&root, l.get(&root)), root);
    }

    #[test]
    fn composition_is_associative(root in root_strategy(), value in any::<i64>()) {
        let (a, b, c) = (lens!(Root, branch), lens!(Branch, leaf), lens!(Leaf, value));
        let left = a.compose(&b).compose(&c);
        let right = a.compose(&b.compose(&c));

        prop_assert_eq!(left.get(&root), right.get(&root));
        prop_assert_eq!(left.set(&root, value), right.set(&root, value));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. Locality and atom views
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_only_touches_target(root in root_strategy(), value in any::<i64>()) {
        let updated = value_lens().set(&root, value);
        prop_assert_eq!(updated.flag, root.flag);
        prop_assert_eq!(&updated.branch.items, &root.branch.items);
        prop_assert_eq!(&updated.branch.leaf.tag, &root.branch.leaf.tag);
    }

    #[test]
    fn atom_view_matches_lens(root in root_strategy(), values in proptest::collection::vec(any::<i64>(), 1..10)) {
        let atom = atom_from_value(root);
        let view = atom.view(value_lens());

        for value in values {
            view.set(value);
            prop_assert_eq!(view.get(), value);
            prop_assert_eq!(value_lens().get(&atom.get()), value);
        }
    }
}
