//! Trellis Core
//!
//! This crate provides a minimal reactive-value runtime. It implements:
//!
//! - Observable read-only values (signals) and read-write values (atoms)
//! - A re-entrancy safe dispatcher for change notifications
//! - Composable lenses for read-write projections of nested state
//! - Derivation combinators: map, filter, view, debounce, switch, combine
//!   and cache
//!
//! The runtime is single-threaded and synchronous. The one source of delay,
//! debouncing, runs on an injected [`Scheduler`].
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Signals, atoms, the dispatcher and the combinators
//! - `lens`: Pure bidirectional accessors and the `lens!` macro
//! - `scheduler`: The delayed-callback capability and a virtual-clock
//!   implementation
//!
//! Everything public is re-exported at the crate root.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_core::{atom_from_value, lens};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct State { count: u32, label: String }
//!
//! // Create the root of truth
//! let state = atom_from_value(State { count: 0, label: "clicks".into() });
//!
//! // Create a writable view of one field
//! let count = state.view(lens!(State, count));
//!
//! // Observe changes
//! let seen = Rc::new(Cell::new(0));
//! let seen_clone = seen.clone();
//! let _token = count.on_change(move |n| seen_clone.set(*n));
//!
//! // Update through the view
//! count.modify(|n| n + 1);
//! assert_eq!(state.get().count, 1);
//! assert_eq!(seen.get(), 1);
//! ```

pub mod lens;
pub mod reactive;
pub mod scheduler;

mod error;

pub use error::{Error, Result};
pub use lens::Lens;
pub use reactive::*;
pub use scheduler::{CancelToken, ManualScheduler, Scheduler, DEFAULT_DEBOUNCE};
