//! Ordered collections backed by a randomized binary search tree.
//!
//! The `treap` module provides `TreapSet` and `TreapMap`, ordered by a configurable
//! `Comparator`. Their balance comes from the random `Priority` attached to every node, which is
//! drawn lazily with unbounded precision by a `PriorityGenerator`. Tree nodes are stored in a
//! `TypedArena` and refer to each other by `Handle`.
//!
//! # Examples
//!
//! ```
//! use randomized_collections::treap::TreapSet;
//!
//! let mut set = TreapSet::new();
//! for key in &[5, 3, 8, 1, 4, 7, 9] {
//!     set.insert(*key);
//! }
//! assert!(set.contains(&4));
//! assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![1, 3, 4, 5, 7, 8, 9]);
//! ```

mod entry;
pub mod arena;
pub mod comparator;
pub mod error;
pub mod priority;
pub mod treap;
