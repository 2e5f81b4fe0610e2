//! Randomized binary search tree where each node also maintains the heap invariant over a random
//! priority.
//!
//! Nodes are allocated in a `TypedArena` and link to their parent and children by handle, which
//! keeps rotations constant time and lets cursors remove entries mid-traversal.

mod map;
mod node;
mod pretty;
mod set;
mod tree;

pub use self::map::{TreapMap, TreapMapCursor, TreapMapIntoIter, TreapMapIter};
pub use self::set::{TreapSet, TreapSetCursor, TreapSetIntoIter, TreapSetIter};
