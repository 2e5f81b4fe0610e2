use crate::arena::Handle;
use crate::entry::Entry;
use crate::priority::Priority;

/// The position of a node relative to its parent. It is derived from the parent's child slots
/// and never stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Handedness {
    Root,
    Left,
    Right,
    Detached,
}

/// A struct representing an internal node of a treap.
///
/// `parent` is a back-reference used for navigation only; nodes are owned by the tree's arena.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub priority: Priority,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U, priority: Priority) -> Self {
        Node {
            entry: Entry { key, value },
            priority,
            parent: None,
            left: None,
            right: None,
        }
    }
}
