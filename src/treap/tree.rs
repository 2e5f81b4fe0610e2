use crate::arena::{Handle, TypedArena};
use crate::comparator::Comparator;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::priority::PriorityGenerator;
use crate::treap::node::{Handedness, Node};
use log::trace;
use std::cmp::Ordering;

/// The outcome of inserting a key into a `Tree`.
pub enum Insertion<T, U> {
    /// The key was new and now lives in the node behind the handle.
    Added(Handle),
    /// The key was already present in the node behind the handle. The rejected entry is handed
    /// back untouched.
    Present(Handle, Entry<T, U>),
}

/// The treap shared by `TreapMap` and `TreapSet`.
///
/// Nodes live in an arena and refer to each other by handle. The tree maintains the binary
/// search tree property over keys, as ordered by the comparator, and the heap property over
/// priorities: every node has a smaller priority than its children, so the root holds the
/// minimum priority.
pub struct Tree<T, U, C> {
    arena: TypedArena<Node<T, U>>,
    root: Option<Handle>,
    len: usize,
    comparator: C,
    generator: PriorityGenerator,
}

impl<T, U, C> Tree<T, U, C> {
    pub fn new(comparator: C, generator: PriorityGenerator) -> Self {
        Tree {
            arena: TypedArena::new(),
            root: None,
            len: 0,
            comparator,
            generator,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    pub fn node(&self, handle: Handle) -> &Node<T, U> {
        &self.arena[handle]
    }

    pub fn entry(&self, handle: Handle) -> &Entry<T, U> {
        &self.arena[handle].entry
    }

    pub fn entry_mut(&mut self, handle: Handle) -> &mut Entry<T, U> {
        &mut self.arena[handle].entry
    }

    pub fn handedness(&self, handle: Handle) -> Handedness {
        match self.arena[handle].parent {
            None => Handedness::Root,
            Some(parent) => {
                let parent_node = &self.arena[parent];
                if parent_node.left == Some(handle) {
                    Handedness::Left
                } else if parent_node.right == Some(handle) {
                    Handedness::Right
                } else {
                    Handedness::Detached
                }
            },
        }
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    pub fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    pub fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.rightmost(root))
    }

    /// Returns the node holding the next larger key.
    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.arena[handle].right {
            return Some(self.leftmost(right));
        }
        let mut curr = handle;
        while self.handedness(curr) == Handedness::Right {
            curr = self.arena[curr].parent.expect("Expected right child to have a parent.");
        }
        self.arena[curr].parent
    }

    /// Returns the node holding the next smaller key.
    pub fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.arena[handle].left {
            return Some(self.rightmost(left));
        }
        let mut curr = handle;
        while self.handedness(curr) == Handedness::Left {
            curr = self.arena[curr].parent.expect("Expected left child to have a parent.");
        }
        self.arena[curr].parent
    }

    fn compare_priority(&mut self, first: Handle, second: Handle) -> Ordering {
        if first == second {
            return Ordering::Equal;
        }
        let Tree {
            arena, generator, ..
        } = self;
        let (first_node, second_node) = arena
            .get_pair_mut(first, second)
            .expect("Expected both nodes to be allocated.");
        generator.compare(&mut first_node.priority, &mut second_node.priority)
    }

    fn allocate(&mut self, key: T, value: U) -> Handle {
        let priority = self.generator.generate();
        self.len += 1;
        self.arena.allocate(Node::new(key, value, priority))
    }

    // Points the slot that held a node with the given handedness at `child` instead.
    fn replace_child(
        &mut self,
        parent: Option<Handle>,
        handedness: Handedness,
        child: Option<Handle>,
    ) {
        match (handedness, parent) {
            (Handedness::Root, _) => self.root = child,
            (Handedness::Left, Some(parent)) => self.arena[parent].left = child,
            (Handedness::Right, Some(parent)) => self.arena[parent].right = child,
            _ => panic!("Expected node to be attached to the tree."),
        }
    }

    fn rotate_left(&mut self, handle: Handle) {
        let handedness = self.handedness(handle);
        let parent = self.arena[handle].parent;
        let child = self.arena[handle]
            .right
            .expect("Expected right child node to be `Some`.");
        let middle = self.arena[child].left;

        self.arena[handle].right = middle;
        if let Some(middle) = middle {
            self.arena[middle].parent = Some(handle);
        }
        self.arena[child].left = Some(handle);
        self.arena[handle].parent = Some(child);
        self.arena[child].parent = parent;
        self.replace_child(parent, handedness, Some(child));
    }

    fn rotate_right(&mut self, handle: Handle) {
        let handedness = self.handedness(handle);
        let parent = self.arena[handle].parent;
        let child = self.arena[handle]
            .left
            .expect("Expected left child node to be `Some`.");
        let middle = self.arena[child].right;

        self.arena[handle].left = middle;
        if let Some(middle) = middle {
            self.arena[middle].parent = Some(handle);
        }
        self.arena[child].right = Some(handle);
        self.arena[handle].parent = Some(child);
        self.arena[child].parent = parent;
        self.replace_child(parent, handedness, Some(child));
    }

    fn bubble_up(&mut self, handle: Handle) {
        while let Some(parent) = self.arena[handle].parent {
            if self.compare_priority(handle, parent) != Ordering::Less {
                break;
            }
            match self.handedness(handle) {
                Handedness::Left => self.rotate_right(parent),
                Handedness::Right => self.rotate_left(parent),
                Handedness::Root | Handedness::Detached => break,
            }
        }
    }

    /// Unlinks a node from the tree, frees it, and returns its entry.
    ///
    /// While the node has two children, the child with the smaller priority is rotated above it.
    /// Once it has at most one child, that child takes its place.
    pub fn remove_handle(&mut self, handle: Handle) -> Entry<T, U> {
        while let (Some(left), Some(right)) = (self.arena[handle].left, self.arena[handle].right) {
            if self.compare_priority(left, right) == Ordering::Greater {
                self.rotate_left(handle);
            } else {
                self.rotate_right(handle);
            }
        }

        let handedness = self.handedness(handle);
        let Node {
            entry,
            parent,
            left,
            right,
            ..
        } = self.arena.free(handle);
        let child = left.or(right);
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_child(parent, handedness, child);
        self.len -= 1;
        entry
    }

    /// Frees every node using an explicit worklist.
    pub fn clear(&mut self) {
        let mut stack: Vec<Handle> = self.root.take().into_iter().collect();
        let mut freed = 0;
        while let Some(handle) = stack.pop() {
            let node = self.arena.free(handle);
            stack.extend(node.left);
            stack.extend(node.right);
            freed += 1;
        }
        self.len = 0;
        trace!("Cleared treap of {} nodes.", freed);
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        let mut stack: Vec<(Handle, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        let mut height = 0;
        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[handle];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Removes the root, which holds the minimum priority.
    pub fn pop_root(&mut self) -> Option<Entry<T, U>> {
        let root = self.root?;
        trace!("Removing root of treap with {} nodes.", self.len);
        Some(self.remove_handle(root))
    }

    pub fn iter(&self) -> Iter<'_, T, U, C> {
        Iter {
            tree: self,
            front: self.first(),
            back: self.last(),
            remaining: self.len,
        }
    }

    pub fn cursor(&mut self) -> Cursor<'_, T, U, C> {
        Cursor {
            tree: self,
            position: Position::Start,
            removable: false,
        }
    }
}

impl<T, U, C> Tree<T, U, C>
where
    C: Comparator<T>,
{
    pub fn find(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match self.comparator.compare(key, &node.entry.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts a key-value pair. An existing equal key is left untouched and reported.
    pub fn insert(&mut self, key: T, value: U) -> Insertion<T, U> {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                let handle = self.allocate(key, value);
                self.root = Some(handle);
                return Insertion::Added(handle);
            },
        };

        loop {
            let ordering = self.comparator.compare(&key, &self.arena[curr].entry.key);
            let slot = match ordering {
                Ordering::Less => self.arena[curr].left,
                Ordering::Greater => self.arena[curr].right,
                Ordering::Equal => return Insertion::Present(curr, Entry { key, value }),
            };
            match slot {
                Some(child) => curr = child,
                None => {
                    let handle = self.allocate(key, value);
                    self.arena[handle].parent = Some(curr);
                    if ordering == Ordering::Less {
                        self.arena[curr].left = Some(handle);
                    } else {
                        self.arena[curr].right = Some(handle);
                    }
                    self.bubble_up(handle);
                    return Insertion::Added(handle);
                },
            }
        }
    }

    pub fn remove(&mut self, key: &T) -> Option<Entry<T, U>> {
        self.find(key).map(|handle| self.remove_handle(handle))
    }

    /// Returns the node holding the greatest key less than or equal to `key`.
    pub fn floor(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match self.comparator.compare(key, &node.entry.key) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => {
                    best = Some(handle);
                    curr = node.right;
                },
                Ordering::Equal => return Some(handle),
            }
        }
        best
    }

    /// Returns the node holding the least key greater than or equal to `key`.
    pub fn ceil(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match self.comparator.compare(key, &node.entry.key) {
                Ordering::Greater => curr = node.right,
                Ordering::Less => {
                    best = Some(handle);
                    curr = node.left;
                },
                Ordering::Equal => return Some(handle),
            }
        }
        best
    }

    /// Checks every structural invariant of the tree: parent links agree with child links, the
    /// length matches the number of reachable nodes, keys are strictly increasing in order, and
    /// no node has a greater priority than its children.
    ///
    /// Comparing priorities may draw randomness, hence the mutable receiver.
    pub fn is_valid(&mut self) -> bool {
        let root = match self.root {
            Some(root) => root,
            None => return self.len == 0 && self.arena.is_empty(),
        };
        if self.arena.get(root).map(|node| node.parent) != Some(None) {
            return false;
        }

        let mut links = Vec::new();
        let mut stack = vec![root];
        let mut count = 0;
        while let Some(handle) = stack.pop() {
            count += 1;
            if count > self.len {
                return false;
            }
            let node = &self.arena[handle];
            for &child in node.left.iter().chain(node.right.iter()) {
                let parent = self.arena.get(child).map(|child_node| child_node.parent);
                if parent != Some(Some(handle)) {
                    return false;
                }
                links.push((handle, child));
                stack.push(child);
            }
        }
        if count != self.len || count != self.arena.len() {
            return false;
        }

        let mut prev = None;
        let mut curr = self.first();
        while let Some(handle) = curr {
            if let Some(prev) = prev {
                let ordering = self
                    .comparator
                    .compare(&self.arena[prev].entry.key, &self.arena[handle].entry.key);
                if ordering != Ordering::Less {
                    return false;
                }
            }
            prev = curr;
            curr = self.successor(handle);
        }

        links
            .into_iter()
            .all(|(parent, child)| self.compare_priority(parent, child) != Ordering::Greater)
    }
}

/// An in-order iterator over the entries of a `Tree`.
pub struct Iter<'a, T, U, C> {
    tree: &'a Tree<T, U, C>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T, U, C> Iterator for Iter<'a, T, U, C> {
    type Item = &'a Entry<T, U>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(handle);
        Some(self.tree.entry(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, U, C> DoubleEndedIterator for Iter<'a, T, U, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(handle);
        Some(self.tree.entry(handle))
    }
}

impl<'a, T, U, C> ExactSizeIterator for Iter<'a, T, U, C> {}

/// An owning in-order iterator over the entries of a `Tree`.
pub struct IntoIter<T, U, C> {
    tree: Tree<T, U, C>,
    next: Option<Handle>,
}

impl<T, U, C> IntoIter<T, U, C> {
    pub fn new(tree: Tree<T, U, C>) -> Self {
        let next = tree.first();
        IntoIter { tree, next }
    }
}

impl<T, U, C> Iterator for IntoIter<T, U, C> {
    type Item = Entry<T, U>;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        // the minimum has no left child, so removing it never rotates
        self.next = self.tree.successor(handle);
        Some(self.tree.remove_handle(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

#[cfg(test)]
impl<T, U, C> Tree<T, U, C> {
    /// Links a new node into the given empty slot without restoring heap order, so tests can
    /// build an exact shape.
    pub fn attach(
        &mut self,
        key: T,
        value: U,
        parent: Option<Handle>,
        handedness: Handedness,
    ) -> Handle {
        let handle = self.allocate(key, value);
        self.arena[handle].parent = parent;
        self.replace_child(parent, handedness, Some(handle));
        handle
    }
}

#[derive(Clone, Copy)]
enum Position {
    Start,
    At(Handle),
    End,
}

/// A cursor that walks a `Tree` in order and can remove the entry it last returned.
///
/// After a removal, the cursor rests on the removed entry's predecessor, so the following call to
/// `next` returns the removed entry's successor.
pub struct Cursor<'a, T, U, C> {
    tree: &'a mut Tree<T, U, C>,
    position: Position,
    removable: bool,
}

impl<'a, T, U, C> Cursor<'a, T, U, C> {
    fn upcoming(&self) -> Option<Handle> {
        match self.position {
            Position::Start => self.tree.first(),
            Position::At(handle) => self.tree.successor(handle),
            Position::End => None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.upcoming().is_some()
    }

    pub fn next(&mut self) -> Result<(&T, &mut U)> {
        match self.upcoming() {
            Some(handle) => {
                self.position = Position::At(handle);
                self.removable = true;
                let Entry { ref key, ref mut value } = *self.tree.entry_mut(handle);
                Ok((key, value))
            },
            None => {
                self.position = Position::End;
                self.removable = false;
                Err(Error::IteratorExhausted)
            },
        }
    }

    pub fn remove(&mut self) -> Result<Entry<T, U>> {
        let handle = match self.position {
            Position::At(handle) if self.removable => handle,
            _ => return Err(Error::InvalidIteratorState),
        };
        let predecessor = self.tree.predecessor(handle);
        let entry = self.tree.remove_handle(handle);
        self.position = predecessor.map_or(Position::Start, Position::At);
        self.removable = false;
        trace!("Removed entry through cursor, {} entries remain.", self.tree.len());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::{Insertion, Tree};
    use crate::comparator::Natural;
    use crate::error::Error;
    use crate::priority::PriorityGenerator;
    use crate::treap::node::Handedness;

    fn new_tree() -> Tree<u32, (), Natural> {
        Tree::new(Natural, PriorityGenerator::from_seed([1, 2, 3, 4]))
    }

    fn keys(tree: &Tree<u32, (), Natural>) -> Vec<u32> {
        tree.iter().map(|entry| entry.key).collect()
    }

    fn added(insertion: Insertion<u32, ()>) -> bool {
        match insertion {
            Insertion::Added(_) => true,
            Insertion::Present(..) => false,
        }
    }

    #[test]
    fn test_insert_scenario() {
        let mut tree = new_tree();
        for key in &[5, 3, 8, 1, 4, 7, 9] {
            assert!(added(tree.insert(*key, ())));
            assert!(tree.is_valid());
        }
        assert!(tree.find(&4).is_some());
        assert_eq!(keys(&tree), vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn test_remove_inner_node() {
        let mut tree = new_tree();
        for key in &[5, 3, 8, 1, 4, 7, 9] {
            tree.insert(*key, ());
        }
        assert_eq!(tree.remove(&5).map(|entry| entry.key), Some(5));
        assert!(tree.is_valid());
        assert_eq!(keys(&tree), vec![1, 3, 4, 7, 8, 9]);
        assert_eq!(tree.len(), 6);
        assert!(tree.remove(&5).is_none());
    }

    #[test]
    fn test_insert_present() {
        let mut tree = new_tree();
        tree.insert(5, ());
        match tree.insert(5, ()) {
            Insertion::Present(handle, entry) => {
                assert_eq!(entry.key, 5);
                assert_eq!(tree.entry(handle).key, 5);
            },
            Insertion::Added(_) => panic!("Expected key to be present."),
        }
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_root_has_minimum_priority() {
        let mut tree = new_tree();
        for key in 0..64 {
            tree.insert(key, ());
        }
        let root = tree.root().unwrap();
        assert_eq!(tree.handedness(root), Handedness::Root);
        let handles: Vec<_> = (0..64).map(|key| tree.find(&key).unwrap()).collect();
        for handle in handles {
            if handle != root {
                assert_ne!(tree.handedness(handle), Handedness::Root);
                assert_eq!(tree.compare_priority(root, handle), std::cmp::Ordering::Less);
            }
        }
    }

    #[test]
    fn test_sequential_inserts_stay_shallow() {
        let mut tree = new_tree();
        for key in 0..1024 {
            tree.insert(key, ());
        }
        assert!(tree.is_valid());
        assert!(tree.height() < 60);
    }

    #[test]
    fn test_successor_predecessor() {
        let mut tree = new_tree();
        for key in &[5, 3, 8, 1, 4, 7, 9] {
            tree.insert(*key, ());
        }
        let four = tree.find(&4).unwrap();
        assert_eq!(tree.successor(four).map(|handle| tree.entry(handle).key), Some(5));
        assert_eq!(tree.predecessor(four).map(|handle| tree.entry(handle).key), Some(3));
        assert!(tree.successor(tree.last().unwrap()).is_none());
        assert!(tree.predecessor(tree.first().unwrap()).is_none());
    }

    #[test]
    fn test_floor_ceil() {
        let mut tree = new_tree();
        for key in &[1, 3, 5] {
            tree.insert(*key, ());
        }
        let key_of = |handle| tree.entry(handle).key;
        assert_eq!(tree.floor(&0).map(key_of), None);
        assert_eq!(tree.floor(&4).map(key_of), Some(3));
        assert_eq!(tree.floor(&5).map(key_of), Some(5));
        assert_eq!(tree.ceil(&2).map(key_of), Some(3));
        assert_eq!(tree.ceil(&6).map(key_of), None);
    }

    #[test]
    fn test_clear_frees_nodes() {
        let mut tree = new_tree();
        for key in 0..100 {
            tree.insert(key, ());
        }
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
        assert!(tree.is_valid());
        tree.insert(1, ());
        assert!(tree.is_valid());
    }

    #[test]
    fn test_reversed_iter() {
        let mut tree = new_tree();
        for key in &[2, 1, 3] {
            tree.insert(*key, ());
        }
        let reversed: Vec<u32> = tree.iter().rev().map(|entry| entry.key).collect();
        assert_eq!(reversed, vec![3, 2, 1]);

        let mut iter = tree.iter();
        assert_eq!(iter.next().map(|entry| entry.key), Some(1));
        assert_eq!(iter.next_back().map(|entry| entry.key), Some(3));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().map(|entry| entry.key), Some(2));
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_cursor_remove_every_other() {
        let mut tree = new_tree();
        for key in 0..20 {
            tree.insert(key, ());
        }
        let mut seen = Vec::new();
        {
            let mut cursor = tree.cursor();
            while cursor.has_next() {
                let key = *cursor.next().unwrap().0;
                seen.push(key);
                if key % 2 == 0 {
                    assert_eq!(cursor.remove().map(|entry| entry.key), Ok(key));
                }
            }
            assert_eq!(cursor.next().map(|pair| *pair.0), Err(Error::IteratorExhausted));
        }
        assert_eq!(seen, (0..20).collect::<Vec<u32>>());
        assert_eq!(keys(&tree), (0..20).filter(|key| key % 2 == 1).collect::<Vec<u32>>());
        assert!(tree.is_valid());
    }

    #[test]
    fn test_cursor_invalid_remove() {
        let mut tree = new_tree();
        tree.insert(1, ());
        tree.insert(2, ());
        let mut cursor = tree.cursor();
        assert_eq!(cursor.remove().err(), Some(Error::InvalidIteratorState));
        cursor.next().unwrap();
        assert!(cursor.remove().is_ok());
        assert_eq!(cursor.remove().err(), Some(Error::InvalidIteratorState));
        assert_eq!(cursor.next().map(|pair| *pair.0), Ok(2));
    }
}
