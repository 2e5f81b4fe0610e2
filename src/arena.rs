//! Slot allocator for a single type of object.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// A simple allocator that only allocates a single type of object.
///
/// Objects live in a single growable `Vec` of blocks and are addressed by `Handle`. Freed blocks
/// are threaded onto a free-list and reused by later allocations, so a handle stays valid exactly
/// until the object it refers to is freed. The arena uses no unsafe code.
///
/// # Examples
///
/// ```
/// use randomized_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<usize>,
    blocks: Vec<Block<T>>,
    len: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_handle(&self, handle: Handle) -> bool {
        handle.index < self.blocks.len()
    }

    /// Constructs a new, empty `TypedArena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new();
    /// ```
    pub fn new() -> Self {
        TypedArena {
            head: None,
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// Constructs a new, empty `TypedArena<T>` with room for `capacity` objects before it needs
    /// to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns a `Handle` that can later be used to
    /// retrieve references to the object and to free it.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Handle {
                    index: self.blocks.len() - 1,
                }
            },
            Some(index) => {
                let vacant_block = mem::replace(&mut self.blocks[index], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next_index) => {
                        self.head = next_index;
                        Handle { index }
                    },
                    Block::Occupied(_) => panic!("Expected a vacant block."),
                }
            },
        }
    }

    /// Frees an object in the arena and returns it. The block is reused by a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if the handle corresponds to an invalid or vacant block.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if !self.is_valid_handle(handle) {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(&mut self.blocks[handle.index], Block::Vacant(self.head));
        match old_block {
            Block::Vacant(next_index) => {
                self.blocks[handle.index] = Block::Vacant(next_index);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle.index);
                value
            },
        }
    }

    /// Returns an immutable reference to an object in the arena. Returns `None` if the handle
    /// does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.blocks[handle.index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object in the arena. Returns `None` if the handle does
    /// not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// *arena.get_mut(x).unwrap() = 1;
    /// assert_eq!(arena.get(x), Some(&1));
    /// ```
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.blocks[handle.index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns mutable references to two distinct objects at once. Returns `None` if both
    /// handles are the same or if either one does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// let y = arena.allocate(1);
    /// {
    ///     let (a, b) = arena.get_pair_mut(x, y).unwrap();
    ///     std::mem::swap(a, b);
    /// }
    /// assert_eq!(arena[x], 1);
    /// assert_eq!(arena[y], 0);
    /// assert!(arena.get_pair_mut(x, x).is_none());
    /// ```
    pub fn get_pair_mut(&mut self, first: Handle, second: Handle) -> Option<(&mut T, &mut T)> {
        if first == second || !self.is_valid_handle(first) || !self.is_valid_handle(second) {
            return None;
        }
        let (low, high) = if first.index < second.index {
            (first.index, second.index)
        } else {
            (second.index, first.index)
        };
        let (head, tail) = self.blocks.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Block::Occupied(low_value), Block::Occupied(high_value)) => {
                if first.index < second.index {
                    Some((low_value, high_value))
                } else {
                    Some((high_value, low_value))
                }
            },
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// arena.allocate(0);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new();
    /// assert!(arena.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;
    use super::TypedArena;

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new();
        arena.free(Handle { index: 0 });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_block() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        arena.free(handle);
        arena.free(handle);
    }

    #[test]
    fn test_allocate() {
        let mut arena = TypedArena::new();
        assert_eq!(arena.allocate(0), Handle { index: 0 });
        assert_eq!(arena.allocate(0), Handle { index: 1 });
        assert_eq!(arena.allocate(0), Handle { index: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_block() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        assert_eq!(arena.free(handle), 0);
        assert!(arena.is_empty());
        assert_eq!(arena.allocate(1), handle);
        assert_eq!(arena[handle], 1);
    }

    #[test]
    fn test_free_list_is_last_in_first_out() {
        let mut arena = TypedArena::new();
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        let c = arena.allocate(2);
        arena.free(a);
        arena.free(c);
        assert_eq!(arena.allocate(3), c);
        assert_eq!(arena.allocate(4), a);
        assert_eq!(arena.allocate(5), Handle { index: 3 });
        assert_eq!(arena[b], 1);
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        arena.free(handle);
        assert_eq!(arena.get(handle), None);
        assert_eq!(arena.get_mut(handle), None);
    }

    #[test]
    fn test_get_invalid_block() {
        let arena: TypedArena<u32> = TypedArena::new();
        assert_eq!(arena.get(Handle { index: 0 }), None);
    }

    #[test]
    fn test_get_pair_mut() {
        let mut arena = TypedArena::new();
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        {
            let (x, y) = arena.get_pair_mut(b, a).unwrap();
            assert_eq!((*x, *y), (1, 0));
            *x += 10;
        }
        assert_eq!(arena[b], 11);
    }

    #[test]
    fn test_get_pair_mut_invalid() {
        let mut arena = TypedArena::new();
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        arena.free(b);
        assert!(arena.get_pair_mut(a, a).is_none());
        assert!(arena.get_pair_mut(a, b).is_none());
        assert!(arena.get_pair_mut(a, Handle { index: 7 }).is_none());
    }
}
