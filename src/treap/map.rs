use crate::comparator::{Comparator, Natural};
use crate::entry::Entry;
use crate::error::Result;
use crate::priority::PriorityGenerator;
use crate::treap::tree::{self, Insertion, Tree};
use std::fmt::{self, Debug};
use std::iter::FromIterator;
use std::mem;

/// An ordered map implemented using a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property.
/// Each node has a key, a value, and a priority. The key of any node is greater than all keys in
/// its left subtree and less than all keys occurring in its right subtree. The priority of a node
/// is less than the priority of all nodes in its subtrees. By randomly generating priorities, the
/// expected height of the tree is proportional to the logarithm of the number of keys.
///
/// Keys are ordered by a `Comparator`, which defaults to the key type's `Ord` implementation.
///
/// # Examples
///
/// ```
/// use randomized_collections::treap::TreapMap;
///
/// let mut map = TreapMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// *map.get_mut(&0).unwrap() = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct TreapMap<T, U, C = Natural> {
    tree: Tree<T, U, C>,
}

impl<T, U> TreapMap<T, U>
where
    T: Ord,
{
    /// Constructs a new, empty `TreapMap<T, U>` ordered by the keys' `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let map: TreapMap<u32, u32> = TreapMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, U, C> TreapMap<T, U, C>
where
    C: Comparator<T>,
{
    /// Constructs a new, empty `TreapMap<T, U, C>` ordered by a particular comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.min(), Some(&2));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_generator(comparator, PriorityGenerator::new())
    }

    /// Constructs a new, empty `TreapMap<T, U, C>` ordered by a particular comparator that draws
    /// node priorities from a particular generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::comparator::Natural;
    /// use randomized_collections::priority::PriorityGenerator;
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let generator = PriorityGenerator::from_seed([1, 2, 3, 4]);
    /// let map: TreapMap<u32, u32> = TreapMap::with_generator(Natural, generator);
    /// ```
    pub fn with_generator(comparator: C, generator: PriorityGenerator) -> Self {
        TreapMap {
            tree: Tree::new(comparator, generator),
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, only the value
    /// is replaced: the stored key is kept, and the given key is returned along with the old value.
    /// The key is searched for only once.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)> {
        match self.tree.insert(key, value) {
            Insertion::Added(_) => None,
            Insertion::Present(handle, Entry { key, value }) => {
                let old_value = mem::replace(&mut self.tree.entry_mut(handle).value, value);
                Some((key, old_value))
            },
        }
    }

    /// Inserts a key-value pair into the map only if the key does not exist yet. Returns `true`
    /// if the pair was inserted; otherwise the map is left unchanged and the pair is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert!(map.insert_absent(1, 1));
    /// assert!(!map.insert_absent(1, 2));
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn insert_absent(&mut self, key: T, value: U) -> bool {
        match self.tree.insert(key, value) {
            Insertion::Added(_) => true,
            Insertion::Present(..) => false,
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<(T, U)> {
        self.tree.remove(key).map(Entry::into_pair)
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &T) -> bool {
        self.tree.find(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get(&self, key: &T) -> Option<&U> {
        self.get_key_value(key).map(|pair| pair.1)
    }

    /// Returns immutable references to the stored key equal to a particular key and to its
    /// value. It will return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 2);
    /// assert_eq!(map.get_key_value(&1), Some((&1, &2)));
    /// ```
    pub fn get_key_value(&self, key: &T) -> Option<(&T, &U)> {
        self.tree.find(key).map(|handle| {
            let entry = self.tree.entry(handle);
            (&entry.key, &entry.value)
        })
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Option<&mut U> {
        match self.tree.find(key) {
            Some(handle) => Some(&mut self.tree.entry_mut(handle).value),
            None => None,
        }
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.tree.floor(key).map(|handle| &self.tree.entry(handle).key)
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.tree.ceil(key).map(|handle| &self.tree.entry(handle).key)
    }

    /// Checks the structural invariants of the underlying treap. Intended for tests and
    /// debugging.
    pub fn is_valid(&mut self) -> bool {
        self.tree.is_valid()
    }
}

impl<T, U, C> TreapMap<T, U, C> {
    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let map: TreapMap<u32, u32> = TreapMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.first().map(|handle| &self.tree.entry(handle).key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.last().map(|handle| &self.tree.entry(handle).key)
    }

    /// Returns the key-value pair at the root of the treap, which holds the minimum priority.
    /// This is an arbitrary element of the map, not its minimum or maximum key. Returns `None` if
    /// the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.peek(), None);
    /// map.insert(1, 1);
    /// assert_eq!(map.peek(), Some((&1, &1)));
    /// ```
    pub fn peek(&self) -> Option<(&T, &U)> {
        self.tree.root().map(|handle| {
            let entry = self.tree.entry(handle);
            (&entry.key, &entry.value)
        })
    }

    /// Removes and returns the key-value pair at the root of the treap. Returns `None` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.poll(), Some((1, 1)));
    /// assert_eq!(map.poll(), None);
    /// ```
    pub fn poll(&mut self) -> Option<(T, U)> {
        self.tree.pop_root().map(Entry::into_pair)
    }

    /// Returns the number of nodes on the longest path from the root of the treap to a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.height(), 0);
    /// map.insert(1, 1);
    /// assert_eq!(map.height(), 1);
    /// ```
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapMapIter<'_, T, U, C> {
        TreapMapIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns an iterator over the keys of the map in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(3, 1);
    /// map.insert(1, 3);
    /// assert_eq!(map.keys().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// ```
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.iter().map(|pair| pair.0)
    }

    /// Returns an iterator over the values of the map in the order of their keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(3, 1);
    /// map.insert(1, 3);
    /// assert_eq!(map.values().collect::<Vec<&u32>>(), vec![&3, &1]);
    /// ```
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &U> {
        self.iter().map(|pair| pair.1)
    }

    /// Returns a cursor over the map. The cursor yields keys with mutable references to their
    /// values in order, and can remove the pair it last yielded without disturbing the
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.insert(3, 3);
    ///
    /// let mut cursor = map.cursor();
    /// while cursor.has_next() {
    ///     let (key, value) = cursor.next().unwrap();
    ///     *value *= 10;
    ///     if *key == 2 {
    ///         cursor.remove().unwrap();
    ///     }
    /// }
    ///
    /// assert_eq!(map.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&1, &10), (&3, &30)]);
    /// ```
    pub fn cursor(&mut self) -> TreapMapCursor<'_, T, U, C> {
        TreapMapCursor {
            cursor: self.tree.cursor(),
        }
    }
}

impl<T, U, C> TreapMap<T, U, C>
where
    T: Debug,
{
    /// Returns the lines of a diagram of the treap's shape. The right subtree of each node is
    /// drawn above it and the left subtree below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.pretty_print(), vec!["+--@"]);
    /// map.insert(1, 1);
    /// assert_eq!(map.pretty_print(), vec!["o-Node(1; 0b0....)"]);
    /// ```
    pub fn pretty_print(&self) -> Vec<String> {
        self.tree.pretty_print()
    }
}

impl<T, U, C> IntoIterator for TreapMap<T, U, C> {
    type Item = (T, U);
    type IntoIter = TreapMapIntoIter<T, U, C>;

    fn into_iter(self) -> Self::IntoIter {
        TreapMapIntoIter {
            tree_iter: tree::IntoIter::new(self.tree),
        }
    }
}

impl<'a, T, U, C> IntoIterator for &'a TreapMap<T, U, C>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);
    type IntoIter = TreapMapIter<'a, T, U, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapMap<T, U, C>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct TreapMapIntoIter<T, U, C = Natural> {
    tree_iter: tree::IntoIter<T, U, C>,
}

impl<T, U, C> Iterator for TreapMapIntoIter<T, U, C> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(Entry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

/// An iterator for `TreapMap<T, U, C>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct TreapMapIter<'a, T, U, C = Natural> {
    tree_iter: tree::Iter<'a, T, U, C>,
}

impl<'a, T, U, C> Iterator for TreapMapIter<'a, T, U, C>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<'a, T, U, C> DoubleEndedIterator for TreapMapIter<'a, T, U, C>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back().map(|entry| (&entry.key, &entry.value))
    }
}

impl<'a, T, U, C> ExactSizeIterator for TreapMapIter<'a, T, U, C>
where
    T: 'a,
    U: 'a,
{
}

/// A cursor for `TreapMap<T, U, C>`.
///
/// The cursor traverses the elements of the map in-order. Removing the pair it last yielded
/// leaves the rest of the traversal intact: every remaining pair is still yielded exactly once.
pub struct TreapMapCursor<'a, T, U, C = Natural> {
    cursor: tree::Cursor<'a, T, U, C>,
}

impl<'a, T, U, C> TreapMapCursor<'a, T, U, C> {
    /// Returns `true` if a call to `next` would yield a pair.
    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    /// Advances the cursor and returns the next pair.
    ///
    /// # Errors
    ///
    /// Returns `Error::IteratorExhausted` if every pair has been yielded.
    pub fn next(&mut self) -> Result<(&T, &mut U)> {
        self.cursor.next()
    }

    /// Removes the pair last yielded by `next` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIteratorState` if `next` has not yielded a pair since the cursor
    /// was created or since the last removal.
    pub fn remove(&mut self) -> Result<(T, U)> {
        self.cursor.remove().map(Entry::into_pair)
    }
}

impl<T, U> Default for TreapMap<T, U>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> FromIterator<(T, U)> for TreapMap<T, U>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<T, U, C> Extend<(T, U)> for TreapMap<T, U, C>
where
    C: Comparator<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<T, U, C> Debug for TreapMap<T, U, C>
where
    T: Debug,
    U: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
