use crate::comparator::{Comparator, Natural};
use crate::error::{Error, Result};
use crate::priority::PriorityGenerator;
use crate::treap::map::{TreapMap, TreapMapCursor, TreapMapIntoIter, TreapMapIter};
use std::any::Any;
use std::fmt::{self, Debug};
use std::iter::FromIterator;

/// An ordered set implemented using a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property.
/// Each node has a key and a priority. The key of any node is greater than all keys in its left
/// subtree and less than all keys occurring in its right subtree. The priority of a node is less
/// than the priority of all nodes in its subtrees. By randomly generating priorities, the
/// expected height of the tree is proportional to the logarithm of the number of keys.
///
/// Priorities have unbounded precision: their random bits are drawn lazily while they are
/// compared, so no two nodes ever share a priority.
///
/// The set also offers a queue-like surface (`peek`, `poll`, `element`, `remove_head`) that acts
/// on the root of the treap. Since the root is the node with the minimum priority, these yield an
/// arbitrary element of the set rather than its minimum or maximum key; use `min` and `max` for
/// the key extrema.
///
/// # Examples
///
/// ```
/// use randomized_collections::treap::TreapSet;
///
/// let mut set = TreapSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct TreapSet<T, C = Natural> {
    map: TreapMap<T, (), C>,
}

impl<T> TreapSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `TreapSet<T>` ordered by the keys' `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = TreapSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> TreapSet<T, C>
where
    C: Comparator<T>,
{
    /// Constructs a new, empty `TreapSet<T, C>` ordered by a particular comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::with_comparator(|a: &String, b: &String| a.len().cmp(&b.len()));
    /// assert!(set.insert(String::from("abc")));
    /// assert!(!set.insert(String::from("xyz")));
    /// assert!(set.insert(String::from("a")));
    /// assert_eq!(set.min().map(String::as_str), Some("a"));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        TreapSet {
            map: TreapMap::with_comparator(comparator),
        }
    }

    /// Constructs a new, empty `TreapSet<T, C>` ordered by a particular comparator that draws
    /// node priorities from a particular generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::comparator::Natural;
    /// use randomized_collections::priority::PriorityGenerator;
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let generator = PriorityGenerator::from_seed([1, 2, 3, 4]);
    /// let set: TreapSet<u32> = TreapSet::with_generator(Natural, generator);
    /// ```
    pub fn with_generator(comparator: C, generator: PriorityGenerator) -> Self {
        TreapSet {
            map: TreapMap::with_generator(comparator, generator),
        }
    }

    /// Inserts a key into the set. Returns `true` if the key was added and `false` if an equal
    /// key was already present, in which case the set is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        self.map.insert_absent(key, ())
    }

    /// Inserts a key into the set. Equivalent to `insert`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.offer(1));
    /// assert!(!set.offer(1));
    /// ```
    pub fn offer(&mut self, key: T) -> bool {
        self.insert(key)
    }

    /// Removes a key from the set. Returns `true` if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &T) -> bool {
        self.take(key).is_some()
    }

    /// Removes a key from the set and returns the stored key. Returns `None` if the key was not
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.take(&1), Some(1));
    /// assert_eq!(set.take(&1), None);
    /// ```
    pub fn take(&mut self, key: &T) -> Option<T> {
        self.map.remove(key).map(|pair| pair.0)
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        self.map.contains_key(key)
    }

    /// Returns a reference to the stored key equal to a particular key. Returns `None` if the
    /// key does not exist in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.get(&1), Some(&1));
    /// assert_eq!(set.get(&2), None);
    /// ```
    pub fn get(&self, key: &T) -> Option<&T> {
        self.map.get_key_value(key).map(|pair| pair.0)
    }

    /// Inserts every key of an iterator. Returns `true` if any key was added.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.insert_all(vec![1, 2]));
    /// assert!(set.insert_all(vec![2, 3]));
    /// assert!(!set.insert_all(vec![1, 3]));
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn insert_all<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for key in keys {
            changed |= self.insert(key);
        }
        changed
    }

    /// Removes every key of an iterator. Returns `true` if any key was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set: TreapSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// assert!(set.remove_all(&[2, 4]));
    /// assert!(!set.remove_all(&[4, 5]));
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// ```
    pub fn remove_all<'a, I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut changed = false;
        for key in keys {
            changed |= self.remove(key);
        }
        changed
    }

    /// Returns `true` if every key of an iterator exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// assert!(set.contains_all(&[1, 3]));
    /// assert!(!set.contains_all(&[1, 4]));
    /// ```
    pub fn contains_all<'a, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        keys.into_iter().all(|key| self.contains(key))
    }

    /// Retains only the keys for which the predicate returns `true`. Returns `true` if any key
    /// was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set: TreapSet<u32> = (0..6).collect();
    /// assert!(set.retain(|key| key % 2 == 0));
    /// assert!(!set.retain(|key| key % 2 == 0));
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&0, &2, &4]);
    /// ```
    pub fn retain<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Ok(key) = cursor.next() {
            if !predicate(key) {
                cursor.remove().expect("Expected cursor to rest on a key.");
                changed = true;
            }
        }
        changed
    }

    /// Retains only the keys that also exist in another set. Returns `true` if any key was
    /// removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set: TreapSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// let other: TreapSet<u32> = vec![2, 3, 4].into_iter().collect();
    /// assert!(set.retain_all(&other));
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &3]);
    /// ```
    pub fn retain_all<D>(&mut self, other: &TreapSet<T, D>) -> bool
    where
        D: Comparator<T>,
    {
        self.retain(|key| other.contains(key))
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.map.floor(key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns
    /// `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.map.ceil(key)
    }

    /// Checks the structural invariants of the underlying treap. Intended for tests and
    /// debugging.
    pub fn is_valid(&mut self) -> bool {
        self.map.is_valid()
    }
}

impl<T, C> TreapSet<T, C>
where
    T: Any,
    C: Comparator<T>,
{
    /// Checks if a dynamically typed key exists in the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key is not a `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::error::Error;
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1u32);
    /// assert_eq!(set.contains_any(&1u32), Ok(true));
    /// assert_eq!(set.contains_any(&"1"), Err(Error::TypeMismatch));
    /// ```
    pub fn contains_any(&self, key: &dyn Any) -> Result<bool> {
        key.downcast_ref::<T>()
            .map(|key| self.contains(key))
            .ok_or(Error::TypeMismatch)
    }

    /// Removes a dynamically typed key from the set. Returns `true` if the key was present.
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key is not a `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::error::Error;
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1u32);
    /// assert_eq!(set.remove_any(&1u64), Err(Error::TypeMismatch));
    /// assert_eq!(set.remove_any(&1u32), Ok(true));
    /// assert_eq!(set.remove_any(&1u32), Ok(false));
    /// ```
    pub fn remove_any(&mut self, key: &dyn Any) -> Result<bool> {
        let key = key.downcast_ref::<T>().ok_or(Error::TypeMismatch)?;
        Ok(self.remove(key))
    }
}

impl<T, C> TreapSet<T, C> {
    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = TreapSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.map.min()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.map.max()
    }

    /// Returns the key at the root of the treap, or `None` if the set is empty. The root holds
    /// the minimum priority, so this is an arbitrary element of the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert_eq!(set.peek(), None);
    /// set.insert(1);
    /// assert_eq!(set.peek(), Some(&1));
    /// ```
    pub fn peek(&self) -> Option<&T> {
        self.map.peek().map(|pair| pair.0)
    }

    /// Removes and returns the key at the root of the treap, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.poll(), Some(1));
    /// assert_eq!(set.poll(), None);
    /// ```
    pub fn poll(&mut self) -> Option<T> {
        self.map.poll().map(|pair| pair.0)
    }

    /// Returns the key at the root of the treap.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyContainer` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::error::Error;
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert_eq!(set.element(), Err(Error::EmptyContainer));
    /// set.insert(1);
    /// assert_eq!(set.element(), Ok(&1));
    /// ```
    pub fn element(&self) -> Result<&T> {
        self.peek().ok_or(Error::EmptyContainer)
    }

    /// Removes and returns the key at the root of the treap.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyContainer` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::error::Error;
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove_head(), Ok(1));
    /// assert_eq!(set.remove_head(), Err(Error::EmptyContainer));
    /// ```
    pub fn remove_head(&mut self) -> Result<T> {
        self.poll().ok_or(Error::EmptyContainer)
    }

    /// Returns the number of nodes on the longest path from the root of the treap to a leaf.
    pub fn height(&self) -> usize {
        self.map.height()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapSetIter<'_, T, C> {
        TreapSetIter {
            map_iter: self.map.iter(),
        }
    }

    /// Returns a cursor over the set. The cursor yields keys in order and can remove the key it
    /// last yielded without disturbing the traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set: TreapSet<u32> = (0..5).collect();
    /// let mut cursor = set.cursor();
    /// while let Ok(key) = cursor.next() {
    ///     if *key < 3 {
    ///         cursor.remove().unwrap();
    ///     }
    /// }
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &4]);
    /// ```
    pub fn cursor(&mut self) -> TreapSetCursor<'_, T, C> {
        TreapSetCursor {
            map_cursor: self.map.cursor(),
        }
    }
}

impl<T, C> TreapSet<T, C>
where
    T: Debug,
{
    /// Returns the lines of a diagram of the treap's shape. The right subtree of each node is
    /// drawn above it and the left subtree below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.pretty_print(), vec!["o-Node(1; 0b0....)"]);
    /// ```
    pub fn pretty_print(&self) -> Vec<String> {
        self.map.pretty_print()
    }
}

impl<T, C> IntoIterator for TreapSet<T, C> {
    type Item = T;
    type IntoIter = TreapSetIntoIter<T, C>;

    fn into_iter(self) -> Self::IntoIter {
        TreapSetIntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a TreapSet<T, C>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = TreapSetIter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct TreapSetIntoIter<T, C = Natural> {
    map_iter: TreapMapIntoIter<T, (), C>,
}

impl<T, C> Iterator for TreapSetIntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

/// An iterator for `TreapSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct TreapSetIter<'a, T, C = Natural> {
    map_iter: TreapMapIter<'a, T, (), C>,
}

impl<'a, T, C> Iterator for TreapSetIter<'a, T, C>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<'a, T, C> DoubleEndedIterator for TreapSetIter<'a, T, C>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|pair| pair.0)
    }
}

impl<'a, T, C> ExactSizeIterator for TreapSetIter<'a, T, C> where T: 'a {}

/// A cursor for `TreapSet<T, C>`.
///
/// The cursor traverses the elements of the set in-order. Removing the key it last yielded
/// leaves the rest of the traversal intact: every remaining key is still yielded exactly once.
pub struct TreapSetCursor<'a, T, C = Natural> {
    map_cursor: TreapMapCursor<'a, T, (), C>,
}

impl<'a, T, C> TreapSetCursor<'a, T, C> {
    /// Returns `true` if a call to `next` would yield a key.
    pub fn has_next(&self) -> bool {
        self.map_cursor.has_next()
    }

    /// Advances the cursor and returns the next key.
    ///
    /// # Errors
    ///
    /// Returns `Error::IteratorExhausted` if every key has been yielded.
    pub fn next(&mut self) -> Result<&T> {
        self.map_cursor.next().map(|pair| pair.0)
    }

    /// Removes the key last yielded by `next` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIteratorState` if `next` has not yielded a key since the cursor
    /// was created or since the last removal.
    pub fn remove(&mut self) -> Result<T> {
        self.map_cursor.remove().map(|pair| pair.0)
    }
}

impl<T> Default for TreapSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for TreapSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::new();
        set.insert_all(iter);
        set
    }
}

impl<T, C> Extend<T> for TreapSet<T, C>
where
    C: Comparator<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_all(iter);
    }
}

impl<T, C> Debug for TreapSet<T, C>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
