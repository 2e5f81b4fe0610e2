//! Key orderings used by the ordered collections.

use std::cmp::Ordering;

/// A total order over keys of type `T`.
///
/// Any closure of the form `Fn(&T, &T) -> Ordering` is a comparator, and `Natural` orders keys by
/// their `Ord` implementation.
///
/// # Examples
///
/// ```
/// use randomized_collections::comparator::{Comparator, Natural};
/// use std::cmp::Ordering;
///
/// assert_eq!(Natural.compare(&1, &2), Ordering::Less);
///
/// let reverse = |a: &u32, b: &u32| b.cmp(a);
/// assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
/// ```
pub trait Comparator<T> {
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord,
{
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self(left, right)
    }
}
