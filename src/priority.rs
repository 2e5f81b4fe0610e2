//! Random priorities of unbounded precision that are drawn lazily.
//!
//! A `Priority` is conceptually an infinite binary fraction whose bits are uniformly random. Only
//! the prefix needed to order two priorities is ever materialized: comparisons draw 64-bit words
//! on demand and cache them, so two distinct priorities are ordered after an expected constant
//! number of words and never compare equal.

use rand::{self, Rng, SeedableRng, XorShiftRng};
use std::cmp::Ordering;
use std::fmt;

enum Repr {
    Bottom,
    Drawn(Vec<u64>),
    Top,
}

/// An opaque, totally ordered random value.
///
/// Priorities are created by a `PriorityGenerator` and can only be ordered through
/// `PriorityGenerator::compare`. The sentinels `Priority::top()` and `Priority::bottom()` compare
/// greater and less than every generated priority without consuming any randomness.
pub struct Priority {
    repr: Repr,
}

impl Priority {
    /// Returns a priority greater than every generated priority.
    pub fn top() -> Self {
        Priority { repr: Repr::Top }
    }

    /// Returns a priority less than every generated priority.
    pub fn bottom() -> Self {
        Priority { repr: Repr::Bottom }
    }

    /// Returns the number of 64-bit words drawn for this priority so far. Sentinels never draw
    /// any.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::priority::{Priority, PriorityGenerator};
    ///
    /// let mut generator = PriorityGenerator::from_seed([1, 2, 3, 4]);
    /// let mut a = generator.generate();
    /// let mut b = generator.generate();
    /// assert_eq!(a.precision(), 0);
    ///
    /// generator.compare(&mut a, &mut b);
    /// assert!(a.precision() >= 1);
    /// assert_eq!(Priority::top().precision(), 0);
    /// ```
    pub fn precision(&self) -> usize {
        match self.repr {
            Repr::Drawn(ref words) => words.len(),
            Repr::Bottom | Repr::Top => 0,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Top => write!(f, "0b1"),
            Repr::Bottom => write!(f, "0b0"),
            Repr::Drawn(ref words) => {
                write!(f, "0b0.")?;
                for word in words {
                    write!(f, "{:064b}", word)?;
                }
                write!(f, "...")
            },
        }
    }
}

impl fmt::Debug for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A source of `Priority` values and the only way to order them.
///
/// The generator owns the random number generator that lazily extends priorities while they are
/// compared.
///
/// # Examples
///
/// ```
/// use randomized_collections::priority::{Priority, PriorityGenerator};
/// use std::cmp::Ordering;
///
/// let mut generator = PriorityGenerator::new();
/// let mut a = generator.generate();
/// let mut b = generator.generate();
///
/// let ordering = generator.compare(&mut a, &mut b);
/// assert_ne!(ordering, Ordering::Equal);
/// assert_eq!(generator.compare(&mut b, &mut a), ordering.reverse());
/// assert_eq!(generator.compare(&mut a, &mut Priority::top()), Ordering::Less);
/// ```
pub struct PriorityGenerator {
    rng: XorShiftRng,
}

impl PriorityGenerator {
    /// Constructs a new `PriorityGenerator` seeded from the thread-local random number
    /// generator.
    pub fn new() -> Self {
        PriorityGenerator {
            rng: rand::weak_rng(),
        }
    }

    /// Constructs a new `PriorityGenerator` that produces a reproducible sequence of
    /// priorities.
    ///
    /// # Panics
    ///
    /// Panics if the seed is all zeroes.
    pub fn from_seed(seed: [u32; 4]) -> Self {
        PriorityGenerator {
            rng: XorShiftRng::from_seed(seed),
        }
    }

    /// Returns a fresh priority. No randomness is drawn until the priority is compared.
    pub fn generate(&mut self) -> Priority {
        Priority {
            repr: Repr::Drawn(Vec::with_capacity(1)),
        }
    }

    /// Orders two priorities, drawing and caching words on either side as needed.
    ///
    /// Two sentinels of the same kind are equal. Two generated priorities are ordered by the
    /// first word at which they differ, compared as unsigned integers.
    pub fn compare(&mut self, left: &mut Priority, right: &mut Priority) -> Ordering {
        match (&mut left.repr, &mut right.repr) {
            (Repr::Top, Repr::Top) | (Repr::Bottom, Repr::Bottom) => Ordering::Equal,
            (Repr::Top, _) | (_, Repr::Bottom) => Ordering::Greater,
            (_, Repr::Top) | (Repr::Bottom, _) => Ordering::Less,
            (Repr::Drawn(left_words), Repr::Drawn(right_words)) => {
                let mut index = 0;
                loop {
                    let left_word = Self::word(&mut self.rng, left_words, index);
                    let right_word = Self::word(&mut self.rng, right_words, index);
                    match left_word.cmp(&right_word) {
                        Ordering::Equal => index += 1,
                        ordering => return ordering,
                    }
                }
            },
        }
    }

    fn word(rng: &mut XorShiftRng, words: &mut Vec<u64>, index: usize) -> u64 {
        while words.len() <= index {
            words.push(rng.next_u64());
        }
        words[index]
    }
}

impl Default for PriorityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, PriorityGenerator};
    use std::cmp::Ordering;

    #[test]
    fn test_generate_draws_nothing() {
        let mut generator = PriorityGenerator::from_seed([1, 1, 1, 1]);
        let priority = generator.generate();
        assert_eq!(priority.precision(), 0);
        assert_eq!(priority.to_string(), "0b0....");
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        let mut generator = PriorityGenerator::from_seed([1, 1, 1, 1]);
        let mut a = generator.generate();
        let mut b = generator.generate();
        let ordering = generator.compare(&mut a, &mut b);
        assert_ne!(ordering, Ordering::Equal);
        assert_eq!(generator.compare(&mut b, &mut a), ordering.reverse());
    }

    #[test]
    fn test_compare_is_stable() {
        let mut generator = PriorityGenerator::from_seed([4, 3, 2, 1]);
        let mut priorities: Vec<Priority> = (0..32).map(|_| generator.generate()).collect();
        let mut first = Vec::new();
        for i in 1..priorities.len() {
            let (head, tail) = priorities.split_at_mut(i);
            first.push(generator.compare(&mut head[i - 1], &mut tail[0]));
        }
        for i in 1..priorities.len() {
            let (head, tail) = priorities.split_at_mut(i);
            assert_eq!(generator.compare(&mut head[i - 1], &mut tail[0]), first[i - 1]);
        }
    }

    #[test]
    fn test_compare_is_transitive() {
        let mut generator = PriorityGenerator::from_seed([7, 7, 7, 7]);
        let mut priorities: Vec<Priority> = (0..16).map(|_| generator.generate()).collect();
        // insertion sort using only the lazy comparison
        for i in 1..priorities.len() {
            let mut j = i;
            while j > 0 {
                let (head, tail) = priorities.split_at_mut(j);
                if generator.compare(&mut head[j - 1], &mut tail[0]) == Ordering::Greater {
                    priorities.swap(j - 1, j);
                    j -= 1;
                } else {
                    break;
                }
            }
        }
        for i in 0..priorities.len() {
            for j in i + 1..priorities.len() {
                let (head, tail) = priorities.split_at_mut(j);
                assert_eq!(generator.compare(&mut head[i], &mut tail[0]), Ordering::Less);
            }
        }
    }

    #[test]
    fn test_sentinels() {
        let mut generator = PriorityGenerator::from_seed([1, 1, 1, 1]);
        let mut priority = generator.generate();
        let mut top = Priority::top();
        let mut bottom = Priority::bottom();

        assert_eq!(generator.compare(&mut priority, &mut top), Ordering::Less);
        assert_eq!(generator.compare(&mut top, &mut priority), Ordering::Greater);
        assert_eq!(generator.compare(&mut priority, &mut bottom), Ordering::Greater);
        assert_eq!(generator.compare(&mut bottom, &mut priority), Ordering::Less);
        assert_eq!(generator.compare(&mut top, &mut bottom), Ordering::Greater);
        assert_eq!(generator.compare(&mut top, &mut Priority::top()), Ordering::Equal);
        assert_eq!(generator.compare(&mut bottom, &mut Priority::bottom()), Ordering::Equal);
        assert_eq!(priority.precision(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Priority::top().to_string(), "0b1");
        assert_eq!(Priority::bottom().to_string(), "0b0");

        let mut generator = PriorityGenerator::from_seed([1, 1, 1, 1]);
        let mut a = generator.generate();
        let mut b = generator.generate();
        generator.compare(&mut a, &mut b);
        let rendered = a.to_string();
        assert!(rendered.starts_with("0b0."));
        assert!(rendered.ends_with("..."));
        assert_eq!(rendered.len(), 4 + 64 * a.precision() + 3);
    }
}
