//! Small insertion-ordered sets.
//!
//! [`SimplexSet`] stores the vertices of a simplex and the neighbor lists of
//! the adjacency graph. Both stay tiny (three vertices, three neighbors for a
//! triangle), so a linear scan over an inline buffer beats hashing, and
//! insertion order is preserved, which keeps iteration deterministic.

#![forbid(unsafe_code)]

use smallvec::SmallVec;
use std::fmt;

/// Inline capacity before a [`SimplexSet`] spills to the heap.
pub const SIMPLEX_SET_INLINE_CAPACITY: usize = 4;

/// An insertion-ordered collection of distinct elements.
///
/// Membership uses `PartialEq`. Inserting an element that is already present
/// is a no-op. Two sets compare equal when they have the same members in any
/// order.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::simplex_set::SimplexSet;
///
/// let mut set: SimplexSet<u32> = [3, 1, 3, 2].into_iter().collect();
/// assert_eq!(set.as_slice(), &[3, 1, 2]);
/// assert!(!set.insert(1));
/// assert!(set.remove(&3));
/// assert_eq!(set, [2, 1].into_iter().collect::<SimplexSet<u32>>());
/// ```
#[derive(Clone)]
pub struct SimplexSet<T> {
    items: SmallVec<[T; SIMPLEX_SET_INLINE_CAPACITY]>,
}

impl<T: PartialEq> SimplexSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    /// Creates an empty set with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: SmallVec::with_capacity(capacity),
        }
    }

    /// Adds `item` at the end unless an equal element is present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes the element equal to `item`, preserving the order of the rest.
    ///
    /// Returns `true` if the set changed.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.position(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Symmetric-difference insert: removes `item` if present, otherwise adds
    /// it. Returns `true` if `item` is a member afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::simplex_set::SimplexSet;
    ///
    /// let mut set = SimplexSet::new();
    /// assert!(set.toggle('a'));
    /// assert!(!set.toggle('a'));
    /// assert!(set.is_empty());
    /// ```
    pub fn toggle(&mut self, item: T) -> bool {
        if self.remove(&item) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Returns `true` if an element equal to `item` is present.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|x| x == item)
    }

    /// Index of the element equal to `item`.
    #[inline]
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|x| x == item)
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.items.iter().all(|x| other.contains(x))
    }
}

impl<T> SimplexSet<T> {
    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at `index` in insertion order.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Elements in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Elements in insertion order, as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq> Default for SimplexSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<T> for SimplexSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: PartialEq> Extend<T> for SimplexSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: PartialEq> PartialEq for SimplexSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T: Eq> Eq for SimplexSet<T> {}

impl<'a, T> IntoIterator for &'a SimplexSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for SimplexSet<T> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; SIMPLEX_SET_INLINE_CAPACITY]>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for SimplexSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_rejected_and_order_is_kept() {
        let mut set = SimplexSet::new();
        assert!(set.insert(5));
        assert!(set.insert(2));
        assert!(!set.insert(5));
        assert!(set.insert(9));
        assert_eq!(set.as_slice(), &[5, 2, 9]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(1), Some(&2));
        assert_eq!(set.position(&9), Some(2));
    }

    #[test]
    fn removal_preserves_order() {
        let mut set: SimplexSet<_> = (0..6).collect();
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        assert_eq!(set.as_slice(), &[0, 1, 3, 4, 5]);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_computes_symmetric_difference() {
        let mut boundary = SimplexSet::new();
        for edge in [(0, 1), (1, 2), (2, 0), (1, 2), (2, 3), (3, 1)] {
            boundary.toggle(edge);
        }
        // The shared edge (1, 2) cancels out.
        assert_eq!(boundary.as_slice(), &[(0, 1), (2, 0), (2, 3), (3, 1)]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: SimplexSet<_> = ["x", "y", "z"].into_iter().collect();
        let b: SimplexSet<_> = ["z", "x", "y"].into_iter().collect();
        let c: SimplexSet<_> = ["x", "y"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(c.is_subset(&a));
        assert!(!a.is_subset(&c));
    }

    #[test]
    fn iteration_and_debug() {
        let set: SimplexSet<_> = [1, 2].into_iter().collect();
        let doubled: Vec<_> = set.iter().map(|x| x * 2).collect();
        assert_eq!(doubled, vec![2, 4]);
        assert_eq!(format!("{set:?}"), "{1, 2}");
        assert_eq!(set.into_iter().sum::<i32>(), 3);
    }
}
