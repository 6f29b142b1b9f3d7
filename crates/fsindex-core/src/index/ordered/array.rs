//! Sorted array of feature structures.
//!
//! Backing store of [`OrderedIndex`](super::OrderedIndex). Elements are kept
//! sorted under [`FsComparator::compare`] (keys, then identity), so binary
//! search finds an element exactly when the same structure is present.
//!
//! The navigable queries come in two flavours: `*_index` returns the array
//! index of the answer, the plain form returns the element.

use std::cmp::Ordering;
use std::ops::{Bound, Range};

use fsindex_common::FeatureStructure;

use crate::comparator::FsComparator;
use crate::index::position::{Position, PositionalStore};

/// A sorted `Vec` plus the comparator that sorts it.
#[derive(Debug, Clone)]
pub struct OrderedArray<T> {
    items: Vec<T>,
    comparator: FsComparator<T>,
}

impl<T: FeatureStructure + Clone> OrderedArray<T> {
    /// Creates an empty array ordered by `comparator`.
    #[must_use]
    pub fn new(comparator: FsComparator<T>) -> Self {
        Self::with_capacity(comparator, 0)
    }

    /// Creates an empty array with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(comparator: FsComparator<T>, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            comparator,
        }
    }

    /// The comparator this array is sorted by.
    #[must_use]
    pub fn comparator(&self) -> &FsComparator<T> {
        &self.comparator
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the array holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The elements in sort order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Binary search under the full order. `Ok(i)` if `fs` itself is at `i`,
    /// otherwise `Err(i)` with its insertion point.
    pub fn search(&self, fs: &T) -> Result<usize, usize> {
        self.items
            .binary_search_by(|probe| self.comparator.compare(probe, fs))
    }

    /// Inserts `fs` at `index`. The caller guarantees `index` came from
    /// [`search`](Self::search) on the current content.
    pub(crate) fn insert_at(&mut self, index: usize, fs: T) {
        debug_assert!(index == 0 || self.comparator.compare(&self.items[index - 1], &fs).is_lt());
        self.items.insert(index, fs);
    }

    /// Inserts `fs` in order. Returns false if it was already present.
    pub fn add(&mut self, fs: T) -> bool {
        match self.search(&fs) {
            Ok(_) => false,
            Err(index) => {
                self.items.insert(index, fs);
                true
            }
        }
    }

    /// Removes `fs`. Returns the stored element if it was present.
    pub fn remove(&mut self, fs: &T) -> Option<T> {
        let index = self.search(fs).ok()?;
        Some(self.items.remove(index))
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Removes the elements in `range`.
    pub fn remove_range(&mut self, range: Range<usize>) {
        self.items.drain(range);
    }

    /// Keeps only the elements for which `keep` returns true. Returns the
    /// number removed.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        before - self.items.len()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns true if `fs` itself is present.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        self.search(fs).is_ok()
    }

    /// Index of the leftmost element equal to `fs` under the key comparator
    /// alone, ignoring identity.
    #[must_use]
    pub fn find_index_without_id(&self, fs: &T) -> Option<usize> {
        let index = self.partition_without_id(fs);
        self.items
            .get(index)
            .filter(|found| self.comparator.compare_without_id(found, fs) == Ordering::Equal)
            .map(|_| index)
    }

    /// Number of leading elements whose keys are strictly less than `fs`'s.
    #[must_use]
    pub fn partition_without_id(&self, fs: &T) -> usize {
        self.items
            .partition_point(|probe| self.comparator.compare_without_id(probe, fs) == Ordering::Less)
    }

    /// Index of the greatest element strictly less than `fs`.
    #[must_use]
    pub fn lower_index(&self, fs: &T) -> Option<usize> {
        let (Ok(i) | Err(i)) = self.search(fs);
        i.checked_sub(1)
    }

    /// Index of the greatest element less than or equal to `fs`.
    #[must_use]
    pub fn floor_index(&self, fs: &T) -> Option<usize> {
        match self.search(fs) {
            Ok(i) => Some(i),
            Err(i) => i.checked_sub(1),
        }
    }

    /// Index of the least element greater than or equal to `fs`.
    #[must_use]
    pub fn ceiling_index(&self, fs: &T) -> Option<usize> {
        let (Ok(i) | Err(i)) = self.search(fs);
        (i < self.items.len()).then_some(i)
    }

    /// Index of the least element strictly greater than `fs`.
    #[must_use]
    pub fn higher_index(&self, fs: &T) -> Option<usize> {
        let i = match self.search(fs) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        (i < self.items.len()).then_some(i)
    }

    /// The greatest element strictly less than `fs`.
    #[must_use]
    pub fn lower(&self, fs: &T) -> Option<&T> {
        self.lower_index(fs).and_then(|i| self.items.get(i))
    }

    /// The greatest element less than or equal to `fs`.
    #[must_use]
    pub fn floor(&self, fs: &T) -> Option<&T> {
        self.floor_index(fs).and_then(|i| self.items.get(i))
    }

    /// The least element greater than or equal to `fs`.
    #[must_use]
    pub fn ceiling(&self, fs: &T) -> Option<&T> {
        self.ceiling_index(fs).and_then(|i| self.items.get(i))
    }

    /// The least element strictly greater than `fs`.
    #[must_use]
    pub fn higher(&self, fs: &T) -> Option<&T> {
        self.higher_index(fs).and_then(|i| self.items.get(i))
    }

    /// First index inside a lower bound.
    #[must_use]
    pub fn bound_start(&self, bound: Bound<&T>) -> usize {
        match bound {
            Bound::Unbounded => 0,
            Bound::Included(fs) => {
                let (Ok(i) | Err(i)) = self.search(fs);
                i
            }
            Bound::Excluded(fs) => match self.search(fs) {
                Ok(i) => i + 1,
                Err(i) => i,
            },
        }
    }

    /// First index past an upper bound.
    #[must_use]
    pub fn bound_end(&self, bound: Bound<&T>) -> usize {
        match bound {
            Bound::Unbounded => self.items.len(),
            Bound::Included(fs) => match self.search(fs) {
                Ok(i) => i + 1,
                Err(i) => i,
            },
            Bound::Excluded(fs) => {
                let (Ok(i) | Err(i)) = self.search(fs);
                i
            }
        }
    }

    /// The index range covered by a pair of bounds. Empty if they cross.
    #[must_use]
    pub fn bound_range(&self, from: Bound<&T>, to: Bound<&T>) -> Range<usize> {
        let start = self.bound_start(from);
        let end = self.bound_end(to).max(start);
        start..end
    }
}

impl<T: FeatureStructure + Clone> PositionalStore<T> for OrderedArray<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn first_position(&self) -> Position {
        Position::at(0)
    }

    fn last_position(&self) -> Position {
        self.items
            .len()
            .checked_sub(1)
            .map_or(Position::INVALID, Position::at)
    }

    fn next_position(&self, pos: Position) -> Position {
        pos.index().map_or(Position::at(0), |i| Position::at(i + 1))
    }

    fn previous_position(&self, pos: Position) -> Position {
        pos.index()
            .and_then(|i| i.checked_sub(1))
            .map_or(Position::INVALID, Position::at)
    }

    fn get_at(&self, pos: Position) -> Option<&T> {
        pos.index().and_then(|i| self.items.get(i))
    }

    fn seek(&self, fs: &T) -> Position {
        Position::at(self.partition_without_id(fs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsindex_common::{FsId, TypeCode};

    #[derive(Debug, Clone)]
    struct Num {
        id: u64,
        value: i32,
    }

    impl FeatureStructure for Num {
        fn id(&self) -> FsId {
            FsId::new(self.id)
        }

        fn type_code(&self) -> TypeCode {
            TypeCode::new(0)
        }
    }

    fn num(id: u64, value: i32) -> Num {
        Num { id, value }
    }

    fn by_value() -> OrderedArray<Num> {
        OrderedArray::new(FsComparator::by_key(|n: &Num| n.value))
    }

    fn values(array: &OrderedArray<Num>) -> Vec<i32> {
        array.as_slice().iter().map(|n| n.value).collect()
    }

    #[test]
    fn test_add_keeps_sorted() {
        let mut array = by_value();
        for (id, value) in [(1, 10), (2, 3), (3, 7), (4, 3)] {
            assert!(array.add(num(id, value)));
        }
        assert_eq!(values(&array), vec![3, 3, 7, 10]);
        // Equal keys ordered by id.
        assert_eq!(array.get(0).map(|n| n.id), Some(2));
        assert_eq!(array.get(1).map(|n| n.id), Some(4));
    }

    #[test]
    fn test_add_same_identity_is_noop() {
        let mut array = by_value();
        assert!(array.add(num(1, 5)));
        assert!(!array.add(num(1, 5)));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut array = by_value();
        array.add(num(1, 5));
        array.add(num(2, 5));
        assert_eq!(array.remove(&num(1, 5)).map(|n| n.id), Some(1));
        assert!(array.remove(&num(1, 5)).is_none());
        assert_eq!(array.len(), 1);
        assert!(array.remove_at(3).is_none());
    }

    #[test]
    fn test_navigable_indices() {
        let mut array = by_value();
        let ten = num(1, 10);
        let three = num(2, 3);
        let seven = num(3, 7);
        for n in [&ten, &three, &seven] {
            array.add(n.clone());
        }

        assert_eq!(array.floor(&seven).map(|n| n.value), Some(7));
        assert_eq!(array.lower(&seven).map(|n| n.value), Some(3));
        assert_eq!(array.higher(&seven).map(|n| n.value), Some(10));
        assert_eq!(array.ceiling(&seven).map(|n| n.value), Some(7));

        let eight = num(100, 8);
        assert_eq!(array.ceiling(&eight).map(|n| n.value), Some(10));
        assert_eq!(array.floor(&eight).map(|n| n.value), Some(7));

        assert!(array.lower(&three).is_none());
        assert!(array.higher(&ten).is_none());
        assert!(array.floor(&num(100, 1)).is_none());
        assert!(array.ceiling(&num(100, 11)).is_none());
    }

    #[test]
    fn test_find_without_id() {
        let mut array = by_value();
        array.add(num(5, 4));
        array.add(num(2, 4));
        array.add(num(9, 8));

        // Leftmost equal key, which is the smallest id.
        assert_eq!(array.find_index_without_id(&num(77, 4)), Some(0));
        assert_eq!(array.get(0).map(|n| n.id), Some(2));
        assert_eq!(array.find_index_without_id(&num(77, 6)), None);
        assert_eq!(array.seek(&num(77, 6)), Position::at(2));
    }

    #[test]
    fn test_bound_range() {
        let mut array = by_value();
        for (id, value) in [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)] {
            array.add(num(id, value));
        }
        let two = num(2, 2);
        let four = num(4, 4);

        assert_eq!(array.bound_range(Bound::Included(&two), Bound::Included(&four)), 1..4);
        assert_eq!(array.bound_range(Bound::Excluded(&two), Bound::Excluded(&four)), 2..3);
        assert_eq!(array.bound_range(Bound::Unbounded, Bound::Excluded(&two)), 0..1);
        assert_eq!(array.bound_range(Bound::Included(&four), Bound::Unbounded), 3..5);
        // Crossed bounds give an empty range.
        assert!(array.bound_range(Bound::Included(&four), Bound::Included(&two)).is_empty());
    }

    #[test]
    fn test_positions() {
        let mut array = by_value();
        assert_eq!(array.last_position(), Position::INVALID);
        assert!(!array.is_valid_position(array.first_position()));

        array.add(num(1, 1));
        array.add(num(2, 2));
        let first = array.first_position();
        let second = array.next_position(first);
        assert_eq!(array.get_at(second).map(|n| n.value), Some(2));
        assert!(!array.is_valid_position(array.next_position(second)));
        assert_eq!(array.previous_position(first), Position::INVALID);
    }

    #[test]
    fn test_retain() {
        let mut array = by_value();
        for id in 0..10 {
            array.add(num(id, id as i32));
        }
        let removed = array.retain(|n| n.value % 2 == 0);
        assert_eq!(removed, 5);
        assert_eq!(values(&array), vec![0, 2, 4, 6, 8]);
    }
}
