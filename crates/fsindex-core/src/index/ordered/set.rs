//! The ordered index: a sorted set with navigable queries and range views.

use std::ops::{Bound, Range};

use fsindex_common::{Error, FeatureStructure, Result};

use super::array::OrderedArray;
use super::view::SubSet;
use crate::comparator::FsComparator;
use crate::config::IndexConfig;
use crate::index::cow::{CowStore, Snapshot};
use crate::index::position::{Position, PositionalStore};
use crate::iterator::{FsIterator, Iter, SnapshotCursor};

/// Cursor over an ordered index snapshot.
pub type OrderedCursor<T> = SnapshotCursor<T, OrderedArray<T>>;

/// Owned iterator over an ordered index snapshot.
pub type OrderedIter<T> = Iter<T, OrderedArray<T>>;

/// A sorted set of feature structures.
///
/// Elements are ordered by the index's [`FsComparator`]: the caller's key
/// order, then ascending identifier. Two structures with equal keys are both
/// kept; adding the same structure twice is a no-op.
///
/// Iterators and cursors read a snapshot of the backing array. Mutating the
/// index while one is alive copies the array once; the snapshot keeps its
/// content.
///
/// # Example
///
/// ```
/// use fsindex_common::{FsId, FsRef, TypeCode};
/// use fsindex_core::{FsComparator, OrderedIndex};
///
/// let fs = |id| FsRef::new(FsId::new(id), TypeCode::new(1));
/// let mut index = OrderedIndex::new(FsComparator::by_key(|f: &FsRef| f.id));
/// for id in [10, 3, 7] {
///     index.add(fs(id));
/// }
///
/// assert_eq!(index.floor(&fs(7)), Some(fs(7)));
/// assert_eq!(index.lower(&fs(7)), Some(fs(3)));
/// assert_eq!(index.higher(&fs(7)), Some(fs(10)));
/// assert_eq!(index.ceiling(&fs(8)), Some(fs(10)));
/// ```
#[derive(Debug)]
pub struct OrderedIndex<T> {
    store: CowStore<OrderedArray<T>>,
    initial_capacity: usize,
    modification_count: u64,
}

impl<T: FeatureStructure + Clone> OrderedIndex<T> {
    /// Creates an empty index ordered by `comparator`.
    #[must_use]
    pub fn new(comparator: FsComparator<T>) -> Self {
        Self::with_config(comparator, &IndexConfig::default())
    }

    /// Creates an empty index with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(comparator: FsComparator<T>, capacity: usize) -> Self {
        Self::with_config(
            comparator,
            &IndexConfig::default().with_ordered_capacity(capacity),
        )
    }

    /// Creates an empty index sized by `config`.
    #[must_use]
    pub fn with_config(comparator: FsComparator<T>, config: &IndexConfig) -> Self {
        let initial_capacity = config.ordered_initial_capacity;
        Self {
            store: CowStore::new(OrderedArray::with_capacity(comparator, initial_capacity)),
            initial_capacity,
            modification_count: 0,
        }
    }

    /// The order this index keeps.
    #[must_use]
    pub fn comparator(&self) -> &FsComparator<T> {
        self.store.get().comparator()
    }

    pub(crate) fn array(&self) -> &OrderedArray<T> {
        self.store.get()
    }

    // === Mutation ===

    /// Inserts `fs` in order. Returns false if `fs` itself is already present.
    pub fn add(&mut self, fs: T) -> bool {
        match self.store.get().search(&fs) {
            Ok(_) => false,
            Err(index) => {
                self.store.make_mut().insert_at(index, fs);
                self.modification_count += 1;
                true
            }
        }
    }

    /// Removes `fs`. Returns true if it was present.
    pub fn remove(&mut self, fs: &T) -> bool {
        match self.store.get().search(fs) {
            Ok(index) => self.remove_at(index).is_some(),
            Err(_) => false,
        }
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let removed = self.store.make_mut().remove_at(index);
        self.modification_count += 1;
        removed
    }

    pub(crate) fn remove_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if range.len() == self.len() {
            self.clear();
            return;
        }
        self.store.make_mut().remove_range(range);
        self.modification_count += 1;
    }

    /// Removes every element. Outstanding snapshots keep their content.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.store.is_shared() {
            let comparator = self.comparator().clone();
            self.store
                .reset(OrderedArray::with_capacity(comparator, self.initial_capacity));
        } else {
            self.store.make_mut().clear();
        }
        self.modification_count += 1;
    }

    /// Removes and returns the first element.
    pub fn poll_first(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    /// Removes and returns the last element.
    pub fn poll_last(&mut self) -> Option<T> {
        let last = self.len().checked_sub(1)?;
        self.remove_at(last)
    }

    /// Adds every element of `items`. Returns how many were new.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        items.into_iter().map(|fs| self.add(fs)).filter(|&added| added).count()
    }

    /// Removes every element of `items`. Returns how many were present.
    pub fn remove_all<'a, I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items
            .into_iter()
            .map(|fs| self.remove(fs))
            .filter(|&removed| removed)
            .count()
    }

    /// Keeps only the elements for which `keep` returns true. Returns the
    /// number removed.
    ///
    /// `keep` is called once per element, in order. The backing array is
    /// not copied unless something is removed.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> usize {
        let Some(first_dropped) = self.store.get().as_slice().iter().position(|fs| !keep(fs))
        else {
            return 0;
        };
        let mut index = 0;
        let removed = self.store.make_mut().retain(|fs| {
            let at = index;
            index += 1;
            match at.cmp(&first_dropped) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Equal => false,
                std::cmp::Ordering::Greater => keep(fs),
            }
        });
        self.modification_count += 1;
        removed
    }

    // === Queries ===

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.get().len()
    }

    /// Returns true if the index holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.get().is_empty()
    }

    /// Returns true if `fs` itself is present.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        self.store.get().contains(fs)
    }

    /// Returns true if every element of `items` is present.
    pub fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items.into_iter().all(|fs| self.contains(fs))
    }

    /// The first element whose keys equal `fs`'s, ignoring identity.
    ///
    /// May return a structure other than `fs`.
    #[must_use]
    pub fn find(&self, fs: &T) -> Option<T> {
        let array = self.store.get();
        array
            .find_index_without_id(fs)
            .and_then(|i| array.get(i))
            .cloned()
    }

    /// The smallest element.
    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.store.get().as_slice().first().cloned()
    }

    /// The largest element.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.store.get().as_slice().last().cloned()
    }

    /// The greatest element strictly less than `fs`.
    #[must_use]
    pub fn lower(&self, fs: &T) -> Option<T> {
        self.store.get().lower(fs).cloned()
    }

    /// The greatest element less than or equal to `fs`.
    #[must_use]
    pub fn floor(&self, fs: &T) -> Option<T> {
        self.store.get().floor(fs).cloned()
    }

    /// The least element greater than or equal to `fs`.
    #[must_use]
    pub fn ceiling(&self, fs: &T) -> Option<T> {
        self.store.get().ceiling(fs).cloned()
    }

    /// The least element strictly greater than `fs`.
    #[must_use]
    pub fn higher(&self, fs: &T) -> Option<T> {
        self.store.get().higher(fs).cloned()
    }

    /// Position of [`lower`](Self::lower), or [`Position::INVALID`].
    #[must_use]
    pub fn lower_position(&self, fs: &T) -> Position {
        to_position(self.store.get().lower_index(fs))
    }

    /// Position of [`floor`](Self::floor), or [`Position::INVALID`].
    #[must_use]
    pub fn floor_position(&self, fs: &T) -> Position {
        to_position(self.store.get().floor_index(fs))
    }

    /// Position of [`ceiling`](Self::ceiling), or [`Position::INVALID`].
    #[must_use]
    pub fn ceiling_position(&self, fs: &T) -> Position {
        to_position(self.store.get().ceiling_index(fs))
    }

    /// Position of [`higher`](Self::higher), or [`Position::INVALID`].
    #[must_use]
    pub fn higher_position(&self, fs: &T) -> Position {
        to_position(self.store.get().higher_index(fs))
    }

    /// The elements in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.store.get().as_slice().to_vec()
    }

    /// Appends every element to `out`, in order.
    pub fn bulk_export(&self, out: &mut Vec<T>) {
        out.extend_from_slice(self.store.get().as_slice());
    }

    // === Iteration ===

    /// An owned iterator over a snapshot, in ascending order.
    #[must_use]
    pub fn iter(&self) -> OrderedIter<T> {
        Iter::new(self.store.snapshot())
    }

    /// An owned iterator over a snapshot, in descending order.
    #[must_use]
    pub fn descending_iter(&self) -> OrderedIter<T> {
        self.iter().reversed()
    }

    /// An unpositioned cursor over a snapshot of the current content.
    #[must_use]
    pub fn cursor(&self) -> OrderedCursor<T> {
        SnapshotCursor::new(self.store.snapshot(), self.modification_count)
    }

    /// A cursor over a snapshot of the current content, on the first element.
    #[must_use]
    pub fn iterator(&self) -> OrderedCursor<T> {
        let mut cursor = self.cursor();
        cursor.move_to_first();
        cursor
    }

    pub(crate) fn windowed_iter(&self, range: Range<usize>) -> OrderedIter<T> {
        Iter::windowed(self.store.snapshot(), range)
    }

    pub(crate) fn windowed_cursor(&self, range: Range<usize>) -> OrderedCursor<T> {
        SnapshotCursor::windowed(self.store.snapshot(), range, self.modification_count)
    }

    // === Range views ===

    /// A live view of the elements between two bounds.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if both bounds are set and `from` sorts after `to`.
    pub fn range(&self, from: Bound<&T>, to: Bound<&T>) -> Result<SubSet<T, &Self>> {
        self.check_bounds(from, to)?;
        Ok(SubSet::new(self, from.cloned(), to.cloned()))
    }

    /// A live, mutable view of the elements between two bounds.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if both bounds are set and `from` sorts after `to`.
    pub fn range_mut(&mut self, from: Bound<&T>, to: Bound<&T>) -> Result<SubSet<T, &mut Self>> {
        self.check_bounds(from, to)?;
        Ok(SubSet::new(self, from.cloned(), to.cloned()))
    }

    /// A view of the elements from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if `from` sorts after `to`.
    pub fn sub_set(
        &self,
        from: &T,
        from_inclusive: bool,
        to: &T,
        to_inclusive: bool,
    ) -> Result<SubSet<T, &Self>> {
        self.range(bound(from, from_inclusive), bound(to, to_inclusive))
    }

    /// A view of the elements below `to`.
    #[must_use]
    pub fn head_set(&self, to: &T, inclusive: bool) -> SubSet<T, &Self> {
        SubSet::new(self, Bound::Unbounded, bound(to, inclusive).cloned())
    }

    /// A view of the elements above `from`.
    #[must_use]
    pub fn tail_set(&self, from: &T, inclusive: bool) -> SubSet<T, &Self> {
        SubSet::new(self, bound(from, inclusive).cloned(), Bound::Unbounded)
    }

    /// Mutable [`sub_set`](Self::sub_set).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if `from` sorts after `to`.
    pub fn sub_set_mut(
        &mut self,
        from: &T,
        from_inclusive: bool,
        to: &T,
        to_inclusive: bool,
    ) -> Result<SubSet<T, &mut Self>> {
        self.range_mut(bound(from, from_inclusive), bound(to, to_inclusive))
    }

    /// Mutable [`head_set`](Self::head_set).
    pub fn head_set_mut(&mut self, to: &T, inclusive: bool) -> SubSet<T, &mut Self> {
        SubSet::new(self, Bound::Unbounded, bound(to, inclusive).cloned())
    }

    /// Mutable [`tail_set`](Self::tail_set).
    pub fn tail_set_mut(&mut self, from: &T, inclusive: bool) -> SubSet<T, &mut Self> {
        SubSet::new(self, bound(from, inclusive).cloned(), Bound::Unbounded)
    }

    /// A view of the whole index in descending order.
    #[must_use]
    pub fn descending_set(&self) -> SubSet<T, &Self> {
        SubSet::new(self, Bound::Unbounded, Bound::Unbounded).descending()
    }

    fn check_bounds(&self, from: Bound<&T>, to: Bound<&T>) -> Result<()> {
        match (from, to) {
            (
                Bound::Included(lo) | Bound::Excluded(lo),
                Bound::Included(hi) | Bound::Excluded(hi),
            ) if self.comparator().compare(lo, hi).is_gt() => Err(Error::InvalidRange),
            _ => Ok(()),
        }
    }

    /// Hash of the element identities in iteration order (FNV-1a fold).
    ///
    /// Two indexes holding the same structures hash alike; insertion order
    /// does not matter.
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.store
            .get()
            .as_slice()
            .iter()
            .fold(0xcbf2_9ce4_8422_2325_u64, |hash, fs| {
                (hash ^ fs.id().as_u64()).wrapping_mul(0x0100_0000_01b3)
            })
    }

    // === Snapshots and counters ===

    /// Number of structural changes so far.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    /// Number of times the backing array was copied because a snapshot
    /// still referenced it.
    #[must_use]
    pub fn copy_count(&self) -> u64 {
        self.store.copy_count()
    }

    /// Captures the current backing array.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<OrderedArray<T>> {
        self.store.snapshot()
    }

    /// Returns true if the snapshot still reflects the live content.
    #[must_use]
    pub fn is_current(&self, snapshot: &Snapshot<OrderedArray<T>>) -> bool {
        snapshot.is_current(&self.store)
    }

    // === Live positions ===

    /// Position of the first element in the live array.
    #[must_use]
    pub fn move_to_first(&self) -> Position {
        self.store.get().first_position()
    }

    /// Position of the last element in the live array.
    #[must_use]
    pub fn move_to_last(&self) -> Position {
        self.store.get().last_position()
    }

    /// Position after `pos`.
    #[must_use]
    pub fn move_to_next(&self, pos: Position) -> Position {
        self.store.get().next_position(pos)
    }

    /// Position before `pos`.
    #[must_use]
    pub fn move_to_previous(&self, pos: Position) -> Position {
        self.store.get().previous_position(pos)
    }

    /// Returns true if `pos` holds an element in the live array.
    #[must_use]
    pub fn is_valid(&self, pos: Position) -> bool {
        self.store.get().is_valid_position(pos)
    }

    /// The element at `pos` in the live array.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<T> {
        self.store.get().get_at(pos).cloned()
    }
}

impl<T: FeatureStructure + Clone> Extend<T> for OrderedIndex<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

fn bound<T>(fs: &T, inclusive: bool) -> Bound<&T> {
    if inclusive {
        Bound::Included(fs)
    } else {
        Bound::Excluded(fs)
    }
}

fn to_position(index: Option<usize>) -> Position {
    index.map_or(Position::INVALID, Position::at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsindex_common::{FsId, TypeCode};

    #[derive(Debug, Clone, PartialEq)]
    struct Token {
        id: u64,
        begin: u32,
    }

    impl FeatureStructure for Token {
        fn id(&self) -> FsId {
            FsId::new(self.id)
        }

        fn type_code(&self) -> TypeCode {
            TypeCode::new(3)
        }
    }

    fn tok(id: u64, begin: u32) -> Token {
        Token { id, begin }
    }

    fn by_begin() -> OrderedIndex<Token> {
        OrderedIndex::new(FsComparator::by_key(|t: &Token| t.begin))
    }

    fn begins<I: IntoIterator<Item = Token>>(items: I) -> Vec<u32> {
        items.into_iter().map(|t| t.begin).collect()
    }

    fn ids<I: IntoIterator<Item = Token>>(items: I) -> Vec<u64> {
        items.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_navigable_scenario() {
        let mut index = by_begin();
        index.add(tok(1, 10));
        index.add(tok(2, 3));
        index.add(tok(3, 7));

        let probe = tok(3, 7);
        assert_eq!(index.floor(&probe), Some(tok(3, 7)));
        assert_eq!(index.lower(&probe), Some(tok(2, 3)));
        assert_eq!(index.higher(&probe), Some(tok(1, 10)));
        // A probe that is not indexed.
        assert_eq!(index.ceiling(&tok(99, 8)), Some(tok(1, 10)));
        assert_eq!(index.lower(&tok(2, 3)), None);
        assert_eq!(index.higher(&tok(1, 10)), None);
    }

    #[test]
    fn test_equal_keys_kept_in_id_order() {
        let mut index = by_begin();
        assert!(index.add(tok(9, 5)));
        assert!(index.add(tok(4, 5)));
        assert!(index.add(tok(6, 5)));
        assert!(!index.add(tok(4, 5)));

        assert_eq!(ids(index.iter()), vec![4, 6, 9]);
        assert_eq!(index.find(&tok(100, 5)), Some(tok(4, 5)));
        assert_eq!(index.find(&tok(100, 6)), None);
    }

    #[test]
    fn test_floor_ceiling_bracket_missing_probe() {
        let mut index = by_begin();
        index.add_all([tok(1, 10), tok(2, 20), tok(3, 30)]);

        assert_eq!(index.floor(&tok(50, 25)), Some(tok(2, 20)));
        assert_eq!(index.ceiling(&tok(50, 25)), Some(tok(3, 30)));
        assert_eq!(index.floor(&tok(50, 5)), None);
        assert_eq!(index.ceiling(&tok(50, 35)), None);
        // Tie-break: same key, larger id sorts after the stored element.
        assert_eq!(index.floor(&tok(50, 20)), Some(tok(2, 20)));
        assert_eq!(index.ceiling(&tok(0, 20)), Some(tok(2, 20)));
    }

    #[test]
    fn test_positions() {
        let mut index = by_begin();
        index.add_all([tok(1, 10), tok(2, 20)]);

        assert_eq!(index.floor_position(&tok(9, 15)).index(), Some(0));
        assert_eq!(index.higher_position(&tok(9, 15)).index(), Some(1));
        assert_eq!(index.lower_position(&tok(1, 10)), Position::INVALID);
        assert_eq!(index.ceiling_position(&tok(9, 25)), Position::INVALID);

        let pos = index.move_to_first();
        assert_eq!(index.get(pos), Some(tok(1, 10)));
        let pos = index.move_to_next(pos);
        assert_eq!(index.get(pos), Some(tok(2, 20)));
        assert!(!index.is_valid(index.move_to_next(pos)));
        assert_eq!(index.get(index.move_to_previous(index.move_to_last())), Some(tok(1, 10)));
    }

    #[test]
    fn test_poll() {
        let mut index = by_begin();
        index.add_all([tok(1, 2), tok(2, 1), tok(3, 3)]);

        assert_eq!(index.poll_first(), Some(tok(2, 1)));
        assert_eq!(index.poll_last(), Some(tok(3, 3)));
        assert_eq!(index.poll_last(), Some(tok(1, 2)));
        assert_eq!(index.poll_first(), None);
        assert_eq!(index.poll_last(), None);
        assert_eq!(index.modification_count(), 6);
    }

    #[test]
    fn test_bulk_operations() {
        let mut index = by_begin();
        let items = [tok(1, 1), tok(2, 2), tok(3, 3), tok(4, 4)];
        assert_eq!(index.add_all(items.clone()), 4);
        assert_eq!(index.add_all(items.clone()), 0);
        assert!(index.contains_all(&items));

        assert_eq!(index.remove_all(&items[..2]), 2);
        assert!(!index.contains_all(&items));
        assert_eq!(begins(index.to_vec()), vec![3, 4]);

        let mut out = vec![tok(9, 9)];
        index.bulk_export(&mut out);
        assert_eq!(begins(out), vec![9, 3, 4]);
    }

    #[test]
    fn test_retain_calls_predicate_once() {
        let mut index = by_begin();
        index.add_all((0..6).map(|i| tok(i, i as u32)));

        let mut calls = 0;
        let removed = index.retain(|t| {
            calls += 1;
            t.begin % 2 == 0
        });
        assert_eq!(removed, 3);
        assert_eq!(calls, 6);
        assert_eq!(begins(index.iter()), vec![0, 2, 4]);

        let count = index.modification_count();
        assert_eq!(index.retain(|_| true), 0);
        assert_eq!(index.modification_count(), count);
    }

    #[test]
    fn test_descending() {
        let mut index = by_begin();
        index.add_all([tok(1, 3), tok(2, 1), tok(3, 2)]);

        assert_eq!(begins(index.descending_iter()), vec![3, 2, 1]);
        let ascending: Vec<_> = index.iter().collect();
        let mut reversed: Vec<_> = index.descending_iter().collect();
        reversed.reverse();
        assert_eq!(ascending, reversed);
    }

    #[test]
    fn test_iterator_isolated_from_mutation() {
        let mut index = by_begin();
        index.add_all([tok(1, 1), tok(2, 2), tok(3, 3)]);

        let mut cursor = index.iterator();
        assert_eq!(cursor.get().unwrap(), tok(1, 1));

        index.add(tok(4, 4));
        index.remove(&tok(2, 2));

        let mut seen = Vec::new();
        while cursor.is_valid() {
            seen.push(cursor.get().unwrap().begin);
            cursor.move_to_next();
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(begins(index.iter()), vec![1, 3, 4]);
        assert_eq!(index.copy_count(), 1);
        assert!(cursor.modification_count() < index.modification_count());
    }

    #[test]
    fn test_clear_with_snapshot_keeps_snapshot() {
        let mut index = by_begin();
        index.add_all([tok(1, 1), tok(2, 2)]);
        let iter = index.iter();

        index.clear();
        assert!(index.is_empty());
        assert_eq!(begins(iter), vec![1, 2]);
        assert_eq!(index.copy_count(), 0);

        index.add(tok(3, 3));
        assert_eq!(index.first(), Some(tok(3, 3)));
        assert_eq!(index.last(), Some(tok(3, 3)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut index = by_begin();
        index.add_all([tok(1, 1), tok(2, 2)]);

        assert_eq!(
            index.sub_set(&tok(2, 2), true, &tok(1, 1), true).err(),
            Some(Error::InvalidRange)
        );
        // Equal exclusive bounds are an empty view, not an error.
        let view = index.sub_set(&tok(1, 1), false, &tok(1, 1), false).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_cursor_move_to() {
        let mut index = by_begin();
        index.add_all([tok(1, 10), tok(2, 20), tok(3, 20), tok(4, 30)]);

        let mut cursor = index.cursor();
        cursor.move_to(&tok(0, 20));
        assert_eq!(cursor.get().unwrap(), tok(2, 20));
        cursor.move_to(&tok(0, 25));
        assert_eq!(cursor.get().unwrap(), tok(4, 30));
        cursor.move_to(&tok(0, 31));
        assert!(!cursor.is_valid());
    }

    #[test]
    fn test_structural_hash_follows_content() {
        let mut a = by_begin();
        a.add_all([tok(1, 10), tok(2, 20), tok(3, 30)]);
        let mut b = by_begin();
        b.add_all([tok(3, 30), tok(1, 10), tok(2, 20)]);
        assert_eq!(a.structural_hash(), b.structural_hash());

        b.remove(&tok(2, 20));
        assert_ne!(a.structural_hash(), b.structural_hash());
        b.add(tok(2, 20));
        assert_eq!(a.structural_hash(), b.structural_hash());

        let as_any = crate::index::FsIndex::from(a);
        assert_eq!(as_any.structural_hash(), Ok(b.structural_hash()));
    }
}
