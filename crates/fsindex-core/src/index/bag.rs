//! Bag index: an unordered, identity-deduplicated set of feature structures.
//!
//! Use this when callers only need "every structure of this type" and never
//! a sort order. Inserting the same structure twice is a no-op; two distinct
//! structures with identical content are both kept.
//!
//! # Example
//!
//! ```
//! use fsindex_common::{FsId, FsRef, TypeCode};
//! use fsindex_core::index::BagIndex;
//!
//! let fs = |id| FsRef::new(FsId::new(id), TypeCode::new(1));
//! let mut bag = BagIndex::new();
//!
//! assert!(bag.insert(fs(5)));
//! assert!(bag.insert(fs(2)));
//! assert!(bag.insert(fs(9)));
//! assert!(!bag.insert(fs(2))); // same identity
//! assert_eq!(bag.len(), 3);
//! ```

use std::cmp::Ordering;

use fsindex_common::{Error, FeatureStructure, Result};

use super::cow::{CowStore, Snapshot};
use super::hash_set::IdentityHashSet;
use super::position::{Position, PositionalStore};
use crate::config::IndexConfig;
use crate::iterator::{FsIterator, Iter, SnapshotCursor};

/// Cursor over a bag index snapshot.
pub type BagCursor<T> = SnapshotCursor<T, IdentityHashSet<T>>;

/// Owned iterator over a bag index snapshot.
pub type BagIter<T> = Iter<T, IdentityHashSet<T>>;

/// A slot in the live table of a [`BagIndex`].
///
/// Stamped with the table generation it was taken from. Once the table is
/// resized or rehashed the position is no longer valid and reads nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagPosition {
    slot: Position,
    generation: u64,
}

impl BagPosition {
    /// A position that is never valid.
    pub const INVALID: Self = Self {
        slot: Position::INVALID,
        generation: 0,
    };

    /// The slot within the table generation this position came from.
    #[must_use]
    pub fn slot(self) -> Position {
        self.slot
    }
}

/// A set of feature structures keyed by identity, with copy-on-write
/// snapshots for iteration.
#[derive(Debug)]
pub struct BagIndex<T> {
    store: CowStore<IdentityHashSet<T>>,
    modification_count: u64,
}

impl<T: FeatureStructure + Clone> BagIndex<T> {
    /// Creates an empty bag index.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&IndexConfig::default())
    }

    /// Creates a bag index sized for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&IndexConfig::default().with_bag_capacity(capacity))
    }

    /// Creates a bag index sized and tuned by `config`.
    #[must_use]
    pub fn with_config(config: &IndexConfig) -> Self {
        Self {
            store: CowStore::new(IdentityHashSet::with_load(
                config.bag_initial_capacity,
                config.max_load_percent,
            )),
            modification_count: 0,
        }
    }

    /// Adds `fs` unless the same structure is already present.
    ///
    /// Returns true if the index changed.
    pub fn insert(&mut self, fs: T) -> bool {
        if self.store.get().contains(&fs) {
            return false;
        }
        let inserted = self.store.make_mut().insert(fs);
        if inserted {
            self.modification_count += 1;
        }
        inserted
    }

    /// Removes `fs`. Returns true if it was present.
    pub fn remove(&mut self, fs: &T) -> bool {
        if !self.store.get().contains(fs) {
            return false;
        }
        let removed = self.store.make_mut().remove(fs);
        if removed {
            self.modification_count += 1;
        }
        removed
    }

    /// Returns true if `fs` itself is present.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        self.store.get().contains(fs)
    }

    /// Returns the stored handle for `fs`, if present.
    ///
    /// A bag has no notion of "equal but distinct", so this is either `fs`'s
    /// own structure or nothing.
    #[must_use]
    pub fn find(&self, fs: &T) -> Option<T> {
        self.store.get().get(fs.id()).cloned()
    }

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

    /// Removes every element. Outstanding snapshots keep their content.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.store.is_shared() {
            let fresh = self.store.get().empty_like();
            self.store.reset(fresh);
        } else {
            self.store.make_mut().clear();
        }
        self.modification_count += 1;
    }

    /// Appends every element to `out`, in no particular order.
    pub fn bulk_export(&self, out: &mut Vec<T>) {
        let set = self.store.get();
        out.reserve(set.len());
        out.extend(set.iter().cloned());
    }

    /// Order used when a bag has to act as a comparable container: equal
    /// only for the same structure, otherwise by identifier.
    ///
    /// Content is never consulted, so two distinct structures with identical
    /// content never compare equal.
    #[must_use]
    pub fn compare(a: &T, b: &T) -> Ordering {
        a.id().cmp(&b.id())
    }

    /// Content hashing is not defined for a bag index.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::UnsupportedOperation`].
    pub fn structural_hash(&self) -> Result<u64> {
        Err(Error::UnsupportedOperation(
            "structural hashing of a bag index",
        ))
    }

    /// Number of structural changes (insert, remove, clear) so far.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    /// Number of times the backing table was copied because a snapshot
    /// still referenced it.
    #[must_use]
    pub fn copy_count(&self) -> u64 {
        self.store.copy_count()
    }

    /// Captures the current backing table.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<IdentityHashSet<T>> {
        self.store.snapshot()
    }

    /// Returns true if the snapshot still reflects the live content.
    #[must_use]
    pub fn is_current(&self, snapshot: &Snapshot<IdentityHashSet<T>>) -> bool {
        snapshot.is_current(&self.store)
    }

    /// An unpositioned cursor over a snapshot of the current content.
    #[must_use]
    pub fn cursor(&self) -> BagCursor<T> {
        SnapshotCursor::new(self.store.snapshot(), self.modification_count)
    }

    /// A cursor over a snapshot of the current content, on the first element.
    #[must_use]
    pub fn iterator(&self) -> BagCursor<T> {
        let mut cursor = self.cursor();
        cursor.move_to_first();
        cursor
    }

    /// An owned iterator over a snapshot of the current content.
    #[must_use]
    pub fn iter(&self) -> BagIter<T> {
        Iter::new(self.store.snapshot())
    }

    fn stamp(&self, slot: Position) -> BagPosition {
        BagPosition {
            slot,
            generation: self.store.get().generation(),
        }
    }

    /// The slot of `pos` if it was taken from the current table.
    fn live_slot(&self, pos: BagPosition) -> Option<Position> {
        (pos.generation == self.store.get().generation()).then_some(pos.slot)
    }

    /// Position of the first element in the live table.
    #[must_use]
    pub fn move_to_first(&self) -> BagPosition {
        self.stamp(self.store.get().first_position())
    }

    /// Position of the last element in the live table.
    #[must_use]
    pub fn move_to_last(&self) -> BagPosition {
        self.stamp(self.store.get().last_position())
    }

    /// Position of the element following `pos` in the live table. A stale
    /// position moves nowhere.
    #[must_use]
    pub fn move_to_next(&self, pos: BagPosition) -> BagPosition {
        match self.live_slot(pos) {
            Some(slot) => self.stamp(self.store.get().next_position(slot)),
            None => BagPosition::INVALID,
        }
    }

    /// Position of the element preceding `pos` in the live table. A stale
    /// position moves nowhere.
    #[must_use]
    pub fn move_to_previous(&self, pos: BagPosition) -> BagPosition {
        match self.live_slot(pos) {
            Some(slot) => self.stamp(self.store.get().previous_position(slot)),
            None => BagPosition::INVALID,
        }
    }

    /// Returns true if `pos` holds an element in the live table.
    ///
    /// False once the table has been resized or rehashed since `pos` was
    /// taken; use a cursor to traverse while mutating.
    #[must_use]
    pub fn is_valid(&self, pos: BagPosition) -> bool {
        self.live_slot(pos)
            .is_some_and(|slot| self.store.get().is_valid_position(slot))
    }

    /// The element at `pos` in the live table, or `None` if `pos` is stale.
    #[must_use]
    pub fn get(&self, pos: BagPosition) -> Option<T> {
        let slot = self.live_slot(pos)?;
        self.store.get().get_at(slot).cloned()
    }
}

impl<T: FeatureStructure + Clone> Default for BagIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsindex_common::{FsId, FsRef, TypeCode};

    fn fs(id: u64) -> FsRef {
        FsRef::new(FsId::new(id), TypeCode::new(1))
    }

    fn sorted_ids(bag: &BagIndex<FsRef>) -> Vec<u64> {
        let mut out = Vec::new();
        bag.bulk_export(&mut out);
        let mut ids: Vec<u64> = out.iter().map(|f| f.id.as_u64()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut bag = BagIndex::new();
        assert!(bag.insert(fs(5)));
        assert!(bag.insert(fs(2)));
        assert!(bag.insert(fs(9)));
        assert!(!bag.insert(fs(2)));

        assert_eq!(bag.len(), 3);
        assert_eq!(bag.modification_count(), 3);
    }

    #[test]
    fn test_same_content_distinct_identity_kept() {
        #[derive(Clone)]
        struct Word {
            id: u64,
            text: &'static str,
        }
        impl FeatureStructure for Word {
            fn id(&self) -> FsId {
                FsId::new(self.id)
            }
            fn type_code(&self) -> TypeCode {
                TypeCode::new(2)
            }
        }

        let a = Word { id: 1, text: "the" };
        let b = Word { id: 2, text: "the" };
        assert_eq!(a.text, b.text);

        let mut bag = BagIndex::new();
        assert!(bag.insert(a.clone()));
        assert!(bag.insert(b.clone()));
        assert_eq!(bag.len(), 2);
        assert_eq!(BagIndex::compare(&a, &b), Ordering::Less);
        assert_eq!(BagIndex::compare(&b, &a), Ordering::Greater);
        assert_eq!(BagIndex::compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_find_and_contains() {
        let mut bag = BagIndex::new();
        bag.insert(fs(3));

        assert!(bag.contains(&fs(3)));
        assert_eq!(bag.find(&fs(3)), Some(fs(3)));
        assert_eq!(bag.find(&fs(4)), None);
    }

    #[test]
    fn test_remove() {
        let mut bag = BagIndex::new();
        bag.insert(fs(1));
        bag.insert(fs(2));

        assert!(bag.remove(&fs(1)));
        assert!(!bag.remove(&fs(1)));
        assert_eq!(sorted_ids(&bag), vec![2]);
        assert_eq!(bag.modification_count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut bag = BagIndex::with_capacity(100);
        for id in 0..100 {
            bag.insert(fs(id));
        }
        bag.clear();
        assert!(bag.is_empty());
        assert!(!bag.contains(&fs(5)));
        // Clearing an empty bag changes nothing.
        let count = bag.modification_count();
        bag.clear();
        assert_eq!(bag.modification_count(), count);
    }

    #[test]
    fn test_bulk_export_appends() {
        let mut bag = BagIndex::new();
        for id in [7, 8, 9] {
            bag.insert(fs(id));
        }
        let mut out = vec![fs(100)];
        bag.bulk_export(&mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], fs(100));
    }

    #[test]
    fn test_structural_hash_unsupported() {
        let bag: BagIndex<FsRef> = BagIndex::new();
        assert!(matches!(
            bag.structural_hash(),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_live_positions() {
        let mut bag = BagIndex::new();
        for id in [4, 1, 3] {
            bag.insert(fs(id));
        }
        let mut count = 0;
        let mut pos = bag.move_to_first();
        while bag.is_valid(pos) {
            assert!(bag.get(pos).is_some());
            count += 1;
            pos = bag.move_to_next(pos);
        }
        assert_eq!(count, 3);
        assert!(bag.is_valid(bag.move_to_last()));
        assert!(bag.get(BagPosition::INVALID).is_none());
    }

    #[test]
    fn test_position_invalid_after_rehash() {
        let mut bag = BagIndex::with_capacity(4);
        bag.insert(fs(17));
        let pos = bag.move_to_first();
        assert_eq!(bag.get(pos), Some(fs(17)));

        // Enough to force the table to grow; id 1 lands in 17's old slot.
        for id in 1..=12 {
            bag.insert(fs(id));
        }
        assert!(!bag.is_valid(pos));
        assert_eq!(bag.get(pos), None);
        assert!(!bag.is_valid(bag.move_to_next(pos)));
        assert!(!bag.is_valid(bag.move_to_previous(pos)));

        let fresh = bag.move_to_first();
        assert!(bag.is_valid(fresh));
        assert_eq!(bag.get(fresh).map(|f| f.id), Some(FsId::new(1)));
    }

    #[test]
    fn test_position_invalid_after_shrinking_clear() {
        let mut bag = BagIndex::with_capacity(4);
        for id in 0..40 {
            bag.insert(fs(id));
        }
        let pos = bag.move_to_first();
        bag.clear();
        bag.insert(fs(0));
        assert!(!bag.is_valid(pos));
        assert!(bag.is_valid(bag.move_to_first()));
    }

    #[test]
    fn test_snapshot_survives_mutation() {
        let mut bag = BagIndex::new();
        bag.insert(fs(1));
        bag.insert(fs(2));

        let mut cursor = bag.iterator();
        bag.insert(fs(3));
        bag.remove(&fs(1));

        let mut seen = Vec::new();
        while cursor.is_valid() {
            seen.push(cursor.get().unwrap().id.as_u64());
            cursor.move_to_next();
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(sorted_ids(&bag), vec![2, 3]);
        assert_eq!(bag.copy_count(), 1);
    }

    #[test]
    fn test_no_copy_without_outstanding_iterator() {
        let mut bag = BagIndex::new();
        bag.insert(fs(1));
        {
            let ids: Vec<_> = bag.iter().collect();
            assert_eq!(ids.len(), 1);
        }
        bag.insert(fs(2));
        assert_eq!(bag.copy_count(), 0);
    }

    #[test]
    fn test_clear_with_outstanding_snapshot() {
        let mut bag = BagIndex::new();
        bag.insert(fs(1));
        let pos = bag.move_to_first();
        let snapshot = bag.snapshot();
        bag.clear();

        assert!(bag.is_empty());
        assert_eq!(snapshot.len(), 1);
        assert!(!bag.is_current(&snapshot));
        assert_eq!(bag.copy_count(), 0);

        // The replacement table is a new generation.
        bag.insert(fs(1));
        assert!(!bag.is_valid(pos));
    }
}
