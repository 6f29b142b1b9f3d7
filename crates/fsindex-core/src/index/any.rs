//! One type for either index kind.
//!
//! Code that only needs insert, remove and positional iteration should take
//! an [`FsIndex`] (or be generic over [`FsIterator`]) and not care whether the
//! index is a bag or ordered.

use std::fmt;

use fsindex_common::{FeatureStructure, Result};

use super::bag::{BagCursor, BagIndex, BagIter};
use super::ordered::{OrderedCursor, OrderedIndex, OrderedIter};
use crate::comparator::FsComparator;
use crate::config::IndexConfig;
use crate::iterator::{CursorState, FsIterator};

/// The kind of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Unordered, identity-deduplicated.
    Bag,
    /// Sorted by a comparator with identity tie-break.
    Sorted,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bag => write!(f, "bag"),
            Self::Sorted => write!(f, "sorted"),
        }
    }
}

/// A bag or an ordered index.
#[derive(Debug)]
pub enum FsIndex<T> {
    /// See [`BagIndex`].
    Bag(BagIndex<T>),
    /// See [`OrderedIndex`].
    Ordered(OrderedIndex<T>),
}

impl<T: FeatureStructure + Clone> FsIndex<T> {
    /// An empty bag index.
    #[must_use]
    pub fn bag(config: &IndexConfig) -> Self {
        Self::Bag(BagIndex::with_config(config))
    }

    /// An empty ordered index.
    #[must_use]
    pub fn ordered(comparator: FsComparator<T>, config: &IndexConfig) -> Self {
        Self::Ordered(OrderedIndex::with_config(comparator, config))
    }

    /// Which kind of index this is.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Bag(_) => IndexKind::Bag,
            Self::Ordered(_) => IndexKind::Sorted,
        }
    }

    /// Adds `fs`. Returns false if `fs` itself was already present.
    pub fn insert(&mut self, fs: T) -> bool {
        match self {
            Self::Bag(bag) => bag.insert(fs),
            Self::Ordered(ordered) => ordered.add(fs),
        }
    }

    /// Removes `fs`. Returns true if it was present.
    pub fn remove(&mut self, fs: &T) -> bool {
        match self {
            Self::Bag(bag) => bag.remove(fs),
            Self::Ordered(ordered) => ordered.remove(fs),
        }
    }

    /// Returns true if `fs` itself is present.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        match self {
            Self::Bag(bag) => bag.contains(fs),
            Self::Ordered(ordered) => ordered.contains(fs),
        }
    }

    /// The stored structure matching `fs`: by identity for a bag, by keys
    /// for an ordered index.
    #[must_use]
    pub fn find(&self, fs: &T) -> Option<T> {
        match self {
            Self::Bag(bag) => bag.find(fs),
            Self::Ordered(ordered) => ordered.find(fs),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bag(bag) => bag.len(),
            Self::Ordered(ordered) => ordered.len(),
        }
    }

    /// Returns true if the index holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        match self {
            Self::Bag(bag) => bag.clear(),
            Self::Ordered(ordered) => ordered.clear(),
        }
    }

    /// Appends every element to `out`.
    pub fn bulk_export(&self, out: &mut Vec<T>) {
        match self {
            Self::Bag(bag) => bag.bulk_export(out),
            Self::Ordered(ordered) => ordered.bulk_export(out),
        }
    }

    /// Number of structural changes so far.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        match self {
            Self::Bag(bag) => bag.modification_count(),
            Self::Ordered(ordered) => ordered.modification_count(),
        }
    }

    /// Number of copy-on-write copies so far.
    #[must_use]
    pub fn copy_count(&self) -> u64 {
        match self {
            Self::Bag(bag) => bag.copy_count(),
            Self::Ordered(ordered) => ordered.copy_count(),
        }
    }

    /// Content hash of the index.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperation`](fsindex_common::Error::UnsupportedOperation)
    /// for a bag index.
    pub fn structural_hash(&self) -> Result<u64> {
        match self {
            Self::Bag(bag) => bag.structural_hash(),
            Self::Ordered(ordered) => Ok(ordered.structural_hash()),
        }
    }

    /// An unpositioned cursor over a snapshot.
    #[must_use]
    pub fn cursor(&self) -> IndexCursor<T> {
        match self {
            Self::Bag(bag) => IndexCursor::Bag(bag.cursor()),
            Self::Ordered(ordered) => IndexCursor::Ordered(ordered.cursor()),
        }
    }

    /// A cursor over a snapshot, on the first element.
    #[must_use]
    pub fn iterator(&self) -> IndexCursor<T> {
        let mut cursor = self.cursor();
        cursor.move_to_first();
        cursor
    }

    /// An owned iterator over a snapshot.
    #[must_use]
    pub fn iter(&self) -> IndexIter<T> {
        match self {
            Self::Bag(bag) => IndexIter::Bag(bag.iter()),
            Self::Ordered(ordered) => IndexIter::Ordered(ordered.iter()),
        }
    }

    /// The bag index, if this is one.
    #[must_use]
    pub fn as_bag(&self) -> Option<&BagIndex<T>> {
        match self {
            Self::Bag(bag) => Some(bag),
            Self::Ordered(_) => None,
        }
    }

    /// The bag index, mutably, if this is one.
    pub fn as_bag_mut(&mut self) -> Option<&mut BagIndex<T>> {
        match self {
            Self::Bag(bag) => Some(bag),
            Self::Ordered(_) => None,
        }
    }

    /// The ordered index, if this is one.
    #[must_use]
    pub fn as_ordered(&self) -> Option<&OrderedIndex<T>> {
        match self {
            Self::Ordered(ordered) => Some(ordered),
            Self::Bag(_) => None,
        }
    }

    /// The ordered index, mutably, if this is one.
    pub fn as_ordered_mut(&mut self) -> Option<&mut OrderedIndex<T>> {
        match self {
            Self::Ordered(ordered) => Some(ordered),
            Self::Bag(_) => None,
        }
    }
}

impl<T> From<BagIndex<T>> for FsIndex<T> {
    fn from(bag: BagIndex<T>) -> Self {
        Self::Bag(bag)
    }
}

impl<T> From<OrderedIndex<T>> for FsIndex<T> {
    fn from(ordered: OrderedIndex<T>) -> Self {
        Self::Ordered(ordered)
    }
}

/// A cursor over either index kind.
#[derive(Debug, Clone)]
pub enum IndexCursor<T> {
    /// Over a bag index.
    Bag(BagCursor<T>),
    /// Over an ordered index.
    Ordered(OrderedCursor<T>),
}

impl<T: FeatureStructure + Clone> IndexCursor<T> {
    /// The index's modification count when this cursor was created.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        match self {
            Self::Bag(cursor) => cursor.modification_count(),
            Self::Ordered(cursor) => cursor.modification_count(),
        }
    }
}

macro_rules! delegate {
    ($self:ident, $cursor:ident => $body:expr) => {
        match $self {
            IndexCursor::Bag($cursor) => $body,
            IndexCursor::Ordered($cursor) => $body,
        }
    };
}

impl<T: FeatureStructure + Clone> FsIterator<T> for IndexCursor<T> {
    fn move_to_first(&mut self) {
        delegate!(self, cursor => cursor.move_to_first())
    }

    fn move_to_last(&mut self) {
        delegate!(self, cursor => cursor.move_to_last())
    }

    fn move_to_next(&mut self) {
        delegate!(self, cursor => cursor.move_to_next())
    }

    fn move_to_previous(&mut self) {
        delegate!(self, cursor => cursor.move_to_previous())
    }

    fn move_to(&mut self, fs: &T) {
        delegate!(self, cursor => cursor.move_to(fs))
    }

    fn is_valid(&self) -> bool {
        delegate!(self, cursor => cursor.is_valid())
    }

    fn get(&self) -> Result<T> {
        delegate!(self, cursor => cursor.get())
    }

    fn state(&self) -> CursorState {
        delegate!(self, cursor => cursor.state())
    }
}

/// An owned iterator over either index kind.
#[derive(Debug)]
pub enum IndexIter<T> {
    /// Over a bag index.
    Bag(BagIter<T>),
    /// Over an ordered index.
    Ordered(OrderedIter<T>),
}

impl<T: FeatureStructure + Clone> Iterator for IndexIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Self::Bag(iter) => iter.next(),
            Self::Ordered(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Bag(iter) => iter.size_hint(),
            Self::Ordered(iter) => iter.size_hint(),
        }
    }
}

impl<T: FeatureStructure + Clone> DoubleEndedIterator for IndexIter<T> {
    fn next_back(&mut self) -> Option<T> {
        match self {
            Self::Bag(iter) => iter.next_back(),
            Self::Ordered(iter) => iter.next_back(),
        }
    }
}

impl<T: FeatureStructure + Clone> ExactSizeIterator for IndexIter<T> {}
