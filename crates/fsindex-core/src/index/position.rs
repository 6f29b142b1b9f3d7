//! Positions and the positional traversal seam shared by both backing stores.
//!
//! A [`Position`] is an opaque cursor into one backing store. Positions are
//! totally ordered in traversal order, so a range of a store can be described
//! by its first and last position.

use std::fmt;

/// An opaque cursor into a backing store.
///
/// For the identity hash set this is a slot number, for the ordered array an
/// element index. A position is only meaningful for the store it came from.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(isize);

impl Position {
    /// A position that is never valid in any store.
    pub const INVALID: Self = Self(-1);

    #[inline]
    pub(crate) const fn at(index: usize) -> Self {
        // Stores never hold more than isize::MAX elements.
        Self(index as isize)
    }

    /// Returns the underlying index, or `None` for a before-the-start position.
    #[inline]
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "Position({index})"),
            None => write!(f, "Position(INVALID)"),
        }
    }
}

/// Position-based traversal over a backing store.
///
/// Implemented by [`IdentityHashSet`](super::IdentityHashSet) and
/// [`OrderedArray`](super::OrderedArray), and consumed by cursors and
/// snapshot iterators so they work the same way over either index kind.
///
/// Moving past either end yields a position for which
/// [`is_valid_position`](Self::is_valid_position) is false.
pub trait PositionalStore<T> {
    /// Number of elements in the store.
    fn len(&self) -> usize;

    /// Returns true if the store holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the first element.
    fn first_position(&self) -> Position;

    /// Position of the last element.
    fn last_position(&self) -> Position;

    /// Position following `pos`.
    fn next_position(&self, pos: Position) -> Position;

    /// Position preceding `pos`.
    fn previous_position(&self, pos: Position) -> Position;

    /// The element at `pos`, if `pos` holds one.
    fn get_at(&self, pos: Position) -> Option<&T>;

    /// Returns true if `pos` holds an element.
    fn is_valid_position(&self, pos: Position) -> bool {
        self.get_at(pos).is_some()
    }

    /// Where a cursor should land when asked to move to `fs`.
    ///
    /// Ordered stores return the leftmost element not less than `fs` under
    /// the key comparator, ignoring identity. Identity stores return the
    /// slot holding `fs` itself, or an invalid position.
    fn seek(&self, fs: &T) -> Position;
}
