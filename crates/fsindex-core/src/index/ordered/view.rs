//! Live range views over an ordered index.
//!
//! A [`SubSet`] holds the index itself plus two bounds, never a backing
//! array. Every call resolves the bounds against the index's current array,
//! so a view keeps working after the index copies its array for an
//! outstanding iterator, and changes made through the index show up in the
//! view (and the other way round).

use std::ops::{Bound, Deref, DerefMut, Range};

use fsindex_common::{Error, FeatureStructure, Result};

use super::array::OrderedArray;
use super::set::{OrderedCursor, OrderedIndex, OrderedIter};

/// The elements of an ordered index between two bounds.
///
/// `I` is `&OrderedIndex<T>` for a read-only view or `&mut OrderedIndex<T>`
/// for one that can also add and remove.
///
/// A descending view reverses every order-dependent operation: `first`
/// returns the largest element, `lower` looks upward, `head_set` keeps the
/// larger elements. Cursors always walk in index order.
pub struct SubSet<T, I> {
    index: I,
    lo: Bound<T>,
    hi: Bound<T>,
    descending: bool,
}

impl<T, I> SubSet<T, I>
where
    T: FeatureStructure + Clone,
    I: Deref<Target = OrderedIndex<T>>,
{
    pub(crate) fn new(index: I, lo: Bound<T>, hi: Bound<T>) -> Self {
        Self {
            index,
            lo,
            hi,
            descending: false,
        }
    }

    /// Flips the order this view presents its elements in.
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.descending = !self.descending;
        self
    }

    /// Returns true if this view presents elements in descending order.
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.descending
    }

    fn array(&self) -> &OrderedArray<T> {
        self.index.array()
    }

    /// Indexes of the live array covered by this view.
    fn span(&self) -> Range<usize> {
        self.array().bound_range(self.lo.as_ref(), self.hi.as_ref())
    }

    fn too_low(&self, fs: &T) -> bool {
        let cmp = self.index.comparator();
        match &self.lo {
            Bound::Unbounded => false,
            Bound::Included(lo) => cmp.compare(fs, lo).is_lt(),
            Bound::Excluded(lo) => cmp.compare(fs, lo).is_le(),
        }
    }

    fn too_high(&self, fs: &T) -> bool {
        let cmp = self.index.comparator();
        match &self.hi {
            Bound::Unbounded => false,
            Bound::Included(hi) => cmp.compare(fs, hi).is_gt(),
            Bound::Excluded(hi) => cmp.compare(fs, hi).is_ge(),
        }
    }

    /// Returns true if `fs` falls inside this view's bounds.
    #[must_use]
    pub fn in_range(&self, fs: &T) -> bool {
        !self.too_low(fs) && !self.too_high(fs)
    }

    /// Like [`in_range`](Self::in_range), but an exclusive bound admits its
    /// own endpoint.
    fn in_closed_range(&self, fs: &T) -> bool {
        let cmp = self.index.comparator();
        let above_lo = match &self.lo {
            Bound::Unbounded => true,
            Bound::Included(lo) | Bound::Excluded(lo) => cmp.compare(fs, lo).is_ge(),
        };
        let below_hi = match &self.hi {
            Bound::Unbounded => true,
            Bound::Included(hi) | Bound::Excluded(hi) => cmp.compare(fs, hi).is_le(),
        };
        above_lo && below_hi
    }

    fn admits(&self, bound: Bound<&T>) -> bool {
        match bound {
            Bound::Unbounded => true,
            Bound::Included(fs) => self.in_range(fs),
            Bound::Excluded(fs) => self.in_closed_range(fs),
        }
    }

    /// Number of elements currently in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.span().len()
    }

    /// Returns true if no element currently falls inside the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span().is_empty()
    }

    /// Returns true if `fs` is present and inside the view.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        self.in_range(fs) && self.index.contains(fs)
    }

    fn at(&self, index: Option<usize>) -> Option<T> {
        index.and_then(|i| self.array().get(i)).cloned()
    }

    fn lowest(&self) -> Option<usize> {
        let span = self.span();
        (!span.is_empty()).then_some(span.start)
    }

    fn highest(&self) -> Option<usize> {
        let span = self.span();
        (!span.is_empty()).then(|| span.end - 1)
    }

    /// Clamps an index found below a probe into the view.
    fn clamp_down(&self, found: Option<usize>) -> Option<usize> {
        let span = self.span();
        let top = span.end.checked_sub(1)?;
        let i = found?.min(top);
        (i >= span.start).then_some(i)
    }

    /// Clamps an index found above a probe into the view.
    fn clamp_up(&self, found: Option<usize>) -> Option<usize> {
        let span = self.span();
        let i = found?.max(span.start);
        (i < span.end).then_some(i)
    }

    /// The first element in view order.
    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.at(if self.descending {
            self.highest()
        } else {
            self.lowest()
        })
    }

    /// The last element in view order.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.at(if self.descending {
            self.lowest()
        } else {
            self.highest()
        })
    }

    fn below(&self, fs: &T) -> Option<usize> {
        self.clamp_down(self.array().lower_index(fs))
    }

    fn at_or_below(&self, fs: &T) -> Option<usize> {
        self.clamp_down(self.array().floor_index(fs))
    }

    fn at_or_above(&self, fs: &T) -> Option<usize> {
        self.clamp_up(self.array().ceiling_index(fs))
    }

    fn above(&self, fs: &T) -> Option<usize> {
        self.clamp_up(self.array().higher_index(fs))
    }

    /// The element just before `fs` in view order.
    #[must_use]
    pub fn lower(&self, fs: &T) -> Option<T> {
        self.at(if self.descending {
            self.above(fs)
        } else {
            self.below(fs)
        })
    }

    /// The element at or just before `fs` in view order.
    #[must_use]
    pub fn floor(&self, fs: &T) -> Option<T> {
        self.at(if self.descending {
            self.at_or_above(fs)
        } else {
            self.at_or_below(fs)
        })
    }

    /// The element at or just after `fs` in view order.
    #[must_use]
    pub fn ceiling(&self, fs: &T) -> Option<T> {
        self.at(if self.descending {
            self.at_or_below(fs)
        } else {
            self.at_or_above(fs)
        })
    }

    /// The element just after `fs` in view order.
    #[must_use]
    pub fn higher(&self, fs: &T) -> Option<T> {
        self.at(if self.descending {
            self.below(fs)
        } else {
            self.above(fs)
        })
    }

    /// An owned iterator over a snapshot of the view, in view order.
    #[must_use]
    pub fn iter(&self) -> OrderedIter<T> {
        let iter = self.index.windowed_iter(self.span());
        if self.descending {
            iter.reversed()
        } else {
            iter
        }
    }

    /// An unpositioned cursor over a snapshot of the view, in index order.
    #[must_use]
    pub fn cursor(&self) -> OrderedCursor<T> {
        self.index.windowed_cursor(self.span())
    }

    /// The view's elements in view order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Bounds for a narrower view, given in view order.
    fn narrowed(&self, from: Bound<&T>, to: Bound<&T>) -> Result<(Bound<T>, Bound<T>)> {
        let (lo, hi) = if self.descending { (to, from) } else { (from, to) };
        if let (
            Bound::Included(a) | Bound::Excluded(a),
            Bound::Included(b) | Bound::Excluded(b),
        ) = (lo, hi)
        {
            if self.index.comparator().compare(a, b).is_gt() {
                return Err(Error::InvalidRange);
            }
        }
        if !self.admits(lo) || !self.admits(hi) {
            return Err(Error::KeyOutOfRange);
        }
        let lo = match lo {
            Bound::Unbounded => self.lo.clone(),
            bound => bound.cloned(),
        };
        let hi = match hi {
            Bound::Unbounded => self.hi.clone(),
            bound => bound.cloned(),
        };
        Ok((lo, hi))
    }

    fn narrow(&self, from: Bound<&T>, to: Bound<&T>) -> Result<SubSet<T, &OrderedIndex<T>>> {
        let (lo, hi) = self.narrowed(from, to)?;
        Ok(SubSet {
            index: &*self.index,
            lo,
            hi,
            descending: self.descending,
        })
    }

    /// A view of this view's elements from `from` to `to`, in view order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if `from` comes after `to`;
    /// [`Error::KeyOutOfRange`] if either endpoint lies outside this view.
    pub fn sub_set(
        &self,
        from: &T,
        from_inclusive: bool,
        to: &T,
        to_inclusive: bool,
    ) -> Result<SubSet<T, &OrderedIndex<T>>> {
        self.narrow(bound(from, from_inclusive), bound(to, to_inclusive))
    }

    /// A view of this view's elements before `to`, in view order.
    ///
    /// # Errors
    ///
    /// [`Error::KeyOutOfRange`] if `to` lies outside this view.
    pub fn head_set(&self, to: &T, inclusive: bool) -> Result<SubSet<T, &OrderedIndex<T>>> {
        self.narrow(Bound::Unbounded, bound(to, inclusive))
    }

    /// A view of this view's elements after `from`, in view order.
    ///
    /// # Errors
    ///
    /// [`Error::KeyOutOfRange`] if `from` lies outside this view.
    pub fn tail_set(&self, from: &T, inclusive: bool) -> Result<SubSet<T, &OrderedIndex<T>>> {
        self.narrow(bound(from, inclusive), Bound::Unbounded)
    }
}

impl<T, I> SubSet<T, I>
where
    T: FeatureStructure + Clone,
    I: DerefMut<Target = OrderedIndex<T>>,
{
    /// Adds `fs` to the underlying index.
    ///
    /// # Errors
    ///
    /// [`Error::KeyOutOfRange`] if `fs` lies outside this view.
    pub fn add(&mut self, fs: T) -> Result<bool> {
        if !self.in_range(&fs) {
            return Err(Error::KeyOutOfRange);
        }
        Ok(self.index.add(fs))
    }

    /// Removes `fs` if it is inside this view. Returns true if it was removed.
    pub fn remove(&mut self, fs: &T) -> bool {
        self.in_range(fs) && self.index.remove(fs)
    }

    /// Removes and returns the first element in view order.
    pub fn poll_first(&mut self) -> Option<T> {
        let at = if self.descending {
            self.highest()
        } else {
            self.lowest()
        };
        self.index.remove_at(at?)
    }

    /// Removes and returns the last element in view order.
    pub fn poll_last(&mut self) -> Option<T> {
        let at = if self.descending {
            self.lowest()
        } else {
            self.highest()
        };
        self.index.remove_at(at?)
    }

    /// Removes every element inside the view from the underlying index.
    pub fn clear(&mut self) {
        let span = self.span();
        self.index.remove_range(span);
    }

    fn narrow_mut(
        &mut self,
        from: Bound<&T>,
        to: Bound<&T>,
    ) -> Result<SubSet<T, &mut OrderedIndex<T>>> {
        let (lo, hi) = self.narrowed(from, to)?;
        Ok(SubSet {
            index: &mut *self.index,
            lo,
            hi,
            descending: self.descending,
        })
    }

    /// Mutable [`sub_set`](Self::sub_set).
    ///
    /// # Errors
    ///
    /// Same as [`sub_set`](Self::sub_set).
    pub fn sub_set_mut(
        &mut self,
        from: &T,
        from_inclusive: bool,
        to: &T,
        to_inclusive: bool,
    ) -> Result<SubSet<T, &mut OrderedIndex<T>>> {
        self.narrow_mut(bound(from, from_inclusive), bound(to, to_inclusive))
    }

    /// Mutable [`head_set`](Self::head_set).
    ///
    /// # Errors
    ///
    /// Same as [`head_set`](Self::head_set).
    pub fn head_set_mut(&mut self, to: &T, inclusive: bool) -> Result<SubSet<T, &mut OrderedIndex<T>>> {
        self.narrow_mut(Bound::Unbounded, bound(to, inclusive))
    }

    /// Mutable [`tail_set`](Self::tail_set).
    ///
    /// # Errors
    ///
    /// Same as [`tail_set`](Self::tail_set).
    pub fn tail_set_mut(
        &mut self,
        from: &T,
        inclusive: bool,
    ) -> Result<SubSet<T, &mut OrderedIndex<T>>> {
        self.narrow_mut(bound(from, inclusive), Bound::Unbounded)
    }
}

impl<T: Clone> Clone for SubSet<T, &OrderedIndex<T>> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            lo: self.lo.clone(),
            hi: self.hi.clone(),
            descending: self.descending,
        }
    }
}

impl<T, I> std::fmt::Debug for SubSet<T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubSet")
            .field("descending", &self.descending)
            .finish_non_exhaustive()
    }
}

fn bound<T>(fs: &T, inclusive: bool) -> Bound<&T> {
    if inclusive {
        Bound::Included(fs)
    } else {
        Bound::Excluded(fs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::FsComparator;
    use crate::iterator::FsIterator;
    use fsindex_common::{FsId, TypeCode};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        key: i32,
    }

    impl FeatureStructure for Item {
        fn id(&self) -> FsId {
            FsId::new(self.id)
        }

        fn type_code(&self) -> TypeCode {
            TypeCode::new(7)
        }
    }

    /// Keys double as identifiers, so `item(k)` is always the same structure.
    fn item(key: i32) -> Item {
        Item {
            id: key as u64,
            key,
        }
    }

    fn index_of(keys: &[i32]) -> OrderedIndex<Item> {
        let mut index = OrderedIndex::new(FsComparator::by_key(|i: &Item| i.key));
        index.add_all(keys.iter().map(|&k| item(k)));
        index
    }

    fn keys<I: IntoIterator<Item = Item>>(items: I) -> Vec<i32> {
        items.into_iter().map(|i| i.key).collect()
    }

    #[test]
    fn test_sub_set_bounds() {
        let index = index_of(&[10, 20, 30, 40, 50]);

        let view = index.sub_set(&item(20), true, &item(40), false).unwrap();
        assert_eq!(keys(view.iter()), vec![20, 30]);
        assert_eq!(view.len(), 2);
        assert!(view.contains(&item(20)));
        assert!(!view.contains(&item(40)));

        assert_eq!(keys(index.head_set(&item(30), true).iter()), vec![10, 20, 30]);
        assert_eq!(keys(index.tail_set(&item(30), false).iter()), vec![40, 50]);
    }

    #[test]
    fn test_view_navigation_clamps() {
        let index = index_of(&[10, 20, 30, 40, 50]);
        let view = index.sub_set(&item(20), true, &item(40), true).unwrap();

        assert_eq!(view.first(), Some(item(20)));
        assert_eq!(view.last(), Some(item(40)));
        assert_eq!(view.lower(&item(60)), Some(item(40)));
        assert_eq!(view.floor(&item(20)), Some(item(20)));
        assert_eq!(view.lower(&item(20)), None);
        assert_eq!(view.ceiling(&item(5)), Some(item(20)));
        assert_eq!(view.higher(&item(40)), None);
        assert_eq!(view.higher(&item(25)), Some(item(30)));
    }

    #[test]
    fn test_view_is_live() {
        let mut index = index_of(&[10, 20, 30]);
        {
            let view = index.tail_set(&item(15), true);
            assert_eq!(view.len(), 2);
        }
        index.add(item(25));
        index.remove(&item(30));
        let view = index.tail_set(&item(15), true);
        assert_eq!(keys(view.to_vec()), vec![20, 25]);
    }

    #[test]
    fn test_mutable_view_writes_through() {
        let mut index = index_of(&[10, 20, 30, 40]);
        {
            let mut view = index.sub_set_mut(&item(15), true, &item(35), true).unwrap();
            assert_eq!(view.add(item(25)), Ok(true));
            assert_eq!(view.add(item(25)), Ok(false));
            assert_eq!(view.add(item(50)), Err(Error::KeyOutOfRange));
            assert!(!view.remove(&item(40)));
            assert!(view.remove(&item(20)));
            assert_eq!(view.poll_first(), Some(item(25)));
            assert_eq!(view.poll_last(), Some(item(30)));
            assert_eq!(view.poll_last(), None);
        }
        assert_eq!(keys(index.iter()), vec![10, 40]);
    }

    #[test]
    fn test_view_clear() {
        let mut index = index_of(&[1, 2, 3, 4, 5]);
        index.head_set_mut(&item(3), false).clear();
        assert_eq!(keys(index.iter()), vec![3, 4, 5]);

        index.tail_set_mut(&item(0), true).clear();
        assert!(index.is_empty());
    }

    #[test]
    fn test_narrowing() {
        let index = index_of(&[10, 20, 30, 40, 50]);
        let view = index.sub_set(&item(20), true, &item(40), false).unwrap();

        let narrower = view.head_set(&item(30), true).unwrap();
        assert_eq!(keys(narrower.iter()), vec![20, 30]);

        // The excluded upper endpoint itself may close a narrower view.
        let edge = view.head_set(&item(40), false).unwrap();
        assert_eq!(keys(edge.iter()), vec![20, 30]);
        assert_eq!(view.head_set(&item(40), true).err(), Some(Error::KeyOutOfRange));
        assert_eq!(view.tail_set(&item(10), true).err(), Some(Error::KeyOutOfRange));
        assert_eq!(
            view.sub_set(&item(35), true, &item(25), true).err(),
            Some(Error::InvalidRange)
        );
    }

    #[test]
    fn test_descending_view() {
        let index = index_of(&[1, 2, 3, 4, 5]);
        let desc = index.descending_set();

        assert_eq!(keys(desc.iter()), vec![5, 4, 3, 2, 1]);
        assert_eq!(desc.first(), Some(item(5)));
        assert_eq!(desc.last(), Some(item(1)));
        assert_eq!(desc.lower(&item(3)), Some(item(4)));
        assert_eq!(desc.higher(&item(3)), Some(item(2)));
        assert_eq!(desc.floor(&item(3)), Some(item(3)));
        assert_eq!(desc.ceiling(&item(6)), Some(item(5)));

        // Head of a descending view holds the larger elements.
        let head = desc.head_set(&item(3), false).unwrap();
        assert_eq!(keys(head.iter()), vec![5, 4]);
        let sub = desc.sub_set(&item(4), true, &item(2), true).unwrap();
        assert_eq!(keys(sub.to_vec()), vec![4, 3, 2]);
        assert_eq!(keys(sub.descending().iter()), vec![2, 3, 4]);
    }

    #[test]
    fn test_view_rebinds_after_copy() {
        let mut index = index_of(&[10, 20, 30]);
        let cursor = index.iterator();

        {
            let mut view = index.tail_set_mut(&item(15), true);
            // The cursor's snapshot forces a copy; the view follows the new array.
            assert_eq!(view.add(item(40)), Ok(true));
            assert_eq!(view.len(), 3);
            assert_eq!(view.poll_first(), Some(item(20)));
        }
        assert_eq!(index.copy_count(), 1);

        let view = index.tail_set(&item(15), true);
        assert_eq!(keys(view.iter()), vec![30, 40]);

        let mut old = cursor;
        let mut seen = Vec::new();
        while old.is_valid() {
            seen.push(old.get().unwrap().key);
            old.move_to_next();
        }
        assert_eq!(seen, vec![10, 20, 30]);
    }

    #[test]
    fn test_view_cursor_window() {
        let index = index_of(&[1, 2, 3, 4, 5]);
        let view = index.sub_set(&item(2), true, &item(4), true).unwrap();

        let mut cursor = view.cursor();
        assert_eq!(cursor.len(), 3);
        cursor.move_to_first();
        assert_eq!(cursor.get().unwrap(), item(2));
        cursor.move_to_last();
        assert_eq!(cursor.get().unwrap(), item(4));
        cursor.move_to_next();
        assert!(!cursor.is_valid());
    }
}
