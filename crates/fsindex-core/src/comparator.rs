//! Sort order for ordered indexes.
//!
//! The caller supplies a key comparator. [`FsComparator::compare`] extends it
//! with an identity tie-break so two distinct structures never compare equal:
//! whenever the keys are equal, the smaller [`FsId`](fsindex_common::FsId)
//! sorts first. Insertion and every navigable query use the extended order.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use fsindex_common::FeatureStructure;

type KeyCompare<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// A caller key comparator plus the identity tie-break.
///
/// The key comparator must be a total order and must not change its answer
/// for elements while they are indexed. This is not checked.
pub struct FsComparator<T> {
    keys: Arc<KeyCompare<T>>,
}

impl<T: FeatureStructure> FsComparator<T> {
    /// Wraps a key comparator.
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            keys: Arc::new(compare),
        }
    }

    /// Orders by a key extracted from each element.
    ///
    /// ```
    /// use fsindex_common::{FsId, FsRef, TypeCode};
    /// use fsindex_core::FsComparator;
    ///
    /// let by_type = FsComparator::by_key(|fs: &FsRef| fs.type_code);
    /// let a = FsRef::new(FsId::new(2), TypeCode::new(1));
    /// let b = FsRef::new(FsId::new(1), TypeCode::new(1));
    /// // Equal keys fall back to identity.
    /// assert!(by_type.compare(&b, &a).is_lt());
    /// ```
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// A comparator with no keys: every pair of keys is equal, so elements
    /// are ordered purely by identifier.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|_, _| Ordering::Equal)
    }

    /// Compares keys only. Distinct structures may compare equal.
    #[inline]
    pub fn compare_without_id(&self, a: &T, b: &T) -> Ordering {
        (self.keys)(a, b)
    }

    /// Compares keys, then identifiers. Equal only for the same structure.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.compare_without_id(a, b)
            .then_with(|| a.id().cmp(&b.id()))
    }
}

impl<T> Clone for FsComparator<T> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<T> fmt::Debug for FsComparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsComparator").finish_non_exhaustive()
    }
}
