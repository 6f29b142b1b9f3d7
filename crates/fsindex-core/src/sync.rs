//! Sharing one index between threads.
//!
//! Indexes themselves do no locking. [`SharedIndex`] adds the outer
//! discipline: writers hold a write lock for the duration of one call, and
//! readers take a snapshot under a brief read lock, then iterate without
//! holding any lock at all.

use std::sync::Arc;

use fsindex_common::FeatureStructure;
use parking_lot::RwLock;

use crate::index::{FsIndex, IndexCursor, IndexIter};

/// A reference-counted, lock-protected [`FsIndex`].
///
/// Cloning shares the same index.
#[derive(Debug)]
pub struct SharedIndex<T> {
    inner: Arc<RwLock<FsIndex<T>>>,
}

impl<T: FeatureStructure + Clone> SharedIndex<T> {
    /// Wraps `index` for sharing.
    #[must_use]
    pub fn new(index: impl Into<FsIndex<T>>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index.into())),
        }
    }

    /// Adds `fs`. Returns false if it was already present.
    pub fn insert(&self, fs: T) -> bool {
        self.inner.write().insert(fs)
    }

    /// Removes `fs`. Returns true if it was present.
    pub fn remove(&self, fs: &T) -> bool {
        self.inner.write().remove(fs)
    }

    /// Returns true if `fs` is present.
    #[must_use]
    pub fn contains(&self, fs: &T) -> bool {
        self.inner.read().contains(fs)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Number of structural changes so far.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        self.inner.read().modification_count()
    }

    /// An owned iterator over a snapshot. Holds no lock while iterating.
    #[must_use]
    pub fn snapshot_iter(&self) -> IndexIter<T> {
        self.inner.read().iter()
    }

    /// An unpositioned cursor over a snapshot. Holds no lock.
    #[must_use]
    pub fn cursor(&self) -> IndexCursor<T> {
        self.inner.read().cursor()
    }

    /// Runs `f` with shared access to the index.
    pub fn read<R>(&self, f: impl FnOnce(&FsIndex<T>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the index.
    pub fn write<R>(&self, f: impl FnOnce(&mut FsIndex<T>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<T> Clone for SharedIndex<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
