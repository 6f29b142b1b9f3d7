//! Copy-on-write coordination between an index and its outstanding iterators.
//!
//! An index keeps its backing store behind an `Arc`. Creating a cursor or an
//! iterator clones that `Arc` into a [`Snapshot`]. Before mutating, the index
//! asks [`CowStore::make_mut`] for write access:
//!
//! - If nothing else holds the store, the mutation happens in place.
//! - If a snapshot is outstanding, the store is copied first and the index
//!   adopts the copy. Existing snapshots keep observing the old content.
//!
//! ```text
//!   before mutation             after mutation
//!
//!   index ──┐                   index ──► store' (copy, mutated)
//!           ├─► store
//!   iter ───┘                   iter ───► store  (unchanged)
//! ```
//!
//! Copies are structural (a clone of the array or table), never a re-sort, so
//! relative order is identical in both stores.

use std::ops::Deref;
use std::sync::Arc;

/// Owner-side handle to a backing store that may be shared with snapshots.
#[derive(Debug)]
pub struct CowStore<S> {
    current: Arc<S>,
    copies: u64,
}

impl<S> CowStore<S> {
    /// Wraps a freshly built store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            current: Arc::new(store),
            copies: 0,
        }
    }

    /// Read access to the current store.
    #[inline]
    #[must_use]
    pub fn get(&self) -> &S {
        &self.current
    }

    /// Captures the current store. Holding the snapshot makes the next
    /// mutation copy the store.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<S> {
        Snapshot(Arc::clone(&self.current))
    }

    /// Returns true if at least one snapshot still references the current store.
    #[inline]
    #[must_use]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.current) > 1
    }

    /// Number of snapshots currently referencing the store.
    #[must_use]
    pub fn outstanding_snapshots(&self) -> usize {
        Arc::strong_count(&self.current) - 1
    }

    /// How many times the store has been copied because it was shared.
    #[must_use]
    pub fn copy_count(&self) -> u64 {
        self.copies
    }

    /// Replaces the store without copying the old one.
    ///
    /// Used when the new content does not depend on the old, like `clear`.
    pub fn reset(&mut self, store: S) {
        if let Some(current) = Arc::get_mut(&mut self.current) {
            *current = store;
        } else {
            tracing::trace!(
                outstanding = self.outstanding_snapshots(),
                "detaching shared backing store"
            );
            self.current = Arc::new(store);
        }
    }
}

impl<S: Clone> CowStore<S> {
    /// Write access to the store, copying it first if it is shared.
    pub fn make_mut(&mut self) -> &mut S {
        if self.is_shared() {
            self.copies += 1;
            tracing::trace!(
                outstanding = self.outstanding_snapshots(),
                copies = self.copies,
                "copying shared backing store before mutation"
            );
        }
        Arc::make_mut(&mut self.current)
    }
}

/// A point-in-time view of a backing store.
///
/// Shared between the index and any number of cursors. The content never
/// changes while a snapshot exists; the store is released when its last
/// holder drops it.
#[derive(Debug)]
pub struct Snapshot<S>(Arc<S>);

impl<S> Snapshot<S> {
    /// Returns true if both snapshots refer to the same store.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns true if `store` still holds the content this snapshot captured,
    /// that is, no mutation has happened since.
    #[must_use]
    pub fn is_current(&self, store: &CowStore<S>) -> bool {
        Arc::ptr_eq(&self.0, &store.current)
    }
}

impl<S> Clone for Snapshot<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S> Deref for Snapshot<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}
