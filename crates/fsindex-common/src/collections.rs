//! Standard collection type aliases for fsindex.
//!
//! Use these instead of `std` maps and sets so hashing is consistent across
//! the codebase.
//!
//! | Type | Use Case |
//! |------|----------|
//! | [`FsMap`] | Hash map (labels, type routing) |
//! | [`FsSet`] | Hash set (identity bookkeeping in tests and callers) |
//!
//! # Example
//!
//! ```rust
//! use fsindex_common::collections::{fs_map, FsSet};
//! use fsindex_common::FsId;
//!
//! let mut map = fs_map::<&str, usize>();
//! map.insert("tokens", 0);
//!
//! let mut seen: FsSet<FsId> = FsSet::default();
//! seen.insert(FsId::new(1));
//! ```

use rustc_hash::FxBuildHasher;

/// HashMap with FxHash (fast, non-cryptographic).
pub type FsMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// HashSet with FxHash.
pub type FsSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Create a new empty [`FsMap`].
#[inline]
#[must_use]
pub fn fs_map<K, V>() -> FsMap<K, V> {
    FsMap::with_hasher(FxBuildHasher)
}

/// Create a new [`FsMap`] with the specified capacity.
#[inline]
#[must_use]
pub fn fs_map_with_capacity<K, V>(capacity: usize) -> FsMap<K, V> {
    FsMap::with_capacity_and_hasher(capacity, FxBuildHasher)
}

/// Create a new empty [`FsSet`].
#[inline]
#[must_use]
pub fn fs_set<T>() -> FsSet<T> {
    FsSet::with_hasher(FxBuildHasher)
}

/// Create a new [`FsSet`] with the specified capacity.
#[inline]
#[must_use]
pub fn fs_set_with_capacity<T>(capacity: usize) -> FsSet<T> {
    FsSet::with_capacity_and_hasher(capacity, FxBuildHasher)
}
