//! Index structures over feature structures.
//!
//! Pick the right index for your access pattern:
//!
//! | Index | Best for | Complexity |
//! | ----- | -------- | ---------- |
//! | [`bag`] | Membership and "all of this type" scans | O(1) average |
//! | [`ordered`] | Sorted scans, predecessor/successor, ranges | O(log n) lookup, O(n) insert |
//!
//! Both keep their content in a [`cow::CowStore`], so iterators read a
//! snapshot and never block or invalidate on mutation. [`FsIndex`] puts
//! either kind behind one type.

pub mod any;
pub mod bag;
pub mod cow;
pub mod hash_set;
pub mod ordered;
pub mod position;

pub use any::{FsIndex, IndexCursor, IndexIter, IndexKind};
pub use bag::{BagCursor, BagIndex, BagIter, BagPosition};
pub use cow::{CowStore, Snapshot};
pub use hash_set::IdentityHashSet;
pub use ordered::{OrderedArray, OrderedCursor, OrderedIndex, OrderedIter, SubSet};
pub use position::{Position, PositionalStore};
