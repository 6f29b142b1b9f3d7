//! # fsindex-core
//!
//! Index engine for feature structures: bag and ordered indexes whose
//! iterators read copy-on-write snapshots, so an index can be mutated while
//! it is being traversed.
//!
//! ## Modules
//!
//! - [`index`] - Bag and ordered indexes, range views, the copy-on-write store
//! - [`iterator`] - The positional cursor protocol and owned iterators
//! - [`comparator`] - Key order with identity tie-break
//! - [`repository`] - Labelled indexes routed by type code
//! - [`sync`] - Lock-protected sharing across threads
//! - [`config`] - Sizing and tuning

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comparator;
pub mod config;
pub mod index;
pub mod iterator;
pub mod repository;
pub mod sync;

// Re-export commonly used types
pub use comparator::FsComparator;
pub use config::{ConfigError, IndexConfig};
pub use index::{BagIndex, FsIndex, IndexCursor, IndexIter, IndexKind, OrderedIndex, SubSet};
pub use iterator::{CursorState, FsIterator, Iter, SnapshotCursor};
pub use repository::IndexRepository;
pub use sync::SharedIndex;
