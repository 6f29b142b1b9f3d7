//! Sorted index over a caller-supplied comparator.
//!
//! [`OrderedArray`] is the plain sorted array; [`OrderedIndex`] wraps it in
//! a copy-on-write store and adds navigable queries and [`SubSet`] views.

mod array;
mod set;
mod view;

pub use array::OrderedArray;
pub use set::{OrderedCursor, OrderedIndex, OrderedIter};
pub use view::SubSet;
