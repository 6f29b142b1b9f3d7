//! Common utilities used throughout fsindex.
//!
//! - [`error`] - The [`Error`] type and [`Result`] alias
//! - [`strings`] - "Did you mean" suggestions for unknown index labels

pub mod error;
pub mod strings;

pub use error::{Error, Result};
