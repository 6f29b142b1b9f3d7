//! # fsindex-common
//!
//! Shared building blocks for the fsindex crates: the identity model every
//! indexed feature structure exposes, the error type, and collection aliases.
//!
//! ## Modules
//!
//! - [`types`] - Identifiers ([`FsId`], [`TypeCode`]) and the [`FeatureStructure`] trait
//! - [`utils`] - Error type and `Result` alias
//! - [`collections`] - Hash map/set aliases with FxHash

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collections;
pub mod types;
pub mod utils;

pub use types::{FeatureStructure, FsId, FsIdGenerator, FsRef, TypeCode};
pub use utils::error::{Error, Result};
