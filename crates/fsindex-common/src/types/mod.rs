//! Core type definitions for fsindex.
//!
//! - Identifier types ([`FsId`], [`TypeCode`])
//! - The [`FeatureStructure`] trait indexes are generic over, and a minimal
//!   handle ([`FsRef`]) implementing it

mod fs;
mod id;

pub use fs::{FeatureStructure, FsRef};
pub use id::{FsId, FsIdGenerator, TypeCode};
