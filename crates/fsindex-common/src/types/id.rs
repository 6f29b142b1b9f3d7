//! Identifier types for feature structures and their types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier of a feature structure.
///
/// Assigned by the owning object store, monotonically increasing, and never
/// reused while the structure is reachable. Identity comparison ("is this the
/// same object?") is defined as equality of `FsId`s.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[repr(transparent)]
pub struct FsId(pub u64);

impl FsId {
    /// The invalid/null identifier.
    pub const INVALID: Self = Self(u64::MAX);

    /// Creates a new FsId from a raw u64 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Checks if this is a valid identifier.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u64::MAX
    }
}

impl fmt::Debug for FsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "FsId({})", self.0)
        } else {
            write!(f, "FsId(INVALID)")
        }
    }
}

impl fmt::Display for FsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FsId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<FsId> for u64 {
    fn from(id: FsId) -> Self {
        id.0
    }
}

/// Opaque type tag of a feature structure.
///
/// Supplied by the type system. The index engine only uses it to route a
/// structure to the indexes registered for its type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[repr(transparent)]
pub struct TypeCode(pub u32);

impl TypeCode {
    /// The invalid/null type code.
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates a new TypeCode from a raw u32 value.
    #[inline]
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Checks if this is a valid type code.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "TypeCode({})", self.0)
        } else {
            write!(f, "TypeCode(INVALID)")
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TypeCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// Hands out monotonically increasing [`FsId`]s, starting at 1.
///
/// Stands in for the owning object store's allocator. Safe to share across
/// threads.
#[derive(Debug)]
pub struct FsIdGenerator {
    next: AtomicU64,
}

impl FsIdGenerator {
    /// Creates a generator whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator whose first id is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocates the next identifier.
    pub fn next_id(&self) -> FsId {
        FsId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the identifier the next call to [`next_id`](Self::next_id) will hand out.
    #[must_use]
    pub fn peek(&self) -> FsId {
        FsId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for FsIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_id_basic() {
        let id = FsId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert!(id.is_valid());
        assert!(!FsId::INVALID.is_valid());
        assert_eq!(format!("{id:?}"), "FsId(42)");
        assert_eq!(format!("{:?}", FsId::INVALID), "FsId(INVALID)");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_fs_id_ordering() {
        assert!(FsId::new(1) < FsId::new(2));
        assert_eq!(FsId::from(7), FsId::new(7));
        assert_eq!(u64::from(FsId::new(7)), 7);
    }

    #[test]
    fn test_type_code_basic() {
        let code = TypeCode::new(3);
        assert_eq!(code.as_u32(), 3);
        assert!(code.is_valid());
        assert!(!TypeCode::INVALID.is_valid());
        assert_eq!(format!("{code:?}"), "TypeCode(3)");
    }

    #[test]
    fn test_generator_is_monotonic() {
        let ids = FsIdGenerator::new();
        assert_eq!(ids.peek(), FsId::new(1));
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert_eq!(a, FsId::new(1));
        assert!(a < b && b < c);
        assert_eq!(ids.peek(), FsId::new(4));
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&FsId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: TypeCode = serde_json::from_str("12").unwrap();
        assert_eq!(back, TypeCode::new(12));
    }
}
