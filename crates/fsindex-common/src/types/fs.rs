//! The identity contract every indexed object fulfils.

use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{FsId, TypeCode};

/// An object that can be placed in an index.
///
/// Indexes only ever look at the identifier and, for routing, the type code.
/// They store handles (`T: Clone`) and never own or destroy the underlying
/// object: removing a structure from an index is purely a membership change.
///
/// Two handles with the same [`id`](Self::id) are the same object. Behaviour
/// is undefined if distinct objects report the same identifier.
pub trait FeatureStructure {
    /// The stable, process-unique identifier of this object.
    fn id(&self) -> FsId;

    /// The type tag of this object.
    fn type_code(&self) -> TypeCode;
}

impl<F: FeatureStructure + ?Sized> FeatureStructure for &F {
    #[inline]
    fn id(&self) -> FsId {
        (**self).id()
    }

    #[inline]
    fn type_code(&self) -> TypeCode {
        (**self).type_code()
    }
}

impl<F: FeatureStructure + ?Sized> FeatureStructure for Arc<F> {
    #[inline]
    fn id(&self) -> FsId {
        (**self).id()
    }

    #[inline]
    fn type_code(&self) -> TypeCode {
        (**self).type_code()
    }
}

impl<F: FeatureStructure + ?Sized> FeatureStructure for Rc<F> {
    #[inline]
    fn id(&self) -> FsId {
        (**self).id()
    }

    #[inline]
    fn type_code(&self) -> TypeCode {
        (**self).type_code()
    }
}

/// The smallest possible handle: just the identity and the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FsRef {
    /// Identifier of the referenced structure.
    pub id: FsId,
    /// Type of the referenced structure.
    pub type_code: TypeCode,
}

impl FsRef {
    /// Creates a new handle.
    #[inline]
    #[must_use]
    pub const fn new(id: FsId, type_code: TypeCode) -> Self {
        Self { id, type_code }
    }
}

impl FeatureStructure for FsRef {
    #[inline]
    fn id(&self) -> FsId {
        self.id
    }

    #[inline]
    fn type_code(&self) -> TypeCode {
        self.type_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Token {
        id: u64,
        begin: usize,
    }

    impl FeatureStructure for Token {
        fn id(&self) -> FsId {
            FsId::new(self.id)
        }

        fn type_code(&self) -> TypeCode {
            TypeCode::new(1)
        }
    }

    #[test]
    fn test_shared_handles_forward_identity() {
        let token = Arc::new(Token { id: 5, begin: 10 });
        let other = Arc::clone(&token);
        assert_eq!(token.id(), other.id());
        assert_eq!(other.begin, 10);

        let rc = Rc::new(Token { id: 6, begin: 0 });
        assert_eq!(rc.id(), FsId::new(6));
        assert_eq!((&*rc).type_code(), TypeCode::new(1));
    }

    #[test]
    fn test_fs_ref() {
        let fs = FsRef::new(FsId::new(3), TypeCode::new(2));
        assert_eq!(fs.id(), FsId::new(3));
        assert_eq!(fs.type_code(), TypeCode::new(2));
    }
}
