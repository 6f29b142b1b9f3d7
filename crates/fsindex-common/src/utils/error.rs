//! Error type for index operations.
//!
//! Only caller mistakes the engine can detect cheaply are reported here.
//! Comparators that are not a total order, or distinct objects sharing an
//! identifier, are not detected: behaviour under such misuse is undefined.
//!
//! Iterating a snapshot that has diverged from the live index is not an
//! error either. A cursor keeps yielding the content it captured.

use thiserror::Error;

/// Result alias used throughout fsindex.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by indexes, cursors and the index repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation was called in a state where it is undefined, such as
    /// reading from a cursor that is not positioned on an element.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    /// The operation has no meaning for this kind of index.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The element lies outside the bounds of a range view.
    #[error("key out of range for this view")]
    KeyOutOfRange,

    /// The lower bound of a range is greater than its upper bound.
    #[error("invalid range: lower bound is greater than upper bound")]
    InvalidRange,

    /// An index with this label is already defined.
    #[error("index '{0}' is already defined")]
    DuplicateIndex(String),

    /// No index with this label is defined.
    #[error("unknown index '{label}'{hint}")]
    UnknownIndex {
        /// The label that was looked up.
        label: String,
        /// A "did you mean" hint, or empty.
        hint: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::PreconditionViolation("cursor is exhausted").to_string(),
            "precondition violated: cursor is exhausted"
        );
        assert_eq!(
            Error::DuplicateIndex("tokens".to_string()).to_string(),
            "index 'tokens' is already defined"
        );
        let unknown = Error::UnknownIndex {
            label: "tokns".to_string(),
            hint: " (did you mean 'tokens'?)".to_string(),
        };
        assert_eq!(
            unknown.to_string(),
            "unknown index 'tokns' (did you mean 'tokens'?)"
        );
    }
}
