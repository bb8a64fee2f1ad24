//! Error type shared across the Tessera workspace.

use thiserror::Error;

use crate::key::{Key, KeyId};

/// Errors surfaced by the key registry, the columnar store and the slotmap.
///
/// Validation errors are always reported before any state is touched, so
/// receiving one of these never implies a partial write.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SlotMapError {
    /// The key is out of range, was never issued, or has been removed.
    #[error("no such key: {key}")]
    NoKey {
        /// The rejected key.
        key: Key,
    },
    /// No column of the requested element type exists at this index.
    #[error("no column of the requested type at index {index}")]
    InvalidTypeIndex {
        /// The rejected column index.
        index: usize,
    },
    /// A partial update supplied a different number of column indices and
    /// values.
    #[error("mismatched index/value counts: {indices} indices, {values} values")]
    MismatchedIndexValues {
        /// Number of column indices supplied.
        indices: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// A full-row write did not supply exactly one value per column.
    #[error("not enough values: expected {expected}, got {got}")]
    NotEnoughValues {
        /// Number of declared columns.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
    /// The id being removed is already the head of the free list.
    #[error("ran out of room for key removal: id {id} is already the free-list head")]
    ExhaustedKeyRemoval {
        /// The id whose removal was refused.
        id: KeyId,
    },
    /// Every assignable id is live; no new key can be issued.
    #[error("key space exhausted: {live} ids in use")]
    CapacityExceeded {
        /// Number of ids allocated when the request failed.
        live: usize,
    },
    /// A configuration value was rejected at construction.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = SlotMapError::NoKey {
            key: Key::forge(4, 2),
        };
        assert_eq!(err.to_string(), "no such key: 4v2");

        let err = SlotMapError::MismatchedIndexValues {
            indices: 2,
            values: 3,
        };
        assert_eq!(
            err.to_string(),
            "mismatched index/value counts: 2 indices, 3 values"
        );

        let err = SlotMapError::NotEnoughValues {
            expected: 3,
            got: 1,
        };
        assert_eq!(err.to_string(), "not enough values: expected 3, got 1");
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<SlotMapError>();
    }
}
