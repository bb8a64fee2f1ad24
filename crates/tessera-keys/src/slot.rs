//! Per-id slot state.

use tessera_core::{Key, KeyId, KeyVersion, INVALID_ID};

/// State of a single id in the registry.
///
/// A slot is either occupied by a live key or threaded onto the free list.
/// A free slot already carries the incremented version that the next
/// occupant of its id will receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The id is in use by the key with this version.
    Live {
        /// Version of the live key.
        version: KeyVersion,
    },
    /// The id is on the free list.
    Free {
        /// Version handed to the next key issued for this id.
        version: KeyVersion,
        /// Next-older free id, or `None` at the tail.
        next: Option<KeyId>,
    },
}

impl Slot {
    /// Whether this slot holds a live key.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }

    /// The version stored in the slot.
    pub fn version(&self) -> KeyVersion {
        match *self {
            Self::Live { version } | Self::Free { version, .. } => version,
        }
    }

    /// Packed encoding of this slot when stored at position `id`.
    ///
    /// A live slot encodes as its own key. A free slot encodes its free-list
    /// successor in the id field ([`INVALID_ID`] at the tail), so the id
    /// field equals `id` exactly when the slot is live.
    pub fn raw(&self, id: KeyId) -> Key {
        match *self {
            Self::Live { version } => Key::forge(id, version),
            Self::Free { version, next } => Key::forge(next.unwrap_or(INVALID_ID), version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_slot_encodes_its_own_id() {
        let slot = Slot::Live { version: 3 };
        assert!(slot.is_live());
        assert_eq!(slot.raw(5), Key::forge(5, 3));
    }

    #[test]
    fn free_slot_encodes_successor() {
        let slot = Slot::Free {
            version: 1,
            next: Some(2),
        };
        assert!(!slot.is_live());
        assert_eq!(slot.version(), 1);
        assert_eq!(slot.raw(7).id(), 2);
    }

    #[test]
    fn free_tail_encodes_invalid_id() {
        let slot = Slot::Free {
            version: 4,
            next: None,
        };
        let raw = slot.raw(0);
        assert_eq!(raw.id(), INVALID_ID);
        assert_eq!(raw.version(), 4);
    }
}
