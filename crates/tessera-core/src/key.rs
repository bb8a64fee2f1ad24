//! The packed [`Key`] handle and its bit layout.
//!
//! A key is 32 bits split into two parts: the low [`N_ID_BITS`] hold the
//! slot id and the high [`N_VERSION_BITS`] hold the version. Ids are reused
//! after removal; the version distinguishes successive occupants of the
//! same id so that stale keys can be detected in O(1).

use std::fmt;

/// Slot index portion of a [`Key`].
pub type KeyId = u32;

/// Generation counter portion of a [`Key`].
pub type KeyVersion = u32;

/// Number of low bits holding the id.
pub const N_ID_BITS: u32 = 20;

/// Number of high bits holding the version.
pub const N_VERSION_BITS: u32 = 32 - N_ID_BITS;

/// Largest representable id.
pub const MAX_ID: KeyId = 0xF_FFFF;

/// Mask selecting the id bits.
pub const ID_MASK: u32 = MAX_ID;

/// Largest representable version. Versions wrap to 0 after this.
pub const MAX_VERSION: KeyVersion = 0xFFF;

/// Mask selecting the version bits.
pub const VERSION_MASK: u32 = MAX_VERSION << N_ID_BITS;

/// Reserved id marking the end of the free list. Never issued to a live key.
pub const INVALID_ID: KeyId = ID_MASK;

/// A versioned handle to an entry in a slotmap.
///
/// Keys are plain values: copying one does not extend the life of the
/// entry it names. A key is only meaningful to the registry that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u32);

impl Key {
    /// Pack an id and a version into a key.
    ///
    /// Both fields are masked to their bit widths, so out-of-range inputs
    /// are truncated rather than rejected. This creates a key out of thin
    /// air; it is not registered anywhere.
    pub const fn forge(id: KeyId, version: KeyVersion) -> Self {
        Self(((version << N_ID_BITS) & VERSION_MASK) | (id & ID_MASK))
    }

    /// The slot id.
    pub const fn id(self) -> KeyId {
        self.0 & ID_MASK
    }

    /// The version.
    pub const fn version(self) -> KeyVersion {
        (self.0 & VERSION_MASK) >> N_ID_BITS
    }

    /// The raw packed representation.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Reinterpret a raw packed value as a key.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The version the next occupant of this key's id receives.
    ///
    /// Increments by one and wraps from [`MAX_VERSION`] to 0. After 4096
    /// recycles of one id a stale key compares equal to a live one again.
    pub const fn next_version(version: KeyVersion) -> KeyVersion {
        if version >= MAX_VERSION {
            0
        } else {
            version + 1
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id(), self.version())
    }
}

impl From<Key> for u32 {
    fn from(key: Key) -> Self {
        key.0
    }
}
