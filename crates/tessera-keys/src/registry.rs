//! The key registry: allocation, recycling and liveness.

use std::iter::Enumerate;
use std::slice;

use tessera_core::{Key, KeyId, SlotMapError, INVALID_ID};

use crate::slot::Slot;

/// Number of ids added to the registry's capacity each time it fills up.
pub const DEFAULT_ALLOC_CHUNK: usize = 64;

/// Highest number of ids a registry can hand out. [`INVALID_ID`] itself is
/// reserved as the free-list terminator.
const ID_SPACE: usize = INVALID_ID as usize;

/// A freshly issued key plus any capacity change it caused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Allocation {
    /// The issued key.
    pub key: Key,
    /// New id capacity if this allocation grew the registry, else `None`.
    ///
    /// Storage indexed by id must grow to at least this many entries before
    /// the key is used.
    pub grown_to: Option<usize>,
}

/// Selects which slots [`KeyRegistry::list`] returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyListFilter {
    /// Every allocated slot, live or free.
    All,
    /// Only slots holding a live key.
    Alive,
    /// Only slots on the free list.
    Dead,
}

/// Allocates and recycles versioned keys.
///
/// Ids are handed out densely from zero. Removing a key bumps the version
/// stored at its id and pushes the id onto an intrusive free list, so the
/// next `create()` reuses it with the new version. Any key still holding the
/// old version is rejected from then on.
///
/// Capacity grows in fixed chunks of `alloc_chunk` ids. Each growth is
/// reported through [`Allocation::grown_to`].
#[derive(Clone, Debug)]
pub struct KeyRegistry {
    /// One entry per id ever allocated. `slots.len()` is the append cursor.
    slots: Vec<Slot>,
    /// Id capacity; the next append past this grows it by `alloc_chunk`.
    capacity: usize,
    /// Ids added per growth step.
    alloc_chunk: usize,
    /// Most recently freed id (head of the free list).
    free_head: Option<KeyId>,
    /// Number of slots on the free list.
    free_count: usize,
}

impl KeyRegistry {
    /// Create an empty registry with no preallocated capacity.
    pub fn new() -> Self {
        Self::with_chunk(0, DEFAULT_ALLOC_CHUNK)
    }

    /// Create an empty registry with room for `capacity` ids.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_chunk(capacity, DEFAULT_ALLOC_CHUNK)
    }

    /// Create an empty registry with an explicit growth step.
    ///
    /// `capacity` is clamped to the id space. An `alloc_chunk` of zero is
    /// treated as one.
    pub fn with_chunk(capacity: usize, alloc_chunk: usize) -> Self {
        let capacity = capacity.min(ID_SPACE);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            alloc_chunk: alloc_chunk.max(1),
            free_head: None,
            free_count: 0,
        }
    }

    /// Issue a new key.
    ///
    /// Reuses the most recently freed id if there is one, keeping the
    /// version stored in its slot. Otherwise appends a fresh id with
    /// version 0, growing capacity by one chunk if the cursor has reached
    /// it.
    pub fn create(&mut self) -> Result<Allocation, SlotMapError> {
        if let Some((id, version)) = self.pop_free() {
            tracing::trace!(id, version, "recycled key id");
            return Ok(Allocation {
                key: Key::forge(id, version),
                grown_to: None,
            });
        }

        let id = self.slots.len();
        if id >= ID_SPACE {
            return Err(SlotMapError::CapacityExceeded { live: id });
        }

        let grown_to = if id >= self.capacity {
            let target = (self.capacity + self.alloc_chunk).min(ID_SPACE);
            self.slots.reserve_exact(target - self.slots.len());
            self.capacity = target;
            tracing::debug!(capacity = target, "key registry grew");
            Some(target)
        } else {
            None
        };

        self.slots.push(Slot::Live { version: 0 });
        Ok(Allocation {
            key: Key::forge(id as KeyId, 0),
            grown_to,
        })
    }

    /// Unlink the free-list head and mark it live again.
    fn pop_free(&mut self) -> Option<(KeyId, u32)> {
        let id = self.free_head?;
        let slot = self.slots.get_mut(id as usize)?;
        let Slot::Free { version, next } = *slot else {
            // The head always points at a free slot; drop a corrupt link
            // rather than hand out a live id twice.
            self.free_head = None;
            return None;
        };
        *slot = Slot::Live { version };
        self.free_head = next;
        self.free_count -= 1;
        Some((id, version))
    }

    /// Retire a key.
    ///
    /// Fails with [`SlotMapError::NoKey`] if the id is out of range or its
    /// slot does not hold exactly this key. Fails with
    /// [`SlotMapError::ExhaustedKeyRemoval`] if the id is already the head
    /// of the free list, which cannot be linked to itself.
    pub fn remove(&mut self, key: Key) -> Result<(), SlotMapError> {
        let id = key.id();
        match self.slots.get(id as usize) {
            Some(Slot::Live { version }) if *version == key.version() => {}
            _ => return Err(SlotMapError::NoKey { key }),
        }

        if self.free_head == Some(id) {
            return Err(SlotMapError::ExhaustedKeyRemoval { id });
        }

        let version = Key::next_version(key.version());
        if version == 0 {
            tracing::debug!(id, "key version wrapped");
        }
        self.slots[id as usize] = Slot::Free {
            version,
            next: self.free_head,
        };
        self.free_head = Some(id);
        self.free_count += 1;
        tracing::trace!(id, version, "retired key");
        Ok(())
    }

    /// Whether `key` is currently live.
    pub fn is_alive(&self, key: Key) -> bool {
        matches!(
            self.slots.get(key.id() as usize),
            Some(Slot::Live { version }) if *version == key.version()
        )
    }

    /// The live key occupying `id`, if any.
    pub fn key_at(&self, id: KeyId) -> Option<Key> {
        match self.slots.get(id as usize)? {
            Slot::Live { version } => Some(Key::forge(id, *version)),
            Slot::Free { .. } => None,
        }
    }

    /// The slot state at `id`.
    pub fn slot(&self, id: KeyId) -> Option<&Slot> {
        self.slots.get(id as usize)
    }

    /// Packed slot encodings in id order, filtered.
    ///
    /// Free slots encode their free-list successor in the id field; see
    /// [`Slot::raw`].
    pub fn list(&self, filter: KeyListFilter) -> Vec<Key> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| match filter {
                KeyListFilter::All => true,
                KeyListFilter::Alive => slot.is_live(),
                KeyListFilter::Dead => !slot.is_live(),
            })
            .map(|(id, slot)| slot.raw(id as KeyId))
            .collect()
    }

    /// Packed encodings of every allocated slot.
    pub fn list_all(&self) -> Vec<Key> {
        self.list(KeyListFilter::All)
    }

    /// Every live key, in id order.
    pub fn list_alive(&self) -> Vec<Key> {
        self.list(KeyListFilter::Alive)
    }

    /// Iterate over live keys in id order.
    pub fn iter(&self) -> Keys<'_> {
        Keys {
            inner: self.slots.iter().enumerate(),
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_count
    }

    /// Whether no key is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of ids ever allocated (the append cursor).
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of ids waiting on the free list.
    pub fn free_count(&self) -> usize {
        self.free_count
    }

    /// Current id capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Head of the free list.
    pub fn free_head(&self) -> Option<KeyId> {
        self.free_head
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the live keys of a [`KeyRegistry`], in id order.
#[derive(Clone, Debug)]
pub struct Keys<'a> {
    inner: Enumerate<slice::Iter<'a, Slot>>,
}

impl Iterator for Keys<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        self.inner.by_ref().find_map(|(id, slot)| match *slot {
            Slot::Live { version } => Some(Key::forge(id as KeyId, version)),
            Slot::Free { .. } => None,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<'a> IntoIterator for &'a KeyRegistry {
    type Item = Key;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Keys<'a> {
        self.iter()
    }
}
