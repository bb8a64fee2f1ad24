//! Key-aware entry iteration.

use std::iter::FusedIterator;

use tessera_columns::{ColumnSet, Entries as RowEntries};
use tessera_core::{Key, KeyId};
use tessera_keys::KeyRegistry;

/// Iterator over `(Key, values)` pairs in dense row order.
///
/// Produced by [`SlotMap::entries`](crate::SlotMap::entries) and
/// [`SlotMap::entries_all`](crate::SlotMap::entries_all).
pub struct Entries<'a, S: ColumnSet> {
    rows: RowEntries<'a, S>,
    keys: &'a KeyRegistry,
}

impl<'a, S: ColumnSet> Entries<'a, S> {
    pub(crate) fn new(rows: RowEntries<'a, S>, keys: &'a KeyRegistry) -> Self {
        Self { rows, keys }
    }
}

impl<'a, S: ColumnSet> Iterator for Entries<'a, S> {
    type Item = (Key, S::Refs<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, refs) = self.rows.next()?;
        Some((live_key(self.keys, id), refs))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<S: ColumnSet> ExactSizeIterator for Entries<'_, S> {}

impl<S: ColumnSet> FusedIterator for Entries<'_, S> {}

/// The live key occupying `id`, which must own a row.
///
/// The map only stores rows for live ids, so a missing key means the
/// registry and the store have diverged.
pub(crate) fn live_key(keys: &KeyRegistry, id: KeyId) -> Key {
    match keys.key_at(id) {
        Some(key) => key,
        None => unreachable!("row owner {id} has no live key"),
    }
}
