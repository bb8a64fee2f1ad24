//! [`SlotMap`]: the key registry and the column store behind one API.

use std::fmt;

use tessera_columns::{
    ColumnId, ColumnSet, ColumnStore, DynValue, RemovalPolicy, Row, RowRefs, Values,
};
use tessera_core::{Key, SlotMapError};
use tessera_keys::{Allocation, KeyRegistry, Keys};

use crate::config::SlotMapConfig;
use crate::iter::{live_key, Entries};

/// A generational-index map from [`Key`] to a row of typed columns.
///
/// Every row has the column layout `R`, a tuple such as
/// `(String, Option<String>, i32)`. Columns are addressed with
/// [`ColumnId`] handles and can be read or written in any combination.
///
/// Keys are only valid while their entry lives. After
/// [`remove`](Self::remove) the key's id is recycled under a new version,
/// and every operation on the old key behaves as if it never existed.
///
/// # Examples
///
/// ```rust
/// use tessera::prelude::*;
///
/// const POS: ColumnId<f32> = ColumnId::new(0);
/// const VEL: ColumnId<f32> = ColumnId::new(1);
///
/// let mut map: SlotMap<(f32, f32)> = SlotMap::new();
/// let a = map.insert((0.0, 1.0));
/// let b = map.insert((10.0, -2.0));
///
/// map.update_rw((POS, VEL), POS, |(p, v): (&f32, &f32), _| p + v).unwrap();
///
/// assert_eq!(map.get(a, POS).unwrap().unwrap(), &1.0);
/// assert_eq!(map.get(b, POS).unwrap().unwrap(), &8.0);
/// ```
pub struct SlotMap<R: Row> {
    keys: KeyRegistry,
    store: ColumnStore<R>,
    removal: RemovalPolicy,
}

impl<R: Row> SlotMap<R> {
    /// Create an empty map with the default configuration.
    pub fn new() -> Self {
        Self::build(SlotMapConfig::default())
    }

    /// Create an empty map with room for `capacity` entries.
    ///
    /// `capacity` is clamped to the id space.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(
            SlotMapConfig::default()
                .with_initial_capacity(capacity.min(tessera_core::MAX_ID as usize)),
        )
    }

    /// Create an empty map from a validated configuration.
    pub fn with_config(config: SlotMapConfig) -> Result<Self, SlotMapError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SlotMapConfig) -> Self {
        Self {
            keys: KeyRegistry::with_chunk(config.initial_capacity, config.alloc_chunk),
            store: ColumnStore::with_capacity(config.initial_capacity),
            removal: config.removal,
        }
    }

    /// Insert a row and return its key.
    ///
    /// # Panics
    ///
    /// Panics if every id is in use. See [`try_insert`](Self::try_insert).
    pub fn insert(&mut self, row: R) -> Key {
        match self.try_insert(row) {
            Ok(key) => key,
            Err(err) => panic!("slotmap insert failed: {err}"),
        }
    }

    /// Insert a row and return its key, or `CapacityExceeded` if every id
    /// is in use.
    pub fn try_insert(&mut self, row: R) -> Result<Key, SlotMapError> {
        let Allocation { key, grown_to } = self.keys.create()?;
        if let Some(capacity) = grown_to {
            self.store.grow(capacity);
        }
        if let Err(err) = self.store.insert(key.id(), row) {
            // Hand the id back so the registry and the store stay in step.
            self.keys.remove(key)?;
            return Err(err);
        }
        Ok(key)
    }

    /// Remove the entry for `key`.
    ///
    /// Removing a stale or never-issued key is a no-op.
    pub fn remove(&mut self, key: Key) -> Result<(), SlotMapError> {
        match self.keys.remove(key) {
            Ok(()) => {
                self.store.remove(key.id(), self.removal);
                Ok(())
            }
            Err(SlotMapError::NoKey { .. }) => {
                tracing::trace!(%key, "ignored removal of dead key");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Remove every entry. Every outstanding key becomes stale.
    pub fn clear(&mut self) -> Result<(), SlotMapError> {
        for key in self.keys.list_alive() {
            self.keys.remove(key)?;
            self.store.remove(key.id(), RemovalPolicy::SwapRemove);
        }
        Ok(())
    }

    /// Whether `key` refers to a live entry.
    pub fn contains_key(&self, key: Key) -> bool {
        self.keys.is_alive(key)
    }

    /// Read a subset of columns for `key`.
    ///
    /// `None` if `key` is not live. `Some(Err(InvalidTypeIndex))` if a
    /// handle does not match the column layout.
    pub fn get<S: ColumnSet>(&self, key: Key, set: S) -> Option<Result<S::Refs<'_>, SlotMapError>> {
        if !self.keys.is_alive(key) {
            return None;
        }
        self.store.get(key.id(), set)
    }

    /// Read every column for `key`, or `None` if it is not live.
    pub fn get_all(&self, key: Key) -> Option<RowRefs<'_, R>> {
        if !self.keys.is_alive(key) {
            return None;
        }
        self.store.get_row(key.id())
    }

    /// Mutable access to one value of `key`.
    pub fn get_mut<T: Send + 'static>(
        &mut self,
        key: Key,
        column: ColumnId<T>,
    ) -> Option<Result<&mut T, SlotMapError>> {
        if !self.keys.is_alive(key) {
            return None;
        }
        self.store.get_mut(key.id(), column)
    }

    /// Overwrite a subset of columns for `key`.
    ///
    /// Fails with `NoKey` if `key` is not live; nothing is written unless
    /// every handle is valid.
    pub fn update_some<S: ColumnSet>(
        &mut self,
        key: Key,
        set: S,
        values: S::Values,
    ) -> Result<(), SlotMapError> {
        self.check_live(key)?;
        self.store.update_some(key.id(), set, values).map(drop)
    }

    /// Overwrite one value of `key`.
    pub fn update_at<T: Send + 'static>(
        &mut self,
        key: Key,
        column: ColumnId<T>,
        value: T,
    ) -> Result<(), SlotMapError> {
        self.update_some(key, column, value)
    }

    /// Overwrite every column of `key`.
    pub fn set(&mut self, key: Key, row: R) -> Result<(), SlotMapError> {
        self.check_live(key)?;
        self.store.set_row(key.id(), row).map(drop)
    }

    /// Overwrite columns of `key` from `(column index, boxed value)` pairs.
    pub fn replace(&mut self, key: Key, pairs: Vec<(usize, DynValue)>) -> Result<(), SlotMapError> {
        self.check_live(key)?;
        self.store.replace(key.id(), pairs).map(drop)
    }

    /// Overwrite columns of `key` by index with boxed values.
    ///
    /// `MismatchedIndexValues` if the two lists differ in length;
    /// `InvalidTypeIndex` if an index is out of range or a value has the
    /// wrong type. Nothing is written on error.
    pub fn update_some_dyn(
        &mut self,
        key: Key,
        indices: &[usize],
        values: Vec<DynValue>,
    ) -> Result<(), SlotMapError> {
        self.check_live(key)?;
        self.store.update_some_dyn(key.id(), indices, values).map(drop)
    }

    /// Overwrite every column of `key` from boxed values, one per column.
    pub fn set_dyn(&mut self, key: Key, values: Vec<DynValue>) -> Result<(), SlotMapError> {
        self.check_live(key)?;
        self.store.set_row_dyn(key.id(), values).map(drop)
    }

    /// Rewrite `set` on every live entry with `f(current, key)`.
    pub fn update<S, F>(&mut self, set: S, f: F) -> Result<(), SlotMapError>
    where
        S: ColumnSet + Copy,
        F: FnMut(S::Refs<'_>, Key) -> S::Values,
    {
        self.update_rw(set, set, f)
    }

    /// For every live entry, read `read`, compute with `f`, write `write`.
    ///
    /// Both sets are validated before `f` runs. Results are buffered, so the
    /// sets may share columns.
    pub fn update_rw<Rd, W, F>(&mut self, read: Rd, write: W, mut f: F) -> Result<(), SlotMapError>
    where
        Rd: ColumnSet,
        W: ColumnSet,
        F: FnMut(Rd::Refs<'_>, Key) -> W::Values,
    {
        let keys = &self.keys;
        self.store.update_rw(read, write, |refs, id| f(refs, live_key(keys, id)))
    }

    /// Live keys in id order.
    pub fn keys(&self) -> Keys<'_> {
        self.keys.iter()
    }

    /// A column subset of every live entry, in storage order.
    pub fn values<S: ColumnSet>(&self, set: S) -> Result<Values<'_, S>, SlotMapError> {
        self.store.values(set)
    }

    /// Every column of every live entry, in storage order.
    pub fn values_all(&self) -> Values<'_, R::Columns> {
        self.store.values_all()
    }

    /// `(key, columns)` for every live entry, in storage order.
    pub fn entries<S: ColumnSet>(&self, set: S) -> Result<Entries<'_, S>, SlotMapError> {
        Ok(Entries::new(self.store.entries(set)?, &self.keys))
    }

    /// `(key, row)` for every live entry, in storage order.
    pub fn entries_all(&self) -> Entries<'_, R::Columns> {
        Entries::new(self.store.entries_all(), &self.keys)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the map has no live entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of columns per row.
    pub fn n_columns(&self) -> usize {
        self.store.n_columns()
    }

    /// Ids the map can hold before it next grows.
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    /// The removal policy in effect.
    pub fn removal_policy(&self) -> RemovalPolicy {
        self.removal
    }

    /// The underlying key registry.
    pub fn registry(&self) -> &KeyRegistry {
        &self.keys
    }

    /// The underlying column store.
    pub fn store(&self) -> &ColumnStore<R> {
        &self.store
    }

    fn check_live(&self, key: Key) -> Result<(), SlotMapError> {
        if self.keys.is_alive(key) {
            Ok(())
        } else {
            Err(SlotMapError::NoKey { key })
        }
    }
}

impl<R: Row> Default for SlotMap<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Row> fmt::Debug for SlotMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotMap")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("columns", &self.store.column_types())
            .field("removal", &self.removal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::MAX_VERSION;

    type Labelled = (&'static str, Option<&'static str>, i32);

    const LABEL: ColumnId<&'static str> = ColumnId::new(0);
    const NOTE: ColumnId<Option<&'static str>> = ColumnId::new(1);
    const NUM: ColumnId<i32> = ColumnId::new(2);

    fn three() -> (SlotMap<Labelled>, [Key; 3]) {
        let mut map = SlotMap::new();
        let hello = map.insert(("hello", Some("world"), 10));
        let ok = map.insert(("ok", None, 42));
        let yay = map.insert(("yay", Some("hooray"), 3));
        (map, [hello, ok, yay])
    }

    #[test]
    fn insert_then_get() {
        let (map, [hello, ok, yay]) = three();
        assert_eq!(map.len(), 3);
        assert_eq!(map.n_columns(), 3);
        assert_eq!(map.get_all(hello), Some((&"hello", &Some("world"), &10)));
        assert_eq!(map.get(ok, (NUM, LABEL)), Some(Ok((&42, &"ok"))));
        assert_eq!(map.get(yay, NOTE), Some(Ok(&Some("hooray"))));
    }

    #[test]
    fn removed_key_reads_nothing() {
        let (mut map, [hello, ok, yay]) = three();
        map.remove(ok).unwrap();
        assert!(!map.contains_key(ok));
        assert_eq!(map.get_all(ok), None);
        assert!(map.get(ok, NUM).is_none());
        assert_eq!(map.len(), 2);

        let labels: Vec<_> = map.values(LABEL).unwrap().copied().collect();
        assert_eq!(labels, vec!["hello", "yay"]);
        assert!(map.contains_key(hello) && map.contains_key(yay));
    }

    #[test]
    fn stale_key_never_sees_reused_slot() {
        let (mut map, [_, ok, _]) = three();
        map.remove(ok).unwrap();
        let fresh = map.insert(("fresh", None, 7));
        assert_eq!(fresh.id(), ok.id());
        assert_eq!(fresh.version(), ok.version() + 1);
        assert_eq!(map.get_all(ok), None);
        assert_eq!(map.get_all(fresh), Some((&"fresh", &None, &7)));
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let (mut map, [hello, ..]) = three();
        map.remove(hello).unwrap();
        map.remove(hello).unwrap();
        map.remove(Key::forge(999, 0)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.registry().free_count(), 1);
    }

    #[test]
    fn writes_to_dead_keys_fail() {
        let (mut map, [hello, ..]) = three();
        map.remove(hello).unwrap();
        let err = SlotMapError::NoKey { key: hello };
        assert_eq!(map.update_at(hello, NUM, 1), Err(err.clone()));
        assert_eq!(map.set(hello, ("x", None, 0)), Err(err.clone()));
        assert_eq!(
            map.set_dyn(hello, vec![Box::new("x"), Box::new(None::<&str>), Box::new(0i32)]),
            Err(err)
        );
        assert!(map.get_mut(hello, NUM).is_none());
    }

    #[test]
    fn partial_update_leaves_other_columns() {
        let (mut map, [hello, ok, _]) = three();
        map.update_some(hello, (NUM, NOTE), (11, None)).unwrap();
        assert_eq!(map.get_all(hello), Some((&"hello", &None, &11)));
        assert_eq!(map.get_all(ok), Some((&"ok", &None, &42)));

        *map.get_mut(ok, NUM).unwrap().unwrap() += 1;
        assert_eq!(map.get(ok, NUM), Some(Ok(&43)));
    }

    #[test]
    fn dyn_writes_validate_before_writing() {
        let (mut map, [hello, ..]) = three();
        assert_eq!(
            map.update_some_dyn(hello, &[2, 0], vec![Box::new(5i32)]),
            Err(SlotMapError::MismatchedIndexValues { indices: 2, values: 1 })
        );
        assert_eq!(
            map.replace(hello, vec![(2, Box::new(5i32)), (0, Box::new(1u8))]),
            Err(SlotMapError::InvalidTypeIndex { index: 0 })
        );
        assert_eq!(map.get(hello, NUM), Some(Ok(&10)));

        map.replace(hello, vec![(2, Box::new(5i32))]).unwrap();
        assert_eq!(map.get(hello, NUM), Some(Ok(&5)));
        assert_eq!(
            map.set_dyn(hello, vec![Box::new("bye")]),
            Err(SlotMapError::NotEnoughValues { expected: 3, got: 1 })
        );
    }

    #[test]
    fn bulk_update_sees_live_keys() {
        let (mut map, keys) = three();
        let mut seen = Vec::new();
        map.update(NUM, |n: &i32, key| {
            seen.push(key);
            n * 2
        })
        .unwrap();
        assert_eq!(seen, keys.to_vec());
        let nums: Vec<i32> = map.values(NUM).unwrap().copied().collect();
        assert_eq!(nums, vec![20, 84, 6]);
    }

    #[test]
    fn entries_pair_keys_with_rows() {
        let (mut map, [hello, ok, yay]) = three();
        map.remove(hello).unwrap();
        let pairs: Vec<(Key, i32)> = map.entries(NUM).unwrap().map(|(k, n)| (k, *n)).collect();
        assert_eq!(pairs, vec![(ok, 42), (yay, 3)]);
        assert_eq!(map.entries_all().len(), 2);
        let mut rows = map.entries(LABEL).unwrap();
        rows.next();
        assert_eq!(rows.len(), 1);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![ok, yay]);
    }

    #[test]
    fn swap_remove_policy_moves_last_row() {
        let config = SlotMapConfig::new().with_removal(RemovalPolicy::SwapRemove);
        let mut map: SlotMap<Labelled> = SlotMap::with_config(config).unwrap();
        let a = map.insert(("a", None, 1));
        let _b = map.insert(("b", None, 2));
        let c = map.insert(("c", None, 3));
        map.remove(a).unwrap();
        let labels: Vec<_> = map.values(LABEL).unwrap().copied().collect();
        assert_eq!(labels, vec!["c", "b"]);
        assert_eq!(map.get(c, NUM), Some(Ok(&3)));
    }

    #[test]
    fn clear_invalidates_every_key() {
        let (mut map, keys) = three();
        map.clear().unwrap();
        assert!(map.is_empty());
        assert!(keys.iter().all(|&k| !map.contains_key(k)));
        assert_eq!(map.values_all().count(), 0);
        let again = map.insert(("again", None, 0));
        assert_eq!(again.version(), 1);
    }

    #[test]
    fn grows_in_chunks() {
        let config = SlotMapConfig::new().with_alloc_chunk(4);
        let mut map: SlotMap<(u32,)> = SlotMap::with_config(config).unwrap();
        assert_eq!(map.capacity(), 0);
        for i in 0..5 {
            map.insert((i,));
        }
        assert_eq!(map.capacity(), 8);
        assert!(map.store().capacity() >= 5);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SlotMapConfig::new().with_alloc_chunk(0);
        assert!(matches!(
            SlotMap::<(u8,)>::with_config(config),
            Err(SlotMapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn version_wraps_after_full_cycle() {
        let mut map: SlotMap<(u8,)> = SlotMap::new();
        let first = map.insert((0,));
        let mut key = first;
        for _ in 0..=MAX_VERSION {
            map.remove(key).unwrap();
            key = map.insert((0,));
        }
        assert_eq!(key.id(), first.id());
        assert_eq!(key.version(), 0);
        // A key from a full cycle ago aliases the live entry.
        assert_eq!(key, first);
        assert!(map.contains_key(first));
    }

    #[test]
    fn debug_lists_columns() {
        let (map, _) = three();
        let text = format!("{map:?}");
        assert!(text.contains("len: 3"));
        assert!(text.contains("i32"));
    }
}
