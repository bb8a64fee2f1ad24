//! The columnar store: slot ids mapped onto dense, parallel columns.

use std::fmt;
use std::marker::PhantomData;

use tessera_core::{KeyId, SlotMapError};

use crate::column::{column_mut, DynValue, ErasedColumn};
use crate::handle::ColumnId;
use crate::iter::{Entries, Values};
use crate::set::{ColumnList, ColumnSet, Row, RowRefs};

/// How a removal closes the hole it leaves in the dense columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Splice the row out and shift every later row down by one.
    ///
    /// Iteration order stays insertion order (modulo removals). Costs
    /// O(len) per removal.
    #[default]
    Ordered,
    /// Move the last row into the hole.
    ///
    /// O(1) per removal, but the moved row changes position in iteration
    /// order.
    SwapRemove,
}

/// Dense per-column storage addressed by slot id.
///
/// The store trusts its caller about liveness: any id it holds a row for
/// is considered present. The slotmap facade checks key versions before
/// reaching the store.
///
/// Invariants:
/// - every column has exactly `len()` rows;
/// - `indices[id] == Some(r)` iff `owners[r] == id`.
pub struct ColumnStore<R: Row> {
    /// One column per field of `R`.
    columns: Vec<Box<dyn ErasedColumn>>,
    /// Slot id → dense row. Sized to the key registry's capacity.
    indices: Vec<Option<u32>>,
    /// Dense row → slot id.
    owners: Vec<KeyId>,
    _row: PhantomData<fn() -> R>,
}

impl<R: Row> ColumnStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty store with room for `capacity` ids and rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: R::empty_columns(capacity),
            indices: vec![None; capacity],
            owners: Vec::with_capacity(capacity),
            _row: PhantomData,
        }
    }

    /// Number of declared columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of present rows.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no row is present.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Number of ids the index table covers.
    pub fn capacity(&self) -> usize {
        self.indices.len()
    }

    /// Extend the index table to cover `capacity` ids.
    ///
    /// Never shrinks.
    pub fn grow(&mut self, capacity: usize) {
        if capacity > self.indices.len() {
            self.indices.resize(capacity, None);
            tracing::debug!(capacity, "column store indices grew");
        }
    }

    /// The dense row holding `id`.
    pub fn row_of(&self, id: KeyId) -> Option<usize> {
        self.indices
            .get(id as usize)
            .copied()
            .flatten()
            .map(|row| row as usize)
    }

    /// Whether `id` has a row.
    pub fn contains(&self, id: KeyId) -> bool {
        self.row_of(id).is_some()
    }

    /// The id owning dense row `row`.
    pub fn owner_of(&self, row: usize) -> Option<KeyId> {
        self.owners.get(row).copied()
    }

    /// Slot ids in dense row order.
    pub fn owners(&self) -> &[KeyId] {
        &self.owners
    }

    /// Element type name of each column, for diagnostics.
    pub fn column_types(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.element_type_name()).collect()
    }

    /// Append a row for `id`.
    ///
    /// Returns `Ok(false)` without touching anything if `id` already has a
    /// row. The index table grows if `id` lies beyond it.
    pub fn insert(&mut self, id: KeyId, row: R) -> Result<bool, SlotMapError> {
        if self.contains(id) {
            return Ok(false);
        }
        let slot = id as usize;
        if slot >= self.indices.len() {
            self.grow(slot + 1);
        }
        let dense = self.owners.len();
        row.push_into(&mut self.columns)?;
        self.indices[slot] = Some(dense as u32);
        self.owners.push(id);
        Ok(true)
    }

    /// Remove the row for `id`, returning the dense row it occupied.
    pub fn remove(&mut self, id: KeyId, policy: RemovalPolicy) -> Option<usize> {
        let row = self.row_of(id)?;
        match policy {
            RemovalPolicy::Ordered => {
                for column in &mut self.columns {
                    column.remove_ordered(row);
                }
                self.owners.remove(row);
                for &owner in &self.owners[row..] {
                    if let Some(r) = self.indices[owner as usize].as_mut() {
                        *r -= 1;
                    }
                }
            }
            RemovalPolicy::SwapRemove => {
                for column in &mut self.columns {
                    column.swap_remove(row);
                }
                self.owners.swap_remove(row);
                if let Some(&moved) = self.owners.get(row) {
                    self.indices[moved as usize] = Some(row as u32);
                }
            }
        }
        self.indices[id as usize] = None;
        Some(row)
    }

    /// Drop every row. Capacity is kept.
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.owners.clear();
        self.indices.fill(None);
    }

    /// Read a subset of columns for `id`.
    ///
    /// `None` if `id` has no row; otherwise the validated references in the
    /// order the set names them.
    pub fn get<S: ColumnSet>(
        &self,
        id: KeyId,
        set: S,
    ) -> Option<Result<S::Refs<'_>, SlotMapError>> {
        let row = self.row_of(id)?;
        Some(set.slices(&self.columns).map(|slices| S::refs_at(slices, row)))
    }

    /// Read every column for `id`.
    pub fn get_row(&self, id: KeyId) -> Option<RowRefs<'_, R>> {
        let row = self.row_of(id)?;
        Some(<R::Columns as ColumnSet>::refs_at(self.row_slices(), row))
    }

    /// Mutable access to one value of `id`.
    pub fn get_mut<T: Send + 'static>(
        &mut self,
        id: KeyId,
        column: ColumnId<T>,
    ) -> Option<Result<&mut T, SlotMapError>> {
        let row = self.row_of(id)?;
        Some(column_mut::<T>(&mut self.columns, column.index()).map(|c| &mut c.as_mut_slice()[row]))
    }

    /// Overwrite a subset of columns for `id`.
    ///
    /// Returns `Ok(false)` if `id` has no row. Every handle is validated
    /// before the first write.
    pub fn update_some<S: ColumnSet>(
        &mut self,
        id: KeyId,
        set: S,
        values: S::Values,
    ) -> Result<bool, SlotMapError> {
        let Some(row) = self.row_of(id) else {
            return Ok(false);
        };
        set.validate(&self.columns)?;
        set.write(&mut self.columns, row, values)?;
        Ok(true)
    }

    /// Overwrite every column for `id`.
    pub fn set_row(&mut self, id: KeyId, row: R) -> Result<bool, SlotMapError> {
        self.update_some(id, R::columns(), row)
    }

    /// Overwrite columns named by index with boxed values.
    ///
    /// Argument shape is checked first (`MismatchedIndexValues`), then
    /// presence, then each index and value type (`InvalidTypeIndex`). No
    /// value is written unless all checks pass.
    pub fn update_some_dyn(
        &mut self,
        id: KeyId,
        indices: &[usize],
        values: Vec<DynValue>,
    ) -> Result<bool, SlotMapError> {
        if indices.len() != values.len() {
            return Err(SlotMapError::MismatchedIndexValues {
                indices: indices.len(),
                values: values.len(),
            });
        }
        let Some(row) = self.row_of(id) else {
            return Ok(false);
        };
        for (&index, value) in indices.iter().zip(&values) {
            match self.columns.get(index) {
                Some(column) if column.accepts(&**value) => {}
                _ => return Err(SlotMapError::InvalidTypeIndex { index }),
            }
        }
        for (&index, value) in indices.iter().zip(values) {
            self.columns[index]
                .set_dyn(row, value)
                .map_err(|_| SlotMapError::InvalidTypeIndex { index })?;
        }
        Ok(true)
    }

    /// Overwrite columns from `(index, value)` pairs.
    pub fn replace(
        &mut self,
        id: KeyId,
        pairs: Vec<(usize, DynValue)>,
    ) -> Result<bool, SlotMapError> {
        let (indices, values): (ColumnList, Vec<DynValue>) = pairs.into_iter().unzip();
        self.update_some_dyn(id, &indices, values)
    }

    /// Overwrite a whole row from boxed values, one per column.
    pub fn set_row_dyn(&mut self, id: KeyId, values: Vec<DynValue>) -> Result<bool, SlotMapError> {
        if values.len() != self.n_columns() {
            return Err(SlotMapError::NotEnoughValues {
                expected: self.n_columns(),
                got: values.len(),
            });
        }
        let indices: ColumnList = (0..self.n_columns()).collect();
        self.update_some_dyn(id, &indices, values)
    }

    /// Iterate a subset of columns over every row, in row order.
    pub fn values<S: ColumnSet>(&self, set: S) -> Result<Values<'_, S>, SlotMapError> {
        Ok(Values::new(set.slices(&self.columns)?, self.len()))
    }

    /// Iterate every column over every row.
    pub fn values_all(&self) -> Values<'_, R::Columns> {
        Values::new(self.row_slices(), self.len())
    }

    /// Like [`values`](Self::values), paired with the owning slot id.
    pub fn entries<S: ColumnSet>(&self, set: S) -> Result<Entries<'_, S>, SlotMapError> {
        Ok(Entries::new(self.values(set)?, &self.owners))
    }

    /// Like [`values_all`](Self::values_all), paired with the owning slot id.
    pub fn entries_all(&self) -> Entries<'_, R::Columns> {
        Entries::new(self.values_all(), &self.owners)
    }

    /// Map every row's `set` columns through `f` and write the results back.
    pub fn update<S, F>(&mut self, set: S, f: F) -> Result<(), SlotMapError>
    where
        S: ColumnSet + Copy,
        F: FnMut(S::Refs<'_>, KeyId) -> S::Values,
    {
        self.update_rw(set, set, f)
    }

    /// Read `read` from every row, compute `write` values with `f`, store them.
    ///
    /// Both sets are validated before `f` is first called. Results are
    /// buffered, so `read` and `write` may overlap.
    pub fn update_rw<Rd, W, F>(&mut self, read: Rd, write: W, mut f: F) -> Result<(), SlotMapError>
    where
        Rd: ColumnSet,
        W: ColumnSet,
        F: FnMut(Rd::Refs<'_>, KeyId) -> W::Values,
    {
        write.validate(&self.columns)?;
        let slices = read.slices(&self.columns)?;
        let outputs: Vec<W::Values> = self
            .owners
            .iter()
            .enumerate()
            .map(|(row, &owner)| f(Rd::refs_at(slices, row), owner))
            .collect();
        tracing::trace!(
            read = ?read.indices(),
            write = ?write.indices(),
            rows = outputs.len(),
            "bulk column update"
        );
        for (row, values) in outputs.into_iter().enumerate() {
            write.write(&mut self.columns, row, values)?;
        }
        Ok(())
    }

    fn row_slices(&self) -> <R::Columns as ColumnSet>::Slices<'_> {
        match R::columns().slices(&self.columns) {
            Ok(slices) => slices,
            Err(err) => unreachable!("store columns diverged from their row layout: {err}"),
        }
    }
}

impl<R: Row> Default for ColumnStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Row> fmt::Debug for ColumnStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnStore")
            .field("columns", &self.column_types())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
