//! Type-erased column storage.

use std::any::{self, Any};

use tessera_core::SlotMapError;

/// A boxed value of unknown type, used by the dynamic write paths.
pub type DynValue = Box<dyn Any + Send>;

/// Object-safe view of a dense column.
///
/// Row-shape operations (removal, length) work without knowing the element
/// type; typed access goes through [`as_any`](ErasedColumn::as_any) and a
/// downcast to [`TypedColumn<T>`].
pub trait ErasedColumn: Any + Send {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Whether the column holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove `row`, shifting every later row down by one.
    fn remove_ordered(&mut self, row: usize);

    /// Remove `row`, moving the last row into its place.
    fn swap_remove(&mut self, row: usize);

    /// Drop every row.
    fn clear(&mut self);

    /// Whether `value` has this column's element type.
    fn accepts(&self, value: &(dyn Any + Send)) -> bool;

    /// Overwrite `row` with a boxed value, handing it back if its type is
    /// wrong.
    fn set_dyn(&mut self, row: usize, value: DynValue) -> Result<(), DynValue>;

    /// Name of the element type, for diagnostics.
    fn element_type_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete column.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete column.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A dense column of `T`.
#[derive(Clone, Debug, Default)]
pub struct TypedColumn<T> {
    data: Vec<T>,
}

impl<T: Send + 'static> TypedColumn<T> {
    /// Create an empty column with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// The rows as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The rows as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Append a row.
    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }
}

impl<T: Send + 'static> ErasedColumn for TypedColumn<T> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn remove_ordered(&mut self, row: usize) {
        self.data.remove(row);
    }

    fn swap_remove(&mut self, row: usize) {
        self.data.swap_remove(row);
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn accepts(&self, value: &(dyn Any + Send)) -> bool {
        value.is::<T>()
    }

    fn set_dyn(&mut self, row: usize, value: DynValue) -> Result<(), DynValue> {
        let value = value.downcast::<T>()?;
        self.data[row] = *value;
        Ok(())
    }

    fn element_type_name(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Resolve column `index` as a slice of `T`.
pub(crate) fn column_slice<T: Send + 'static>(
    columns: &[Box<dyn ErasedColumn>],
    index: usize,
) -> Result<&[T], SlotMapError> {
    columns
        .get(index)
        .and_then(|column| column.as_any().downcast_ref::<TypedColumn<T>>())
        .map(TypedColumn::as_slice)
        .ok_or(SlotMapError::InvalidTypeIndex { index })
}

/// Resolve column `index` as a mutable `TypedColumn<T>`.
pub(crate) fn column_mut<T: Send + 'static>(
    columns: &mut [Box<dyn ErasedColumn>],
    index: usize,
) -> Result<&mut TypedColumn<T>, SlotMapError> {
    columns
        .get_mut(index)
        .and_then(|column| column.as_any_mut().downcast_mut::<TypedColumn<T>>())
        .ok_or(SlotMapError::InvalidTypeIndex { index })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erased(values: &[i32]) -> Vec<Box<dyn ErasedColumn>> {
        let mut column = TypedColumn::with_capacity(values.len());
        for &v in values {
            column.push(v);
        }
        let column: Box<dyn ErasedColumn> = Box::new(column);
        vec![column]
    }

    #[test]
    fn ordered_removal_keeps_order() {
        let mut column = TypedColumn::with_capacity(4);
        for v in [1, 2, 3, 4] {
            column.push(v);
        }
        column.remove_ordered(1);
        assert_eq!(column.as_slice(), &[1, 3, 4]);
    }

    #[test]
    fn swap_removal_moves_last() {
        let mut column = TypedColumn::with_capacity(4);
        for v in [1, 2, 3, 4] {
            column.push(v);
        }
        column.swap_remove(0);
        assert_eq!(column.as_slice(), &[4, 2, 3]);
    }

    #[test]
    fn set_dyn_checks_type() {
        let mut column = TypedColumn::with_capacity(1);
        column.push(1u8);

        let wrong: DynValue = Box::new("nope");
        assert!(!column.accepts(&*wrong));
        assert!(column.set_dyn(0, wrong).is_err());

        let right: DynValue = Box::new(9u8);
        assert!(column.accepts(&*right));
        assert!(column.set_dyn(0, right).is_ok());
        assert_eq!(column.as_slice(), &[9]);
    }

    #[test]
    fn resolve_by_index_and_type() {
        let mut columns = erased(&[5, 6]);
        assert_eq!(column_slice::<i32>(&columns, 0).unwrap(), &[5, 6]);
        assert_eq!(
            column_slice::<u64>(&columns, 0),
            Err(SlotMapError::InvalidTypeIndex { index: 0 })
        );
        assert_eq!(
            column_slice::<i32>(&columns, 1),
            Err(SlotMapError::InvalidTypeIndex { index: 1 })
        );

        column_mut::<i32>(&mut columns, 0).unwrap().as_mut_slice()[1] = 7;
        assert_eq!(column_slice::<i32>(&columns, 0).unwrap(), &[5, 7]);
        assert_eq!(columns[0].element_type_name(), "i32");
    }
}
