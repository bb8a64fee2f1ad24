//! Column subsets and full rows.
//!
//! [`ColumnSet`] is implemented for a single [`ColumnId<T>`] and for
//! tuples of up to eight handles. [`Row`] is implemented for tuples of up
//! to eight value types and describes the full column layout of a store.

use smallvec::{smallvec, SmallVec};
use tessera_core::SlotMapError;

use crate::column::{column_mut, column_slice, ErasedColumn, TypedColumn};
use crate::handle::ColumnId;

/// Column indices named by a [`ColumnSet`], in request order.
pub type ColumnList = SmallVec<[usize; 8]>;

/// A typed selection of columns.
///
/// Reads yield [`Refs`](ColumnSet::Refs) in the order the handles appear in
/// the set; writes take [`Values`](ColumnSet::Values) in the same order.
/// Repeating a handle is allowed; the last write wins.
pub trait ColumnSet {
    /// Resolved column slices, one per handle.
    type Slices<'a>: Copy;
    /// References to one row's values, one per handle.
    type Refs<'a>;
    /// Owned values for one row, one per handle.
    type Values;

    /// The column indices named by this set.
    fn indices(&self) -> ColumnList;

    /// Resolve every handle against `columns`.
    ///
    /// Fails with `InvalidTypeIndex` on the first handle whose index is out
    /// of range or whose element type does not match.
    fn slices<'a>(
        &self,
        columns: &'a [Box<dyn ErasedColumn>],
    ) -> Result<Self::Slices<'a>, SlotMapError>;

    /// Pick `row` out of resolved slices.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    fn refs_at<'a>(slices: Self::Slices<'a>, row: usize) -> Self::Refs<'a>;

    /// Overwrite `row` in every selected column.
    ///
    /// Callers validate with [`slices`](ColumnSet::slices) first so that a
    /// bad handle never leaves a row half written.
    fn write(
        &self,
        columns: &mut [Box<dyn ErasedColumn>],
        row: usize,
        values: Self::Values,
    ) -> Result<(), SlotMapError>;

    /// Check every handle without reading anything.
    fn validate(&self, columns: &[Box<dyn ErasedColumn>]) -> Result<(), SlotMapError> {
        self.slices(columns).map(|_| ())
    }
}

impl<T: Send + 'static> ColumnSet for ColumnId<T> {
    type Slices<'a> = &'a [T];
    type Refs<'a> = &'a T;
    type Values = T;

    fn indices(&self) -> ColumnList {
        smallvec![self.index()]
    }

    fn slices<'a>(
        &self,
        columns: &'a [Box<dyn ErasedColumn>],
    ) -> Result<&'a [T], SlotMapError> {
        column_slice::<T>(columns, self.index())
    }

    fn refs_at<'a>(slices: Self::Slices<'a>, row: usize) -> Self::Refs<'a> {
        &slices[row]
    }

    fn write(
        &self,
        columns: &mut [Box<dyn ErasedColumn>],
        row: usize,
        value: T,
    ) -> Result<(), SlotMapError> {
        column_mut::<T>(columns, self.index())?.as_mut_slice()[row] = value;
        Ok(())
    }
}

/// The full column layout of a store: one column per tuple field.
///
/// Implemented for tuples `(A,)` through `(A, B, C, D, E, F, G, H)`.
pub trait Row: Sized + Send + 'static {
    /// Handles for every column, in declaration order.
    type Columns: ColumnSet<Values = Self> + Copy;

    /// Number of columns.
    const ARITY: usize;

    /// Handles for every column.
    fn columns() -> Self::Columns;

    /// Fresh, empty columns for this layout.
    fn empty_columns(capacity: usize) -> Vec<Box<dyn ErasedColumn>>;

    /// Append this row to the end of every column.
    fn push_into(self, columns: &mut [Box<dyn ErasedColumn>]) -> Result<(), SlotMapError>;
}

/// References to every value of a row of `R`.
pub type RowRefs<'a, R> = <<R as Row>::Columns as ColumnSet>::Refs<'a>;

macro_rules! impl_tuples {
    ($arity:expr; $($T:ident $idx:tt),+) => {
        impl<$($T: Send + 'static),+> ColumnSet for ($(ColumnId<$T>,)+) {
            type Slices<'a> = ($(&'a [$T],)+);
            type Refs<'a> = ($(&'a $T,)+);
            type Values = ($($T,)+);

            fn indices(&self) -> ColumnList {
                smallvec![$(self.$idx.index()),+]
            }

            fn slices<'a>(
                &self,
                columns: &'a [Box<dyn ErasedColumn>],
            ) -> Result<Self::Slices<'a>, SlotMapError> {
                Ok(($(column_slice::<$T>(columns, self.$idx.index())?,)+))
            }

            fn refs_at<'a>(slices: Self::Slices<'a>, row: usize) -> Self::Refs<'a> {
                ($(&slices.$idx[row],)+)
            }

            fn write(
                &self,
                columns: &mut [Box<dyn ErasedColumn>],
                row: usize,
                values: Self::Values,
            ) -> Result<(), SlotMapError> {
                $(column_mut::<$T>(columns, self.$idx.index())?.as_mut_slice()[row] = values.$idx;)+
                Ok(())
            }
        }

        impl<$($T: Send + 'static),+> Row for ($($T,)+) {
            type Columns = ($(ColumnId<$T>,)+);

            const ARITY: usize = $arity;

            fn columns() -> Self::Columns {
                ($(ColumnId::new($idx),)+)
            }

            fn empty_columns(capacity: usize) -> Vec<Box<dyn ErasedColumn>> {
                vec![$(
                    Box::new(TypedColumn::<$T>::with_capacity(capacity)) as Box<dyn ErasedColumn>
                ),+]
            }

            fn push_into(self, columns: &mut [Box<dyn ErasedColumn>]) -> Result<(), SlotMapError> {
                Self::columns().validate(columns)?;
                $(column_mut::<$T>(columns, $idx)?.push(self.$idx);)+
                Ok(())
            }
        }
    };
}

impl_tuples!(1; A 0);
impl_tuples!(2; A 0, B 1);
impl_tuples!(3; A 0, B 1, C 2);
impl_tuples!(4; A 0, B 1, C 2, D 3);
impl_tuples!(5; A 0, B 1, C 2, D 3, E 4);
impl_tuples!(6; A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuples!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuples!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
