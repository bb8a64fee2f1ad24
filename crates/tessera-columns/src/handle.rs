//! Typed column handles.

use std::any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Addresses column `index` and asserts its element type is `T`.
///
/// Handles are plain values. A handle built for the wrong index or type is
/// not an error until it is used, at which point the store rejects it with
/// `InvalidTypeIndex` before touching any data.
pub struct ColumnId<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ColumnId<T> {
    /// Handle for column `index`.
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// The column index.
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for ColumnId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ColumnId<T> {}

impl<T> PartialEq for ColumnId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for ColumnId<T> {}

impl<T> Hash for ColumnId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for ColumnId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId<{}>({})", any::type_name::<T>(), self.index)
    }
}
