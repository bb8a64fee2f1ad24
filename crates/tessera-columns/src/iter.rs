//! Row iterators over a column subset.
//!
//! Both iterators walk dense rows in order and resolve their columns once
//! up front, so each step is a plain slice index per column.

use std::iter::FusedIterator;

use tessera_core::KeyId;

use crate::set::ColumnSet;

/// Iterator over one column subset of every present row, in row order.
pub struct Values<'a, S: ColumnSet> {
    slices: S::Slices<'a>,
    row: usize,
    len: usize,
}

impl<'a, S: ColumnSet> Values<'a, S> {
    pub(crate) fn new(slices: S::Slices<'a>, len: usize) -> Self {
        Self {
            slices,
            row: 0,
            len,
        }
    }
}

impl<S: ColumnSet> Clone for Values<'_, S> {
    fn clone(&self) -> Self {
        Self {
            slices: self.slices,
            row: self.row,
            len: self.len,
        }
    }
}

impl<'a, S: ColumnSet> Iterator for Values<'a, S> {
    type Item = S::Refs<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.len {
            return None;
        }
        let refs = S::refs_at(self.slices, self.row);
        self.row += 1;
        Some(refs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.row;
        (remaining, Some(remaining))
    }
}

impl<S: ColumnSet> ExactSizeIterator for Values<'_, S> {}

impl<S: ColumnSet> FusedIterator for Values<'_, S> {}

/// Like [`Values`], but also yields the slot id owning each row.
pub struct Entries<'a, S: ColumnSet> {
    values: Values<'a, S>,
    owners: &'a [KeyId],
}

impl<'a, S: ColumnSet> Entries<'a, S> {
    pub(crate) fn new(values: Values<'a, S>, owners: &'a [KeyId]) -> Self {
        Self { values, owners }
    }
}

impl<S: ColumnSet> Clone for Entries<'_, S> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            owners: self.owners,
        }
    }
}

impl<'a, S: ColumnSet> Iterator for Entries<'a, S> {
    type Item = (KeyId, S::Refs<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.values.row;
        let refs = self.values.next()?;
        Some((self.owners[row], refs))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<S: ColumnSet> ExactSizeIterator for Entries<'_, S> {}

impl<S: ColumnSet> FusedIterator for Entries<'_, S> {}
