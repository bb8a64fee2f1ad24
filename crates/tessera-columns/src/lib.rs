//! Dense columnar value storage for the Tessera slotmap.
//!
//! A [`ColumnStore`] keeps one densely packed `Vec<T>` per declared
//! column. All columns share the same length and row order, so a row is
//! the set of values found at one index across every column. A sparse
//! `indices` table maps slot ids to rows; a dense `owners` table maps rows
//! back to slot ids.
//!
//! # Architecture
//!
//! ```text
//! ColumnStore<R: Row>
//! ├── columns: Vec<Box<dyn ErasedColumn>>   one TypedColumn<T> per field of R
//! ├── indices: Vec<Option<u32>>             slot id → dense row
//! └── owners:  Vec<KeyId>                   dense row → slot id
//! ```
//!
//! # Column addressing
//!
//! Columns are addressed by [`ColumnId<T>`] handles carrying both the
//! column index and its element type. Tuples of handles implement
//! [`ColumnSet`], so a caller can read or write any subset of columns in
//! any order. Every handle is checked against the store before anything
//! is read or written; a bad index or element type is reported as
//! [`SlotMapError::InvalidTypeIndex`](tessera_core::SlotMapError::InvalidTypeIndex)
//! and nothing is modified.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod column;
pub mod handle;
pub mod iter;
pub mod set;
pub mod store;

pub use column::{DynValue, ErasedColumn, TypedColumn};
pub use handle::ColumnId;
pub use iter::{Entries, Values};
pub use set::{ColumnList, ColumnSet, Row, RowRefs};
pub use store::{ColumnStore, RemovalPolicy};
