//! Tessera: a generational-index slotmap with columnar value storage.
//!
//! This is the top-level facade crate. A [`SlotMap`] hands out versioned
//! [`Key`](types::Key)s on insert, stores each entry's values in dense
//! per-column arrays, and rejects stale keys after their entry is removed
//! and the slot reused.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! const LABEL: ColumnId<String> = ColumnId::new(0);
//! const SCORE: ColumnId<i32> = ColumnId::new(2);
//!
//! let mut map: SlotMap<(String, Option<String>, i32)> = SlotMap::new();
//! let hello = map.insert(("hello".into(), Some("world".into()), 10));
//! let ok = map.insert(("ok".into(), None, 42));
//!
//! // Read any subset of columns, in any order.
//! let (label, score) = map.get(hello, (LABEL, SCORE)).unwrap().unwrap();
//! assert_eq!((label.as_str(), *score), ("hello", 10));
//!
//! // Removed keys never see data again, even after their slot is reused.
//! map.remove(ok).unwrap();
//! let again = map.insert(("again".into(), None, 1));
//! assert_eq!(again.id(), ok.id());
//! assert!(map.get_all(ok).is_none());
//! assert_eq!(map.len(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | `Key`, bit layout constants, `SlotMapError` |
//! | [`keys`] | `tessera-keys` | `KeyRegistry`, free list, debug formatters |
//! | [`columns`] | `tessera-columns` | `ColumnStore`, `ColumnId`, `ColumnSet`, `Row` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Key layout and error types (`tessera-core`).
pub use tessera_core as types;

/// Key allocation and recycling (`tessera-keys`).
pub use tessera_keys as keys;

/// Dense columnar storage (`tessera-columns`).
pub use tessera_columns as columns;

pub mod config;
pub mod iter;
pub mod map;

pub use config::SlotMapConfig;
pub use iter::Entries;
pub use map::SlotMap;

/// Common imports for working with a [`SlotMap`].
pub mod prelude {
    pub use crate::config::SlotMapConfig;
    pub use crate::map::SlotMap;
    pub use tessera_columns::{ColumnId, ColumnSet, DynValue, RemovalPolicy, Row};
    pub use tessera_core::{Key, SlotMapError};
}
