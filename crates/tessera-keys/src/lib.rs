//! Versioned key allocation for the Tessera slotmap.
//!
//! The [`KeyRegistry`] hands out packed [`Key`](tessera_core::Key)s,
//! recycles the ids of removed keys through an intrusive free list, and
//! answers liveness queries in O(1).
//!
//! # Architecture
//!
//! ```text
//! KeyRegistry
//! ├── Vec<Slot>        one entry per id ever allocated
//! │   ├── Slot::Live { version }
//! │   └── Slot::Free { version, next }   (free list threaded in place)
//! ├── free_head        most recently freed id
//! └── capacity         grown in fixed chunks, reported to the caller
//! ```
//!
//! Growth is reported through [`Allocation::grown_to`] so that storage kept
//! in parallel with the registry can be resized in lockstep.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod format;
pub mod registry;
pub mod slot;

pub use registry::{Allocation, KeyListFilter, KeyRegistry, Keys, DEFAULT_ALLOC_CHUNK};
pub use slot::Slot;
