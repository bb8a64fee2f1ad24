//! Core types for the Tessera slotmap.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the packed [`Key`] handle, the id/version bit layout, and the
//! [`SlotMapError`] type shared by the registry, the columnar store,
//! and the facade.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod key;

pub use error::SlotMapError;
pub use key::{
    Key, KeyId, KeyVersion, ID_MASK, INVALID_ID, MAX_ID, MAX_VERSION, N_ID_BITS, N_VERSION_BITS,
    VERSION_MASK,
};
