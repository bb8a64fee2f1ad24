//! Slotmap construction parameters.

use tessera_columns::RemovalPolicy;
use tessera_core::{SlotMapError, MAX_ID};
use tessera_keys::DEFAULT_ALLOC_CHUNK;

/// Configuration for a [`SlotMap`](crate::SlotMap).
///
/// Validated by [`SlotMap::with_config`](crate::SlotMap::with_config);
/// immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotMapConfig {
    /// Ids (and dense rows) to allocate up front.
    ///
    /// Default: 0. At most [`MAX_ID`].
    pub initial_capacity: usize,

    /// Ids added each time the key registry fills up.
    ///
    /// Default: 64. Must be non-zero.
    pub alloc_chunk: usize,

    /// How removal closes holes in the dense columns.
    ///
    /// Default: [`RemovalPolicy::Ordered`], which keeps iteration in
    /// insertion order at O(len) per removal.
    pub removal: RemovalPolicy,
}

impl SlotMapConfig {
    /// Default growth step.
    pub const DEFAULT_ALLOC_CHUNK: usize = DEFAULT_ALLOC_CHUNK;

    /// Config with default values.
    pub fn new() -> Self {
        Self {
            initial_capacity: 0,
            alloc_chunk: Self::DEFAULT_ALLOC_CHUNK,
            removal: RemovalPolicy::Ordered,
        }
    }

    /// Set [`initial_capacity`](Self::initial_capacity).
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set [`alloc_chunk`](Self::alloc_chunk).
    pub fn with_alloc_chunk(mut self, chunk: usize) -> Self {
        self.alloc_chunk = chunk;
        self
    }

    /// Set [`removal`](Self::removal).
    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), SlotMapError> {
        if self.alloc_chunk == 0 {
            return Err(SlotMapError::InvalidConfig {
                reason: "alloc_chunk must be non-zero".to_string(),
            });
        }
        if self.initial_capacity > MAX_ID as usize {
            return Err(SlotMapError::InvalidConfig {
                reason: format!(
                    "initial_capacity {} exceeds the id space ({MAX_ID})",
                    self.initial_capacity
                ),
            });
        }
        Ok(())
    }
}

impl Default for SlotMapConfig {
    fn default() -> Self {
        Self::new()
    }
}
