//! Benchmark workloads for the Tessera slotmap.
//!
//! - [`Particle`]: a three-column row used by every benchmark
//! - [`fragmented`]: a populated map with a seeded scatter of recycled ids
//! - [`shuffled`]: a deterministic permutation for access patterns

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera::prelude::*;

/// Position, velocity, tag.
pub type Particle = (f32, f32, u32);

/// Position column of [`Particle`].
pub const POS: ColumnId<f32> = ColumnId::new(0);
/// Velocity column of [`Particle`].
pub const VEL: ColumnId<f32> = ColumnId::new(1);
/// Tag column of [`Particle`].
pub const TAG: ColumnId<u32> = ColumnId::new(2);

/// The row stored for index `i`.
pub fn particle(i: usize) -> Particle {
    (i as f32, 1.0 + (i % 7) as f32, i as u32)
}

/// A deterministic permutation of `0..n`.
pub fn shuffled(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n).collect();
    // Fisher-Yates
    for i in (1..n).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        order.swap(i, j);
    }
    order
}

/// A map of `n` particles whose ids have been recycled in seeded order.
///
/// Every id is inserted, removed and reinserted once, so live keys carry
/// version 1 and the dense order differs from id order.
pub fn fragmented(n: usize, seed: u64) -> (SlotMap<Particle>, Vec<Key>) {
    let mut map = SlotMap::with_capacity(n);
    let first: Vec<Key> = (0..n).map(|i| map.insert(particle(i))).collect();
    for &i in &shuffled(n, seed) {
        map.remove(first[i]).unwrap();
    }
    let keys = (0..n).map(|i| map.insert(particle(i))).collect();
    (map, keys)
}
