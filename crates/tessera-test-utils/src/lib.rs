//! Test fixtures for Tessera development.
//!
//! Provides a shared row layout with named column handles, prebuilt maps,
//! and a tracing subscriber for test output.

#![forbid(unsafe_code)]

use tessera::prelude::*;

/// Row layout used across tests: a label, an optional note, a number.
pub type Labelled = (String, Option<String>, i32);

/// Column 0 of [`Labelled`].
pub const LABEL: ColumnId<String> = ColumnId::new(0);
/// Column 1 of [`Labelled`].
pub const NOTE: ColumnId<Option<String>> = ColumnId::new(1);
/// Column 2 of [`Labelled`].
pub const NUM: ColumnId<i32> = ColumnId::new(2);

/// Build a [`Labelled`] row from borrowed parts.
pub fn labelled(label: &str, note: Option<&str>, num: i32) -> Labelled {
    (label.to_string(), note.map(str::to_string), num)
}

/// A map holding `hello/world/10` and `ok/-/42`, plus their keys.
pub fn hello_ok() -> (SlotMap<Labelled>, Key, Key) {
    let mut map = SlotMap::new();
    let hello = map.insert(labelled("hello", Some("world"), 10));
    let ok = map.insert(labelled("ok", None, 42));
    (map, hello, ok)
}

/// A map with `n` rows `item_{i}/-/i`, plus their keys in insertion order.
pub fn populated(n: usize) -> (SlotMap<Labelled>, Vec<Key>) {
    let mut map = SlotMap::with_capacity(n);
    let keys = (0..n)
        .map(|i| map.insert(labelled(&format!("item_{i}"), None, i as i32)))
        .collect();
    (map, keys)
}

/// Labels of every row in storage order.
pub fn labels(map: &SlotMap<Labelled>) -> Vec<String> {
    match map.values(LABEL) {
        Ok(values) => values.cloned().collect(),
        Err(err) => panic!("label column missing: {err}"),
    }
}

/// Install a `tracing` subscriber honouring `RUST_LOG`, writing through the
/// test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
