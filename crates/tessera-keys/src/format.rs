//! Debug renderings of registry state.
//!
//! Keys render as `(ID|VERSION)`:
//!
//! - `E{n}`: the id field names a live slot `n`.
//! - `PTR{n}`: the id field names slot `n`, which is on the free list.
//! - `INVALID`: the id field is the free-list terminator.
//! - `ERROR`: the id field is past the end of the registry.

use std::fmt::Write;

use tessera_core::{Key, INVALID_ID};

use crate::registry::KeyRegistry;

impl KeyRegistry {
    /// The free-list head as `NONE`, `INVALID` or a decimal id.
    pub fn destroyed_to_string(&self) -> String {
        match self.free_head() {
            None => "NONE".to_string(),
            Some(INVALID_ID) => "INVALID".to_string(),
            Some(id) => id.to_string(),
        }
    }

    /// Render a key against the current slot state.
    pub fn key_to_string(&self, key: Key) -> String {
        let id = key.id();
        let id_str = if id == INVALID_ID {
            "INVALID".to_string()
        } else {
            match self.slot(id) {
                None => "ERROR".to_string(),
                Some(slot) if slot.is_live() => format!("E{id}"),
                Some(_) => format!("PTR{id}"),
            }
        };
        format!("({id_str}|V{})", key.version())
    }

    /// Render a key without consulting slot state.
    pub fn key_to_string_raw(&self, key: Key) -> String {
        format!("(E{}|V{})", key.id(), key.version())
    }

    /// Render every slot's packed encoding with [`key_to_string`](Self::key_to_string).
    pub fn list_to_string(&self) -> String {
        self.render_list(|key| self.key_to_string(key))
    }

    /// Render every slot's packed encoding with [`key_to_string_raw`](Self::key_to_string_raw).
    pub fn list_to_string_raw(&self) -> String {
        self.render_list(|key| self.key_to_string_raw(key))
    }

    fn render_list(&self, render: impl Fn(Key) -> String) -> String {
        let mut out = String::from("[");
        for (i, key) in self.list_all().into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            // Writing to a String cannot fail.
            let _ = write!(out, "{}", render(key));
        }
        out.push(']');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_renders_empty() {
        let keys = KeyRegistry::new();
        assert_eq!(keys.destroyed_to_string(), "NONE");
        assert_eq!(keys.list_to_string(), "[]");
    }

    #[test]
    fn renders_live_and_free_slots() {
        let mut keys = KeyRegistry::new();
        let e0 = keys.create().unwrap().key;
        let e1 = keys.create().unwrap().key;
        let _e2 = keys.create().unwrap().key;
        keys.remove(e1).unwrap();

        assert_eq!(keys.destroyed_to_string(), "1");
        assert_eq!(keys.key_to_string(e0), "(E0|V0)");
        assert_eq!(keys.key_to_string(e1), "(PTR1|V0)");
        assert_eq!(keys.list_to_string(), "[(E0|V0), (INVALID|V1), (E2|V0)]");

        keys.remove(e0).unwrap();
        assert_eq!(keys.list_to_string(), "[(PTR1|V1), (INVALID|V1), (E2|V0)]");
        assert_eq!(
            keys.list_to_string_raw(),
            "[(E1|V1), (E1048575|V1), (E2|V0)]"
        );
    }

    #[test]
    fn out_of_range_renders_error() {
        let keys = KeyRegistry::new();
        assert_eq!(keys.key_to_string(Key::forge(9, 2)), "(ERROR|V2)");
        assert_eq!(keys.key_to_string_raw(Key::forge(9, 2)), "(E9|V2)");
    }
}
