//! Deterministic identifiers for vector-store points.

use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string key.
///
/// The vector store requires UUID point ids; deriving them from the chunk key
/// keeps re-indexing idempotent (same key, same point, superseded in place).
pub fn stable_uuid(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_uuid() {
        assert_eq!(stable_uuid("a/b.go_p0"), stable_uuid("a/b.go_p0"));
    }

    #[test]
    fn different_keys_differ() {
        assert_ne!(stable_uuid("a/b.go_p0"), stable_uuid("a/b.go_p1"));
    }
}
