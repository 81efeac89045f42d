//! Fixed-length character chunking and deterministic chunk identity.
//!
//! Chunks are contiguous character windows with no overlap and no semantic
//! boundary awareness. Identity is a pure function of `(file, chunk_id)` so
//! re-indexing supersedes points in place.

use sha2::{Digest, Sha256};

/// Splits `text` into contiguous chunks of at most `max_chars` characters.
///
/// The final chunk carries the remainder. Character-based, so multi-byte
/// input never splits inside a code point.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|window| window.iter().collect())
        .collect()
}

/// Deterministic chunk key: `hex(sha256(file))[..12]` + `_p{chunk_id}`.
pub fn chunk_key(file: &str, chunk_id: u32) -> String {
    let digest = Sha256::digest(file.as_bytes());
    let hex: String = digest
        .iter()
        .take(6)
        .map(|b| format!("{b:02x}"))
        .collect();
    format!("{hex}_p{chunk_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_2500_chars_into_1000_1000_500() {
        let text = "x".repeat(2500);
        let chunks = split_chunks(&text, 1000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 1000);
        assert_eq!(chunks[2].chars().count(), 500);
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(split_chunks("abc", 1000), vec!["abc".to_string()]);
    }

    #[test]
    fn empty_text_produces_no_chunks() {
        assert!(split_chunks("", 1000).is_empty());
    }

    #[test]
    fn multibyte_input_splits_on_characters() {
        let text = "äöü".repeat(400); // 1200 chars, 2400 bytes
        let chunks = split_chunks(&text, 1000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 200);
    }

    #[test]
    fn chunk_key_is_pure() {
        assert_eq!(chunk_key("src/a.go", 0), chunk_key("src/a.go", 0));
    }

    #[test]
    fn chunk_key_distinguishes_chunk_ids_and_files() {
        assert_ne!(chunk_key("src/a.go", 0), chunk_key("src/a.go", 1));
        assert_ne!(chunk_key("src/a.go", 0), chunk_key("src/b.go", 0));
    }

    #[test]
    fn chunk_key_has_twelve_hex_prefix() {
        let key = chunk_key("src/a.go", 3);
        let (prefix, suffix) = key.split_once("_p").unwrap();
        assert_eq!(prefix.len(), 12);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(suffix, "3");
    }
}
