use blake3::Hasher;

/// Length of the hex fingerprint used in cache file names.
const FINGERPRINT_HEX_LEN: usize = 16;

/// Stable content fingerprint of a corpus: blake3 over every `(id, text)`
/// pair in order. Reordering, renaming or editing any entry changes it.
pub fn corpus_fingerprint(ids: &[String], texts: &[String]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(&(ids.len() as u64).to_le_bytes());
    for (id, text) in ids.iter().zip(texts.iter()) {
        hasher.update(&(id.len() as u64).to_le_bytes());
        hasher.update(id.as_bytes());
        hasher.update(&(text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
    }
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..FINGERPRINT_HEX_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(items: &[&str]) -> Vec<String> {
        items.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn fingerprint_is_stable_and_order_sensitive() {
        let a = corpus_fingerprint(&s(&["a", "b"]), &s(&["x", "y"]));
        assert_eq!(a, corpus_fingerprint(&s(&["a", "b"]), &s(&["x", "y"])));
        assert_ne!(a, corpus_fingerprint(&s(&["b", "a"]), &s(&["y", "x"])));
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn boundaries_are_unambiguous() {
        assert_ne!(
            corpus_fingerprint(&s(&["ab"]), &s(&["c"])),
            corpus_fingerprint(&s(&["a"]), &s(&["bc"]))
        );
    }
}
