//! # Common Types

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type SLHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> SLHashMap<K, V> {
            SLHashMap::new()
        }
    } else {
        /// Type Alias for hash maps in this crate.
        pub type SLHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> SLHashMap<K, V> {
            SLHashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_map_new() {
        let mut map: SLHashMap<&str, u32> = hash_map_new();
        assert!(map.is_empty());
        map.insert("a", 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
