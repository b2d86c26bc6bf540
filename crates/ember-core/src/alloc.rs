//! Hash collections used across Ember.
//!
//! AHash-backed maps, keyed mostly by asset names.

pub use ahash::AHashMap as HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_by_asset_name() {
        let mut map = HashMap::new();
        map.insert("hero.png".to_string(), 7u64);
        assert_eq!(map.get("hero.png"), Some(&7));
        assert!(map.get("villain.png").is_none());
    }
}
