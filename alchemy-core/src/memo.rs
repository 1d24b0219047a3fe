//! Memoized combination results.
//!
//! The [`MemoStore`] maps a [`CombinationKey`] to the result it produced. It is
//! created empty, only ever grows, and lives for one process; nothing here is
//! persisted. Owners share it with resolvers through an `Arc`.

use crate::element::CombinationResult;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Joins the two sorted names of a key.
pub const KEY_SEPARATOR: char = '+';

/// Canonical key for an unordered pair of element names.
///
/// Names are compared exactly as given: no case folding, no trimming.
/// Names are not escaped, so a name that itself contains [`KEY_SEPARATOR`]
/// can collide with another pair: `("A+B", "C")` and `("A", "B+C")` share
/// the key `A+B+C`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinationKey(String);

impl CombinationKey {
    pub fn new(first: &str, second: &str) -> Self {
        let (low, high) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self(format!("{low}{KEY_SEPARATOR}{high}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-wide memo table of resolved combinations.
#[derive(Debug, Default)]
pub struct MemoStore {
    entries: RwLock<HashMap<CombinationKey, Arc<CombinationResult>>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously stored result.
    pub fn get(&self, key: &CombinationKey) -> Option<Arc<CombinationResult>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store a result and return whatever the key now holds.
    ///
    /// The first write for a key wins; a later insert for the same key leaves
    /// the stored result untouched and returns it.
    pub fn insert(&self, key: CombinationKey, result: CombinationResult) -> Arc<CombinationResult> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Arc::new(result))
            .clone()
    }

    pub fn contains(&self, key: &CombinationKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, emoji: &str) -> CombinationResult {
        CombinationResult {
            name: name.to_string(),
            emoji: emoji.to_string(),
        }
    }

    #[test]
    fn test_key_is_commutative() {
        assert_eq!(CombinationKey::new("Ateş", "Su"), CombinationKey::new("Su", "Ateş"));
        assert_eq!(CombinationKey::new("Ateş", "Su").as_str(), "Ateş+Su");
    }

    #[test]
    fn test_self_combination_key() {
        assert_eq!(CombinationKey::new("Toprak", "Toprak").as_str(), "Toprak+Toprak");
    }

    #[test]
    fn test_key_does_not_normalize_names() {
        assert_ne!(CombinationKey::new("Ateş", "Su"), CombinationKey::new("ateş", "Su"));
        assert_ne!(CombinationKey::new("Ateş", "Su"), CombinationKey::new("Ateş ", "Su"));
    }

    #[test]
    fn test_separator_inside_names_collides() {
        assert_eq!(CombinationKey::new("A+B", "C"), CombinationKey::new("A", "B+C"));
    }

    #[test]
    fn test_store_starts_empty() {
        let store = MemoStore::new();
        assert!(store.is_empty());
        assert!(store.get(&CombinationKey::new("Su", "Su")).is_none());
    }

    #[test]
    fn test_first_write_wins() {
        let store = MemoStore::new();
        let key = CombinationKey::new("Ateş", "Su");

        let first = store.insert(key.clone(), result("Buhar", "💨"));
        let second = store.insert(key.clone(), result("Sis", "🌫️"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.name, "Buhar");
        assert_eq!(store.len(), 1);
        assert!(store.contains(&key));
    }
}
