//! Elements and combination results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of an element instance in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discovered or base concept the player owns.
///
/// Two elements with the same `name` are the same ingredient for combination
/// and inventory purposes, whatever their `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    /// Usually a single emoji. Longer strings are kept as-is.
    pub emoji: String,
    /// Set on elements that came from a discovery.
    #[serde(default, rename = "isNew")]
    pub is_new: bool,
}

impl Element {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            emoji: emoji.into(),
            is_new: false,
        }
    }

    /// Create a freshly discovered element from a combination result.
    pub fn discovered(result: &CombinationResult) -> Self {
        Self {
            is_new: true,
            ..Self::new(result.name.clone(), result.emoji.clone())
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji, self.name)
    }
}

/// The validated outcome of combining two elements.
///
/// Both fields are non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationResult {
    pub name: String,
    pub emoji: String,
}

/// The elements every new inventory starts with.
pub fn base_elements() -> Vec<Element> {
    vec![
        Element::new("Su", "💧"),
        Element::new("Ateş", "🔥"),
        Element::new("Toprak", "🌱"),
        Element::new("Hava", "💨"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_elements() {
        let names: Vec<_> = base_elements().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Su", "Ateş", "Toprak", "Hava"]);
        assert!(base_elements().iter().all(|e| !e.is_new));
    }

    #[test]
    fn test_discovered_element_is_new() {
        let result = CombinationResult {
            name: "Buhar".to_string(),
            emoji: "💨".to_string(),
        };
        let element = Element::discovered(&result);
        assert!(element.is_new);
        assert_eq!(element.to_string(), "💨 Buhar");
    }

    #[test]
    fn test_identities_are_unique() {
        let a = Element::new("Su", "💧");
        let b = Element::new("Su", "💧");
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn test_missing_new_flag_deserializes() {
        let json = r#"{"id":"6f1c1a2e-3b7c-4f7e-9a3d-1c2b3a4d5e6f","name":"Su","emoji":"💧"}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(!element.is_new);
    }
}
