//! The player's collection of owned elements.
//!
//! Elements are deduplicated by display name: adding a result whose name is
//! already present is a no-op, even if the emoji differs.

use crate::element::{base_elements, CombinationResult, Element, ElementId};
use crate::persist::{PersistError, SavedInventory};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    elements: Vec<Element>,
}

impl Inventory {
    /// A fresh inventory holding the base elements.
    pub fn new() -> Self {
        Self {
            elements: base_elements(),
        }
    }

    /// Build from existing elements, dropping later duplicates by name.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut inventory = Self {
            elements: Vec::new(),
        };
        for element in elements {
            if !inventory.contains_name(&element.name) {
                inventory.elements.push(element);
            }
        }
        inventory
    }

    /// Add a discovery unless an element with the same name is already owned.
    ///
    /// Returns the newly added element, or `None` if it was already present.
    pub fn add_if_absent(&mut self, result: &CombinationResult) -> Option<&Element> {
        if self.contains_name(&result.name) {
            return None;
        }
        self.elements.push(Element::discovered(result));
        self.elements.last()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Clear the "new" highlight on every element.
    pub fn clear_new_flags(&mut self) {
        for element in &mut self.elements {
            element.is_new = false;
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        SavedInventory::new(self.elements.clone()).save_json(path).await
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let saved = SavedInventory::load_json(path).await?;
        Ok(Self::from_elements(saved.elements))
    }

    /// Load a save, falling back to the base elements.
    ///
    /// A missing file, an unreadable save, or a save with no elements all
    /// start a fresh inventory.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_json(path).await {
            Ok(inventory) if !inventory.is_empty() => inventory,
            Ok(_) => Self::new(),
            Err(PersistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load inventory, starting fresh");
                Self::new()
            }
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
