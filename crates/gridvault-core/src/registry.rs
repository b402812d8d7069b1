use serde::{Deserialize, Serialize};

use crate::name::SheetName;

/// Key of the single registry record
pub const REGISTRY_KEY: &str = "default";

/// The list of known sheet names, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    sheet_names: Vec<String>,
}

impl RegistryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(sheet_names: Vec<String>) -> Self {
        Self { sheet_names }
    }

    pub fn contains(&self, name: &SheetName) -> bool {
        self.sheet_names.iter().any(|n| n == name.as_str())
    }

    /// Append a name, returning `false` if it was already present
    pub fn insert(&mut self, name: &SheetName) -> bool {
        if self.contains(name) {
            return false;
        }
        self.sheet_names.push(name.as_str().to_string());
        true
    }

    /// Drop every occurrence of a name, returning whether anything was removed
    pub fn remove(&mut self, name: &SheetName) -> bool {
        let before = self.sheet_names.len();
        self.sheet_names.retain(|n| n != name.as_str());
        self.sheet_names.len() != before
    }

    pub fn names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn into_names(self) -> Vec<String> {
        self.sheet_names
    }

    pub fn len(&self) -> usize {
        self.sheet_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheet_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> SheetName {
        SheetName::parse(s).unwrap()
    }

    #[test]
    fn test_insert_refuses_duplicates() {
        let mut registry = RegistryRecord::new();
        assert!(registry.insert(&name("Budget")));
        assert!(!registry.insert(&name("Budget")));
        assert_eq!(registry.names(), ["Budget"]);
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut registry = RegistryRecord::new();
        registry.insert(&name("b"));
        registry.insert(&name("a"));
        registry.insert(&name("c"));
        assert_eq!(registry.names(), ["b", "a", "c"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = RegistryRecord::from_names(vec!["Budget".into(), "Q3".into()]);
        assert!(registry.remove(&name("Budget")));
        assert!(!registry.remove(&name("Budget")));
        assert_eq!(registry.names(), ["Q3"]);
    }
}
