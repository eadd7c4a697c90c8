use std::collections::HashMap;

use super::models::ItemId;

/// Item id → display name lookup, filled by the loader
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: HashMap<ItemId, String>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn add(&mut self, id: impl Into<ItemId>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Display name for `id`, falling back to the id itself
    pub fn resolve(&self, id: &str) -> ItemId {
        self.name(id).unwrap_or(id).to_string()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_id() {
        let mut catalog = ItemCatalog::new();
        catalog.add("1", "Toy Story (1995)");

        assert_eq!(catalog.resolve("1"), "Toy Story (1995)");
        assert_eq!(catalog.resolve("2"), "2");
        assert_eq!(catalog.len(), 1);
    }
}
