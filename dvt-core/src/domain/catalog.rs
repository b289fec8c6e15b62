// dvt-core/src/domain/catalog.rs

use std::collections::HashMap;

use crate::domain::table::TableDescriptor;

/// Every `(database, table)` pair visible through one connection, keyed by
/// `"{schema}__{table}"`.
///
/// Keeps enumeration order so that matching ties resolve to the first
/// enumerated candidate.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    entries: Vec<(String, TableDescriptor)>,
    index: HashMap<String, usize>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (and keeps the first entry) when the key already exists.
    pub fn insert(&mut self, table: TableDescriptor) -> bool {
        let key = table.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, table));
        true
    }

    pub fn get(&self, key: &str) -> Option<&TableDescriptor> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableDescriptor)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TableDescriptor> for TableCatalog {
    fn from_iter<I: IntoIterator<Item = TableDescriptor>>(iter: I) -> Self {
        let mut catalog = TableCatalog::new();
        for table in iter {
            catalog.insert(table);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_uniqueness() {
        let mut catalog = TableCatalog::new();
        assert!(catalog.insert(TableDescriptor::new("s", "b")));
        assert!(catalog.insert(TableDescriptor::new("s", "a")));
        assert!(!catalog.insert(TableDescriptor::new("s", "b")));

        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(keys, vec!["s__b", "s__a"]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("s__a"), Some(&TableDescriptor::new("s", "a")));
        assert!(catalog.get("s__c").is_none());
    }

    #[test]
    fn test_case_variants_are_distinct_keys() {
        let catalog: TableCatalog = vec![
            TableDescriptor::new("S", "T"),
            TableDescriptor::new("s", "t"),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.len(), 2);
    }
}
