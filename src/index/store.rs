//! Document store: live document records keyed by id.

use std::collections::BTreeMap;
use std::collections::btree_map::Keys;
use std::iter::Copied;

use crate::document::{DocumentId, DocumentRecord};

/// Iterator over live document ids in ascending order.
pub type DocumentIds<'a> = Copied<Keys<'a, DocumentId, DocumentRecord>>;

/// Records of all live documents, ordered by id.
///
/// The key set of the store is the engine's set of live document ids.
#[derive(Debug, Default)]
pub struct DocumentStore {
    records: BTreeMap<DocumentId, DocumentRecord>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the previous record with the same id.
    pub fn insert(&mut self, record: DocumentRecord) -> Option<DocumentRecord> {
        self.records.insert(record.id, record)
    }

    /// Remove a record.
    pub fn remove(&mut self, id: DocumentId) -> Option<DocumentRecord> {
        self.records.remove(&id)
    }

    /// Look up a record.
    pub fn get(&self, id: DocumentId) -> Option<&DocumentRecord> {
        self.records.get(&id)
    }

    /// Whether `id` is live.
    pub fn contains(&self, id: DocumentId) -> bool {
        self.records.contains_key(&id)
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> DocumentIds<'_> {
        self.records.keys().copied()
    }

    /// The `index`-th live id in ascending order.
    pub fn id_at(&self, index: usize) -> Option<DocumentId> {
        self.records.keys().nth(index).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::DocumentStatus;

    #[test]
    fn test_ids_are_ascending() {
        let mut store = DocumentStore::new();
        for id in [5, 1, 3] {
            store.insert(DocumentRecord::new(id, 0, DocumentStatus::Actual, "x"));
        }

        assert_eq!(store.ids().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(store.id_at(1), Some(3));
        assert_eq!(store.id_at(3), None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut store = DocumentStore::new();
        store.insert(DocumentRecord::new(1, 0, DocumentStatus::Actual, "x"));
        assert!(store.remove(1).is_some());
        assert!(store.remove(1).is_none());
        assert!(store.is_empty());
        assert!(!store.contains(1));
    }
}
