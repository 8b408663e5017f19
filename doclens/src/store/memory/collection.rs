use std::sync::Arc;

use parking_lot::RwLock;

use crate::collection::Document;

/// The documents of one in-memory collection, in insertion order.
///
/// Clones share the same documents. Readers see a consistent snapshot for
/// the duration of [CollectionData::read_with]; appends wait for them.
#[derive(Clone, Default)]
pub(crate) struct CollectionData {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl CollectionData {
    pub(crate) fn new() -> Self {
        CollectionData::default()
    }

    /// Runs `f` over the documents while holding the read lock.
    pub(crate) fn read_with<R>(&self, f: impl FnOnce(&[Document]) -> R) -> R {
        let guard = self.documents.read();
        f(&guard)
    }

    /// Appends documents in order and returns the new collection size.
    pub(crate) fn append(&self, documents: Vec<Document>) -> usize {
        let mut guard = self.documents.write();
        guard.extend(documents);
        guard.len()
    }
}
