use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

use crate::collection::{Document, FindOptions};
use crate::common::Value;
use crate::errors::DocLensResult;
use crate::filter::Filter;

/// The capability set a document backend offers to the accessor.
///
/// Implementations are expected to be thread-safe. Failures of the backend
/// itself (I/O, driver, timeout) are reported as `AccessFailure` errors
/// carrying the backend's message; a read of a collection the backend does
/// not know is reported as `CollectionNotFound`.
///
/// A backend that cannot evaluate [Filter]s in process translates them by
/// walking the tree with [crate::filter::FilterProvider::operator] and the
/// describe methods next to it.
pub trait DocumentStoreProvider: Send + Sync {
    /// Names of every collection, sorted.
    fn collection_names(&self) -> DocLensResult<BTreeSet<String>>;

    fn has_collection(&self, name: &str) -> DocLensResult<bool>;

    /// Number of documents of `name` matching `filter`.
    fn count(&self, name: &str, filter: &Filter) -> DocLensResult<u64>;

    /// Documents of `name` matching `filter`, sorted, then skipped and
    /// limited as `find_options` says. Without a sort the store's natural
    /// order is kept.
    fn find(
        &self,
        name: &str,
        filter: &Filter,
        find_options: &FindOptions,
    ) -> DocLensResult<Vec<Document>>;

    /// Distinct values of `field` over the whole collection.
    ///
    /// Array values contribute their elements, documents without the field
    /// contribute nothing and each value appears once, in first-seen order.
    fn distinct(&self, name: &str, field: &str) -> DocLensResult<Vec<Value>>;
}

/// A cheaply clonable handle on a [DocumentStoreProvider].
///
/// ```rust
/// use doclens::doc;
/// use doclens::store::DocumentStore;
/// use doclens::store::memory::InMemoryStore;
///
/// let memory = InMemoryStore::new();
/// memory.insert("users", doc! { name: "Alice" }).unwrap();
///
/// let store = DocumentStore::new(memory);
/// assert!(store.has_collection("users").unwrap());
/// ```
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn DocumentStoreProvider>,
}

impl DocumentStore {
    pub fn new<T: DocumentStoreProvider + 'static>(inner: T) -> Self {
        DocumentStore {
            inner: Arc::new(inner),
        }
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl Deref for DocumentStore {
    type Target = Arc<dyn DocumentStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
