use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexSet;
use itertools::Itertools;

use crate::collection::{Document, FindOptions, SortableFields};
use crate::common::{SortOrder, Value};
use crate::errors::{DocLensError, DocLensResult, ErrorKind};
use crate::filter::Filter;
use crate::store::DocumentStoreProvider;

use super::collection::CollectionData;

/// In-memory document backend.
///
/// Each collection is a vector of documents in insertion order, guarded by
/// its own read-write lock; the collection registry is a concurrent map.
/// Reads hold a collection's lock only for the duration of the call.
///
/// Besides the read capabilities of [DocumentStoreProvider] the store offers
/// a small seeding API (`create_collection`, `insert`, `insert_many`,
/// `insert_json`, `drop_collection`).
///
/// ```rust
/// use doclens::doc;
/// use doclens::collection::FindOptions;
/// use doclens::filter::field;
/// use doclens::store::DocumentStoreProvider;
/// use doclens::store::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// store.insert_many("users", vec![doc! { age: 20 }, doc! { age: 40 }]).unwrap();
///
/// let adults = store.find("users", &field("age").gt(30), &FindOptions::new()).unwrap();
/// assert_eq!(adults.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::default()),
        }
    }

    /// Creates an empty collection. Does nothing if it already exists.
    pub fn create_collection(&self, name: &str) -> DocLensResult<()> {
        self.inner.collection_or_create(name)?;
        Ok(())
    }

    /// Appends a document, creating the collection if needed.
    pub fn insert(&self, name: &str, document: Document) -> DocLensResult<()> {
        self.insert_many(name, vec![document]).map(|_| ())
    }

    /// Appends documents in order, creating the collection if needed.
    /// Returns the number of documents inserted.
    pub fn insert_many(&self, name: &str, documents: Vec<Document>) -> DocLensResult<usize> {
        let collection = self.inner.collection_or_create(name)?;
        let count = documents.len();
        let size = collection.append(documents);
        log::debug!("Inserted {} documents into {}, now {}", count, name, size);
        Ok(count)
    }

    /// Appends documents parsed from JSON: either one object or an array of
    /// objects. Returns the number of documents inserted.
    pub fn insert_json(&self, name: &str, json: serde_json::Value) -> DocLensResult<usize> {
        let documents = match json {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Document::from_json)
                .collect::<DocLensResult<Vec<_>>>()?,
            object @ serde_json::Value::Object(_) => vec![Document::from_json(object)?],
            other => {
                log::error!("Cannot insert {} into {}, expected an object or an array", other, name);
                return Err(DocLensError::new(
                    "Expected a JSON object or an array of objects",
                    ErrorKind::InvalidDataType,
                ));
            }
        };
        self.insert_many(name, documents)
    }

    /// Removes a collection. Returns whether it existed.
    pub fn drop_collection(&self, name: &str) -> bool {
        self.inner.collections.remove(name).is_some()
    }
}

impl DocumentStoreProvider for InMemoryStore {
    fn collection_names(&self) -> DocLensResult<BTreeSet<String>> {
        Ok(self
            .inner
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }

    fn has_collection(&self, name: &str) -> DocLensResult<bool> {
        Ok(self.inner.collections.contains_key(name))
    }

    fn count(&self, name: &str, filter: &Filter) -> DocLensResult<u64> {
        let collection = self.inner.collection(name)?;
        collection.read_with(|docs| {
            let mut count = 0u64;
            for doc in docs.iter() {
                if filter.apply(doc)? {
                    count += 1;
                }
            }
            Ok(count)
        })
    }

    fn find(
        &self,
        name: &str,
        filter: &Filter,
        find_options: &FindOptions,
    ) -> DocLensResult<Vec<Document>> {
        let collection = self.inner.collection(name)?;
        let matched = collection.read_with(|docs| {
            docs.iter()
                .filter_map(|doc| match filter.apply(doc) {
                    Ok(true) => Some(Ok(doc.clone())),
                    Ok(false) => None,
                    Err(err) => Some(Err(err)),
                })
                .collect::<DocLensResult<Vec<Document>>>()
        })?;

        let sorted = match &find_options.sort_by {
            Some(sort_by) if !sort_by.is_empty() => sort_documents(matched, sort_by)?,
            _ => matched,
        };

        let skip = to_usize(find_options.skip.unwrap_or(0));
        let limit = find_options.limit.map_or(usize::MAX, to_usize);
        Ok(sorted.into_iter().skip(skip).take(limit).collect())
    }

    fn distinct(&self, name: &str, field: &str) -> DocLensResult<Vec<Value>> {
        let collection = self.inner.collection(name)?;
        collection.read_with(|docs| {
            let mut values = IndexSet::new();
            for doc in docs.iter() {
                match doc.lookup(field)? {
                    Some(Value::Array(items)) => values.extend(items),
                    Some(value) => {
                        values.insert(value);
                    }
                    None => {}
                }
            }
            Ok(values.into_iter().collect())
        })
    }
}

#[derive(Default)]
struct InMemoryStoreInner {
    collections: DashMap<String, CollectionData>,
}

impl InMemoryStoreInner {
    fn collection(&self, name: &str) -> DocLensResult<CollectionData> {
        match self.collections.get(name) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(DocLensError::collection_not_found(name)),
        }
    }

    fn collection_or_create(&self, name: &str) -> DocLensResult<CollectionData> {
        if name.is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(DocLensError::new(
                "Collection name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }

        let entry = self
            .collections
            .entry(name.to_string())
            .or_insert_with(CollectionData::new);
        Ok(entry.value().clone())
    }
}

// Stable: documents with equal keys keep their store order.
fn sort_documents(documents: Vec<Document>, sort_by: &SortableFields) -> DocLensResult<Vec<Document>> {
    let keyed = documents
        .into_iter()
        .map(|doc| {
            let keys = sort_by
                .sorting_order()
                .iter()
                .map(|(field, _)| doc.get(field))
                .collect::<DocLensResult<Vec<Value>>>()?;
            Ok((keys, doc))
        })
        .collect::<DocLensResult<Vec<(Vec<Value>, Document)>>>()?;

    Ok(keyed
        .into_iter()
        .sorted_by(|(a, _), (b, _)| compare_keys(a, b, sort_by))
        .map(|(_, doc)| doc)
        .collect())
}

fn compare_keys(a: &[Value], b: &[Value], sort_by: &SortableFields) -> Ordering {
    for ((left, right), (_, order)) in a.iter().zip(b.iter()).zip(sort_by.sorting_order()) {
        let ordering = match order {
            SortOrder::Ascending => left.cmp(right),
            SortOrder::Descending => right.cmp(left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[inline]
fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
