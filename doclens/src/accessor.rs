//! Read access to the collections of a document store.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::accessor_builder::AccessorBuilder;
use crate::accessor_config::AccessorConfig;
use crate::collection::{limit_to, Document, FindOptions, Page, Pagination};
use crate::common::{SortOrder, Value};
use crate::errors::{DocLensError, DocLensResult, ErrorKind};
use crate::filter::all;
use crate::query::FilterSpec;
use crate::schema::SchemaDescriptor;
use crate::store::DocumentStore;

/// Inferred schema of a collection together with its size.
///
/// Serializes as the schema response body:
/// `{collection, fields, schema, sampleSize, totalDocuments}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    pub collection: String,
    pub fields: Vec<String>,
    pub schema: SchemaDescriptor,
    pub sample_size: usize,
    pub total_documents: u64,
}

/// Summary of a collection, serialized as `{collection, totalDocuments, exists}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub collection: String,
    pub total_documents: u64,
    pub exists: bool,
}

/// Generic, schema-less read access to the collections of a store.
///
/// Every read of a named collection first checks that the collection exists
/// and fails with `CollectionNotFound` if it does not. Faults reported by the
/// store are returned as the store reported them; nothing is retried and no
/// failure is turned into an empty result.
///
/// The accessor is a cheap handle: clones share the configuration and the
/// store.
///
/// ```rust
/// use doclens::accessor::CollectionAccessor;
/// use doclens::common::SortOrder;
/// use doclens::doc;
/// use doclens::query::FilterSpec;
/// use doclens::store::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// store.insert_many("users", vec![
///     doc! { name: "John Doe", age: 41 },
///     doc! { name: "Jane Roe", age: 29 },
/// ]).unwrap();
///
/// let accessor = CollectionAccessor::builder().store(store).build().unwrap();
///
/// let page = accessor.get_page("users", 0, 10, Some("age"), SortOrder::Ascending).unwrap();
/// assert_eq!(page.total, 2);
///
/// let found = accessor.search("users", &FilterSpec::new().with("name", "jo*"), 0, 10).unwrap();
/// assert_eq!(found.total, 1);
/// ```
#[derive(Clone, Debug)]
pub struct CollectionAccessor {
    config: AccessorConfig,
    store: DocumentStore,
}

impl CollectionAccessor {
    pub fn builder() -> AccessorBuilder {
        AccessorBuilder::new()
    }

    pub(crate) fn new(config: AccessorConfig, store: DocumentStore) -> Self {
        CollectionAccessor { config, store }
    }

    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Names of every collection in the store.
    pub fn list_collections(&self) -> DocLensResult<BTreeSet<String>> {
        self.store.collection_names()
    }

    /// Reports whether `name` exists. An absent collection is not an error.
    pub fn collection_exists(&self, name: &str) -> DocLensResult<bool> {
        self.store.has_collection(name)
    }

    /// Returns one window of a collection.
    ///
    /// `page` and `limit` are clamped as [Pagination::new] describes. With a
    /// `sort_by` field the documents are ordered by it (documents without the
    /// field order as null), otherwise the store order is kept. The page's
    /// total is the size of the whole collection.
    pub fn get_page(
        &self,
        name: &str,
        page: i64,
        limit: i64,
        sort_by: Option<&str>,
        sort_order: SortOrder,
    ) -> DocLensResult<Page> {
        self.ensure_exists(name)?;

        let pagination = self.pagination(page, limit);
        let mut find_options = pagination.to_find_options();
        if let Some(field) = sort_by.filter(|field| !field.is_empty()) {
            find_options = find_options.sort_by(field.to_string(), sort_order);
        }

        log::debug!(
            "Reading page {} of {} from {} with {:?}",
            pagination.page(),
            pagination.limit(),
            name,
            find_options.sort_by
        );
        let documents = self.store.find(name, &all(), &find_options)?;
        let total = self.store.count(name, &all())?;

        Ok(Page {
            documents,
            total,
            pagination,
        })
    }

    /// Returns every document of a collection in store order.
    pub fn get_all(&self, name: &str) -> DocLensResult<Vec<Document>> {
        self.ensure_exists(name)?;
        self.store.find(name, &all(), &FindOptions::new())
    }

    /// Returns one window of the documents matching `criteria`.
    ///
    /// The page's total is the number of matching documents.
    pub fn search(
        &self,
        name: &str,
        criteria: &FilterSpec,
        page: i64,
        limit: i64,
    ) -> DocLensResult<Page> {
        self.ensure_exists(name)?;

        let filter = self.config.query_builder().build(criteria)?;
        let pagination = self.pagination(page, limit);

        let documents = self
            .store
            .find(name, &filter, &pagination.to_find_options())?;
        let total = self.store.count(name, &filter)?;

        Ok(Page {
            documents,
            total,
            pagination,
        })
    }

    /// Infers the schema of a collection from its first `sample_size`
    /// documents in store order. A zero sample size means the configured
    /// default.
    pub fn get_schema(&self, name: &str, sample_size: usize) -> DocLensResult<CollectionSchema> {
        self.ensure_exists(name)?;

        let sample_size = if sample_size == 0 {
            self.config.default_sample_size()
        } else {
            sample_size
        };

        let sample = self.store.find(name, &all(), &limit_to(sample_size as u64))?;
        let total_documents = self.store.count(name, &all())?;
        let inferred = self.config.schema_inferencer().infer(&sample);

        Ok(CollectionSchema {
            collection: name.to_string(),
            fields: inferred.fields,
            schema: inferred.schema,
            sample_size: inferred.sample_size,
            total_documents,
        })
    }

    /// Distinct values of `field` over the whole collection, without
    /// duplicates. Array fields contribute their elements.
    pub fn get_distinct_values(&self, name: &str, field: &str) -> DocLensResult<Vec<Value>> {
        self.ensure_exists(name)?;

        if field.is_empty() {
            log::error!("Field name cannot be empty");
            return Err(DocLensError::new(
                "Field name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }

        self.store.distinct(name, field)
    }

    pub fn collection_stats(&self, name: &str) -> DocLensResult<CollectionStats> {
        self.ensure_exists(name)?;
        let total_documents = self.store.count(name, &all())?;
        Ok(CollectionStats {
            collection: name.to_string(),
            total_documents,
            exists: true,
        })
    }

    fn ensure_exists(&self, name: &str) -> DocLensResult<()> {
        if self.store.has_collection(name)? {
            Ok(())
        } else {
            log::error!("Collection not found: {}", name);
            Err(DocLensError::collection_not_found(name))
        }
    }

    fn pagination(&self, page: i64, limit: i64) -> Pagination {
        Pagination::new(
            page,
            limit,
            self.config.default_page_limit(),
            self.config.max_page_limit(),
        )
    }
}
