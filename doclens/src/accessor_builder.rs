use crate::accessor::CollectionAccessor;
use crate::accessor_config::AccessorConfig;
use crate::errors::{DocLensError, DocLensResult};
use crate::store::{DocumentStore, DocumentStoreProvider};

/// Builder for a [CollectionAccessor].
///
/// Setters validate their value as they go and the first failure is kept;
/// later setters become no-ops and [AccessorBuilder::build] returns it.
///
/// ```rust
/// use doclens::accessor::CollectionAccessor;
/// use doclens::store::memory::InMemoryStore;
///
/// let accessor = CollectionAccessor::builder()
///     .store(InMemoryStore::new())
///     .default_page_limit(25)
///     .max_page_limit(200)
///     .build()
///     .unwrap();
/// assert_eq!(accessor.config().default_page_limit(), 25);
///
/// let invalid = CollectionAccessor::builder()
///     .store(InMemoryStore::new())
///     .max_schema_depth(0)
///     .build();
/// assert!(invalid.is_err());
/// ```
pub struct AccessorBuilder {
    config: AccessorConfig,
    error: Option<DocLensError>,
}

impl Default for AccessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessorBuilder {
    pub fn new() -> Self {
        AccessorBuilder {
            config: AccessorConfig::new(),
            error: None,
        }
    }

    /// Uses `store` as the backend.
    pub fn store<T: DocumentStoreProvider + 'static>(self, store: T) -> Self {
        self.document_store(DocumentStore::new(store))
    }

    /// Uses an already wrapped backend, possibly shared with other accessors.
    pub fn document_store(self, store: DocumentStore) -> Self {
        self.apply(|config| config.set_document_store(store))
    }

    pub fn default_page_limit(self, limit: u64) -> Self {
        self.apply(|config| config.set_default_page_limit(limit))
    }

    pub fn max_page_limit(self, limit: u64) -> Self {
        self.apply(|config| config.set_max_page_limit(limit))
    }

    pub fn default_sample_size(self, size: usize) -> Self {
        self.apply(|config| config.set_default_sample_size(size))
    }

    pub fn max_schema_depth(self, depth: usize) -> Self {
        self.apply(|config| config.set_max_schema_depth(depth))
    }

    /// With `false`, unsupported operators in search criteria are skipped
    /// with a warning instead of failing the search.
    pub fn strict_operators(self, strict: bool) -> Self {
        self.apply(|config| config.set_strict_operators(strict))
    }

    /// Validates the configuration and creates the accessor.
    ///
    /// # Errors
    ///
    /// Returns the first error captured by a setter, `InvalidOperation` if no
    /// store was given, or `ValidationError` if the default page limit is
    /// above the maximum.
    pub fn build(self) -> DocLensResult<CollectionAccessor> {
        if let Some(error) = self.error {
            return Err(error);
        }

        self.config.initialize()?;
        let store = self.config.document_store()?;
        Ok(CollectionAccessor::new(self.config, store))
    }

    fn apply(mut self, setter: impl FnOnce(&AccessorConfig) -> DocLensResult<()>) -> Self {
        if self.error.is_none() {
            if let Err(e) = setter(&self.config) {
                self.error = Some(e);
            }
        }
        self
    }
}
