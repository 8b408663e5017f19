//! Configuration of a collection accessor.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::errors::{DocLensError, DocLensResult, ErrorKind};
use crate::query::QueryBuilder;
use crate::schema::{SchemaInferencer, DEFAULT_MAX_SCHEMA_DEPTH};
use crate::store::DocumentStore;

pub const DEFAULT_PAGE_LIMIT: u64 = 100;
pub const MAX_PAGE_LIMIT: u64 = 1000;
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Settings shared by every clone of a [crate::accessor::CollectionAccessor].
///
/// Values can be changed until the configuration is initialized (which
/// `AccessorBuilder::build` does); afterwards every setter fails with
/// `InvalidOperation`.
///
/// | setting | default |
/// |---|---|
/// | default page limit | 100 |
/// | maximum page limit | 1000 |
/// | default sample size | 100 |
/// | maximum schema depth | 32 |
/// | strict operators | true |
#[derive(Clone)]
pub struct AccessorConfig {
    inner: Arc<AccessorConfigInner>,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessorConfig {
    pub fn new() -> Self {
        AccessorConfig {
            inner: Arc::new(AccessorConfigInner::new()),
        }
    }

    /// Limit used when a page request carries none (or a non-positive one).
    pub fn default_page_limit(&self) -> u64 {
        self.inner.default_page_limit.load(Ordering::Relaxed)
    }

    pub fn set_default_page_limit(&self, limit: u64) -> DocLensResult<()> {
        self.inner.ensure_mutable()?;
        positive(limit, "Default page limit")?;
        self.inner.default_page_limit.store(limit, Ordering::Relaxed);
        Ok(())
    }

    /// Largest page a request may ask for; larger limits are capped.
    pub fn max_page_limit(&self) -> u64 {
        self.inner.max_page_limit.load(Ordering::Relaxed)
    }

    pub fn set_max_page_limit(&self, limit: u64) -> DocLensResult<()> {
        self.inner.ensure_mutable()?;
        positive(limit, "Maximum page limit")?;
        self.inner.max_page_limit.store(limit, Ordering::Relaxed);
        Ok(())
    }

    /// Sample size used when a schema request asks for zero documents.
    pub fn default_sample_size(&self) -> usize {
        self.inner.default_sample_size.load(Ordering::Relaxed)
    }

    pub fn set_default_sample_size(&self, size: usize) -> DocLensResult<()> {
        self.inner.ensure_mutable()?;
        positive(size as u64, "Default sample size")?;
        self.inner.default_sample_size.store(size, Ordering::Relaxed);
        Ok(())
    }

    pub fn max_schema_depth(&self) -> usize {
        self.inner.max_schema_depth.load(Ordering::Relaxed)
    }

    pub fn set_max_schema_depth(&self, depth: usize) -> DocLensResult<()> {
        self.inner.ensure_mutable()?;
        positive(depth as u64, "Maximum schema depth")?;
        self.inner.max_schema_depth.store(depth, Ordering::Relaxed);
        Ok(())
    }

    /// Whether unsupported operators fail a search or are skipped.
    pub fn strict_operators(&self) -> bool {
        self.inner.strict_operators.load(Ordering::Relaxed)
    }

    pub fn set_strict_operators(&self, strict: bool) -> DocLensResult<()> {
        self.inner.ensure_mutable()?;
        self.inner.strict_operators.store(strict, Ordering::Relaxed);
        Ok(())
    }

    /// The backend reads go to.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if no store was configured.
    pub fn document_store(&self) -> DocLensResult<DocumentStore> {
        match self.inner.store.get() {
            Some(store) => Ok(store.clone()),
            None => {
                log::error!("No document store is configured");
                Err(DocLensError::new(
                    "No document store is configured",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    /// Sets the backend. Can only be done once.
    pub fn set_document_store(&self, store: DocumentStore) -> DocLensResult<()> {
        self.inner.ensure_mutable()?;
        if self.inner.store.set(store).is_err() {
            log::error!("Document store is already configured");
            return Err(DocLensError::new(
                "Document store is already configured",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::with_strict(self.strict_operators())
    }

    pub fn schema_inferencer(&self) -> SchemaInferencer {
        SchemaInferencer::new(self.max_schema_depth())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::Relaxed)
    }

    /// Validates the settings against each other and freezes them.
    pub(crate) fn initialize(&self) -> DocLensResult<()> {
        if self.is_initialized() {
            return Ok(());
        }

        self.document_store()?;
        if self.default_page_limit() > self.max_page_limit() {
            log::error!(
                "Default page limit {} exceeds the maximum page limit {}",
                self.default_page_limit(),
                self.max_page_limit()
            );
            return Err(DocLensError::new(
                &format!(
                    "Default page limit {} exceeds the maximum page limit {}",
                    self.default_page_limit(),
                    self.max_page_limit()
                ),
                ErrorKind::ValidationError,
            ));
        }

        self.inner.initialized.store(true, Ordering::Relaxed);
        log::debug!("Accessor configuration initialized: {:?}", self);
        Ok(())
    }
}

impl Debug for AccessorConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorConfig")
            .field("default_page_limit", &self.default_page_limit())
            .field("max_page_limit", &self.max_page_limit())
            .field("default_sample_size", &self.default_sample_size())
            .field("max_schema_depth", &self.max_schema_depth())
            .field("strict_operators", &self.strict_operators())
            .field("has_store", &self.inner.store.get().is_some())
            .finish()
    }
}

struct AccessorConfigInner {
    default_page_limit: AtomicU64,
    max_page_limit: AtomicU64,
    default_sample_size: AtomicUsize,
    max_schema_depth: AtomicUsize,
    strict_operators: AtomicBool,
    store: OnceLock<DocumentStore>,
    initialized: AtomicBool,
}

impl AccessorConfigInner {
    fn new() -> Self {
        AccessorConfigInner {
            default_page_limit: AtomicU64::new(DEFAULT_PAGE_LIMIT),
            max_page_limit: AtomicU64::new(MAX_PAGE_LIMIT),
            default_sample_size: AtomicUsize::new(DEFAULT_SAMPLE_SIZE),
            max_schema_depth: AtomicUsize::new(DEFAULT_MAX_SCHEMA_DEPTH),
            strict_operators: AtomicBool::new(true),
            store: OnceLock::new(),
            initialized: AtomicBool::new(false),
        }
    }

    fn ensure_mutable(&self) -> DocLensResult<()> {
        if self.initialized.load(Ordering::Relaxed) {
            log::error!("Cannot change the accessor configuration after initialization");
            return Err(DocLensError::new(
                "Cannot change the accessor configuration after initialization",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

fn positive(value: u64, name: &str) -> DocLensResult<()> {
    if value == 0 {
        log::error!("{} must be greater than zero", name);
        return Err(DocLensError::new(
            &format!("{} must be greater than zero", name),
            ErrorKind::ValidationError,
        ));
    }
    Ok(())
}
