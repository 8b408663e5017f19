//! JSON response bodies for a request layer in front of the accessor.
//!
//! Keys are camelCase. [crate::accessor::CollectionSchema] and
//! [crate::accessor::CollectionStats] already serialize as their response
//! bodies and have no wrapper here.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::collection::{Document, Page};
use crate::common::Value;
use crate::errors::{DocLensError, ErrorKind};
use crate::query::FilterSpec;

/// `{collections, count}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionList {
    pub collections: Vec<String>,
    pub count: usize,
}

impl CollectionList {
    pub fn new(collections: BTreeSet<String>) -> Self {
        let collections: Vec<String> = collections.into_iter().collect();
        CollectionList {
            count: collections.len(),
            collections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// A window of documents:
/// `{data, pagination: {page, limit, total, totalPages}, collection}`, plus
/// `searchCriteria` when the window is a search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub data: Vec<Document>,
    pub pagination: PaginationInfo,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_criteria: Option<FilterSpec>,
}

impl PageEnvelope {
    pub fn from_page(collection: &str, page: Page) -> Self {
        let pagination = PaginationInfo {
            page: page.pagination.page(),
            limit: page.pagination.limit(),
            total: page.total,
            total_pages: page.total_pages(),
        };
        PageEnvelope {
            data: page.documents,
            pagination,
            collection: collection.to_string(),
            search_criteria: None,
        }
    }

    pub fn with_search_criteria(mut self, criteria: FilterSpec) -> Self {
        self.search_criteria = Some(criteria);
        self
    }
}

/// `{collection, field, values, count}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctEnvelope {
    pub collection: String,
    pub field: String,
    pub values: Vec<Value>,
    pub count: usize,
}

impl DistinctEnvelope {
    pub fn new(collection: &str, field: &str, values: Vec<Value>) -> Self {
        DistinctEnvelope {
            collection: collection.to_string(),
            field: field.to_string(),
            count: values.len(),
            values,
        }
    }
}

/// `{error, message}` for failures, `{error, collection}` for a missing
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl ErrorEnvelope {
    pub fn not_found(collection: &str) -> Self {
        ErrorEnvelope {
            error: ErrorKind::CollectionNotFound.to_string(),
            message: None,
            collection: Some(collection.to_string()),
        }
    }

    /// Describes a failed request. `action` names what failed, for example
    /// `"Failed to fetch data"`.
    pub fn failure(action: &str, error: &DocLensError) -> Self {
        ErrorEnvelope {
            error: action.to_string(),
            message: Some(error.message().to_string()),
            collection: None,
        }
    }

    /// Picks [ErrorEnvelope::not_found] or [ErrorEnvelope::failure] from the
    /// error's kind.
    pub fn from_error(action: &str, collection: &str, error: &DocLensError) -> Self {
        match error.kind() {
            ErrorKind::CollectionNotFound => ErrorEnvelope::not_found(collection),
            _ => ErrorEnvelope::failure(action, error),
        }
    }
}
